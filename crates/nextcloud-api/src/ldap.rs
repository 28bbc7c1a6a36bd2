// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · ldap
// ──────────────────────────────────────────────────────────────────────────────
// User LDAP app configuration API:
//  • create / read / edit / delete configurations (`s01`, `s02`, ...)
//  • typed config keys, validated before any request
//  • single-value get/set and cache flush on top of edit
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::{NextcloudError, NextcloudResult};
use crate::requester::{encode_segment, OcsEndpoint, OcsRequester, Params};
use crate::response::OcsResponse;
use log::debug;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const USER_LDAP: OcsEndpoint = OcsEndpoint::new("/ocs/v2.php/apps/user_ldap/api/v1/config", 200);

macro_rules! ldap_config_keys {
    ($($variant:ident => $key:literal,)+) => {
        /// Keys of an LDAP server configuration.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum LdapConfigKey {
            $($variant,)+
        }

        impl LdapConfigKey {
            pub const ALL: &'static [LdapConfigKey] = &[$(Self::$variant,)+];

            /// Name of the key on the wire.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }
        }
    };
}

ldap_config_keys! {
    Host => "ldapHost",
    Port => "ldapPort",
    BackupHost => "ldapBackupHost",
    BackupPort => "ldapBackupPort",
    Base => "ldapBase",
    BaseUsers => "ldapBaseUsers",
    BaseGroups => "ldapBaseGroups",
    AgentName => "ldapAgentName",
    AgentPassword => "ldapAgentPassword",
    Tls => "ldapTLS",
    TurnOffCertCheck => "turnOffCertCheck",
    UserDisplayName => "ldapUserDisplayName",
    GidNumber => "ldapGidNumber",
    UserFilterObjectclass => "ldapUserFilterObjectclass",
    UserFilterGroups => "ldapUserFilterGroups",
    UserFilter => "ldapUserFilter",
    UserFilterMode => "ldapUserFilterMode",
    GroupFilter => "ldapGroupFilter",
    GroupFilterMode => "ldapGroupFilterMode",
    GroupFilterObjectclass => "ldapGroupFilterObjectclass",
    GroupFilterGroups => "ldapGroupFilterGroups",
    GroupMemberAssocAttr => "ldapGroupMemberAssocAttr",
    GroupDisplayName => "ldapGroupDisplayName",
    LoginFilter => "ldapLoginFilter",
    LoginFilterMode => "ldapLoginFilterMode",
    LoginFilterEmail => "ldapLoginFilterEmail",
    LoginFilterUsername => "ldapLoginFilterUsername",
    LoginFilterAttributes => "ldapLoginFilterAttributes",
    QuotaAttribute => "ldapQuotaAttribute",
    QuotaDefault => "ldapQuotaDefault",
    EmailAttribute => "ldapEmailAttribute",
    CacheTtl => "ldapCacheTTL",
    UuidUserAttribute => "ldapUuidUserAttribute",
    UuidGroupAttribute => "ldapUuidGroupAttribute",
    OverrideMainServer => "ldapOverrideMainServer",
    ConfigurationActive => "ldapConfigurationActive",
    AttributesForUserSearch => "ldapAttributesForUserSearch",
    AttributesForGroupSearch => "ldapAttributesForGroupSearch",
    ExperiencedAdmin => "ldapExperiencedAdmin",
    HomeFolderNamingRule => "homeFolderNamingRule",
    HasMemberOfFilterSupport => "hasMemberOfFilterSupport",
    UseMemberOfToDetectMembership => "useMemberOfToDetectMembership",
    ExpertUsernameAttr => "ldapExpertUsernameAttr",
    ExpertUuidUserAttr => "ldapExpertUUIDUserAttr",
    ExpertUuidGroupAttr => "ldapExpertUUIDGroupAttr",
    LastJpegPhotoLookup => "lastJpegPhotoLookup",
    NestedGroups => "ldapNestedGroups",
    PagingSize => "ldapPagingSize",
    TurnOnPasswordChange => "turnOnPasswordChange",
    DynamicGroupMemberUrl => "ldapDynamicGroupMemberURL",
    DefaultPPolicyDn => "ldapDefaultPPolicyDN",
}

impl fmt::Display for LdapConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LdapConfigKey {
    type Err = NextcloudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| NextcloudError::invalid_input(format!("unknown LDAP config key '{}'", s)))
    }
}

/// Id of the `idx`-th configuration, e.g. `s01`.
pub fn ldap_config_id(idx: u32) -> String {
    format!("s{:02}", idx)
}

#[derive(Debug, Clone, Copy)]
pub struct UserLdap<'a> {
    requester: &'a OcsRequester,
}

impl<'a> UserLdap<'a> {
    pub fn new(requester: &'a OcsRequester) -> Self {
        Self { requester }
    }

    /// Create a new, empty configuration.
    pub async fn create_ldap_config(&self) -> NextcloudResult<OcsResponse> {
        self.requester.post(&USER_LDAP, "", None).await
    }

    /// All keys and values of a configuration. The agent password comes back
    /// in clear text only with `show_password = Some(true)`.
    pub async fn get_ldap_config(
        &self,
        config_id: &str,
        show_password: Option<bool>,
    ) -> NextcloudResult<OcsResponse> {
        let params = Params::new().opt("showPassword", show_password.map(u8::from));
        self.requester
            .get(&USER_LDAP, &encode_segment(config_id), &params)
            .await
    }

    /// Update a configuration. Every key must be an [`LdapConfigKey`] name;
    /// an unknown key fails before anything is sent.
    pub async fn edit_ldap_config(
        &self,
        config_id: &str,
        data: &[(&str, &str)],
    ) -> NextcloudResult<OcsResponse> {
        let form = config_data_form(data)?;
        self.requester
            .put(&USER_LDAP, &encode_segment(config_id), &form)
            .await
    }

    pub async fn delete_ldap_config(&self, config_id: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .delete(&USER_LDAP, &encode_segment(config_id), &Params::new())
            .await
    }

    /// `Some("s0N")` when configuration `idx` exists (the first one is 1).
    pub async fn get_ldap_config_id(&self, idx: u32) -> NextcloudResult<Option<String>> {
        let config_id = ldap_config_id(idx);
        let resp = self.get_ldap_config(&config_id, None).await?;
        Ok(resp.is_ok().then_some(config_id))
    }

    /// Probe indices `lower..=upper` and return the first existing id.
    pub async fn get_ldap_lowest_existing_config_id(
        &self,
        lower: u32,
        upper: u32,
    ) -> NextcloudResult<Option<String>> {
        for idx in lower..=upper {
            if let Some(config_id) = self.get_ldap_config_id(idx).await? {
                return Ok(Some(config_id));
            }
        }
        Ok(None)
    }

    /// Read one value of a configuration. Needs JSON output.
    pub async fn get_ldap_value(
        &self,
        config_id: &str,
        key: LdapConfigKey,
    ) -> NextcloudResult<Option<String>> {
        let resp = self.get_ldap_config(config_id, None).await?;
        let data = resp
            .json()
            .ok_or_else(|| NextcloudError::decode("LDAP values can only be read with JSON output"))?;
        Ok(data.get(key.as_str()).and_then(value_text))
    }

    pub async fn set_ldap_value(
        &self,
        config_id: &str,
        key: LdapConfigKey,
        value: &str,
    ) -> NextcloudResult<OcsResponse> {
        self.edit_ldap_config(config_id, &[(key.as_str(), value)])
            .await
    }

    /// Make the server drop its LDAP cache by writing `ldapCacheTTL` back
    /// with its current value.
    pub async fn ldap_cache_flush(&self, config_id: &str) -> NextcloudResult<OcsResponse> {
        let ttl = self
            .get_ldap_value(config_id, LdapConfigKey::CacheTtl)
            .await?
            .ok_or_else(|| {
                NextcloudError::decode(format!("configuration {} has no ldapCacheTTL", config_id))
            })?;
        debug!("flushing LDAP cache of {} (ttl {})", config_id, ttl);
        self.set_ldap_value(config_id, LdapConfigKey::CacheTtl, &ttl)
            .await
    }
}

fn config_data_form(data: &[(&str, &str)]) -> NextcloudResult<Params> {
    data.iter().try_fold(Params::new(), |form, (key, value)| -> NextcloudResult<Params> {
        let key: LdapConfigKey = key.parse()?;
        Ok(form.set(&format!("configData[{}]", key), value))
    })
}

fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

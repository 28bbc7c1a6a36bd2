// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · users
// ──────────────────────────────────────────────────────────────────────────────
// OCS Provisioning API – user accounts, group membership, subadmin rights,
// welcome mail.
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NextcloudResult;
use crate::requester::{encode_segment, OcsEndpoint, OcsRequester, Params};
use crate::response::OcsResponse;
use crate::types::UserField;
use serde_json::json;

/// `/ocs/v1.php/cloud/users`, success on statuscode 100.
pub const USERS: OcsEndpoint = OcsEndpoint::new("/ocs/v1.php/cloud/users", 100);

/// User provisioning wrapper.
#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    requester: &'a OcsRequester,
}

impl<'a> Users<'a> {
    pub fn new(requester: &'a OcsRequester) -> Self {
        Self { requester }
    }

    /// Create a new user.
    pub async fn add_user(&self, uid: &str, password: &str) -> NextcloudResult<OcsResponse> {
        let body = json!({ "userid": uid, "password": password });
        self.requester.post(&USERS, "", Some(&body)).await
    }

    /// List user ids, optionally filtered and paginated.
    pub async fn get_users(
        &self,
        search: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> NextcloudResult<OcsResponse> {
        let params = Params::new()
            .opt("search", search)
            .opt("limit", limit)
            .opt("offset", offset);
        self.requester.get(&USERS, "", &params).await
    }

    pub async fn get_user(&self, uid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .get(&USERS, &encode_segment(uid), &Params::new())
            .await
    }

    /// Edit one attribute of a user. `field` must name a [`UserField`];
    /// anything else is rejected before a request is made.
    pub async fn edit_user(&self, uid: &str, field: &str, value: &str) -> NextcloudResult<OcsResponse> {
        let field: UserField = field.parse()?;
        let form = Params::new().set("key", field.as_key()).set("value", value);
        self.requester.put(&USERS, &encode_segment(uid), &form).await
    }

    pub async fn disable_user(&self, uid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .put(&USERS, &format!("{}/disable", encode_segment(uid)), &Params::new())
            .await
    }

    pub async fn enable_user(&self, uid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .put(&USERS, &format!("{}/enable", encode_segment(uid)), &Params::new())
            .await
    }

    pub async fn delete_user(&self, uid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .delete(&USERS, &encode_segment(uid), &Params::new())
            .await
    }

    pub async fn add_to_group(&self, uid: &str, gid: &str) -> NextcloudResult<OcsResponse> {
        let body = json!({ "groupid": gid });
        self.requester
            .post(&USERS, &format!("{}/groups", encode_segment(uid)), Some(&body))
            .await
    }

    pub async fn remove_from_group(&self, uid: &str, gid: &str) -> NextcloudResult<OcsResponse> {
        let form = Params::new().set("groupid", gid);
        self.requester
            .delete(&USERS, &format!("{}/groups", encode_segment(uid)), &form)
            .await
    }

    /// Make `uid` a subadmin of `gid`.
    pub async fn create_subadmin(&self, uid: &str, gid: &str) -> NextcloudResult<OcsResponse> {
        let body = json!({ "groupid": gid });
        self.requester
            .post(&USERS, &format!("{}/subadmins", encode_segment(uid)), Some(&body))
            .await
    }

    pub async fn remove_subadmin(&self, uid: &str, gid: &str) -> NextcloudResult<OcsResponse> {
        let form = Params::new().set("groupid", gid);
        self.requester
            .delete(&USERS, &format!("{}/subadmins", encode_segment(uid)), &form)
            .await
    }

    /// Groups in which `uid` is a subadmin.
    pub async fn get_subadmin_groups(&self, uid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .get(&USERS, &format!("{}/subadmins", encode_segment(uid)), &Params::new())
            .await
    }

    pub async fn resend_welcome_mail(&self, uid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .post(&USERS, &format!("{}/welcome", encode_segment(uid)), None)
            .await
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

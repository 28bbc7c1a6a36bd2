// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · sharing
// ──────────────────────────────────────────────────────────────────────────────
// OCS Share API operations:
//  • Create share (user, group, public link, federated)
//  • List shares (all / per path)
//  • Get, update, delete a single share
//  • Parameter validation done before any request
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::{NextcloudError, NextcloudResult};
use crate::requester::{encode_segment, OcsEndpoint, OcsRequester, Params};
use crate::response::OcsResponse;
use crate::types::{CreateShareArgs, ShareType, UpdateShareArgs};
use serde_json::{Map, Value};

/// Shared by the local and federated share resources.
pub const SHARING: OcsEndpoint = OcsEndpoint::new("/ocs/v2.php/apps/files_sharing/api/v1", 200);

const LOCAL: &str = "shares";

fn local_url(suffix: &str) -> String {
    if suffix.is_empty() {
        LOCAL.to_string()
    } else {
        format!("{}/{}", LOCAL, suffix)
    }
}

/// `true` when the combination can be sent: a non-empty path and, for user,
/// group and federated shares, a recipient.
pub fn validate_share_parameters(path: &str, share_type: ShareType, share_with: Option<&str>) -> bool {
    !path.is_empty() && !(share_type.requires_share_with() && share_with.is_none())
}

#[derive(Debug, Clone, Copy)]
pub struct Shares<'a> {
    requester: &'a OcsRequester,
}

impl<'a> Shares<'a> {
    pub fn new(requester: &'a OcsRequester) -> Self {
        Self { requester }
    }

    /// All shares of the logged-in user.
    pub async fn get_shares(&self) -> NextcloudResult<OcsResponse> {
        self.requester
            .get(&SHARING, &local_url(""), &Params::new())
            .await
    }

    /// Shares of one file or folder. `reshares` includes other users' shares
    /// of it, `subfiles` lists shares inside a folder.
    pub async fn get_shares_from_path(
        &self,
        path: &str,
        reshares: Option<bool>,
        subfiles: Option<bool>,
    ) -> NextcloudResult<OcsResponse> {
        let params = Params::new()
            .set("path", path)
            .opt("reshares", reshares)
            .opt("subfiles", subfiles);
        self.requester.get(&SHARING, &local_url(""), &params).await
    }

    pub async fn get_share_info(&self, sid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .get(&SHARING, &local_url(&encode_segment(sid)), &Params::new())
            .await
    }

    /// Share a file or folder. Rejected locally when the arguments don't pass
    /// [`validate_share_parameters`].
    pub async fn create_share(&self, args: &CreateShareArgs) -> NextcloudResult<OcsResponse> {
        let body = create_share_body(args)?;
        self.requester
            .post(&SHARING, &local_url(""), Some(&body))
            .await
    }

    pub async fn delete_share(&self, sid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .delete(&SHARING, &local_url(&encode_segment(sid)), &Params::new())
            .await
    }

    /// Update one attribute of a share. The server accepts a single change per
    /// request, so more than one field is rejected locally.
    pub async fn update_share(&self, sid: &str, args: &UpdateShareArgs) -> NextcloudResult<OcsResponse> {
        let form = update_share_form(args)?;
        self.requester
            .put(&SHARING, &local_url(&encode_segment(sid)), &form)
            .await
    }
}

fn create_share_body(args: &CreateShareArgs) -> NextcloudResult<Value> {
    if !validate_share_parameters(&args.path, args.share_type, args.share_with.as_deref()) {
        return Err(NextcloudError::invalid_input(format!(
            "share of '{}' as {:?} needs a path and a share_with recipient",
            args.path, args.share_type
        )));
    }

    let mut body = Map::new();
    body.insert("path".into(), Value::from(args.path.clone()));
    body.insert("shareType".into(), Value::from(args.share_type.as_i32()));
    if args.share_type.requires_share_with() {
        if let Some(ref who) = args.share_with {
            body.insert("shareWith".into(), Value::from(who.clone()));
        }
    }
    if args.public_upload == Some(true) {
        body.insert("publicUpload".into(), Value::from("true"));
    }
    if args.share_type == ShareType::PublicLink {
        if let Some(ref password) = args.password {
            body.insert("password".into(), Value::from(password.clone()));
        }
    }
    if let Some(permissions) = args.permissions {
        body.insert("permissions".into(), Value::from(permissions));
    }
    Ok(Value::Object(body))
}

fn update_share_form(args: &UpdateShareArgs) -> NextcloudResult<Params> {
    if args.specified_count() > 1 {
        return Err(NextcloudError::invalid_input(
            "Only one parameter for update can be specified per request",
        ));
    }
    Ok(Params::new()
        .opt("permissions", args.permissions)
        .opt("password", args.password.as_deref())
        .opt("publicUpload", args.public_upload)
        .opt("expireDate", args.expire_date.as_deref()))
}

// ── Share URL helpers ────────────────────────────────────────────────────────

/// Public URL of a link share from its token.
pub fn share_url(base_url: &str, token: &str) -> String {
    format!("{}/s/{}", base_url.trim_end_matches('/'), token)
}

/// Direct download URL of a link share.
pub fn share_download_url(base_url: &str, token: &str) -> String {
    format!("{}/download", share_url(base_url, token))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · groups
// ──────────────────────────────────────────────────────────────────────────────
// OCS Provisioning API – groups and their subadmins.
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NextcloudResult;
use crate::requester::{encode_segment, OcsEndpoint, OcsRequester, Params};
use crate::response::OcsResponse;
use serde_json::json;

pub const GROUPS: OcsEndpoint = OcsEndpoint::new("/ocs/v1.php/cloud/groups", 100);

#[derive(Debug, Clone, Copy)]
pub struct Groups<'a> {
    requester: &'a OcsRequester,
}

impl<'a> Groups<'a> {
    pub fn new(requester: &'a OcsRequester) -> Self {
        Self { requester }
    }

    pub async fn get_groups(
        &self,
        search: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> NextcloudResult<OcsResponse> {
        let params = Params::new()
            .opt("search", search)
            .opt("limit", limit)
            .opt("offset", offset);
        self.requester.get(&GROUPS, "", &params).await
    }

    pub async fn add_group(&self, gid: &str) -> NextcloudResult<OcsResponse> {
        let body = json!({ "groupid": gid });
        self.requester.post(&GROUPS, "", Some(&body)).await
    }

    /// Members of a group.
    pub async fn get_group(&self, gid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .get(&GROUPS, &encode_segment(gid), &Params::new())
            .await
    }

    pub async fn get_subadmins(&self, gid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .get(&GROUPS, &format!("{}/subadmins", encode_segment(gid)), &Params::new())
            .await
    }

    pub async fn delete_group(&self, gid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .delete(&GROUPS, &encode_segment(gid), &Params::new())
            .await
    }
}

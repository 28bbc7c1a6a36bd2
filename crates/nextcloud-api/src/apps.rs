// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · apps
// ──────────────────────────────────────────────────────────────────────────────
// OCS Provisioning API – installed apps.
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NextcloudResult;
use crate::requester::{encode_segment, OcsEndpoint, OcsRequester, Params};
use crate::response::OcsResponse;
use crate::types::AppFilter;

pub const APPS: OcsEndpoint = OcsEndpoint::new("/ocs/v1.php/cloud/apps", 100);

#[derive(Debug, Clone, Copy)]
pub struct Apps<'a> {
    requester: &'a OcsRequester,
}

impl<'a> Apps<'a> {
    pub fn new(requester: &'a OcsRequester) -> Self {
        Self { requester }
    }

    /// List installed apps, all of them when `filter` is `None`.
    pub async fn get_apps(&self, filter: Option<AppFilter>) -> NextcloudResult<OcsResponse> {
        let params = Params::new().opt("filter", filter.map(|f| f.as_str()));
        self.requester.get(&APPS, "", &params).await
    }

    pub async fn get_app(&self, app_id: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .get(&APPS, &encode_segment(app_id), &Params::new())
            .await
    }

    pub async fn enable_app(&self, app_id: &str) -> NextcloudResult<OcsResponse> {
        self.requester.post(&APPS, &encode_segment(app_id), None).await
    }

    pub async fn disable_app(&self, app_id: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .delete(&APPS, &encode_segment(app_id), &Params::new())
            .await
    }
}

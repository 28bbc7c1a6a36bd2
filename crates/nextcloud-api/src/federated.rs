// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · federated
// ──────────────────────────────────────────────────────────────────────────────
// Federated cloud shares received from other servers (`remote_shares`).
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NextcloudResult;
use crate::requester::{encode_segment, OcsRequester, Params};
use crate::response::OcsResponse;
use crate::sharing::SHARING;

const FEDERATED: &str = "remote_shares";

fn federated_url(suffix: &str) -> String {
    if suffix.is_empty() {
        FEDERATED.to_string()
    } else {
        format!("{}/{}", FEDERATED, suffix)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FederatedShares<'a> {
    requester: &'a OcsRequester,
}

impl<'a> FederatedShares<'a> {
    pub fn new(requester: &'a OcsRequester) -> Self {
        Self { requester }
    }

    pub async fn list_accepted_federated_cloudshares(&self) -> NextcloudResult<OcsResponse> {
        self.requester
            .get(&SHARING, &federated_url(""), &Params::new())
            .await
    }

    pub async fn get_known_federated_cloudshare(&self, sid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .get(&SHARING, &federated_url(&encode_segment(sid)), &Params::new())
            .await
    }

    pub async fn delete_accepted_federated_cloudshare(&self, sid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .delete(&SHARING, &federated_url(&encode_segment(sid)), &Params::new())
            .await
    }

    pub async fn list_pending_federated_cloudshares(&self) -> NextcloudResult<OcsResponse> {
        self.requester
            .get(&SHARING, &federated_url("pending"), &Params::new())
            .await
    }

    pub async fn accept_pending_federated_cloudshare(&self, sid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .post(&SHARING, &pending_url(sid), None)
            .await
    }

    pub async fn decline_pending_federated_cloudshare(&self, sid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .delete(&SHARING, &pending_url(sid), &Params::new())
            .await
    }
}

fn pending_url(sid: &str) -> String {
    federated_url(&format!("pending/{}", encode_segment(sid)))
}

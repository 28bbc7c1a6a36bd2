// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · notifications
// ──────────────────────────────────────────────────────────────────────────────
// Notifications app API (OCS v2) for the logged-in user.
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NextcloudResult;
use crate::requester::{OcsEndpoint, OcsRequester, Params};
use crate::response::OcsResponse;

pub const NOTIFICATIONS: OcsEndpoint =
    OcsEndpoint::new("/ocs/v2.php/apps/notifications/api/v2/notifications", 200);

#[derive(Debug, Clone, Copy)]
pub struct Notifications<'a> {
    requester: &'a OcsRequester,
}

impl<'a> Notifications<'a> {
    pub fn new(requester: &'a OcsRequester) -> Self {
        Self { requester }
    }

    pub async fn get_notifications(&self) -> NextcloudResult<OcsResponse> {
        self.requester.get(&NOTIFICATIONS, "", &Params::new()).await
    }

    pub async fn get_notification(&self, notification_id: u64) -> NextcloudResult<OcsResponse> {
        self.requester
            .get(&NOTIFICATIONS, &notification_id.to_string(), &Params::new())
            .await
    }

    pub async fn delete_notification(&self, notification_id: u64) -> NextcloudResult<OcsResponse> {
        self.requester
            .delete(&NOTIFICATIONS, &notification_id.to_string(), &Params::new())
            .await
    }

    /// Dismiss every notification (Nextcloud 14+).
    pub async fn delete_all_notifications(&self) -> NextcloudResult<OcsResponse> {
        self.requester.delete(&NOTIFICATIONS, "", &Params::new()).await
    }
}

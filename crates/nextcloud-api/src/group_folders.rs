// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · group_folders
// ──────────────────────────────────────────────────────────────────────────────
// Group Folders app administration:
//  • create / rename / delete folders
//  • grant / revoke group access and per-group permissions
//  • folder quota
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NextcloudResult;
use crate::requester::{encode_segment, OcsEndpoint, OcsRequester, Params};
use crate::response::OcsResponse;
use serde_json::json;

/// Served under the app route rather than `/ocs/...`; it still answers
/// with an OCS envelope using v1 codes.
pub const GROUP_FOLDERS: OcsEndpoint = OcsEndpoint::new("/apps/groupfolders/folders", 100);

#[derive(Debug, Clone, Copy)]
pub struct GroupFolders<'a> {
    requester: &'a OcsRequester,
}

impl<'a> GroupFolders<'a> {
    pub fn new(requester: &'a OcsRequester) -> Self {
        Self { requester }
    }

    /// All configured folders and their settings.
    pub async fn get_group_folders(&self) -> NextcloudResult<OcsResponse> {
        self.requester.get(&GROUP_FOLDERS, "", &Params::new()).await
    }

    pub async fn get_group_folder(&self, fid: u64) -> NextcloudResult<OcsResponse> {
        self.requester
            .get(&GROUP_FOLDERS, &fid.to_string(), &Params::new())
            .await
    }

    pub async fn create_group_folder(&self, mountpoint: &str) -> NextcloudResult<OcsResponse> {
        let body = json!({ "mountpoint": mountpoint });
        self.requester.post(&GROUP_FOLDERS, "", Some(&body)).await
    }

    pub async fn delete_group_folder(&self, fid: u64) -> NextcloudResult<OcsResponse> {
        self.requester
            .delete(&GROUP_FOLDERS, &fid.to_string(), &Params::new())
            .await
    }

    pub async fn grant_access_to_group_folder(&self, fid: u64, gid: &str) -> NextcloudResult<OcsResponse> {
        let body = json!({ "group": gid });
        self.requester
            .post(&GROUP_FOLDERS, &format!("{}/groups", fid), Some(&body))
            .await
    }

    pub async fn revoke_access_to_group_folder(&self, fid: u64, gid: &str) -> NextcloudResult<OcsResponse> {
        self.requester
            .delete(&GROUP_FOLDERS, &group_url(fid, gid), &Params::new())
            .await
    }

    /// Set the [`Permission`](crate::types::Permission) sum `gid` has in the folder.
    pub async fn set_permissions_to_group_folder(
        &self,
        fid: u64,
        gid: &str,
        permissions: u32,
    ) -> NextcloudResult<OcsResponse> {
        let body = json!({ "permissions": permissions });
        self.requester
            .post(&GROUP_FOLDERS, &group_url(fid, gid), Some(&body))
            .await
    }

    /// Quota in bytes, [`QUOTA_UNLIMITED`](crate::types::QUOTA_UNLIMITED) for no limit.
    pub async fn set_quota_of_group_folder(&self, fid: u64, quota: i64) -> NextcloudResult<OcsResponse> {
        let body = json!({ "quota": quota });
        self.requester
            .post(&GROUP_FOLDERS, &format!("{}/quota", fid), Some(&body))
            .await
    }

    pub async fn rename_group_folder(&self, fid: u64, mountpoint: &str) -> NextcloudResult<OcsResponse> {
        let body = json!({ "mountpoint": mountpoint });
        self.requester
            .post(&GROUP_FOLDERS, &format!("{}/mountpoint", fid), Some(&body))
            .await
    }
}

fn group_url(fid: u64, gid: &str) -> String {
    format!("{}/groups/{}", fid, encode_segment(gid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_url_encodes_gid() {
        assert_eq!(group_url(3, "admin"), "3/groups/admin");
        assert_eq!(group_url(3, "Sales Team"), "3/groups/Sales%20Team");
    }
}

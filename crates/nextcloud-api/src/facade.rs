// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · facade
// ──────────────────────────────────────────────────────────────────────────────
// `NextCloud` – the single entry point.
//
// Owns one OCS requester and one WebDAV requester, hands out the resource
// wrappers, and exposes every wrapper operation directly by name. The flat
// methods and the `OPERATIONS` registry are generated from one table, so a
// name can only be defined once.
// ──────────────────────────────────────────────────────────────────────────────

use crate::activity::Activity;
use crate::apps::Apps;
use crate::capabilities::Capabilities;
use crate::config::ClientConfig;
use crate::error::NextcloudResult;
use crate::federated::FederatedShares;
use crate::group_folders::GroupFolders;
use crate::groups::Groups;
use crate::ldap::{LdapConfigKey, UserLdap};
use crate::notifications::Notifications;
use crate::requester::{OcsRequester, WebDavRequester};
use crate::response::{OcsResponse, WebDavResponse};
use crate::sharing::{self, Shares};
use crate::types::{ActivityQuery, AppFilter, CreateShareArgs, PropfindDepth, ShareType, UpdateShareArgs};
use crate::users::Users;
use crate::webdav::WebDav;
use log::debug;
use reqwest::Client;
use std::path::{Path, PathBuf};

/// Nextcloud client façade.
#[derive(Debug, Clone)]
pub struct NextCloud {
    ocs: OcsRequester,
    dav: WebDavRequester,
}

impl NextCloud {
    /// Client for `endpoint` authenticating as `user`. `json_output` selects
    /// JSON (`?format=json`) or legacy XML bodies for OCS calls.
    pub fn new(endpoint: &str, user: &str, password: &str, json_output: bool) -> Self {
        let http = Client::new();
        debug!("NextCloud client for {} as {}", endpoint, user);
        Self {
            ocs: OcsRequester::with_client(http.clone(), endpoint, user, password, json_output),
            dav: WebDavRequester::with_client(http, endpoint, user, password),
        }
    }

    /// Validate `config` and build a client from it.
    pub fn from_config(config: &ClientConfig) -> NextcloudResult<Self> {
        config.validate()?;
        Ok(Self::new(
            &config.endpoint,
            &config.user,
            &config.password,
            config.json_output,
        ))
    }

    /// Build a client from `NEXTCLOUD_*` environment variables.
    pub fn from_env() -> NextcloudResult<Self> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    pub fn ocs_requester(&self) -> &OcsRequester {
        &self.ocs
    }

    pub fn webdav_requester(&self) -> &WebDavRequester {
        &self.dav
    }

    // ── Resource wrappers ────────────────────────────────────────────────

    pub fn users(&self) -> Users<'_> {
        Users::new(&self.ocs)
    }

    pub fn groups(&self) -> Groups<'_> {
        Groups::new(&self.ocs)
    }

    pub fn apps(&self) -> Apps<'_> {
        Apps::new(&self.ocs)
    }

    pub fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::new(&self.ocs)
    }

    pub fn activity(&self) -> Activity<'_> {
        Activity::new(&self.ocs)
    }

    pub fn notifications(&self) -> Notifications<'_> {
        Notifications::new(&self.ocs)
    }

    pub fn shares(&self) -> Shares<'_> {
        Shares::new(&self.ocs)
    }

    pub fn federated_shares(&self) -> FederatedShares<'_> {
        FederatedShares::new(&self.ocs)
    }

    pub fn group_folders(&self) -> GroupFolders<'_> {
        GroupFolders::new(&self.ocs)
    }

    pub fn user_ldap(&self) -> UserLdap<'_> {
        UserLdap::new(&self.ocs)
    }

    pub fn webdav(&self) -> WebDav<'_> {
        WebDav::new(&self.dav)
    }

    /// See [`sharing::validate_share_parameters`].
    pub fn validate_share_parameters(
        &self,
        path: &str,
        share_type: ShareType,
        share_with: Option<&str>,
    ) -> bool {
        sharing::validate_share_parameters(path, share_type, share_with)
    }

    /// Resource that serves `operation`, if it is one of the façade's.
    pub fn resource_of(operation: &str) -> Option<&'static str> {
        Self::OPERATIONS
            .iter()
            .find(|(name, _)| *name == operation)
            .map(|(_, resource)| *resource)
    }
}

macro_rules! delegate {
    (
        sync { $( $sync_name:ident => $sync_resource:literal ),* $(,)? }
        $(
            $accessor:ident => $resource:literal {
                $( fn $name:ident ( $( $arg:ident : $ty:ty ),* ) -> $ret:ty; )*
            }
        )*
    ) => {
        impl NextCloud {
            $($(
                pub async fn $name(&self, $( $arg: $ty ),*) -> NextcloudResult<$ret> {
                    self.$accessor().$name($( $arg ),*).await
                }
            )*)*

            /// `(operation, resource)` for every operation reachable by name.
            pub const OPERATIONS: &'static [(&'static str, &'static str)] = &[
                $($( (stringify!($name), $resource), )*)*
                $( (stringify!($sync_name), $sync_resource), )*
            ];
        }
    };
}

delegate! {
    sync { validate_share_parameters => "shares" }
    users => "users" {
        fn add_user(uid: &str, password: &str) -> OcsResponse;
        fn get_users(search: Option<&str>, limit: Option<u32>, offset: Option<u32>) -> OcsResponse;
        fn get_user(uid: &str) -> OcsResponse;
        fn edit_user(uid: &str, field: &str, value: &str) -> OcsResponse;
        fn disable_user(uid: &str) -> OcsResponse;
        fn enable_user(uid: &str) -> OcsResponse;
        fn delete_user(uid: &str) -> OcsResponse;
        fn add_to_group(uid: &str, gid: &str) -> OcsResponse;
        fn remove_from_group(uid: &str, gid: &str) -> OcsResponse;
        fn create_subadmin(uid: &str, gid: &str) -> OcsResponse;
        fn remove_subadmin(uid: &str, gid: &str) -> OcsResponse;
        fn get_subadmin_groups(uid: &str) -> OcsResponse;
        fn resend_welcome_mail(uid: &str) -> OcsResponse;
    }
    groups => "groups" {
        fn get_groups(search: Option<&str>, limit: Option<u32>, offset: Option<u32>) -> OcsResponse;
        fn add_group(gid: &str) -> OcsResponse;
        fn get_group(gid: &str) -> OcsResponse;
        fn get_subadmins(gid: &str) -> OcsResponse;
        fn delete_group(gid: &str) -> OcsResponse;
    }
    apps => "apps" {
        fn get_apps(filter: Option<AppFilter>) -> OcsResponse;
        fn get_app(app_id: &str) -> OcsResponse;
        fn enable_app(app_id: &str) -> OcsResponse;
        fn disable_app(app_id: &str) -> OcsResponse;
    }
    capabilities => "capabilities" {
        fn get_capabilities() -> OcsResponse;
    }
    activity => "activity" {
        fn get_activities(query: &ActivityQuery) -> OcsResponse;
    }
    notifications => "notifications" {
        fn get_notifications() -> OcsResponse;
        fn get_notification(notification_id: u64) -> OcsResponse;
        fn delete_notification(notification_id: u64) -> OcsResponse;
        fn delete_all_notifications() -> OcsResponse;
    }
    shares => "shares" {
        fn get_shares() -> OcsResponse;
        fn get_shares_from_path(path: &str, reshares: Option<bool>, subfiles: Option<bool>) -> OcsResponse;
        fn get_share_info(sid: &str) -> OcsResponse;
        fn create_share(args: &CreateShareArgs) -> OcsResponse;
        fn delete_share(sid: &str) -> OcsResponse;
        fn update_share(sid: &str, args: &UpdateShareArgs) -> OcsResponse;
    }
    federated_shares => "federated_shares" {
        fn list_accepted_federated_cloudshares() -> OcsResponse;
        fn get_known_federated_cloudshare(sid: &str) -> OcsResponse;
        fn delete_accepted_federated_cloudshare(sid: &str) -> OcsResponse;
        fn list_pending_federated_cloudshares() -> OcsResponse;
        fn accept_pending_federated_cloudshare(sid: &str) -> OcsResponse;
        fn decline_pending_federated_cloudshare(sid: &str) -> OcsResponse;
    }
    group_folders => "group_folders" {
        fn get_group_folders() -> OcsResponse;
        fn get_group_folder(fid: u64) -> OcsResponse;
        fn create_group_folder(mountpoint: &str) -> OcsResponse;
        fn delete_group_folder(fid: u64) -> OcsResponse;
        fn grant_access_to_group_folder(fid: u64, gid: &str) -> OcsResponse;
        fn revoke_access_to_group_folder(fid: u64, gid: &str) -> OcsResponse;
        fn set_permissions_to_group_folder(fid: u64, gid: &str, permissions: u32) -> OcsResponse;
        fn set_quota_of_group_folder(fid: u64, quota: i64) -> OcsResponse;
        fn rename_group_folder(fid: u64, mountpoint: &str) -> OcsResponse;
    }
    user_ldap => "user_ldap" {
        fn create_ldap_config() -> OcsResponse;
        fn get_ldap_config(config_id: &str, show_password: Option<bool>) -> OcsResponse;
        fn edit_ldap_config(config_id: &str, data: &[(&str, &str)]) -> OcsResponse;
        fn delete_ldap_config(config_id: &str) -> OcsResponse;
        fn get_ldap_config_id(idx: u32) -> Option<String>;
        fn get_ldap_lowest_existing_config_id(lower: u32, upper: u32) -> Option<String>;
        fn get_ldap_value(config_id: &str, key: LdapConfigKey) -> Option<String>;
        fn set_ldap_value(config_id: &str, key: LdapConfigKey, value: &str) -> OcsResponse;
        fn ldap_cache_flush(config_id: &str) -> OcsResponse;
    }
    webdav => "webdav" {
        fn list_folders(uid: &str, path: &str, depth: PropfindDepth, all_properties: bool) -> WebDavResponse;
        fn download_file(uid: &str, path: &str, local_dir: &Path) -> Option<PathBuf>;
        fn upload_file(uid: &str, local_path: &Path, remote_path: &str, timestamp: Option<i64>) -> WebDavResponse;
        fn upload_file_contents(uid: &str, contents: Vec<u8>, remote_path: &str, timestamp: Option<i64>) -> WebDavResponse;
        fn create_folder(uid: &str, folder_path: &str) -> WebDavResponse;
        fn assure_folder_exists(uid: &str, folder_path: &str) -> bool;
        fn assure_tree_exists(uid: &str, tree: &str) -> bool;
        fn delete_path(uid: &str, path: &str) -> WebDavResponse;
        fn move_path(uid: &str, path: &str, destination_path: &str, overwrite: bool) -> WebDavResponse;
        fn copy_path(uid: &str, path: &str, destination_path: &str, overwrite: bool) -> WebDavResponse;
        fn set_favorites(uid: &str, path: &str) -> WebDavResponse;
        fn list_favorites(uid: &str, path: &str) -> WebDavResponse;
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

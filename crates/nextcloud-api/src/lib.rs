//! # nextcloud-api – Nextcloud client
//!
//! Async client for a Nextcloud server providing:
//!
//! - **Users / Groups** – OCS provisioning API: accounts, membership, sub-admins
//! - **Apps / Capabilities** – app listing and toggling, server capabilities
//! - **Sharing** – local shares and federated cloud shares
//! - **Activity / Notifications** – activity feed and notification inbox
//! - **Group Folders / LDAP** – admin APIs of the two apps
//! - **WebDAV** – listing, upload, download, move, copy, favorites
//!
//! Everything is reachable through [`NextCloud`]; each resource family is also
//! usable on its own via the wrappers it hands out.

pub mod types;
pub mod error;
pub mod config;
pub mod timestamp;
pub mod response;
pub mod projector;
pub mod requester;
pub mod users;
pub mod groups;
pub mod apps;
pub mod capabilities;
pub mod activity;
pub mod notifications;
pub mod sharing;
pub mod federated;
pub mod group_folders;
pub mod ldap;
pub mod webdav;
pub mod facade;

pub use config::ClientConfig;
pub use error::{NextcloudError, NextcloudResult};
pub use facade::NextCloud;
pub use ldap::LdapConfigKey;
pub use response::{DavPayload, OcsData, OcsResponse, WebDavResponse};
pub use types::{
    ActivityQuery, AppFilter, CreateShareArgs, FileRecord, Permission, PropfindDepth, ShareType,
    UpdateShareArgs,
};

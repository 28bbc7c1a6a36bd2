// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · types
// ──────────────────────────────────────────────────────────────────────────────
// Type catalogue for the Nextcloud client covering:
//  • OCS envelope metadata & status codes
//  • WebDAV file records and depth values
//  • Sharing types, permissions and share arguments
//  • User / app / activity request parameters
// ──────────────────────────────────────────────────────────────────────────────

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NextcloudError;

/// Quota value meaning "no limit" for users and group folders.
pub const QUOTA_UNLIMITED: i64 = -3;

// ── OCS envelope ─────────────────────────────────────────────────────────────

/// `ocs.meta` block of an OCS response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OcsMeta {
    pub status: String,
    pub statuscode: u32,
    pub message: Option<String>,
    #[serde(rename = "totalitems")]
    pub total_items: Option<String>,
    #[serde(rename = "itemsperpage")]
    pub items_per_page: Option<String>,
}

/// Well-known `ocs.meta.statuscode` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcsCode {
    Ok = 100,
    ServerError = 996,
    NotAuthorized = 997,
    NotFound = 998,
    UnknownError = 999,
}

impl OcsCode {
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            100 => Some(Self::Ok),
            996 => Some(Self::ServerError),
            997 => Some(Self::NotAuthorized),
            998 => Some(Self::NotFound),
            999 => Some(Self::UnknownError),
            _ => None,
        }
    }
}

/// Wire format requested from OCS endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
}

impl OutputFormat {
    pub fn from_json_flag(json_output: bool) -> Self {
        if json_output {
            Self::Json
        } else {
            Self::Xml
        }
    }

    pub fn is_json(self) -> bool {
        self == Self::Json
    }
}

// ── WebDAV ───────────────────────────────────────────────────────────────────

/// Depth header value for PROPFIND requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PropfindDepth {
    Zero,
    #[default]
    One,
    Infinity,
}

impl PropfindDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Infinity => "infinity",
        }
    }
}

/// `DAV:resourcetype` of a listed resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// No child element: an ordinary file.
    #[default]
    File,
    /// `<d:collection/>` child.
    Collection,
    /// Any other child element, by local name.
    Other(String),
}

impl ResourceType {
    pub const COLLECTION: &'static str = "collection";

    pub fn from_child_name(name: Option<&str>) -> Self {
        match name {
            None => Self::File,
            Some(Self::COLLECTION) => Self::Collection,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn is_collection(&self) -> bool {
        *self == Self::Collection
    }
}

/// One WebDAV resource projected from a multistatus `<d:response>`.
///
/// Scalar properties hold the element text verbatim; interpretation of
/// numbers and flags is left to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FileRecord {
    pub href: String,
    /// `d:getlastmodified`, an RFC1123 date.
    pub last_modified: Option<String>,
    pub etag: Option<String>,
    pub content_type: Option<String>,
    pub resource_type: ResourceType,
    pub content_length: Option<String>,
    pub id: Option<String>,
    pub file_id: Option<String>,
    pub favorite: Option<String>,
    pub comments_href: Option<String>,
    pub comments_count: Option<String>,
    pub comments_unread: Option<String>,
    pub owner_id: Option<String>,
    pub owner_display_name: Option<String>,
    pub share_types: Vec<String>,
    pub checksums: Option<String>,
    pub size: Option<String>,
    pub has_preview: Option<String>,
}

impl FileRecord {
    pub fn is_collection(&self) -> bool {
        self.resource_type.is_collection()
    }

    /// `last_modified` as epoch seconds, `None` when absent or unparseable.
    pub fn last_modified_epoch(&self) -> Option<i64> {
        self.last_modified
            .as_deref()
            .and_then(crate::timestamp::parse_rfc1123)
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite.as_deref() == Some("1")
    }
}

// ── Sharing ──────────────────────────────────────────────────────────────────

/// Share types understood by the OCS share API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(into = "i32", try_from = "i32")]
pub enum ShareType {
    User = 0,
    Group = 1,
    PublicLink = 3,
    FederatedCloudShare = 6,
}

impl ShareType {
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::User),
            1 => Some(Self::Group),
            3 => Some(Self::PublicLink),
            6 => Some(Self::FederatedCloudShare),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// User, group and federated shares name a recipient.
    pub fn requires_share_with(&self) -> bool {
        matches!(self, Self::User | Self::Group | Self::FederatedCloudShare)
    }
}

impl From<ShareType> for i32 {
    fn from(t: ShareType) -> Self {
        t.as_i32()
    }
}

impl TryFrom<i32> for ShareType {
    type Error = String;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        Self::from_i32(v).ok_or_else(|| format!("unknown share type {}", v))
    }
}

/// Share permission bit flags; combine by summing / or-ing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission(pub u32);

impl Permission {
    pub const READ: u32 = 1;
    pub const UPDATE: u32 = 2;
    pub const CREATE: u32 = 4;
    pub const DELETE: u32 = 8;
    pub const SHARE: u32 = 16;
    pub const ALL: u32 = 31;

    pub fn can_read(&self) -> bool {
        self.0 & Self::READ != 0
    }
    pub fn can_update(&self) -> bool {
        self.0 & Self::UPDATE != 0
    }
    pub fn can_create(&self) -> bool {
        self.0 & Self::CREATE != 0
    }
    pub fn can_delete(&self) -> bool {
        self.0 & Self::DELETE != 0
    }
    pub fn can_share(&self) -> bool {
        self.0 & Self::SHARE != 0
    }
}

/// Arguments for creating a new share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareArgs {
    /// Path to the file or folder to share.
    pub path: String,
    pub share_type: ShareType,
    /// Recipient user / group / federated cloud id.
    pub share_with: Option<String>,
    /// Allow uploads into a publicly shared folder.
    pub public_upload: Option<bool>,
    /// Password for public link shares.
    pub password: Option<String>,
    /// Sum of [`Permission`] flags.
    pub permissions: Option<u32>,
}

impl CreateShareArgs {
    pub fn new(path: &str, share_type: ShareType) -> Self {
        Self {
            path: path.to_string(),
            share_type,
            share_with: None,
            public_upload: None,
            password: None,
            permissions: None,
        }
    }

    pub fn user(path: &str, user: &str) -> Self {
        Self::new(path, ShareType::User).share_with(user)
    }

    pub fn group(path: &str, group: &str) -> Self {
        Self::new(path, ShareType::Group).share_with(group)
    }

    pub fn public_link(path: &str) -> Self {
        Self::new(path, ShareType::PublicLink)
    }

    pub fn share_with(mut self, who: &str) -> Self {
        self.share_with = Some(who.to_string());
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn permissions(mut self, permissions: u32) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn public_upload(mut self, allow: bool) -> Self {
        self.public_upload = Some(allow);
        self
    }
}

/// Update of an existing share. The server accepts one field per request.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateShareArgs {
    pub permissions: Option<u32>,
    pub password: Option<String>,
    pub public_upload: Option<bool>,
    /// `YYYY-MM-DD`, see [`datetime_to_expire_date`].
    pub expire_date: Option<String>,
}

impl UpdateShareArgs {
    pub fn specified_count(&self) -> usize {
        [
            self.permissions.is_some(),
            self.password.is_some(),
            self.public_upload.is_some(),
            self.expire_date.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

/// Format a date the way the share API expects `expireDate`.
pub fn datetime_to_expire_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ── Users / Apps ─────────────────────────────────────────────────────────────

/// User attributes editable through the provisioning API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserField {
    Email,
    Quota,
    Phone,
    Address,
    Website,
    Twitter,
    Displayname,
    Password,
}

impl UserField {
    pub const ALL: [UserField; 8] = [
        Self::Email,
        Self::Quota,
        Self::Phone,
        Self::Address,
        Self::Website,
        Self::Twitter,
        Self::Displayname,
        Self::Password,
    ];

    /// Value of the `key` form field.
    pub fn as_key(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Quota => "quota",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::Website => "website",
            Self::Twitter => "twitter",
            Self::Displayname => "displayname",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl FromStr for UserField {
    type Err = NextcloudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_key() == s)
            .ok_or_else(|| {
                let choices: Vec<&str> = Self::ALL.iter().map(|f| f.as_key()).collect();
                NextcloudError::invalid_input(format!(
                    "You have chosen to edit user's '{}', but you can choose only from: {}",
                    s,
                    choices.join(", ")
                ))
            })
    }
}

/// Filter for the app listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppFilter {
    Enabled,
    Disabled,
}

impl AppFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }
}

// ── Activity ─────────────────────────────────────────────────────────────────

/// Parameters for querying the activity feed. All optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ActivityQuery {
    /// Id of the last activity already seen.
    pub since: Option<u64>,
    /// How many activities to return (server default 50).
    pub limit: Option<u32>,
    /// Only together with `object_id`.
    pub object_type: Option<String>,
    /// Only together with `object_type`.
    pub object_id: Option<String>,
    /// "asc" or "desc".
    pub sort: Option<String>,
}

impl ActivityQuery {
    pub fn targets_object(&self) -> bool {
        self.object_type.is_some() && self.object_id.is_some()
    }
}

/// A single activity as returned in `ocs.data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityItem {
    pub activity_id: u64,
    pub app: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub user: Option<String>,
    pub affecteduser: Option<String>,
    pub subject: String,
    pub message: Option<String>,
    pub object_type: Option<String>,
    pub object_id: Option<u64>,
    pub object_name: Option<String>,
    pub link: Option<String>,
    pub datetime: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

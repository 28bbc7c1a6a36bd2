// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · webdav
// ──────────────────────────────────────────────────────────────────────────────
// WebDAV file operations for a given user:
//  • Listing (PROPFIND) and favorites (REPORT) projected into FileRecords
//  • Upload / download with modification-time propagation
//  • Folder creation, recursive creation
//  • Move / copy / delete, favorite flag
// Whole files are held in memory; there is no chunked transfer.
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::{NextcloudError, NextcloudResult};
use crate::projector::project_multistatus;
use crate::requester::WebDavRequester;
use crate::response::{DavPayload, WebDavResponse, WebDavStatusCodes};
use crate::types::PropfindDepth;
use filetime::FileTime;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// PROPFIND body asking for every property the projector knows about.
pub const ALL_PROPERTIES_BODY: &str = r#"<?xml version="1.0"?>
<d:propfind xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns" xmlns:nc="http://nextcloud.org/ns">
  <d:prop>
    <d:getlastmodified/>
    <d:getetag/>
    <d:getcontenttype/>
    <d:resourcetype/>
    <oc:fileid/>
    <oc:permissions/>
    <oc:size/>
    <d:getcontentlength/>
    <nc:has-preview/>
    <oc:favorite/>
    <oc:comments-unread/>
    <oc:owner-display-name/>
    <oc:share-types/>
  </d:prop>
</d:propfind>"#;

/// PROPPATCH body marking a resource as favorite.
pub const SET_FAVORITE_BODY: &str = r#"<?xml version="1.0"?>
<d:propertyupdate xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns">
  <d:set>
    <d:prop>
      <oc:favorite>1</oc:favorite>
    </d:prop>
  </d:set>
</d:propertyupdate>"#;

/// REPORT body selecting favorites.
pub const FAVORITES_REPORT_BODY: &str = r#"<?xml version="1.0"?>
<oc:filter-files xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns" xmlns:nc="http://nextcloud.org/ns">
  <oc:filter-rules>
    <oc:favorite>1</oc:favorite>
  </oc:filter-rules>
</oc:filter-files>"#;

#[derive(Debug, Clone, Copy)]
pub struct WebDav<'a> {
    requester: &'a WebDavRequester,
}

impl<'a> WebDav<'a> {
    pub fn new(requester: &'a WebDavRequester) -> Self {
        Self { requester }
    }

    /// List `path` of `uid` down to `depth`. On success `data` holds the
    /// projected records; on failure it is `None`.
    pub async fn list_folders(
        &self,
        uid: &str,
        path: &str,
        depth: PropfindDepth,
        all_properties: bool,
    ) -> NextcloudResult<WebDavResponse> {
        let body = all_properties.then_some(ALL_PROPERTIES_BODY);
        let resp = self.requester.propfind(uid, path, depth, body).await?;
        project_listing(resp)
    }

    /// Download the file at `path` into `local_dir`, keeping its name and
    /// its server-side modification time.
    ///
    /// Fails before downloading when the path does not exist, is a
    /// collection, or `local_dir` already holds a file of that name.
    /// Returns `None` when the server refuses the GET; nothing is written then.
    pub async fn download_file(
        &self,
        uid: &str,
        path: &str,
        local_dir: &Path,
    ) -> NextcloudResult<Option<PathBuf>> {
        let name = filename(path);
        if name.is_empty() {
            return Err(NextcloudError::invalid_input("Given path doesn't name a file"));
        }

        let listing = self.list_folders(uid, path, PropfindDepth::Zero, false).await?;
        let record = match listing.files().and_then(|files| files.first()) {
            Some(record) => record.clone(),
            None => return Err(NextcloudError::invalid_input("Given path doesn't exist")),
        };
        if record.is_collection() {
            return Err(NextcloudError::invalid_input(
                "This is a collection, please specify file path",
            ));
        }
        let target = local_dir.join(&name);
        if tokio::fs::try_exists(&target).await? {
            return Err(NextcloudError::invalid_input(format!(
                "File with such name already exists in {}",
                local_dir.display()
            )));
        }

        let resp = self.requester.download(uid, path).await?;
        let bytes = match resp.data {
            Some(DavPayload::Bytes(bytes)) if resp.is_ok => bytes,
            _ => {
                warn!("download of {} failed with HTTP {}", path, resp.http_status);
                return Ok(None);
            }
        };
        tokio::fs::write(&target, &bytes).await?;

        match record.last_modified_epoch() {
            Some(epoch) => set_mtime(&target, epoch).await?,
            None => warn!(
                "ignoring unparseable last-modified {:?} of {}",
                record.last_modified, path
            ),
        }
        info!("downloaded {} ({} bytes) to {}", path, bytes.len(), target.display());
        Ok(Some(target))
    }

    /// Upload a local file. Without `timestamp` the local modification time
    /// is sent along.
    pub async fn upload_file(
        &self,
        uid: &str,
        local_path: &Path,
        remote_path: &str,
        timestamp: Option<i64>,
    ) -> NextcloudResult<WebDavResponse> {
        let contents = tokio::fs::read(local_path).await?;
        let timestamp = match timestamp {
            Some(ts) => Some(ts),
            None => local_mtime(local_path).await?,
        };
        self.upload_file_contents(uid, contents, remote_path, timestamp)
            .await
    }

    /// Upload raw bytes. `timestamp` becomes the remote modification time.
    pub async fn upload_file_contents(
        &self,
        uid: &str,
        contents: Vec<u8>,
        remote_path: &str,
        timestamp: Option<i64>,
    ) -> NextcloudResult<WebDavResponse> {
        let len = contents.len();
        let resp = self.requester.put(uid, remote_path, contents, timestamp).await?;
        if resp.is_ok {
            info!("uploaded {} bytes to {}", len, remote_path);
        }
        Ok(resp)
    }

    pub async fn create_folder(&self, uid: &str, folder_path: &str) -> NextcloudResult<WebDavResponse> {
        self.requester.mkcol(uid, folder_path).await
    }

    /// Create the folder unless it already exists. `true` when it exists
    /// afterwards.
    pub async fn assure_folder_exists(&self, uid: &str, folder_path: &str) -> NextcloudResult<bool> {
        let resp = self.create_folder(uid, folder_path).await?;
        Ok(resp.is_ok || resp.http_status == WebDavStatusCodes::ALREADY_EXISTS)
    }

    /// Create every folder along `tree`, parents first.
    pub async fn assure_tree_exists(&self, uid: &str, tree: &str) -> NextcloudResult<bool> {
        let mut all_exist = true;
        for folder in ancestors(tree) {
            all_exist &= self.assure_folder_exists(uid, &folder).await?;
        }
        Ok(all_exist)
    }

    /// Delete a file or a folder with all its content.
    pub async fn delete_path(&self, uid: &str, path: &str) -> NextcloudResult<WebDavResponse> {
        self.requester.delete(uid, path).await
    }

    pub async fn move_path(
        &self,
        uid: &str,
        path: &str,
        destination_path: &str,
        overwrite: bool,
    ) -> NextcloudResult<WebDavResponse> {
        self.requester
            .move_to(uid, path, destination_path, overwrite)
            .await
    }

    pub async fn copy_path(
        &self,
        uid: &str,
        path: &str,
        destination_path: &str,
        overwrite: bool,
    ) -> NextcloudResult<WebDavResponse> {
        self.requester
            .copy_to(uid, path, destination_path, overwrite)
            .await
    }

    /// Mark a file or folder as favorite.
    pub async fn set_favorites(&self, uid: &str, path: &str) -> NextcloudResult<WebDavResponse> {
        self.requester.proppatch(uid, path, SET_FAVORITE_BODY).await
    }

    /// Favorites of `uid` below `path`.
    pub async fn list_favorites(&self, uid: &str, path: &str) -> NextcloudResult<WebDavResponse> {
        let resp = self.requester.report(uid, path, FAVORITES_REPORT_BODY).await?;
        project_listing(resp)
    }
}

/// Replace a listing's text body with its projection; drop it on failure.
fn project_listing(mut resp: WebDavResponse) -> NextcloudResult<WebDavResponse> {
    resp.data = if resp.is_ok {
        let files = project_multistatus(resp.text().unwrap_or_default())?;
        Some(DavPayload::Files(files))
    } else {
        None
    };
    Ok(resp)
}

// ── Local file helpers ───────────────────────────────────────────────────────

/// Last path segment, ignoring a trailing `/`.
pub fn filename(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed).to_string()
}

/// `a/b/c` → `["a", "a/b", "a/b/c"]`.
pub fn ancestors(tree: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for part in tree.split('/').filter(|p| !p.is_empty()) {
        if !current.is_empty() {
            current.push('/');
        }
        current.push_str(part);
        out.push(current.clone());
    }
    out
}

/// Local modification time in whole seconds; `None` before the epoch.
async fn local_mtime(path: &Path) -> NextcloudResult<Option<i64>> {
    let metadata = tokio::fs::metadata(path).await?;
    let secs = FileTime::from_last_modification_time(&metadata).unix_seconds();
    Ok((secs >= 0).then_some(secs))
}

async fn set_mtime(path: &Path, epoch: i64) -> NextcloudResult<()> {
    if epoch < 0 {
        warn!("not applying pre-epoch timestamp {} to {}", epoch, path.display());
        return Ok(());
    }
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        filetime::set_file_mtime(&path, FileTime::from_unix_time(epoch, 0))
    })
    .await
    .map_err(std::io::Error::other)??;
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

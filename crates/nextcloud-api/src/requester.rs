// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · requester
// ──────────────────────────────────────────────────────────────────────────────
// Low-level HTTP plumbing for the Nextcloud API covering:
//  • URL building (base + api path + suffix + optional ?format=json)
//  • OCS requests (GET query / POST json / PUT form / DELETE form)
//  • WebDAV requests (PROPFIND, PROPPATCH, REPORT, MKCOL, PUT, DELETE,
//    MOVE, COPY) and the download GET
// Every response is handed straight to the classifier; nothing is retried.
// ──────────────────────────────────────────────────────────────────────────────

use crate::config::{normalize_endpoint, ClientConfig};
use crate::error::{NextcloudError, NextcloudResult};
use crate::response::{classify_ocs, DavMethod, OcsResponse, WebDavResponse};
use crate::types::{OutputFormat, PropfindDepth};
use log::{debug, warn};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{header, Client, RequestBuilder, Response};
use serde_json::Value;

/// Root of the per-user WebDAV file tree.
pub const DAV_FILES_PATH: &str = "/remote.php/dav/files";

/// Fixed path of an OCS resource and the `ocs.meta.statuscode` that means
/// success for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OcsEndpoint {
    pub api_url: &'static str,
    pub success_code: Option<u32>,
}

impl OcsEndpoint {
    pub const fn new(api_url: &'static str, success_code: u32) -> Self {
        Self {
            api_url,
            success_code: Some(success_code),
        }
    }
}

/// `base_url + api_url [+ "/" + suffix]`, with `?format=json` in JSON mode.
pub fn full_url(base_url: &str, api_url: &str, suffix: &str, format: OutputFormat) -> String {
    let mut url = String::with_capacity(base_url.len() + api_url.len() + suffix.len() + 13);
    url.push_str(base_url);
    url.push_str(api_url);
    if !suffix.is_empty() {
        if !suffix.starts_with('/') {
            url.push('/');
        }
        url.push_str(suffix);
    }
    if format.is_json() {
        url.push_str("?format=json");
    }
    url
}

/// Query/form parameter list; `None` values are left out.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    pub fn opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(key, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }
}

#[derive(Clone)]
struct Credentials {
    user: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"****")
            .finish()
    }
}

async fn send(req: RequestBuilder, verb: &str, url: &str) -> NextcloudResult<Response> {
    debug!("{} {}", verb, url);
    req.send().await.map_err(|e| {
        warn!("{} {} failed: {}", verb, url, e);
        NextcloudError::connection(url, e)
    })
}

async fn read_text(resp: Response, url: &str) -> NextcloudResult<(u16, String)> {
    let status = resp.status().as_u16();
    let text = resp
        .text()
        .await
        .map_err(|e| NextcloudError::connection(url, e))?;
    Ok((status, text))
}

// ── OCS ──────────────────────────────────────────────────────────────────────

/// Requester for the OCS administrative API.
#[derive(Debug, Clone)]
pub struct OcsRequester {
    http: Client,
    base_url: String,
    creds: Credentials,
    format: OutputFormat,
}

impl OcsRequester {
    pub fn new(endpoint: &str, user: &str, password: &str, json_output: bool) -> Self {
        Self::with_client(Client::new(), endpoint, user, password, json_output)
    }

    pub fn with_client(
        http: Client,
        endpoint: &str,
        user: &str,
        password: &str,
        json_output: bool,
    ) -> Self {
        Self {
            http,
            base_url: normalize_endpoint(endpoint),
            creds: Credentials {
                user: user.to_string(),
                password: password.to_string(),
            },
            format: OutputFormat::from_json_flag(json_output),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.endpoint, &config.user, &config.password, config.json_output)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user(&self) -> &str {
        &self.creds.user
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn url_for(&self, endpoint: &OcsEndpoint, suffix: &str) -> String {
        full_url(&self.base_url, endpoint.api_url, suffix, self.format)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.creds.user, Some(&self.creds.password))
            .header("OCS-APIRequest", "true")
    }

    async fn finish(
        &self,
        endpoint: &OcsEndpoint,
        req: RequestBuilder,
        verb: &str,
        url: &str,
    ) -> NextcloudResult<OcsResponse> {
        let resp = send(req, verb, url).await?;
        let (status, text) = read_text(resp, url).await?;
        classify_ocs(status, &text, self.format, endpoint.success_code)
    }

    /// OCS GET with query parameters.
    pub async fn get(
        &self,
        endpoint: &OcsEndpoint,
        suffix: &str,
        params: &Params,
    ) -> NextcloudResult<OcsResponse> {
        let url = self.url_for(endpoint, suffix);
        let mut req = self
            .request(reqwest::Method::GET, &url)
            .header(header::ACCEPT, "application/json");
        if !params.is_empty() {
            req = req.query(params.as_slice());
        }
        self.finish(endpoint, req, "GET", &url).await
    }

    /// OCS POST with an optional JSON body.
    pub async fn post(
        &self,
        endpoint: &OcsEndpoint,
        suffix: &str,
        body: Option<&Value>,
    ) -> NextcloudResult<OcsResponse> {
        let url = self.url_for(endpoint, suffix);
        let mut req = self
            .request(reqwest::Method::POST, &url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            req = req.json(body);
        }
        self.finish(endpoint, req, "POST", &url).await
    }

    /// OCS PUT with a form-encoded body.
    pub async fn put(
        &self,
        endpoint: &OcsEndpoint,
        suffix: &str,
        form: &Params,
    ) -> NextcloudResult<OcsResponse> {
        let url = self.url_for(endpoint, suffix);
        let mut req = self.request(reqwest::Method::PUT, &url);
        if !form.is_empty() {
            req = req.form(form.as_slice());
        }
        self.finish(endpoint, req, "PUT", &url).await
    }

    /// OCS DELETE with an optional form-encoded body.
    pub async fn delete(
        &self,
        endpoint: &OcsEndpoint,
        suffix: &str,
        form: &Params,
    ) -> NextcloudResult<OcsResponse> {
        let url = self.url_for(endpoint, suffix);
        let mut req = self.request(reqwest::Method::DELETE, &url);
        if !form.is_empty() {
            req = req.form(form.as_slice());
        }
        self.finish(endpoint, req, "DELETE", &url).await
    }
}

// ── WebDAV ───────────────────────────────────────────────────────────────────

/// Requester for `/remote.php/dav/files/{user}/...`.
#[derive(Debug, Clone)]
pub struct WebDavRequester {
    http: Client,
    base_url: String,
    creds: Credentials,
}

impl WebDavRequester {
    pub fn new(endpoint: &str, user: &str, password: &str) -> Self {
        Self::with_client(Client::new(), endpoint, user, password)
    }

    pub fn with_client(http: Client, endpoint: &str, user: &str, password: &str) -> Self {
        Self {
            http,
            base_url: normalize_endpoint(endpoint),
            creds: Credentials {
                user: user.to_string(),
                password: password.to_string(),
            },
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.endpoint, &config.user, &config.password)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of `path` in the file tree of `uid`. Never carries `format=json`.
    pub fn file_url(&self, uid: &str, path: &str) -> String {
        full_url(
            &self.base_url,
            DAV_FILES_PATH,
            &user_path(uid, path),
            OutputFormat::Xml,
        )
    }

    fn request(&self, method: DavMethod, url: &str) -> NextcloudResult<RequestBuilder> {
        Ok(self
            .http
            .request(method.to_reqwest()?, url)
            .basic_auth(&self.creds.user, Some(&self.creds.password))
            .header("OCS-APIRequest", "true"))
    }

    async fn execute(
        &self,
        method: DavMethod,
        url: &str,
        req: RequestBuilder,
    ) -> NextcloudResult<WebDavResponse> {
        let resp = send(req, method.as_str(), url).await?;
        let (status, text) = read_text(resp, url).await?;
        Ok(WebDavResponse::classify(method, status, text))
    }

    pub async fn propfind(
        &self,
        uid: &str,
        path: &str,
        depth: PropfindDepth,
        body: Option<&str>,
    ) -> NextcloudResult<WebDavResponse> {
        let url = self.file_url(uid, path);
        let mut req = self
            .request(DavMethod::Propfind, &url)?
            .header("Depth", depth.as_str());
        if let Some(body) = body {
            req = req
                .header(header::CONTENT_TYPE, "application/xml; charset=utf-8")
                .body(body.to_string());
        }
        self.execute(DavMethod::Propfind, &url, req).await
    }

    pub async fn proppatch(&self, uid: &str, path: &str, body: &str) -> NextcloudResult<WebDavResponse> {
        let url = self.file_url(uid, path);
        let req = self
            .request(DavMethod::Proppatch, &url)?
            .header(header::CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(body.to_string());
        self.execute(DavMethod::Proppatch, &url, req).await
    }

    pub async fn report(&self, uid: &str, path: &str, body: &str) -> NextcloudResult<WebDavResponse> {
        let url = self.file_url(uid, path);
        let req = self
            .request(DavMethod::Report, &url)?
            .header(header::CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(body.to_string());
        self.execute(DavMethod::Report, &url, req).await
    }

    pub async fn mkcol(&self, uid: &str, path: &str) -> NextcloudResult<WebDavResponse> {
        let url = self.file_url(uid, path);
        let req = self.request(DavMethod::Mkcol, &url)?;
        self.execute(DavMethod::Mkcol, &url, req).await
    }

    /// PUT the given bytes; `mtime` is sent as `X-OC-MTIME` when present.
    pub async fn put(
        &self,
        uid: &str,
        path: &str,
        data: Vec<u8>,
        mtime: Option<i64>,
    ) -> NextcloudResult<WebDavResponse> {
        let url = self.file_url(uid, path);
        let mut req = self
            .request(DavMethod::Put, &url)?
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(data);
        if let Some(ts) = mtime {
            req = req.header("X-OC-MTIME", ts.to_string());
        }
        self.execute(DavMethod::Put, &url, req).await
    }

    pub async fn delete(&self, uid: &str, path: &str) -> NextcloudResult<WebDavResponse> {
        let url = self.file_url(uid, path);
        let req = self.request(DavMethod::Delete, &url)?;
        self.execute(DavMethod::Delete, &url, req).await
    }

    pub async fn move_to(
        &self,
        uid: &str,
        path: &str,
        destination: &str,
        overwrite: bool,
    ) -> NextcloudResult<WebDavResponse> {
        self.transfer(DavMethod::Move, uid, path, destination, overwrite)
            .await
    }

    pub async fn copy_to(
        &self,
        uid: &str,
        path: &str,
        destination: &str,
        overwrite: bool,
    ) -> NextcloudResult<WebDavResponse> {
        self.transfer(DavMethod::Copy, uid, path, destination, overwrite)
            .await
    }

    async fn transfer(
        &self,
        method: DavMethod,
        uid: &str,
        path: &str,
        destination: &str,
        overwrite: bool,
    ) -> NextcloudResult<WebDavResponse> {
        let url = self.file_url(uid, path);
        let destination_url = self.file_url(uid, destination);
        let req = self
            .request(method, &url)?
            .header("Destination", destination_url)
            .header("Overwrite", if overwrite { "T" } else { "F" });
        self.execute(method, &url, req).await
    }

    /// GET the raw content of a file. Successful only on HTTP 200.
    pub async fn download(&self, uid: &str, path: &str) -> NextcloudResult<WebDavResponse> {
        let url = self.file_url(uid, path);
        let req = self
            .http
            .get(&url)
            .basic_auth(&self.creds.user, Some(&self.creds.password))
            .header("OCS-APIRequest", "true");
        let resp = send(req, "GET", &url).await?;
        let status = resp.status().as_u16();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| NextcloudError::connection(&url, e))?;
        Ok(WebDavResponse::download(status, bytes.to_vec()))
    }
}

// ── Path helpers ─────────────────────────────────────────────────────────────

/// `uid[/path]`, each segment percent-encoded.
pub fn user_path(uid: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    let uid = encode_segment(uid);
    if path.is_empty() {
        uid
    } else {
        format!("{}/{}", uid, encode_dav_path(path))
    }
}

/// Percent-encode every segment of a slash-separated path.
pub fn encode_dav_path(path: &str) -> String {
    path.split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// RFC 3986 `pchar` minus `/`: unreserved, sub-delims, `:` and `@` stay literal.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

/// Percent-encode one path segment.
pub(crate) fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

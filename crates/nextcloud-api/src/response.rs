// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · response
// ──────────────────────────────────────────────────────────────────────────────
// Response classification:
//  • OCS envelope → status code + success flag against an expected code
//  • WebDAV verb → success-code table
//  • Normalized response wrappers handed back to callers
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::{NextcloudError, NextcloudResult};
use crate::types::{FileRecord, OcsMeta, OutputFormat};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// HTTP status codes that matter to WebDAV callers.
pub struct WebDavStatusCodes;

impl WebDavStatusCodes {
    pub const CREATED: u16 = 201;
    pub const NO_CONTENT: u16 = 204;
    pub const MULTISTATUS: u16 = 207;
    pub const ALREADY_EXISTS: u16 = 405;
    pub const PRECONDITION_FAILED: u16 = 412;
}

// ── WebDAV verbs ─────────────────────────────────────────────────────────────

/// WebDAV verbs with a defined success rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DavMethod {
    Propfind,
    Proppatch,
    Report,
    Mkcol,
    Put,
    Copy,
    Move,
    Delete,
}

impl DavMethod {
    pub const ALL: [DavMethod; 8] = [
        Self::Propfind,
        Self::Proppatch,
        Self::Report,
        Self::Mkcol,
        Self::Put,
        Self::Copy,
        Self::Move,
        Self::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Propfind => "PROPFIND",
            Self::Proppatch => "PROPPATCH",
            Self::Report => "REPORT",
            Self::Mkcol => "MKCOL",
            Self::Put => "PUT",
            Self::Copy => "COPY",
            Self::Move => "MOVE",
            Self::Delete => "DELETE",
        }
    }

    /// HTTP status codes counted as success for this verb.
    pub fn success_codes(&self) -> &'static [u16] {
        const MULTI: &[u16] = &[WebDavStatusCodes::MULTISTATUS];
        const CREATED: &[u16] = &[WebDavStatusCodes::CREATED];
        const CREATED_OR_EMPTY: &[u16] = &[WebDavStatusCodes::CREATED, WebDavStatusCodes::NO_CONTENT];
        const EMPTY: &[u16] = &[WebDavStatusCodes::NO_CONTENT];
        match self {
            Self::Propfind | Self::Proppatch | Self::Report => MULTI,
            Self::Mkcol | Self::Put => CREATED,
            Self::Copy | Self::Move => CREATED_OR_EMPTY,
            Self::Delete => EMPTY,
        }
    }

    pub fn is_success(&self, http_status: u16) -> bool {
        self.success_codes().contains(&http_status)
    }

    pub fn to_reqwest(&self) -> NextcloudResult<reqwest::Method> {
        reqwest::Method::from_bytes(self.as_str().as_bytes())
            .map_err(|e| NextcloudError::UnmappedVerb(format!("{}: {}", self.as_str(), e)))
    }
}

impl fmt::Display for DavMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DavMethod {
    type Err = NextcloudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or(NextcloudError::UnmappedVerb(upper))
    }
}

/// Success-code table lookup by raw verb name.
pub fn dav_success_codes(verb: &str) -> Option<&'static [u16]> {
    verb.parse::<DavMethod>().ok().map(|m| m.success_codes())
}

/// Classify a WebDAV outcome. Verbs outside the table are never successful.
pub fn classify_dav(verb: &str, http_status: u16) -> bool {
    dav_success_codes(verb)
        .map(|codes| codes.contains(&http_status))
        .unwrap_or(false)
}

// ── WebDAV response ──────────────────────────────────────────────────────────

/// Payload carried by a [`WebDavResponse`].
#[derive(Debug, Clone, PartialEq)]
pub enum DavPayload {
    Text(String),
    Bytes(Vec<u8>),
    Files(Vec<FileRecord>),
}

/// Classified WebDAV response.
#[derive(Debug, Clone)]
pub struct WebDavResponse {
    /// Verb the request was issued with.
    pub method: String,
    pub http_status: u16,
    pub is_ok: bool,
    /// `None` when a listing failed; otherwise the body in its decoded form.
    pub data: Option<DavPayload>,
}

impl WebDavResponse {
    pub fn classify(method: DavMethod, http_status: u16, body: String) -> Self {
        Self {
            method: method.as_str().to_string(),
            http_status,
            is_ok: method.is_success(http_status),
            data: Some(DavPayload::Text(body)),
        }
    }

    /// A download GET is outside the table; it succeeds on HTTP 200 only.
    pub fn download(http_status: u16, bytes: Vec<u8>) -> Self {
        Self {
            method: "GET".to_string(),
            http_status,
            is_ok: http_status == 200,
            data: Some(DavPayload::Bytes(bytes)),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self.data {
            Some(DavPayload::Text(ref t)) => Some(t),
            _ => None,
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match self.data {
            Some(DavPayload::Bytes(ref b)) => Some(b),
            _ => None,
        }
    }

    pub fn files(&self) -> Option<&[FileRecord]> {
        match self.data {
            Some(DavPayload::Files(ref f)) => Some(f),
            _ => None,
        }
    }
}

impl fmt::Display for WebDavResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_ok { "OK" } else { "Failed" };
        write!(f, "<WebDAVResponse: {} {}: {}>", self.method, self.http_status, state)
    }
}

// ── OCS response ─────────────────────────────────────────────────────────────

/// `ocs.data` of a JSON response, or the raw body in XML mode.
#[derive(Debug, Clone, PartialEq)]
pub enum OcsData {
    Json(Value),
    Text(String),
}

/// Classified OCS response.
#[derive(Debug, Clone)]
pub struct OcsResponse {
    pub http_status: u16,
    /// `ocs.meta.statuscode`.
    pub status_code: Option<u32>,
    /// `None` when the operation defines no expected code.
    pub is_ok: Option<bool>,
    pub meta: Option<OcsMeta>,
    pub data: OcsData,
}

impl OcsResponse {
    pub fn is_ok(&self) -> bool {
        self.is_ok.unwrap_or(false)
    }

    pub fn json(&self) -> Option<&Value> {
        match self.data {
            OcsData::Json(ref v) => Some(v),
            OcsData::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self.data {
            OcsData::Text(ref t) => Some(t),
            OcsData::Json(_) => None,
        }
    }

    /// Deserialize `ocs.data` into a concrete type.
    pub fn data_as<T: DeserializeOwned>(&self) -> NextcloudResult<T> {
        match self.data {
            OcsData::Json(ref v) => Ok(serde_json::from_value(v.clone())?),
            OcsData::Text(_) => Err(NextcloudError::decode(
                "response was requested in XML format; no JSON data to decode",
            )),
        }
    }
}

impl fmt::Display for OcsResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_ok() { "OK" } else { "Failed" };
        write!(f, "<OCSResponse: Status: {}>", state)
    }
}

/// Classify an OCS response body.
///
/// In JSON mode the body must carry the `{ocs: {meta, data}}` envelope. In
/// XML mode the body is returned as text and `<statuscode>` is picked out
/// when present.
pub fn classify_ocs(
    http_status: u16,
    body: &str,
    format: OutputFormat,
    expected: Option<u32>,
) -> NextcloudResult<OcsResponse> {
    let (status_code, meta, data) = match format {
        OutputFormat::Json => {
            let mut full: Value = serde_json::from_str(body).map_err(|e| {
                NextcloudError::decode(format!(
                    "OCS JSON parse error (HTTP {}): {} – body: {}",
                    http_status,
                    e,
                    truncate(body, 500)
                ))
            })?;
            let ocs = full
                .get_mut("ocs")
                .ok_or_else(|| NextcloudError::decode("OCS envelope missing 'ocs'"))?;
            let meta_value = ocs
                .get("meta")
                .cloned()
                .ok_or_else(|| NextcloudError::decode("OCS envelope missing 'ocs.meta'"))?;
            let status_code = meta_value
                .get("statuscode")
                .and_then(status_code_value)
                .ok_or_else(|| NextcloudError::decode("OCS envelope missing 'ocs.meta.statuscode'"))?;
            let meta = serde_json::from_value::<OcsMeta>(meta_value).ok();
            let data = ocs.get_mut("data").map(Value::take).unwrap_or(Value::Null);
            (Some(status_code), meta, OcsData::Json(data))
        }
        OutputFormat::Xml => (
            xml_status_code(body),
            None,
            OcsData::Text(body.to_string()),
        ),
    };

    Ok(OcsResponse {
        http_status,
        status_code,
        is_ok: expected.map(|code| status_code == Some(code)),
        meta,
        data,
    })
}

/// `statuscode` is an integer, but some apps send it as a string.
fn status_code_value(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Pull `<statuscode>` out of a legacy XML OCS body.
fn xml_status_code(body: &str) -> Option<u32> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(body);
    let mut in_meta = false;
    let mut in_statuscode = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"meta" => in_meta = true,
                b"statuscode" if in_meta => in_statuscode = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_statuscode => {
                return e.unescape().ok().and_then(|t| t.trim().parse().ok());
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"meta" => in_meta = false,
                b"statuscode" => in_statuscode = false,
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TABLE: &[(&str, &[u16])] = &[
        ("PROPFIND", &[207]),
        ("PROPPATCH", &[207]),
        ("REPORT", &[207]),
        ("MKCOL", &[201]),
        ("PUT", &[201]),
        ("COPY", &[201, 204]),
        ("MOVE", &[201, 204]),
        ("DELETE", &[204]),
    ];

    #[test]
    fn dav_table_matches_exactly() {
        for (verb, codes) in TABLE {
            for status in 100..600u16 {
                assert_eq!(
                    classify_dav(verb, status),
                    codes.contains(&status),
                    "{} {}",
                    verb,
                    status
                );
            }
        }
    }

    #[test]
    fn dav_unmapped_verbs_never_succeed() {
        for verb in ["GET", "HEAD", "POST", "LOCK", "UNLOCK", "OPTIONS", ""] {
            for status in [200, 201, 204, 207] {
                assert!(!classify_dav(verb, status), "{} {}", verb, status);
            }
            assert!(dav_success_codes(verb).is_none());
        }
    }

    #[test]
    fn dav_method_parse() {
        assert_eq!("propfind".parse::<DavMethod>().unwrap(), DavMethod::Propfind);
        assert_eq!("MOVE".parse::<DavMethod>().unwrap(), DavMethod::Move);
        let err = "GET".parse::<DavMethod>().unwrap_err();
        assert!(matches!(err, NextcloudError::UnmappedVerb(ref v) if v == "GET"));
    }

    #[test]
    fn dav_method_to_reqwest() {
        for m in DavMethod::ALL {
            assert_eq!(m.to_reqwest().unwrap().as_str(), m.as_str());
        }
    }

    #[test]
    fn webdav_response_classify() {
        let ok = WebDavResponse::classify(DavMethod::Mkcol, 201, String::new());
        assert!(ok.is_ok);
        let exists = WebDavResponse::classify(DavMethod::Mkcol, 405, "exists".into());
        assert!(!exists.is_ok);
        assert_eq!(exists.http_status, WebDavStatusCodes::ALREADY_EXISTS);
        assert_eq!(exists.text(), Some("exists"));
        assert_eq!(exists.to_string(), "<WebDAVResponse: MKCOL 405: Failed>");
    }

    #[test]
    fn webdav_download_response() {
        let r = WebDavResponse::download(200, b"abc".to_vec());
        assert!(r.is_ok);
        assert_eq!(r.bytes(), Some(&b"abc"[..]));
        assert!(!WebDavResponse::download(404, Vec::new()).is_ok);
    }

    fn envelope(code: u32) -> String {
        json!({
            "ocs": {
                "meta": {"status": "ok", "statuscode": code, "message": "OK"},
                "data": {"id": "alice", "enabled": true}
            }
        })
        .to_string()
    }

    #[test]
    fn ocs_matches_expected_code() {
        let r = classify_ocs(200, &envelope(100), OutputFormat::Json, Some(100)).unwrap();
        assert_eq!(r.is_ok, Some(true));
        assert_eq!(r.status_code, Some(100));
        assert_eq!(r.json().unwrap()["id"], "alice");
        assert_eq!(r.meta.as_ref().unwrap().status, "ok");
    }

    #[test]
    fn ocs_mismatched_expected_code() {
        let r = classify_ocs(200, &envelope(100), OutputFormat::Json, Some(200)).unwrap();
        assert_eq!(r.is_ok, Some(false));
        assert_eq!(r.status_code, Some(100));
    }

    #[test]
    fn ocs_without_expected_code_leaves_is_ok_unset() {
        let r = classify_ocs(200, &envelope(100), OutputFormat::Json, None).unwrap();
        assert_eq!(r.is_ok, None);
        assert!(!r.is_ok());
    }

    #[test]
    fn ocs_failure_preserves_status() {
        let body = json!({
            "ocs": {"meta": {"status": "failure", "statuscode": 998, "message": "not found"}, "data": []}
        })
        .to_string();
        let r = classify_ocs(404, &body, OutputFormat::Json, Some(200)).unwrap();
        assert_eq!(r.is_ok, Some(false));
        assert_eq!(r.status_code, Some(998));
        assert_eq!(r.http_status, 404);
        assert_eq!(r.json(), Some(&json!([])));
    }

    #[test]
    fn ocs_string_statuscode() {
        let body = r#"{"ocs":{"meta":{"status":"ok","statuscode":"200"},"data":{}}}"#;
        let r = classify_ocs(200, body, OutputFormat::Json, Some(200)).unwrap();
        assert_eq!(r.is_ok, Some(true));
        assert!(r.meta.is_none());
    }

    #[test]
    fn ocs_missing_envelope_is_decode_error() {
        let err = classify_ocs(200, r#"{"data":1}"#, OutputFormat::Json, Some(100)).unwrap_err();
        assert!(matches!(err, NextcloudError::Decode(_)));
        let err = classify_ocs(500, "<html>oops</html>", OutputFormat::Json, Some(100)).unwrap_err();
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn ocs_missing_data_is_null() {
        let body = r#"{"ocs":{"meta":{"status":"ok","statuscode":100}}}"#;
        let r = classify_ocs(200, body, OutputFormat::Json, Some(100)).unwrap();
        assert_eq!(r.json(), Some(&Value::Null));
    }

    #[test]
    fn ocs_xml_mode() {
        let body = r#"<?xml version="1.0"?>
<ocs>
 <meta>
  <status>ok</status>
  <statuscode>100</statuscode>
  <message>OK</message>
 </meta>
 <data><users><element>admin</element></users></data>
</ocs>"#;
        let r = classify_ocs(200, body, OutputFormat::Xml, Some(100)).unwrap();
        assert_eq!(r.status_code, Some(100));
        assert_eq!(r.is_ok, Some(true));
        assert!(r.text().unwrap().contains("<element>admin</element>"));
        assert!(r.data_as::<Value>().is_err());
    }

    #[test]
    fn ocs_xml_without_meta() {
        let r = classify_ocs(200, "plain text", OutputFormat::Xml, Some(100)).unwrap();
        assert_eq!(r.status_code, None);
        assert_eq!(r.is_ok, Some(false));
    }

    #[test]
    fn ocs_data_as_typed() {
        #[derive(serde::Deserialize)]
        struct U {
            id: String,
            enabled: bool,
        }
        let r = classify_ocs(200, &envelope(100), OutputFormat::Json, Some(100)).unwrap();
        let u: U = r.data_as().unwrap();
        assert_eq!(u.id, "alice");
        assert!(u.enabled);
        assert_eq!(r.to_string(), "<OCSResponse: Status: OK>");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }
}

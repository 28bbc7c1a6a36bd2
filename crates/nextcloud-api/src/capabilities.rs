// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · capabilities
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NextcloudResult;
use crate::requester::{OcsEndpoint, OcsRequester, Params};
use crate::response::OcsResponse;
use serde_json::Value;

/// v1 endpoint, so success is statuscode 100.
pub const CAPABILITIES: OcsEndpoint = OcsEndpoint::new("/ocs/v1.php/cloud/capabilities", 100);

#[derive(Debug, Clone, Copy)]
pub struct Capabilities<'a> {
    requester: &'a OcsRequester,
}

impl<'a> Capabilities<'a> {
    pub fn new(requester: &'a OcsRequester) -> Self {
        Self { requester }
    }

    /// Capabilities of the server and its apps.
    pub async fn get_capabilities(&self) -> NextcloudResult<OcsResponse> {
        self.requester.get(&CAPABILITIES, "", &Params::new()).await
    }
}

/// Look up a dotted path (e.g. `files_sharing.public.enabled`) inside the
/// `capabilities` object of a capabilities payload.
pub fn capability<'v>(data: &'v Value, path: &str) -> Option<&'v Value> {
    let mut current = data.get("capabilities")?;
    for key in path.split('.') {
        current = current.get(key)?;
    }
    Some(current)
}

pub fn has_capability(data: &Value, path: &str) -> bool {
    capability(data, path).is_some()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

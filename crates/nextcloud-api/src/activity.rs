// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · activity
// ──────────────────────────────────────────────────────────────────────────────
// OCS Activity API:
//  • activity feed of the logged-in user
//  • per-object feed via the `/filter` sub-resource
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NextcloudResult;
use crate::requester::{OcsEndpoint, OcsRequester, Params};
use crate::response::OcsResponse;
use crate::types::{ActivityItem, ActivityQuery};

pub const ACTIVITY: OcsEndpoint = OcsEndpoint::new("/ocs/v2.php/apps/activity/api/v2/activity", 200);

#[derive(Debug, Clone, Copy)]
pub struct Activity<'a> {
    requester: &'a OcsRequester,
}

impl<'a> Activity<'a> {
    pub fn new(requester: &'a OcsRequester) -> Self {
        Self { requester }
    }

    /// Fetch the activity feed. When both `object_type` and `object_id` are
    /// set the request goes to `/filter`.
    pub async fn get_activities(&self, query: &ActivityQuery) -> NextcloudResult<OcsResponse> {
        let suffix = if query.targets_object() { "filter" } else { "" };
        self.requester.get(&ACTIVITY, suffix, &query_params(query)).await
    }
}

impl ActivityQuery {
    /// Activities of a single object, e.g. `("files", "42")`.
    pub fn for_object(object_type: &str, object_id: &str) -> Self {
        Self {
            object_type: Some(object_type.to_string()),
            object_id: Some(object_id.to_string()),
            ..Self::default()
        }
    }

    pub fn since(mut self, since: u64) -> Self {
        self.since = Some(since);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort(mut self, sort: &str) -> Self {
        self.sort = Some(sort.to_string());
        self
    }
}

fn query_params(query: &ActivityQuery) -> Params {
    Params::new()
        .opt("since", query.since)
        .opt("limit", query.limit)
        .opt("object_type", query.object_type.as_deref())
        .opt("object_id", query.object_id.as_deref())
        .opt("sort", query.sort.as_deref())
}

/// Decode the activity list out of a JSON-mode response.
pub fn activity_items(resp: &OcsResponse) -> NextcloudResult<Vec<ActivityItem>> {
    resp.data_as()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::classify_ocs;
    use crate::types::OutputFormat;

    #[test]
    fn default_query_sends_nothing() {
        assert!(query_params(&ActivityQuery::default()).is_empty());
    }

    #[test]
    fn query_params_in_order() {
        let q = ActivityQuery::for_object("files", "42").since(7).limit(5).sort("asc");
        let params = query_params(&q);
        let keys: Vec<&str> = params
            .as_slice()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, ["since", "limit", "object_type", "object_id", "sort"]);
        assert!(q.targets_object());
    }

    #[test]
    fn decodes_items() {
        let body = r#"{"ocs":{"meta":{"status":"ok","statuscode":200,"message":"OK"},"data":[
            {"activity_id":12,"app":"files","type":"file_created","user":"alice",
             "affecteduser":"alice","subject":"You created a.txt","message":"",
             "object_type":"files","object_id":42,"object_name":"/a.txt",
             "link":"https://nc.test/f/42","datetime":"2024-01-01T00:00:00+00:00"}]}}"#;
        let resp = classify_ocs(200, body, OutputFormat::Json, ACTIVITY.success_code).unwrap();
        assert!(resp.is_ok());
        let items = activity_items(&resp).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].activity_id, 12);
        assert_eq!(items[0].activity_type, "file_created");
        assert_eq!(items[0].object_id, Some(42));
    }
}

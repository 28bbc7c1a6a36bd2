// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-api · projector
// ──────────────────────────────────────────────────────────────────────────────
// WebDAV multistatus XML → FileRecord projection:
//  • small element tree built with quick-xml (namespace prefixes dropped)
//  • one record per <d:response>, in document order
//  • only propstat blocks reporting "HTTP/1.1 200 OK" contribute properties
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::{NextcloudError, NextcloudResult};
use crate::types::{FileRecord, ResourceType};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Status line of a propstat block whose properties are usable.
pub const PROPSTAT_OK: &str = "HTTP/1.1 200 OK";

/// Element with its local name, leading text and child elements.
#[derive(Debug, Default, Clone, PartialEq)]
struct Node {
    name: String,
    /// Text before the first child element.
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn named(raw: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(raw).into_owned(),
            ..Self::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn text_opt(&self) -> Option<String> {
        if self.text.is_empty() {
            None
        } else {
            Some(self.text.clone())
        }
    }
}

/// Parse a multistatus body into one record per `<response>`.
///
/// An empty body or a multistatus without responses gives an empty list.
pub fn project_multistatus(xml: &str) -> NextcloudResult<Vec<FileRecord>> {
    if xml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let root = match parse_tree(xml)? {
        Some(root) => root,
        None => return Ok(Vec::new()),
    };
    root.children_named("response").map(project_response).collect()
}

fn project_response(response: &Node) -> NextcloudResult<FileRecord> {
    let href = response
        .child("href")
        .ok_or_else(|| NextcloudError::decode("multistatus response without <href>"))?;
    let mut record = FileRecord {
        href: href.text.clone(),
        ..FileRecord::default()
    };

    for propstat in response.children_named("propstat") {
        let status = propstat.child("status").map(|s| s.text.as_str());
        if status != Some(PROPSTAT_OK) {
            continue;
        }
        if let Some(prop) = propstat.child("prop") {
            for property in &prop.children {
                apply_property(&mut record, property);
            }
        }
    }
    Ok(record)
}

fn apply_property(record: &mut FileRecord, property: &Node) {
    match property.name.as_str() {
        "getlastmodified" => record.last_modified = property.text_opt(),
        "getetag" => record.etag = property.text_opt(),
        "getcontenttype" => record.content_type = property.text_opt(),
        "resourcetype" => {
            let first = property.children.first().map(|c| c.name.as_str());
            record.resource_type = ResourceType::from_child_name(first);
        }
        "getcontentlength" => record.content_length = property.text_opt(),
        "id" => record.id = property.text_opt(),
        "fileid" => record.file_id = property.text_opt(),
        "favorite" => record.favorite = property.text_opt(),
        "comments-href" => record.comments_href = property.text_opt(),
        "comments-count" => record.comments_count = property.text_opt(),
        "comments-unread" => record.comments_unread = property.text_opt(),
        "owner-id" => record.owner_id = property.text_opt(),
        "owner-display-name" => record.owner_display_name = property.text_opt(),
        "share-types" => {
            record.share_types = property
                .children_named("share-type")
                .filter_map(Node::text_opt)
                .collect();
        }
        "checksums" => {
            record.checksums = match property.child("checksum") {
                Some(checksum) => checksum.text_opt(),
                None => property.text_opt(),
            };
        }
        "size" => record.size = property.text_opt(),
        "href" => {
            if let Some(href) = property.text_opt() {
                record.href = href;
            }
        }
        "has-preview" => record.has_preview = property.text_opt(),
        _ => {}
    }
}

// ── Tree builder ─────────────────────────────────────────────────────────────

fn parse_tree(xml: &str) -> NextcloudResult<Option<Node>> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(Node::named(e.local_name().as_ref())),
            Event::Empty(e) => attach(&mut stack, &mut root, Node::named(e.local_name().as_ref()))?,
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    if top.children.is_empty() {
                        top.text.push_str(&t.unescape()?);
                    }
                }
            }
            Event::CData(c) => {
                if let Some(top) = stack.last_mut() {
                    if top.children.is_empty() {
                        top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| NextcloudError::decode("unbalanced closing tag"))?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(NextcloudError::decode(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }
    Ok(root)
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) -> NextcloudResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => {
            return Err(NextcloudError::decode(format!(
                "second root element <{}>",
                node.name
            )))
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:" xmlns:s="http://sabredav.org/ns" xmlns:oc="http://owncloud.org/ns" xmlns:nc="http://nextcloud.org/ns">
  <d:response>
    <d:href>/remote.php/dav/files/alice/</d:href>
    <d:propstat>
      <d:prop>
        <d:getlastmodified>Sun, 09 Sep 2001 01:46:40 GMT</d:getlastmodified>
        <d:resourcetype><d:collection/></d:resourcetype>
        <d:getetag>&quot;5b8d1b3e&quot;</d:getetag>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
    <d:propstat>
      <d:prop>
        <d:getcontenttype/>
        <d:getcontentlength/>
      </d:prop>
      <d:status>HTTP/1.1 404 Not Found</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/remote.php/dav/files/alice/notes.txt</d:href>
    <d:propstat>
      <d:prop>
        <d:getlastmodified>Mon, 01 Jan 2024 00:00:00 GMT</d:getlastmodified>
        <d:getcontentlength>42</d:getcontentlength>
        <d:getcontenttype>text/plain</d:getcontenttype>
        <d:resourcetype/>
        <oc:fileid>117</oc:fileid>
        <oc:favorite>1</oc:favorite>
        <oc:owner-display-name>Alice</oc:owner-display-name>
        <oc:share-types><oc:share-type>0</oc:share-type><oc:share-type>3</oc:share-type></oc:share-types>
        <oc:checksums><oc:checksum>SHA1:abc MD5:def</oc:checksum></oc:checksums>
        <nc:has-preview>true</nc:has-preview>
        <oc:permissions>RGDNVW</oc:permissions>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;

    #[test]
    fn projects_each_response_in_order() {
        let files = project_multistatus(LISTING).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].href, "/remote.php/dav/files/alice/");
        assert_eq!(files[1].href, "/remote.php/dav/files/alice/notes.txt");
    }

    #[test]
    fn collection_and_file_resource_types() {
        let files = project_multistatus(LISTING).unwrap();
        assert_eq!(files[0].resource_type, ResourceType::Collection);
        assert!(files[0].is_collection());
        assert_eq!(files[1].resource_type, ResourceType::File);
    }

    #[test]
    fn non_ok_propstat_is_ignored() {
        let files = project_multistatus(LISTING).unwrap();
        assert_eq!(files[0].content_type, None);
        assert_eq!(files[0].content_length, None);
        assert_eq!(files[0].etag.as_deref(), Some("\"5b8d1b3e\""));
        assert_eq!(files[0].last_modified_epoch(), Some(1_000_000_000));
    }

    #[test]
    fn scalar_properties_are_verbatim_text() {
        let f = &project_multistatus(LISTING).unwrap()[1];
        assert_eq!(f.content_length.as_deref(), Some("42"));
        assert_eq!(f.content_type.as_deref(), Some("text/plain"));
        assert_eq!(f.file_id.as_deref(), Some("117"));
        assert_eq!(f.favorite.as_deref(), Some("1"));
        assert_eq!(f.owner_display_name.as_deref(), Some("Alice"));
        assert_eq!(f.has_preview.as_deref(), Some("true"));
        assert_eq!(f.share_types, vec!["0".to_string(), "3".to_string()]);
        assert_eq!(f.checksums.as_deref(), Some("SHA1:abc MD5:def"));
    }

    #[test]
    fn empty_inputs_give_empty_listing() {
        assert!(project_multistatus("").unwrap().is_empty());
        assert!(project_multistatus("  \n").unwrap().is_empty());
        assert!(project_multistatus(r#"<d:multistatus xmlns:d="DAV:"/>"#)
            .unwrap()
            .is_empty());
        assert!(project_multistatus(r#"<?xml version="1.0"?><d:multistatus xmlns:d="DAV:"></d:multistatus>"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn malformed_xml_is_decode_error() {
        let err = project_multistatus("<d:multistatus><d:response></d:multistatus>").unwrap_err();
        assert!(matches!(err, NextcloudError::Decode(_)));
        let err = project_multistatus("<d:multistatus><d:response>").unwrap_err();
        assert!(matches!(err, NextcloudError::Decode(_)));
    }

    #[test]
    fn status_must_match_exactly() {
        let xml = r#"<d:multistatus xmlns:d="DAV:">
  <d:response>
    <d:href>/a</d:href>
    <d:propstat>
      <d:prop><d:getetag>x</d:getetag></d:prop>
      <d:status> HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;
        let files = project_multistatus(xml).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].etag, None);
    }

    #[test]
    fn unknown_resource_type_keeps_name() {
        let xml = r#"<d:multistatus xmlns:d="DAV:" xmlns:cal="urn:ietf:params:xml:ns:caldav">
  <d:response>
    <d:href>/cal/</d:href>
    <d:propstat>
      <d:prop><d:resourcetype><cal:calendar/><d:collection/></d:resourcetype></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;
        let files = project_multistatus(xml).unwrap();
        assert_eq!(files[0].resource_type, ResourceType::Other("calendar".into()));
    }

    #[test]
    fn unknown_properties_are_skipped() {
        let xml = r#"<d:multistatus xmlns:d="DAV:" xmlns:x="urn:x">
  <d:response>
    <d:href>/f</d:href>
    <d:propstat>
      <d:prop><x:custom>v</x:custom><d:getetag>e</d:getetag></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;
        let f = &project_multistatus(xml).unwrap()[0];
        assert_eq!(f.etag.as_deref(), Some("e"));
    }

    #[test]
    fn checksums_without_child_use_own_text() {
        let xml = r#"<d:multistatus xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns">
  <d:response>
    <d:href>/f</d:href>
    <d:propstat>
      <d:prop><oc:checksums>MD5:123</oc:checksums></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;
        let f = &project_multistatus(xml).unwrap()[0];
        assert_eq!(f.checksums.as_deref(), Some("MD5:123"));
    }

    #[test]
    fn response_without_href_is_rejected() {
        let xml = r#"<d:multistatus xmlns:d="DAV:"><d:response><d:propstat/></d:response></d:multistatus>"#;
        assert!(project_multistatus(xml).is_err());
    }
}

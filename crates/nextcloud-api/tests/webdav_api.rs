use filetime::FileTime;
use mockito::{Matcher, Server, ServerGuard};
use nextcloud_api::timestamp::format_rfc1123;
use nextcloud_api::{DavPayload, NextCloud, PropfindDepth};

const AUTH: &str = "Basic YWRtaW46c2VjcmV0";
const EPOCH: i64 = 1_000_000_000;
const EPOCH_HTTP: &str = "Sun, 09 Sep 2001 01:46:40 GMT";

fn client(server: &ServerGuard) -> NextCloud {
    NextCloud::new(&server.url(), "admin", "secret", true)
}

fn file_entry(href: &str, modified: &str) -> String {
    format!(
        r#"<d:response>
    <d:href>{href}</d:href>
    <d:propstat>
      <d:prop>
        <d:getlastmodified>{modified}</d:getlastmodified>
        <d:getcontentlength>5</d:getcontentlength>
        <d:resourcetype/>
        <d:getetag>"abc"</d:getetag>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>"#
    )
}

fn folder_entry(href: &str) -> String {
    format!(
        r#"<d:response>
    <d:href>{href}</d:href>
    <d:propstat>
      <d:prop>
        <d:resourcetype><d:collection/></d:resourcetype>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>"#
    )
}

fn multistatus(entries: &[String]) -> String {
    format!(
        r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns">
  {}
</d:multistatus>"#,
        entries.join("\n")
    )
}

// ── Listing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_folders_projects_records() {
    let mut server = Server::new_async().await;
    let body = multistatus(&[
        folder_entry("/remote.php/dav/files/alice/Docs/"),
        file_entry("/remote.php/dav/files/alice/Docs/a.txt", EPOCH_HTTP),
    ]);
    let mock = server
        .mock("PROPFIND", "/remote.php/dav/files/alice/Docs")
        .match_header("authorization", AUTH)
        .match_header("depth", "1")
        .with_status(207)
        .with_body(body)
        .create_async()
        .await;

    let resp = client(&server)
        .list_folders("alice", "Docs", PropfindDepth::One, false)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(resp.is_ok);
    assert_eq!(resp.method, "PROPFIND");
    let files = resp.files().unwrap();
    assert_eq!(files.len(), 2);
    assert!(files[0].is_collection());
    assert_eq!(files[1].href, "/remote.php/dav/files/alice/Docs/a.txt");
    assert_eq!(files[1].last_modified_epoch(), Some(EPOCH));
}

#[tokio::test]
async fn test_list_folders_all_properties_sends_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PROPFIND", "/remote.php/dav/files/alice")
        .match_body(Matcher::Regex("<oc:share-types/>".into()))
        .with_status(207)
        .with_body(multistatus(&[folder_entry("/remote.php/dav/files/alice/")]))
        .create_async()
        .await;

    let resp = client(&server)
        .list_folders("alice", "", PropfindDepth::Zero, true)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(resp.files().map(|f| f.len()), Some(1));
}

#[tokio::test]
async fn test_failed_listing_has_no_data() {
    let mut server = Server::new_async().await;
    server
        .mock("PROPFIND", "/remote.php/dav/files/alice/missing")
        .with_status(404)
        .with_body("<d:error xmlns:d=\"DAV:\"/>")
        .create_async()
        .await;

    let resp = client(&server)
        .list_folders("alice", "missing", PropfindDepth::One, false)
        .await
        .unwrap();

    assert!(!resp.is_ok);
    assert_eq!(resp.http_status, 404);
    assert!(resp.data.is_none());
}

#[tokio::test]
async fn test_list_favorites_uses_report() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("REPORT", "/remote.php/dav/files/alice")
        .match_body(Matcher::Regex("<oc:favorite>1</oc:favorite>".into()))
        .with_status(207)
        .with_body(multistatus(&[file_entry(
            "/remote.php/dav/files/alice/fav.txt",
            EPOCH_HTTP,
        )]))
        .create_async()
        .await;

    let resp = client(&server).list_favorites("alice", "").await.unwrap();

    mock.assert_async().await;
    assert_eq!(resp.files().unwrap()[0].href, "/remote.php/dav/files/alice/fav.txt");
}

// ── Status table ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_mkcol_success_and_conflict() {
    let mut server = Server::new_async().await;
    server
        .mock("MKCOL", "/remote.php/dav/files/alice/new")
        .with_status(201)
        .create_async()
        .await;
    server
        .mock("MKCOL", "/remote.php/dav/files/alice/old")
        .with_status(405)
        .create_async()
        .await;

    let nc = client(&server);
    assert!(nc.create_folder("alice", "new").await.unwrap().is_ok);
    let existing = nc.create_folder("alice", "old").await.unwrap();
    assert!(!existing.is_ok);
    assert_eq!(existing.http_status, 405);
    assert!(nc.assure_folder_exists("alice", "old").await.unwrap());
}

#[tokio::test]
async fn test_assure_tree_creates_parents_first() {
    let mut server = Server::new_async().await;
    let a = server
        .mock("MKCOL", "/remote.php/dav/files/alice/a")
        .with_status(405)
        .create_async()
        .await;
    let ab = server
        .mock("MKCOL", "/remote.php/dav/files/alice/a/b")
        .with_status(201)
        .create_async()
        .await;
    let abc = server
        .mock("MKCOL", "/remote.php/dav/files/alice/a/b/c")
        .with_status(201)
        .create_async()
        .await;

    assert!(client(&server).assure_tree_exists("alice", "a/b/c").await.unwrap());
    a.assert_async().await;
    ab.assert_async().await;
    abc.assert_async().await;
}

#[tokio::test]
async fn test_delete_requires_no_content() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/remote.php/dav/files/alice/gone.txt")
        .with_status(204)
        .create_async()
        .await;
    server
        .mock("DELETE", "/remote.php/dav/files/alice/odd.txt")
        .with_status(200)
        .create_async()
        .await;

    let nc = client(&server);
    assert!(nc.delete_path("alice", "gone.txt").await.unwrap().is_ok);
    assert!(!nc.delete_path("alice", "odd.txt").await.unwrap().is_ok);
}

#[tokio::test]
async fn test_move_sends_destination_and_overwrite() {
    let mut server = Server::new_async().await;
    let destination = format!("{}/remote.php/dav/files/alice/b%20c.txt", server.url());
    let mock = server
        .mock("MOVE", "/remote.php/dav/files/alice/a.txt")
        .match_header("destination", destination.as_str())
        .match_header("overwrite", "F")
        .with_status(201)
        .create_async()
        .await;

    let resp = client(&server)
        .move_path("alice", "a.txt", "b c.txt", false)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(resp.is_ok);
}

#[tokio::test]
async fn test_copy_accepts_no_content() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("COPY", "/remote.php/dav/files/alice/a.txt")
        .match_header("overwrite", "T")
        .with_status(204)
        .create_async()
        .await;

    let resp = client(&server)
        .copy_path("alice", "a.txt", "b.txt", true)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(resp.is_ok);
}

#[tokio::test]
async fn test_set_favorites_uses_proppatch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PROPPATCH", "/remote.php/dav/files/alice/a.txt")
        .match_body(Matcher::Regex("<oc:favorite>1</oc:favorite>".into()))
        .with_status(207)
        .with_body(multistatus(&[]))
        .create_async()
        .await;

    assert!(client(&server).set_favorites("alice", "a.txt").await.unwrap().is_ok);
    mock.assert_async().await;
}

// ── Upload / download ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_file_sends_local_mtime() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("a.txt");
    std::fs::write(&local, b"hello").unwrap();
    filetime::set_file_mtime(&local, FileTime::from_unix_time(EPOCH, 0)).unwrap();

    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/remote.php/dav/files/alice/Docs/a.txt")
        .match_header("x-oc-mtime", "1000000000")
        .match_body("hello")
        .with_status(201)
        .create_async()
        .await;

    let resp = client(&server)
        .upload_file("alice", &local, "Docs/a.txt", None)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(resp.is_ok);
}

#[tokio::test]
async fn test_upload_contents_with_explicit_timestamp() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/remote.php/dav/files/alice/b.txt")
        .match_header("x-oc-mtime", "42")
        .with_status(201)
        .create_async()
        .await;

    let resp = client(&server)
        .upload_file_contents("alice", b"data".to_vec(), "b.txt", Some(42))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(resp.is_ok);
}

#[tokio::test]
async fn test_download_file_keeps_server_mtime() {
    assert_eq!(format_rfc1123(EPOCH).as_deref(), Some(EPOCH_HTTP));

    let mut server = Server::new_async().await;
    server
        .mock("PROPFIND", "/remote.php/dav/files/alice/Docs/a.txt")
        .match_header("depth", "0")
        .with_status(207)
        .with_body(multistatus(&[file_entry(
            "/remote.php/dav/files/alice/Docs/a.txt",
            EPOCH_HTTP,
        )]))
        .create_async()
        .await;
    server
        .mock("GET", "/remote.php/dav/files/alice/Docs/a.txt")
        .with_status(200)
        .with_body("hello")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let written = client(&server)
        .download_file("alice", "Docs/a.txt", dir.path())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(written, dir.path().join("a.txt"));
    assert_eq!(std::fs::read(&written).unwrap(), b"hello");
    let metadata = std::fs::metadata(&written).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&metadata).unix_seconds(), EPOCH);
}

#[tokio::test]
async fn test_download_refuses_existing_local_file() {
    let mut server = Server::new_async().await;
    server
        .mock("PROPFIND", "/remote.php/dav/files/alice/a.txt")
        .with_status(207)
        .with_body(multistatus(&[file_entry(
            "/remote.php/dav/files/alice/a.txt",
            EPOCH_HTTP,
        )]))
        .create_async()
        .await;
    let get = server
        .mock("GET", "/remote.php/dav/files/alice/a.txt")
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"local").unwrap();
    let err = client(&server)
        .download_file("alice", "a.txt", dir.path())
        .await
        .unwrap_err();

    assert!(err.is_invalid_input());
    get.assert_async().await;
    assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"local");
}

#[tokio::test]
async fn test_download_refuses_collection() {
    let mut server = Server::new_async().await;
    server
        .mock("PROPFIND", "/remote.php/dav/files/alice/Docs")
        .with_status(207)
        .with_body(multistatus(&[folder_entry("/remote.php/dav/files/alice/Docs/")]))
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = client(&server)
        .download_file("alice", "Docs", dir.path())
        .await
        .unwrap_err();

    assert!(err.is_invalid_input());
}

#[tokio::test]
async fn test_download_get_failure_writes_nothing() {
    let mut server = Server::new_async().await;
    server
        .mock("PROPFIND", "/remote.php/dav/files/alice/a.txt")
        .with_status(207)
        .with_body(multistatus(&[file_entry(
            "/remote.php/dav/files/alice/a.txt",
            EPOCH_HTTP,
        )]))
        .create_async()
        .await;
    server
        .mock("GET", "/remote.php/dav/files/alice/a.txt")
        .with_status(403)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let written = client(&server)
        .download_file("alice", "a.txt", dir.path())
        .await
        .unwrap();

    assert!(written.is_none());
    assert!(!dir.path().join("a.txt").exists());
}

#[tokio::test]
async fn test_raw_download_is_bytes() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/remote.php/dav/files/alice/bin")
        .with_status(200)
        .with_body(vec![0u8, 159, 146, 150])
        .create_async()
        .await;

    let nc = client(&server);
    let resp = nc.webdav_requester().download("alice", "bin").await.unwrap();

    assert!(resp.is_ok);
    assert_eq!(resp.data, Some(DavPayload::Bytes(vec![0, 159, 146, 150])));
}

//! Router tests.
//!
//! Drives the routing table directly with `oneshot`, covering status codes,
//! headers and storage side effects of every route.

use std::io;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes, to_bytes};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{Request, Response, StatusCode};
use http_streaming_server::build_router;
use http_streaming_server::storage::StorageRoot;
use futures_util::stream;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestEnv {
    tmp: TempDir,
    root: Arc<StorageRoot>,
    router: Router,
}

fn setup() -> TestEnv {
    let tmp = tempfile::tempdir().unwrap();
    let root = Arc::new(StorageRoot::open(&tmp.path().join("storage")).unwrap());
    let router = build_router(Arc::clone(&root));
    TestEnv { tmp, root, router }
}

async fn send(router: &Router, method: &str, uri: &str, body: Body) -> Response<Body> {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap();
    router.clone().oneshot(req).await.unwrap()
}

async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
    to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_text(resp: Response<Body>) -> String {
    String::from_utf8(body_bytes(resp).await).unwrap()
}

#[tokio::test]
async fn upload_then_download_returns_identical_bytes() {
    let env = setup();
    let payload: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();

    let resp = send(
        &env.router,
        "POST",
        "/upload?filename=data.bin",
        Body::from(payload.clone()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(body_text(resp).await, "Uploaded data.bin (300000 bytes)");

    let resp = send(&env.router, "GET", "/download?filename=data.bin", Body::empty()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_LENGTH], "300000");
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/octet-stream");
    assert_eq!(
        resp.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"data.bin\""
    );
    assert_eq!(body_bytes(resp).await, payload);
}

#[tokio::test]
async fn chunked_upload_larger_than_default_body_limit() {
    let env = setup();
    const CHUNK: usize = 64 * 1024;
    const CHUNKS: usize = 160;

    let chunks: Vec<io::Result<Bytes>> = (0..CHUNKS)
        .map(|n| Ok(Bytes::from(vec![(n % 251) as u8; CHUNK])))
        .collect();
    let resp = send(
        &env.router,
        "POST",
        "/upload?filename=big.bin",
        Body::from_stream(stream::iter(chunks)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_text(resp).await,
        format!("Uploaded big.bin ({} bytes)", CHUNK * CHUNKS)
    );

    let stored = env.root.path().join("big.bin");
    assert_eq!(
        std::fs::metadata(&stored).unwrap().len(),
        (CHUNK * CHUNKS) as u64
    );

    let resp = send(&env.router, "GET", "/download?filename=big.bin", Body::empty()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_LENGTH], (CHUNK * CHUNKS).to_string());
    let downloaded = body_bytes(resp).await;
    assert_eq!(downloaded.len(), CHUNK * CHUNKS);
    for (n, chunk) in downloaded.chunks(CHUNK).enumerate() {
        assert!(chunk.iter().all(|&b| b == (n % 251) as u8), "chunk {n}");
    }
}

#[tokio::test]
async fn second_upload_overwrites_first() {
    let env = setup();

    send(
        &env.router,
        "POST",
        "/upload?filename=same.txt",
        Body::from("first payload, longer"),
    )
    .await;
    let resp = send(
        &env.router,
        "POST",
        "/upload?filename=same.txt",
        Body::from("second"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&env.router, "GET", "/download?filename=same.txt", Body::empty()).await;
    assert_eq!(resp.headers()[CONTENT_LENGTH], "6");
    assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain");
    assert_eq!(body_text(resp).await, "second");
}

#[tokio::test]
async fn upload_strips_directory_components() {
    let env = setup();

    let resp = send(
        &env.router,
        "POST",
        "/upload?filename=nested%2Fdir%2Fnote.txt",
        Body::from("hi"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "Uploaded note.txt (2 bytes)");
    assert!(env.root.path().join("note.txt").is_file());
    assert!(!env.root.path().join("nested").exists());
}

#[tokio::test]
async fn upload_with_traversal_is_rejected_without_side_effects() {
    let env = setup();

    let resp = send(
        &env.router,
        "POST",
        "/upload?filename=..%2Fsecret",
        Body::from("should not land anywhere"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(resp).await, "Invalid filename");

    assert!(!env.tmp.path().join("secret").exists());
    assert!(!env.root.path().join("secret").exists());
}

#[tokio::test]
async fn upload_without_filename_is_rejected() {
    let env = setup();

    for uri in ["/upload", "/upload?filename=", "/upload?filename=%20%20"] {
        let resp = send(&env.router, "POST", uri, Body::from("test")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_text(resp).await, "Missing filename query parameter");
    }
}

#[tokio::test]
async fn upload_with_dot_filename_is_rejected() {
    let env = setup();
    let resp = send(&env.router, "POST", "/upload?filename=.", Body::from("x")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_methods_are_rejected() {
    let env = setup();

    let resp = send(&env.router, "GET", "/upload?filename=test.bin", Body::empty()).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_text(resp).await, "Only POST allowed");

    let resp = send(&env.router, "POST", "/download?filename=test.bin", Body::empty()).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_text(resp).await, "Only GET allowed");

    let resp = send(&env.router, "POST", "/generate?sizeMB=1", Body::empty()).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_text(resp).await, "Only GET allowed");

    assert!(!env.root.path().join("test.bin").exists());
}

#[tokio::test]
async fn download_missing_file_is_not_found() {
    let env = setup();

    let resp = send(
        &env.router,
        "GET",
        "/download?filename=nonexistent.bin",
        Body::empty(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "File not found");
}

#[tokio::test]
async fn download_outside_root_is_not_found() {
    let env = setup();
    std::fs::write(env.tmp.path().join("outside.txt"), b"secret").unwrap();

    let resp = send(
        &env.router,
        "GET",
        "/download?filename=..%2Foutside.txt",
        Body::empty(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_directory_is_not_found() {
    let env = setup();
    std::fs::create_dir(env.root.path().join("folder")).unwrap();

    let resp = send(&env.router, "GET", "/download?filename=folder", Body::empty()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_below_a_regular_file_is_not_found() {
    let env = setup();
    send(
        &env.router,
        "POST",
        "/upload?filename=existing.txt",
        Body::from("data"),
    )
    .await;

    let long_name = format!("/download?filename={}", "x".repeat(300));
    for uri in ["/download?filename=existing.txt%2Fchild", long_name.as_str()] {
        let resp = send(&env.router, "GET", uri, Body::empty()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body_text(resp).await, "File not found");
    }
}

#[tokio::test]
async fn download_without_filename_is_rejected() {
    let env = setup();
    let resp = send(&env.router, "GET", "/download", Body::empty()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generate_streams_exact_size() {
    let env = setup();

    let resp = send(&env.router, "GET", "/generate?sizeMB=1", Body::empty()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/octet-stream");
    assert_eq!(resp.headers()[CONTENT_LENGTH], "1048576");
    assert_eq!(
        resp.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"generated-1MB.bin\""
    );
    assert_eq!(body_bytes(resp).await.len(), 1_048_576);

    // nothing is persisted
    assert_eq!(std::fs::read_dir(env.root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn generate_rejects_invalid_sizes() {
    let env = setup();

    let cases = [
        ("/generate?sizeMB=0", "sizeMB must be between 1 and 10000"),
        ("/generate?sizeMB=10001", "sizeMB must be between 1 and 10000"),
        ("/generate?sizeMB=abc", "sizeMB must be a valid integer"),
        ("/generate", "Missing sizeMB query parameter"),
    ];

    for (uri, message) in cases {
        let resp = send(&env.router, "GET", uri, Body::empty()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_text(resp).await, message);
    }
}

#[tokio::test]
async fn method_is_checked_before_query() {
    let env = setup();

    for uri in ["/generate?sizeMB=1&sizeMB=2", "/generate?sizeMB", "/generate?sizeMB=abc"] {
        let resp = send(&env.router, "POST", uri, Body::empty()).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{uri}");
        assert_eq!(body_text(resp).await, "Only GET allowed");
    }

    let resp = send(
        &env.router,
        "GET",
        "/upload?filename=a.bin&filename=b.bin",
        Body::empty(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_text(resp).await, "Only POST allowed");
}

#[tokio::test]
async fn repeated_query_keys_use_the_first_value() {
    let env = setup();

    let resp = send(&env.router, "GET", "/generate?sizeMB=1&sizeMB=2", Body::empty()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_LENGTH], "1048576");

    let resp = send(&env.router, "GET", "/generate?sizeMB=1&sizeMB=x", Body::empty()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(
        &env.router,
        "POST",
        "/upload?filename=a.bin&filename=b.bin",
        Body::from("first"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "Uploaded a.bin (5 bytes)");
    assert!(env.root.path().join("a.bin").is_file());
    assert!(!env.root.path().join("b.bin").exists());
}

#[tokio::test]
async fn bare_query_key_counts_as_missing() {
    let env = setup();

    let resp = send(&env.router, "GET", "/generate?sizeMB", Body::empty()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(resp).await, "Missing sizeMB query parameter");

    let resp = send(&env.router, "POST", "/upload?filename", Body::from("x")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(resp).await, "Missing filename query parameter");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let env = setup();
    let resp = send(&env.router, "GET", "/files", Body::empty()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

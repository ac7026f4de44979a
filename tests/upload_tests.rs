use std::fs::File;
use std::io::Write;

use asconnect::upload::{
    UploadError, UploadOperation, UploadOperationHeader, upload, upload_collecting,
};
use httpmock::{Method::PATCH, MockServer};
use tokio::sync::watch;

fn patch_op(url: &str, offset: u64, length: u64) -> UploadOperation {
    UploadOperation {
        length: Some(length),
        method: Some("PATCH".into()),
        offset: Some(offset),
        request_headers: Vec::new(),
        url: Some(url.into()),
    }
}

fn file_with(contents: &[u8]) -> File {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(contents).unwrap();
    file
}

#[test]
fn chunk_returns_exact_bytes() {
    let contents: Vec<u8> = (0..20).collect();
    let mut file = file_with(&contents);

    let op = patch_op("https://example.com/upload", 0, 10);
    let chunk = op.chunk(&mut file).unwrap();
    assert_eq!(chunk, &contents[..10]);

    let op = patch_op("https://example.com/upload", 5, 10);
    let chunk = op.chunk(&mut file).unwrap();
    assert_eq!(chunk, &contents[5..15]);
}

#[test]
fn chunk_requires_offset_and_length() {
    let mut file = file_with(&[0u8; 16]);

    let mut op = patch_op("https://example.com/upload", 0, 8);
    op.offset = None;
    assert!(matches!(
        op.chunk(&mut file),
        Err(UploadError::InvalidOperationBounds)
    ));

    let mut op = patch_op("https://example.com/upload", 0, 8);
    op.length = None;
    assert!(matches!(
        op.chunk(&mut file),
        Err(UploadError::InvalidOperationBounds)
    ));
}

#[test]
fn chunk_past_end_of_file_is_an_io_error() {
    let mut file = file_with(&[0u8; 16]);
    let op = patch_op("https://example.com/upload", 10, 10);
    assert!(matches!(op.chunk(&mut file), Err(UploadError::Io(_))));
}

#[test]
fn request_requires_method_and_url() {
    let http = reqwest::Client::new();

    let mut op = patch_op("https://example.com/upload", 0, 4);
    op.url = None;
    assert!(matches!(
        op.request(&http, vec![1, 2, 3, 4]),
        Err(UploadError::InvalidOperationDestination)
    ));

    let mut op = patch_op("https://example.com/upload", 0, 4);
    op.method = None;
    assert!(matches!(
        op.request(&http, vec![1, 2, 3, 4]),
        Err(UploadError::InvalidOperationDestination)
    ));
}

#[test]
fn request_keeps_well_formed_headers_and_drops_the_rest() {
    let http = reqwest::Client::new();
    let mut op = patch_op("https://example.com/upload", 0, 4);
    op.request_headers = vec![
        UploadOperationHeader {
            name: Some("Content-Type".into()),
            value: Some("application/octet-stream".into()),
        },
        UploadOperationHeader {
            name: Some("X-No-Value".into()),
            value: None,
        },
        UploadOperationHeader {
            name: None,
            value: Some("orphan".into()),
        },
        UploadOperationHeader {
            name: Some("X-Session".into()),
            value: Some("abc123".into()),
        },
    ];

    let request = op.request(&http, vec![0u8; 4]).unwrap();
    assert_eq!(request.method().as_str(), "PATCH");
    assert_eq!(request.url().as_str(), "https://example.com/upload");
    assert_eq!(request.headers().len(), 2);
    assert_eq!(
        request.headers().get("Content-Type").unwrap(),
        "application/octet-stream"
    );
    assert_eq!(request.headers().get("X-Session").unwrap(), "abc123");
    assert!(request.headers().get("X-No-Value").is_none());
}

#[tokio::test]
async fn multipart_upload_succeeds() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PATCH).path("/upload");
        then.status(200);
    });

    let contents: Vec<u8> = (0..64).collect();
    let mut file = file_with(&contents);
    let url = server.url("/upload");

    let operations = vec![
        patch_op(&url, 0, 10),
        patch_op(&url, 10, 10),
        patch_op(&url, 20, 30),
        patch_op(&url, 50, 10),
        patch_op(&url, 60, 4),
    ];

    let http = reqwest::Client::new();
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let result = upload(&operations, &mut file, &http, cancel_rx).await;
    assert!(result.is_ok(), "upload failed: {:?}", result.err());
    mock.assert_hits(5);
}

#[tokio::test]
async fn failing_slice_is_reported_and_siblings_still_complete() {
    let server = MockServer::start();
    let ok_mock = server.mock(|when, then| {
        when.method(PATCH).path("/ok");
        then.status(200);
    });
    let _fail_mock = server.mock(|when, then| {
        when.method(PATCH).path("/fail");
        then.status(500).body("chunk rejected");
    });

    let mut file = file_with(&[7u8; 48]);
    let operations = vec![
        patch_op(&server.url("/ok"), 0, 16),
        patch_op(&server.url("/fail"), 16, 16),
        patch_op(&server.url("/ok"), 32, 16),
    ];

    let http = reqwest::Client::new();
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let err = upload(&operations, &mut file, &http, cancel_rx)
        .await
        .unwrap_err();

    assert_eq!(err.operation.url.as_deref(), Some(server.url("/fail").as_str()));
    assert_eq!(err.operation.offset, Some(16));
    assert!(matches!(err.error, UploadError::Transport(_)));
    // The failure must not cancel the sibling requests.
    ok_mock.assert_hits(2);
}

#[tokio::test]
async fn extraction_failure_skips_request_but_not_siblings() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PATCH).path("/upload");
        then.status(200);
    });

    let mut file = file_with(&[3u8; 32]);
    let mut bad = patch_op(&server.url("/upload"), 0, 8);
    bad.offset = None;
    let operations = vec![bad, patch_op(&server.url("/upload"), 8, 8)];

    let http = reqwest::Client::new();
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let err = upload(&operations, &mut file, &http, cancel_rx)
        .await
        .unwrap_err();

    assert!(matches!(err.error, UploadError::InvalidOperationBounds));
    mock.assert_hits(1);
}

#[tokio::test]
async fn collecting_reports_every_failing_slice() {
    let server = MockServer::start();
    let _fail_mock = server.mock(|when, then| {
        when.method(PATCH).path("/fail");
        then.status(503);
    });
    let _ok_mock = server.mock(|when, then| {
        when.method(PATCH).path("/ok");
        then.status(200);
    });

    let mut file = file_with(&[9u8; 24]);
    let operations = vec![
        patch_op(&server.url("/fail"), 0, 8),
        patch_op(&server.url("/ok"), 8, 8),
        patch_op(&server.url("/fail"), 16, 8),
    ];

    let http = reqwest::Client::new();
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let errors = upload_collecting(&operations, &mut file, &http, cancel_rx).await;

    assert_eq!(errors.len(), 2);
    for err in &errors {
        assert_eq!(err.operation.url.as_deref(), Some(server.url("/fail").as_str()));
        assert!(matches!(err.error, UploadError::Transport(_)));
    }
}

#[tokio::test]
async fn cancellation_aborts_in_flight_requests() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(PATCH).path("/upload");
        then.status(200).delay(std::time::Duration::from_secs(5));
    });

    let mut file = file_with(&[1u8; 16]);
    let operations = vec![
        patch_op(&server.url("/upload"), 0, 8),
        patch_op(&server.url("/upload"), 8, 8),
    ];

    let http = reqwest::Client::new();
    let (cancel_tx, cancel_rx) = watch::channel(false);
    cancel_tx.send(true).unwrap();

    let errors = upload_collecting(&operations, &mut file, &http, cancel_rx).await;
    assert_eq!(errors.len(), 2);
    for err in &errors {
        assert!(matches!(err.error, UploadError::Cancelled));
    }
}

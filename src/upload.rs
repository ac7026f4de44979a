//! Chunked asset upload for App Store Connect.
//!
//! The API reserves an asset and answers with a list of upload operations,
//! each naming a byte range of the local file, a destination URL, an HTTP
//! method, and the headers to attach. This module extracts each range,
//! sends every slice concurrently, and reports failures per slice.
//!
//! https://developer.apple.com/documentation/appstoreconnectapi/uploading_assets_to_app_store_connect

use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use reqwest::{Client, Method, Request};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, watch};

/// Ordered set of upload operations describing one logical file upload.
pub type UploadOperations = Vec<UploadOperation>;

/// One server-specified instruction for transmitting a contiguous byte range
/// of a local file. Every field is optional on the wire; a missing field
/// needed for extraction or dispatch is a data error, never substituted.
///
/// https://developer.apple.com/documentation/appstoreconnectapi/uploadoperation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOperation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub request_headers: Vec<UploadOperationHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// https://developer.apple.com/documentation/appstoreconnectapi/uploadoperationheader
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOperationHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Why a single slice could not be processed.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("could not establish bounds of upload operation")]
    InvalidOperationBounds,
    #[error("could not establish destination of upload operation")]
    InvalidOperationDestination,
    #[error("failed to read chunk from source file")]
    Io(#[from] std::io::Error),
    #[error("malformed upload request: {0}")]
    MalformedRequest(String),
    #[error("upload request failed: {0}")]
    Transport(String),
    #[error("upload cancelled")]
    Cancelled,
}

/// Pairs a failed operation with its cause so the caller can resubmit just
/// that slice.
#[derive(Debug)]
pub struct UploadOperationError {
    pub operation: UploadOperation,
    pub error: UploadError,
}

impl UploadOperationError {
    fn new(operation: UploadOperation, error: UploadError) -> Self {
        Self { operation, error }
    }
}

impl fmt::Display for UploadOperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for UploadOperationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl UploadOperation {
    /// Reads exactly the bytes `[offset, offset + length)` from the file.
    /// Seek and read happen back to back on the borrowed handle, so callers
    /// running extractions for several slices must not interleave them.
    pub fn chunk(&self, file: &mut File) -> Result<Vec<u8>, UploadError> {
        let (Some(offset), Some(length)) = (self.offset, self.length) else {
            return Err(UploadError::InvalidOperationBounds);
        };
        file.seek(SeekFrom::Start(offset))?;
        let mut data = vec![0u8; length as usize];
        file.read_exact(&mut data)?;
        Ok(data)
    }

    /// Builds the outbound request for this slice: server-specified method,
    /// URL, and headers, with the extracted chunk as the body. Header pairs
    /// missing a name or value are skipped.
    pub fn request(&self, http: &Client, data: Vec<u8>) -> Result<Request, UploadError> {
        let (Some(method), Some(url)) = (self.method.as_deref(), self.url.as_deref()) else {
            return Err(UploadError::InvalidOperationDestination);
        };
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|e| UploadError::MalformedRequest(e.to_string()))?;
        let mut builder = http.request(method, url).body(data);
        for header in &self.request_headers {
            let (Some(name), Some(value)) = (header.name.as_deref(), header.value.as_deref())
            else {
                continue;
            };
            builder = builder.header(name, value);
        }
        builder
            .build()
            .map_err(|e| UploadError::MalformedRequest(e.to_string()))
    }
}

/// Uploads every slice and reports the first error observed, if any.
///
/// All slices are attempted regardless of earlier failures; a failing slice
/// never cancels its siblings. The call returns only after every dispatched
/// request has finished. Flipping `cancel` to `true` aborts the in-flight
/// requests; slices already uploaded are not undone.
pub async fn upload(
    operations: &[UploadOperation],
    file: &mut File,
    http: &Client,
    cancel: watch::Receiver<bool>,
) -> Result<(), UploadOperationError> {
    let mut errors = upload_collecting(operations, file, http, cancel).await;
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.remove(0))
    }
}

/// Like [`upload`], but returns every per-slice failure in the order they
/// were observed, for callers that want to retry the exact failing slices.
pub async fn upload_collecting(
    operations: &[UploadOperation],
    file: &mut File,
    http: &Client,
    cancel: watch::Receiver<bool>,
) -> Vec<UploadOperationError> {
    let (errs, mut collected) = mpsc::unbounded_channel::<UploadOperationError>();
    let mut handles = Vec::with_capacity(operations.len());

    // Extraction runs serially on the shared handle; only dispatch fans out.
    for operation in operations {
        let data = match operation.chunk(file) {
            Ok(data) => data,
            Err(err) => {
                let _ = errs.send(UploadOperationError::new(operation.clone(), err));
                continue;
            }
        };
        handles.push(tokio::spawn(send_chunk(
            http.clone(),
            operation.clone(),
            data,
            cancel.clone(),
            errs.clone(),
        )));
    }
    drop(errs);

    for handle in handles {
        let _ = handle.await;
    }

    let mut errors = Vec::new();
    while let Ok(err) = collected.try_recv() {
        errors.push(err);
    }
    errors
}

async fn send_chunk(
    http: Client,
    operation: UploadOperation,
    data: Vec<u8>,
    mut cancel: watch::Receiver<bool>,
    errs: mpsc::UnboundedSender<UploadOperationError>,
) {
    let request = match operation.request(&http, data) {
        Ok(request) => request,
        Err(err) => {
            let _ = errs.send(UploadOperationError::new(operation, err));
            return;
        }
    };

    let sent = tokio::select! {
        res = http.execute(request) => Some(res),
        _ = cancelled(&mut cancel) => None,
    };
    let outcome = match sent {
        None => Err(UploadError::Cancelled),
        Some(Err(err)) => Err(UploadError::Transport(err.to_string())),
        Some(Ok(response)) => {
            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                let text = response.text().await.unwrap_or_default();
                Err(UploadError::Transport(format!(
                    "upload failed {}: {}",
                    status, text
                )))
            }
        }
    };
    if let Err(err) = outcome {
        let _ = errs.send(UploadOperationError::new(operation, err));
    }
}

async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    // A dropped sender means nobody can cancel any more.
    if cancel.wait_for(|&stop| stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

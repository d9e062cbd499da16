//! Supporting-document upload endpoint.
//!
//! `POST /api/uploads` — multipart upload of an ID copy, proof of address,
//! or similar. Size and type are checked against the raw bytes before
//! anything is written, so a rejected upload leaves no partial state.

use std::str::FromStr;

use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::blob::timestamped_path;
use crate::config::MAX_UPLOAD_BYTES;
use crate::models::{policy_key, DocumentKind, FileRef};

/// `POST /api/uploads` — fields: `policy_no` (text), `kind` (text, one of
/// the fixed document kinds), `file`. Returns the stored file reference.
pub async fn upload(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<FileRef>, ApiError> {
    let mut policy_no = String::new();
    let mut kind: Option<DocumentKind> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "policy_no" => {
                policy_no = field.text().await.unwrap_or_default();
            }
            "kind" => {
                let value = field.text().await.unwrap_or_default();
                kind = Some(DocumentKind::from_str(&value).map_err(ApiError::from)?);
            }
            "file" => {
                let filename = field.file_name().unwrap_or("document").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {e}")))?;
                file = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let kind = kind.ok_or_else(|| ApiError::BadRequest("Missing document kind".into()))?;
    let (filename, bytes) =
        file.ok_or_else(|| ApiError::BadRequest("No file provided".into()))?;

    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::FileTooLarge {
            limit_bytes: MAX_UPLOAD_BYTES,
        });
    }

    let mime = detect_mime_from_bytes(&bytes);
    if !matches!(mime, "application/pdf" | "image/jpeg" | "image/png") {
        return Err(ApiError::UnsupportedFileType(mime.into()));
    }

    let path = timestamped_path(&policy_key(&policy_no), kind.as_str(), detect_extension(&bytes));
    let url = ctx
        .blobs
        .put(&path, &bytes, mime)
        .map_err(|e| ApiError::Internal(format!("Blob store: {e}")))?;

    tracing::info!(policy_no, kind = kind.as_str(), path, "Stored supporting document");
    Ok(Json(FileRef {
        url,
        name: filename,
        path,
        uploaded_at: Some(chrono::Utc::now().to_rfc3339()),
    }))
}

/// Sniff the content type from magic bytes; the client-supplied type is
/// not trusted.
pub fn detect_mime_from_bytes(bytes: &[u8]) -> &'static str {
    if bytes.len() < 4 {
        return "application/octet-stream";
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return "image/png";
    }
    if bytes.starts_with(b"%PDF") {
        return "application/pdf";
    }
    "application/octet-stream"
}

pub fn detect_extension(bytes: &[u8]) -> &'static str {
    match detect_mime_from_bytes(bytes) {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "application/pdf" => "pdf",
        _ => "bin",
    }
}

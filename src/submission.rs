//! Submission orchestration — the glue between a captured form and the
//! collaborators: blob store for signatures and the generated PDF, record
//! store for the row, compositor for the document itself.
//!
//! Steps run strictly in sequence: decode signatures → store signature
//! images → insert record → compose PDF → store PDF → patch record with
//! the PDF address. There are no retries, and earlier successful steps are
//! not rolled back when a later one fails (accepted limitation).

use base64::Engine;
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::blob::{timestamped_path, BlobError, BlobStore};
use crate::compose::{compose_application, compose_consent, ComposeError, SignatureImages};
use crate::db::{self, StoreError};
use crate::models::{ApplicationRecord, ConsentRecord, SignatureRole};

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Invalid {role} signature: {reason}")]
    InvalidSignature { role: &'static str, reason: String },

    #[error("Consent checkbox not confirmed")]
    ConsentNotConfirmed,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error(transparent)]
    Compose(#[from] ComposeError),
}

/// What a completed submission handed back to the capturing form.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub id: Uuid,
    pub pdf_url: String,
}

/// Signature pads deliver their images as base64 data URLs
/// (`data:image/png;base64,...`); raw base64 is accepted too.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, String> {
    let base64_data = match data_url.find(',') {
        Some(idx) => &data_url[idx + 1..],
        None => data_url,
    };

    base64::engine::general_purpose::STANDARD
        .decode(base64_data)
        .map_err(|e| format!("Base64 decode failed: {e}"))
}

/// Runs the full application submission flow.
pub fn submit_application(
    conn: &Connection,
    blobs: &BlobStore,
    record: &ApplicationRecord,
    holder_sig: Option<&str>,
    office_sig: Option<&str>,
) -> Result<SubmissionOutcome, SubmitError> {
    record.validate()?;
    let key = record.policy_key();

    let signatures = store_signatures(blobs, &key, holder_sig, office_sig)?.0;

    let (id, stored) = db::insert_application(conn, record)?;

    let pdf = compose_application(&stored, &signatures)?;
    let pdf_url = blobs.put(
        &timestamped_path(&key, "application", "pdf"),
        &pdf,
        "application/pdf",
    )?;

    db::set_application_pdf(conn, &id, &pdf_url)?;
    tracing::info!(%id, pdf_url, "Application submitted");
    Ok(SubmissionOutcome { id, pdf_url })
}

/// Runs the full consent submission flow. Rejects unconfirmed consent
/// before any other work.
pub fn submit_consent(
    conn: &Connection,
    blobs: &BlobStore,
    record: &ConsentRecord,
    holder_sig: Option<&str>,
    admin_sig: Option<&str>,
) -> Result<SubmissionOutcome, SubmitError> {
    if !record.consent_confirmed {
        return Err(SubmitError::ConsentNotConfirmed);
    }
    record.validate()?;
    let key = record.policy_key();

    let (signatures, holder_url) = store_signatures(blobs, &key, holder_sig, admin_sig)?;

    let mut to_insert = record.clone();
    to_insert.holder_signature_url = holder_url;
    let (id, stored) = db::insert_consent(conn, &to_insert)?;

    let pdf = compose_consent(&stored, &signatures)?;
    let pdf_url = blobs.put(
        &timestamped_path(&key, "consent", "pdf"),
        &pdf,
        "application/pdf",
    )?;

    db::set_consent_pdf(conn, &id, &pdf_url)?;
    tracing::info!(%id, pdf_url, "Consent submitted");
    Ok(SubmissionOutcome { id, pdf_url })
}

/// Decodes and stores the supplied signature data URLs. Returns the images
/// (as bytes, ready for the compositor) plus the holder image's stored
/// address. Undecodable base64 is an input error and aborts the submission
/// before anything is written.
fn store_signatures(
    blobs: &BlobStore,
    policy_key: &str,
    holder_sig: Option<&str>,
    office_sig: Option<&str>,
) -> Result<(SignatureImages, Option<String>), SubmitError> {
    let holder_bytes = holder_sig
        .map(|url| {
            decode_data_url(url).map_err(|reason| SubmitError::InvalidSignature {
                role: SignatureRole::Holder.as_str(),
                reason,
            })
        })
        .transpose()?;
    let office_bytes = office_sig
        .map(|url| {
            decode_data_url(url).map_err(|reason| SubmitError::InvalidSignature {
                role: SignatureRole::Office.as_str(),
                reason,
            })
        })
        .transpose()?;

    let mut holder_url = None;
    if let Some(bytes) = &holder_bytes {
        holder_url = Some(blobs.put(
            &timestamped_path(policy_key, "holder_sig", "png"),
            bytes,
            "image/png",
        )?);
    }
    if let Some(bytes) = &office_bytes {
        blobs.put(
            &timestamped_path(policy_key, "office_sig", "png"),
            bytes,
            "image/png",
        )?;
    }

    Ok((
        SignatureImages {
            holder: holder_bytes,
            office: office_bytes,
        },
        holder_url,
    ))
}

//! Shared state for the capture API.

use std::path::PathBuf;

use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::blob::BlobStore;
use crate::db::open_database;

/// Shared context for all API routes.
///
/// Handlers open their own short-lived SQLite connection per request;
/// submissions are sequential per client and the database is local, so
/// there is no pooled state to coordinate.
#[derive(Clone)]
pub struct ApiContext {
    pub db_path: PathBuf,
    pub blobs: BlobStore,
}

impl ApiContext {
    pub fn new(db_path: PathBuf, blobs: BlobStore) -> Self {
        Self { db_path, blobs }
    }

    pub fn connect(&self) -> Result<Connection, ApiError> {
        open_database(&self.db_path).map_err(|e| ApiError::Internal(format!("Database: {e}")))
    }
}

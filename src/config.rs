use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "PolicyDesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default port for the capture API server.
pub const DEFAULT_PORT: u16 = 8730;

/// Maximum size for an uploaded supporting document (10 MB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Get the application data directory
/// ~/PolicyDesk/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("POLICYDESK_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("PolicyDesk")
}

/// Get the database directory
pub fn database_dir() -> PathBuf {
    app_data_dir().join("database")
}

/// Get the blob storage root (uploads, signatures, generated PDFs)
pub fn blobs_dir() -> PathBuf {
    app_data_dir().join("blobs")
}

pub fn default_log_filter() -> &'static str {
    "info,policydesk=debug"
}

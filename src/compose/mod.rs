//! Document Compositor — renders a captured record into a fixed-layout,
//! single-page A4 PDF for archival and printing.
//!
//! Composition is pure and local: records and signature images arrive as
//! in-memory values, output is PDF bytes. Nothing here touches the network
//! or the stores, and identical inputs produce identical bytes.

pub mod application;
pub mod consent;
pub mod layout;

pub use application::compose_application;
pub use consent::compose_consent;
pub use layout::{Compositor, PageCanvas, PAGE_HEIGHT, PAGE_WIDTH};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("PDF font error: {0}")]
    Font(String),

    #[error("PDF save error: {0}")]
    Save(String),
}

/// Signature images by role, already resolved to raster bytes.
///
/// Resolving addresses to bytes is the caller's job; the compositor never
/// fetches anything. An undecodable image is skipped with a warning, along
/// with its caption.
#[derive(Debug, Clone, Default)]
pub struct SignatureImages {
    pub holder: Option<Vec<u8>>,
    /// Office signature on applications, admin signature on consents.
    pub office: Option<Vec<u8>>,
}

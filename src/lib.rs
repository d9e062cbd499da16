pub mod api;
pub mod blob;
pub mod compose; // Document compositor: record → fixed-layout PDF
pub mod config;
pub mod db;
pub mod models;
pub mod submission; // Orchestration: signatures → record → PDF → patch

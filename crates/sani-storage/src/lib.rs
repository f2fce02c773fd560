//! Storage layer for sani
//!
//! This crate provides:
//! - The upload store (`uploads/` and `processed/` directories)
//! - The append-only redaction audit log

pub mod audit;
pub mod error;
pub mod uploads;

pub use audit::AuditLog;
pub use error::{Result, StorageError};
pub use uploads::{StoredUpload, UploadStore, sanitize_filename};

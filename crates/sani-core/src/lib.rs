//! Core domain models for sani
//!
//! This crate contains:
//! - PII categories, matches and detection results
//! - Named-entity spans
//! - Bounding boxes and OCR words
//! - Analysis / processing reports and redaction log entries

pub mod entity;
pub mod error;
pub mod geometry;
pub mod pii;
pub mod report;

pub use entity::{EntityLabel, EntitySpan};
pub use error::{Error, Result};
pub use geometry::{BoundingBox, OcrWord, RedactionMethod};
pub use pii::{DetectionResult, PiiCategory, PiiMatch};
pub use report::{
    AnalysisReport, DetectedItem, DetectionSource, ProcessReport, ProcessStatus,
    RedactionLogEntry,
};

//! Results handed back to callers, plus the redaction log record

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{BoundingBox, DetectionResult};

/// Text-level analysis of one document.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub pii_count: usize,
    pub pii_found: DetectionResult,
    pub original_text: String,
    pub sanitized_text: String,
}

impl AnalysisReport {
    pub const NO_TEXT_MESSAGE: &'static str = "No text could be extracted from the document.";

    /// Report for a document that yielded no text at all.
    pub fn no_text(original_text: String) -> Self {
        Self {
            pii_count: 0,
            pii_found: DetectionResult::new(),
            original_text,
            sanitized_text: Self::NO_TEXT_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSource {
    Regex,
    Ner,
    Signature,
}

/// One thing found while processing an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedItem {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: DetectionSource,
}

impl DetectedItem {
    pub fn new(text: impl Into<String>, kind: impl Into<String>, source: DetectionSource) -> Self {
        Self {
            text: text.into(),
            kind: kind.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessStatus {
    Redacted,
    #[serde(rename = "No PII found")]
    NoPiiFound,
}

/// Outcome of the image upload-and-process flow.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub filename: String,
    pub status: ProcessStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redacted_file: Option<String>,
    /// Seconds, rounded to two decimals
    pub processing_time: f64,
    pub pii_detected: Vec<DetectedItem>,
}

/// Append-only audit record written for every redacted region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionLogEntry {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub item_type: String,
    pub content: String,
    #[serde(rename = "box")]
    pub bbox: Option<BoundingBox>,
}

impl RedactionLogEntry {
    pub fn new(item_type: impl Into<String>, content: impl Into<String>, bbox: Option<BoundingBox>) -> Self {
        Self {
            timestamp: OffsetDateTime::now_utc(),
            item_type: item_type.into(),
            content: content.into(),
            bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_text_report() {
        let report = AnalysisReport::no_text("   ".to_string());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pii_count"], 0);
        assert_eq!(json["pii_found"], serde_json::json!({}));
        assert_eq!(json["sanitized_text"], AnalysisReport::NO_TEXT_MESSAGE);
    }

    #[test]
    fn test_process_report_shape() {
        let report = ProcessReport {
            filename: "scan.png".to_string(),
            status: ProcessStatus::NoPiiFound,
            redacted_file: None,
            processing_time: 0.12,
            pii_detected: vec![DetectedItem {
                text: "Acme Corp".to_string(),
                kind: "organization".to_string(),
                source: DetectionSource::Ner,
            }],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "No PII found");
        assert!(json.get("redacted_file").is_none());
        assert_eq!(json["pii_detected"][0]["type"], "organization");
        assert_eq!(json["pii_detected"][0]["source"], "ner");
    }

    #[test]
    fn test_log_entry_uses_box_key() {
        let entry = RedactionLogEntry::new("email", "a@b.io", Some(BoundingBox::new(0, 0, 5, 5)));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["box"], serde_json::json!([0, 0, 5, 5]));
        assert_eq!(json["item_type"], "email");
        assert!(json["timestamp"].is_string());
    }
}

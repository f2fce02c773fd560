//! Extractor trait and MIME-type dispatch

use async_trait::async_trait;
use sani_core::{Error, Result};
use sani_vision::OcrEngine;
use std::sync::Arc;

use crate::{DocxExtractor, ImageExtractor, PdfExtractor, PlainTextExtractor};

/// Returned by [`ExtractorRegistry::extract`] when no extractor matches.
pub const UNSUPPORTED_MESSAGE: &str = "Unsupported file type for text extraction.";

/// Prefix of the text returned by [`ExtractorRegistry::extract`] when an extractor fails.
pub const EXTRACTION_FAILED_PREFIX: &str = "Could not extract text from the document. Error: ";

/// Trait for pulling plain text out of one kind of document
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Check if this extractor handles the declared content type
    fn supports(&self, content_type: &str) -> bool;

    /// Extract text from the raw document bytes
    async fn extract(&self, bytes: Vec<u8>) -> Result<String>;

    fn name(&self) -> &str;
}

/// Ordered extractors; the first one that supports a content type wins.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Image, PDF, plain text and DOCX extractors, in that order.
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self {
            extractors: vec![
                Box::new(ImageExtractor::new(ocr)),
                Box::new(PdfExtractor),
                Box::new(PlainTextExtractor),
                Box::new(DocxExtractor),
            ],
        }
    }

    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.push(extractor);
    }

    pub fn find(&self, content_type: &str) -> Option<&dyn Extractor> {
        self.extractors
            .iter()
            .find(|e| e.supports(content_type))
            .map(|e| e.as_ref())
    }

    /// Extract text, surfacing failures as errors.
    pub async fn try_extract(&self, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        let extractor = self
            .find(content_type)
            .ok_or_else(|| Error::UnsupportedContentType(content_type.to_string()))?;

        tracing::debug!(
            "Extracting {} bytes of {} with {}",
            bytes.len(),
            content_type,
            extractor.name()
        );

        extractor.extract(bytes).await
    }

    /// Extract text, folding failures into a human-readable message.
    pub async fn extract(&self, content_type: &str, bytes: Vec<u8>) -> String {
        match self.try_extract(content_type, bytes).await {
            Ok(text) => text,
            Err(Error::UnsupportedContentType(content_type)) => {
                tracing::warn!("No extractor for content type '{}'", content_type);
                UNSUPPORTED_MESSAGE.to_string()
            }
            Err(e) => {
                tracing::error!("Text extraction failed for '{}': {}", content_type, e);
                format!("{}{}", EXTRACTION_FAILED_PREFIX, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sani_vision::DisabledOcr;

    fn registry() -> ExtractorRegistry {
        ExtractorRegistry::new(Arc::new(DisabledOcr::new("not installed")))
    }

    #[test]
    fn test_dispatch_order() {
        let registry = registry();
        let name = |ct: &str| registry.find(ct).map(|e| e.name().to_string());

        assert_eq!(name("image/png").as_deref(), Some("image"));
        assert_eq!(name("application/pdf").as_deref(), Some("pdf"));
        assert_eq!(name("text/plain; charset=utf-8").as_deref(), Some("text"));
        assert_eq!(name("text/csv").as_deref(), Some("text"));
        assert_eq!(name("application/json").as_deref(), Some("text"));
        assert_eq!(
            name("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
                .as_deref(),
            Some("docx")
        );
        assert_eq!(name("application/octet-stream"), None);
    }

    #[tokio::test]
    async fn test_unsupported_type_message() {
        let text = registry()
            .extract("application/zip", b"PK\x03\x04".to_vec())
            .await;
        assert_eq!(text, UNSUPPORTED_MESSAGE);
    }

    #[tokio::test]
    async fn test_try_extract_unsupported_is_error() {
        let err = registry()
            .try_extract("audio/mpeg", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedContentType(ct) if ct == "audio/mpeg"));
    }

    #[tokio::test]
    async fn test_failure_becomes_message() {
        let text = registry()
            .extract("application/pdf", b"definitely not a pdf".to_vec())
            .await;
        assert!(text.starts_with(EXTRACTION_FAILED_PREFIX));
    }

    #[tokio::test]
    async fn test_image_without_ocr_becomes_message() {
        let mut png = Vec::new();
        ::image::DynamicImage::new_rgb8(4, 4)
            .write_to(&mut std::io::Cursor::new(&mut png), ::image::ImageFormat::Png)
            .unwrap();

        let text = registry().extract("image/png", png).await;
        assert!(text.starts_with(EXTRACTION_FAILED_PREFIX));
        assert!(text.contains("not installed"));
    }

    #[tokio::test]
    async fn test_plain_text_passthrough() {
        let text = registry()
            .extract("text/plain", b"Email: a@b.co".to_vec())
            .await;
        assert_eq!(text, "Email: a@b.co");
    }
}

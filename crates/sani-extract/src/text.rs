use async_trait::async_trait;
use sani_core::Result;

use crate::handler::Extractor;

/// Plain text, CSV and JSON. Invalid UTF-8 sequences are dropped, never rejected.
pub struct PlainTextExtractor;

#[async_trait]
impl Extractor for PlainTextExtractor {
    fn supports(&self, content_type: &str) -> bool {
        ["text", "csv", "json"]
            .iter()
            .any(|kind| content_type.contains(kind))
    }

    async fn extract(&self, bytes: Vec<u8>) -> Result<String> {
        Ok(bytes.utf8_chunks().map(|chunk| chunk.valid()).collect())
    }

    fn name(&self) -> &str {
        "text"
    }
}

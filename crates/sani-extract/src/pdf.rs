use async_trait::async_trait;
use lopdf::Document;
use sani_core::{Error, Result};

use crate::handler::Extractor;

/// Text layer of every page, in page order.
pub struct PdfExtractor;

impl PdfExtractor {
    fn extract_sync(bytes: &[u8]) -> Result<String> {
        let doc = Document::load_mem(bytes).map_err(|e| Error::Pdf(e.to_string()))?;
        let mut text = String::new();

        for page_number in doc.get_pages().keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(page_text) => {
                    // Keep text at page edges from running together
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                    text.push_str(&page_text);
                }
                Err(e) => tracing::warn!("Skipping unreadable PDF page {}: {}", page_number, e),
            }
        }

        Ok(text)
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    fn supports(&self, content_type: &str) -> bool {
        content_type.contains("pdf")
    }

    async fn extract(&self, bytes: Vec<u8>) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::extract_sync(&bytes))
            .await
            .map_err(|e| Error::Other(anyhow::anyhow!("PDF task failed: {}", e)))?
    }

    fn name(&self) -> &str {
        "pdf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    fn pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[tokio::test]
    async fn test_extracts_page_text() {
        let text = PdfExtractor
            .extract(pdf(&["Contact jane@example.com"]))
            .await
            .unwrap();

        assert!(text.contains("Contact jane@example.com"));
    }

    #[tokio::test]
    async fn test_pages_do_not_run_together() {
        let text = PdfExtractor
            .extract(pdf(&["Account 12345", "67890 continues"]))
            .await
            .unwrap();

        let first = text.find("12345").unwrap();
        let second = text.find("67890").unwrap();
        assert!(first < second);
        assert!(!text.contains("1234567890"));
    }

    #[tokio::test]
    async fn test_garbage_is_pdf_error() {
        let err = PdfExtractor.extract(b"%PDF-garbage".to_vec()).await.unwrap_err();
        assert!(matches!(err, Error::Pdf(_)));
    }
}

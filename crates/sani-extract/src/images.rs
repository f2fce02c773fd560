use async_trait::async_trait;
use sani_core::{Error, Result};
use sani_vision::{OcrEngine, OcrPage};
use std::sync::Arc;

use crate::handler::Extractor;

/// OCR text of an image, one line of text per recognized line.
pub struct ImageExtractor {
    ocr: Arc<dyn OcrEngine>,
}

impl ImageExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }
}

#[async_trait]
impl Extractor for ImageExtractor {
    fn supports(&self, content_type: &str) -> bool {
        content_type.contains("image")
    }

    async fn extract(&self, bytes: Vec<u8>) -> Result<String> {
        let ocr = Arc::clone(&self.ocr);

        tokio::task::spawn_blocking(move || -> Result<String> {
            let image = image::load_from_memory(&bytes).map_err(|e| Error::Image(e.to_string()))?;
            let words = ocr.recognize(&image)?;
            Ok(OcrPage::new(words).layout_text())
        })
        .await
        .map_err(|e| Error::Other(anyhow::anyhow!("OCR task failed: {}", e)))?
    }

    fn name(&self) -> &str {
        "image"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use sani_core::{BoundingBox, OcrWord};

    struct FixedOcr;

    impl OcrEngine for FixedOcr {
        fn recognize(&self, _image: &DynamicImage) -> Result<Vec<OcrWord>> {
            let word = |text: &str, line: u32| OcrWord {
                text: text.to_string(),
                confidence: 95.0,
                bbox: BoundingBox::new(0, 0, 1, 1),
                block: 1,
                paragraph: 1,
                line,
            };
            Ok(vec![word("Name:", 1), word("Ravi", 1), word("SSN", 2)])
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn png() -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::new_rgb8(8, 8)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[tokio::test]
    async fn test_layout_text_from_ocr() {
        let text = ImageExtractor::new(Arc::new(FixedOcr))
            .extract(png())
            .await
            .unwrap();

        assert_eq!(text, "Name: Ravi\nSSN");
    }

    #[tokio::test]
    async fn test_undecodable_image() {
        let err = ImageExtractor::new(Arc::new(FixedOcr))
            .extract(b"not an image".to_vec())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Image(_)));
    }
}

use image::DynamicImage;
use sani_core::BoundingBox;
use std::path::PathBuf;

/// Locates handwritten signatures in an image.
pub trait SignatureDetector: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> Vec<BoundingBox>;

    fn name(&self) -> &str;
}

/// Detector used when no signature model can be loaded. Finds nothing.
pub struct DisabledSignatureDetector {
    model: Option<PathBuf>,
}

impl DisabledSignatureDetector {
    pub fn new(model: Option<PathBuf>) -> Self {
        if let Some(path) = &model {
            tracing::warn!(
                "Signature model '{}' configured but signature detection is not available; \
                 signatures will not be redacted",
                path.display()
            );
        }
        Self { model }
    }

    pub fn model(&self) -> Option<&PathBuf> {
        self.model.as_ref()
    }
}

impl SignatureDetector for DisabledSignatureDetector {
    fn detect(&self, _image: &DynamicImage) -> Vec<BoundingBox> {
        Vec::new()
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_detector_finds_nothing() {
        let detector = DisabledSignatureDetector::new(Some(PathBuf::from("models/signature.pt")));

        assert!(detector.detect(&DynamicImage::new_rgb8(32, 32)).is_empty());
        assert_eq!(detector.model(), Some(&PathBuf::from("models/signature.pt")));
    }
}

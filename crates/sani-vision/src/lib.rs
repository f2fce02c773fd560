//! Image-side processing: OCR, signature detection and redaction

pub mod ocr;
pub mod redact;
pub mod signature;

pub use ocr::{DisabledOcr, JoinedText, OcrEngine, OcrPage, TesseractEngine, engine_from_config};
pub use redact::{redact_boxes, save_redacted};
pub use signature::{DisabledSignatureDetector, SignatureDetector};

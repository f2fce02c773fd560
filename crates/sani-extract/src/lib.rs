//! Text extraction from uploaded documents
//!
//! Extractors are chosen by declared MIME type only; content is never
//! sniffed.

pub mod docx;
pub mod handler;
pub mod images;
pub mod pdf;
pub mod text;

pub use docx::DocxExtractor;
pub use handler::{EXTRACTION_FAILED_PREFIX, Extractor, ExtractorRegistry, UNSUPPORTED_MESSAGE};
pub use images::ImageExtractor;
pub use pdf::PdfExtractor;
pub use text::PlainTextExtractor;

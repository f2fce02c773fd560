use async_trait::async_trait;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use sani_core::{Error, Result};
use std::io::{Cursor, Read};

use crate::handler::Extractor;

const DOCUMENT_PART: &str = "word/document.xml";

/// Word documents: paragraph text from the main document part, one paragraph per line.
pub struct DocxExtractor;

impl DocxExtractor {
    fn extract_sync(bytes: &[u8]) -> Result<String> {
        let mut archive =
            zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| Error::Document(e.to_string()))?;
        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| Error::Document(format!("{}: {}", DOCUMENT_PART, e)))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)?;

        Ok(paragraphs(&xml)?.join("\n"))
    }
}

fn xml_error(e: impl std::fmt::Display) -> Error {
    Error::Document(format!("{}: {}", DOCUMENT_PART, e))
}

/// Text of every non-empty `<w:p>`, built from its `<w:t>` runs.
fn paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_run_text = false;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => current = Some(String::new()),
                b"w:t" => in_run_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.extend(current.take()),
                b"w:t" => in_run_text = false,
                _ => {}
            },
            Event::Text(text) if in_run_text => {
                if let Some(paragraph) = current.as_mut() {
                    paragraph.push_str(&text.decode().map_err(xml_error)?);
                }
            }
            Event::GeneralRef(reference) if in_run_text => {
                let Some(paragraph) = current.as_mut() else {
                    continue;
                };
                if let Some(ch) = reference.resolve_char_ref().map_err(xml_error)? {
                    paragraph.push(ch);
                } else {
                    let name = reference.decode().map_err(xml_error)?;
                    match resolve_predefined_entity(&name) {
                        Some(value) => paragraph.push_str(value),
                        None => tracing::debug!("Dropping unknown entity &{};", name),
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[async_trait]
impl Extractor for DocxExtractor {
    fn supports(&self, content_type: &str) -> bool {
        content_type.contains("openxmlformats-officedocument.wordprocessingml")
    }

    async fn extract(&self, bytes: Vec<u8>) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::extract_sync(&bytes))
            .await
            .map_err(|e| Error::Other(anyhow::anyhow!("DOCX task failed: {}", e)))?
    }

    fn name(&self) -> &str {
        "docx"
    }
}

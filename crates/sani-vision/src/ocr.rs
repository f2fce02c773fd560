//! OCR engines
//!
//! [`TesseractEngine`] wraps the `tesseract` command line tool and parses its
//! TSV output into word boxes. [`DisabledOcr`] stands in when no engine could
//! be set up, so callers can report the condition instead of crashing.

use image::{DynamicImage, ImageFormat};
use sani_config::OcrConfig;
use sani_core::{BoundingBox, Error, OcrWord, Result};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Instant;

pub trait OcrEngine: Send + Sync {
    /// Recognize words in `image`, in reading order.
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<OcrWord>>;

    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        true
    }
}

/// Build the configured engine, falling back to [`DisabledOcr`].
pub fn engine_from_config(config: &OcrConfig) -> Arc<dyn OcrEngine> {
    if !config.enabled {
        return Arc::new(DisabledOcr::new("OCR is disabled in configuration"));
    }

    match TesseractEngine::new(config) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            tracing::warn!("Tesseract unavailable, OCR disabled: {}", e);
            Arc::new(DisabledOcr::new(e.to_string()))
        }
    }
}

/// Tesseract CLI wrapper
pub struct TesseractEngine {
    binary: PathBuf,
    version: String,
    tessdata: Option<PathBuf>,
    lang: String,
    psm: u8,
    oem: u8,
    min_confidence: f32,
}

impl TesseractEngine {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let binary = match &config.binary {
            Some(path) => path.clone(),
            None => which::which("tesseract")
                .map_err(|e| Error::OcrUnavailable(format!("tesseract not found on PATH: {}", e)))?,
        };
        let version = tesseract_version(&binary)?;

        tracing::info!("Using tesseract {} at {}", version, binary.display());

        Ok(Self {
            binary,
            version,
            tessdata: config.tessdata.clone(),
            lang: config.lang.clone(),
            psm: config.psm,
            oem: config.oem,
            min_confidence: config.min_confidence,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn run(&self, image_path: &Path) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .arg("--psm")
            .arg(self.psm.to_string())
            .arg("--oem")
            .arg(self.oem.to_string())
            .arg("tsv");

        if let Some(tessdata) = &self.tessdata {
            cmd.env("TESSDATA_PREFIX", tessdata);
        }

        tracing::debug!(
            "Running {} {} -l {} --psm {} --oem {} tsv",
            self.binary.display(),
            image_path.display(),
            self.lang,
            self.psm,
            self.oem
        );

        let output = cmd
            .output()
            .map_err(|e| Error::Ocr(format!("failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            return Err(Error::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<OcrWord>> {
        let start = Instant::now();

        let input = tempfile::Builder::new()
            .prefix("sani-ocr-")
            .suffix(".png")
            .tempfile()?;
        image
            .save_with_format(input.path(), ImageFormat::Png)
            .map_err(|e| Error::Image(e.to_string()))?;

        let tsv = self.run(input.path())?;
        let words = parse_tsv(&tsv, self.min_confidence);

        tracing::debug!(
            "OCR found {} words in {} ms",
            words.len(),
            start.elapsed().as_millis()
        );

        Ok(words)
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

fn tesseract_version(binary: &Path) -> Result<String> {
    let output = Command::new(binary)
        .arg("--version")
        .output()
        .map_err(|e| Error::OcrUnavailable(format!("cannot run {}: {}", binary.display(), e)))?;

    if !output.status.success() {
        return Err(Error::OcrUnavailable(format!(
            "{} --version exited with {}",
            binary.display(),
            output.status
        )));
    }

    // Older releases print the banner on stderr
    let banner = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        String::from_utf8_lossy(&output.stdout).into_owned()
    };

    Ok(banner
        .lines()
        .next()
        .map(|line| line.trim_start_matches("tesseract").trim().to_string())
        .unwrap_or_default())
}

/// Parse `tesseract ... tsv` output into word boxes.
///
/// Columns: level, page, block, paragraph, line, word, left, top, width,
/// height, conf, text. Only word rows (level 5) with non-empty text and a
/// confidence above `min_confidence` are kept.
pub fn parse_tsv(tsv: &str, min_confidence: f32) -> Vec<OcrWord> {
    let mut words = Vec::new();

    for line in tsv.lines().skip(1) {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 12 {
            continue;
        }

        let level: i32 = cols[0].parse().unwrap_or(-1);
        let confidence: f32 = cols[10].trim().parse().unwrap_or(-1.0);
        let text = cols[11].trim();

        if level != 5 || text.is_empty() || confidence <= min_confidence {
            continue;
        }

        let num = |i: usize| cols[i].trim().parse::<u32>().unwrap_or(0);

        words.push(OcrWord {
            text: text.to_string(),
            confidence,
            bbox: BoundingBox::from_xywh(num(6), num(7), num(8), num(9)),
            block: num(2),
            paragraph: num(3),
            line: num(4),
        });
    }

    words
}

/// Engine that refuses every request.
pub struct DisabledOcr {
    reason: String,
}

impl DisabledOcr {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl OcrEngine for DisabledOcr {
    fn recognize(&self, _image: &DynamicImage) -> Result<Vec<OcrWord>> {
        Err(Error::OcrUnavailable(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "disabled"
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// The words of one recognized image.
#[derive(Debug, Clone, Default)]
pub struct OcrPage {
    words: Vec<OcrWord>,
}

/// Space-joined page text with the byte range each word occupies.
#[derive(Debug, Clone, Default)]
pub struct JoinedText {
    pub text: String,
    words: Vec<(Range<usize>, BoundingBox)>,
}

impl OcrPage {
    pub fn new(words: Vec<OcrWord>) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[OcrWord] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words of a line joined by spaces, one line per `\n`.
    pub fn layout_text(&self) -> String {
        let mut text = String::new();
        let mut current: Option<(u32, u32, u32)> = None;

        for word in &self.words {
            let key = (word.block, word.paragraph, word.line);
            match current {
                Some(prev) if prev == key => text.push(' '),
                Some(_) => text.push('\n'),
                None => {}
            }
            text.push_str(&word.text);
            current = Some(key);
        }

        text
    }

    /// All words joined by single spaces.
    pub fn joined(&self) -> JoinedText {
        let mut text = String::new();
        let mut words = Vec::with_capacity(self.words.len());

        for word in &self.words {
            if !text.is_empty() {
                text.push(' ');
            }
            let start = text.len();
            text.push_str(&word.text);
            words.push((start..text.len(), word.bbox));
        }

        JoinedText { text, words }
    }
}

impl JoinedText {
    /// Boxes of every word sharing at least one byte with `start..end`.
    pub fn boxes_overlapping(&self, start: usize, end: usize) -> Vec<BoundingBox> {
        self.words
            .iter()
            .filter(|(range, _)| range.start < end && start < range.end)
            .map(|(_, bbox)| *bbox)
            .collect()
    }
}

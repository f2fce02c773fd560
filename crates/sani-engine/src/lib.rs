use anyhow::Result;
use image::DynamicImage;
use sani_config::Config;
use sani_core::{
    AnalysisReport, BoundingBox, DetectedItem, DetectionSource, Error, ProcessReport,
    ProcessStatus, RedactionMethod,
};
use sani_detect::{
    DummyProfile, EntityRecognizer, InternalRegexService, PatternSet, PiiServiceRegistry,
    RuleBasedRecognizer,
};
use sani_extract::ExtractorRegistry;
use sani_storage::{AuditLog, UploadStore};
use sani_vision::{
    DisabledSignatureDetector, OcrEngine, OcrPage, SignatureDetector, engine_from_config,
    redact_boxes, save_redacted,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Document analysis and image redaction, wired from configuration.
///
/// Every component is built once and shared; the pipeline itself is cheap to
/// put behind an `Arc` and call from many requests at once.
pub struct Pipeline {
    extractors: ExtractorRegistry,
    services: PiiServiceRegistry,
    patterns: Arc<PatternSet>,
    recognizer: Option<Arc<dyn EntityRecognizer>>,
    ocr: Arc<dyn OcrEngine>,
    signatures: Arc<dyn SignatureDetector>,
    audit: Arc<AuditLog>,
    uploads: UploadStore,
    method: RedactionMethod,
}

impl Pipeline {
    pub fn from_config(config: &Config) -> Result<Self> {
        let patterns = Arc::new(PatternSet::from_config(&config.detection)?);

        let dummy = config
            .detection
            .dummy_profile
            .as_deref()
            .map(DummyProfile::load)
            .unwrap_or_default();

        let mut services = PiiServiceRegistry::new(Arc::new(InternalRegexService::new(
            Arc::clone(&patterns),
            Arc::new(dummy),
        )));
        services.set_default(&config.detection.service);

        let recognizer = config.ner.enabled.then(|| {
            Arc::new(RuleBasedRecognizer::from_config(&config.ner)) as Arc<dyn EntityRecognizer>
        });

        let ocr = engine_from_config(&config.ocr);

        let signatures: Arc<dyn SignatureDetector> = Arc::new(DisabledSignatureDetector::new(
            config.redaction.signature_model.clone(),
        ));

        let audit = match &config.redaction.audit_log {
            Some(path) => AuditLog::open(path)?,
            None => AuditLog::disabled(),
        };

        let uploads = UploadStore::open(&config.server.upload_dir, &config.server.processed_dir)?;

        tracing::info!(
            "Pipeline ready: {} patterns, NER {}, OCR {}, redaction {:?}",
            patterns.len(),
            if recognizer.is_some() { "on" } else { "off" },
            ocr.name(),
            config.redaction.method
        );

        Ok(Self {
            extractors: ExtractorRegistry::new(Arc::clone(&ocr)),
            services,
            patterns,
            recognizer,
            ocr,
            signatures,
            audit: Arc::new(audit),
            uploads,
            method: config.redaction.method,
        })
    }

    /// Replace the OCR engine, for both image extraction and redaction.
    pub fn with_ocr(mut self, ocr: Arc<dyn OcrEngine>) -> Self {
        self.extractors = ExtractorRegistry::new(Arc::clone(&ocr));
        self.ocr = ocr;
        self
    }

    pub fn with_signature_detector(mut self, detector: Arc<dyn SignatureDetector>) -> Self {
        self.signatures = detector;
        self
    }

    pub fn with_method(mut self, method: RedactionMethod) -> Self {
        self.method = method;
        self
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }

    pub fn services(&self) -> &PiiServiceRegistry {
        &self.services
    }

    pub fn ocr_available(&self) -> bool {
        self.ocr.is_available()
    }

    /// Extract text from a document and run a PII service over it.
    ///
    /// Extraction failures do not error: their message becomes the text.
    pub async fn analyze_document(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        service: Option<&str>,
    ) -> AnalysisReport {
        let text = self.extractors.extract(content_type, bytes).await;

        if text.trim().is_empty() {
            tracing::info!("No text extracted from {} document", content_type);
            return AnalysisReport::no_text(text);
        }

        let service = self.services.get(service);
        let report = service.analyze(&text);

        tracing::info!(
            "Analyzed {} document with {}: {} PII matches",
            content_type,
            service.name(),
            report.pii_count
        );

        report
    }

    /// Redact a file from the upload store into the processed directory.
    pub async fn process_image(&self, stored_name: &str) -> sani_core::Result<ProcessReport> {
        self.ensure_ocr()?;

        let input = self.uploads.resolve_upload(stored_name)?;
        let output = self.uploads.processed_path(stored_name);

        self.process_image_at(input, output, stored_name.to_string())
            .await
    }

    /// Redact the image at `input`, writing any redacted copy to `output`.
    pub async fn process_image_at(
        &self,
        input: PathBuf,
        output: PathBuf,
        filename: String,
    ) -> sani_core::Result<ProcessReport> {
        self.ensure_ocr()?;

        let job = RedactionJob {
            patterns: Arc::clone(&self.patterns),
            recognizer: self.recognizer.clone(),
            ocr: Arc::clone(&self.ocr),
            signatures: Arc::clone(&self.signatures),
            audit: Arc::clone(&self.audit),
            method: self.method,
        };

        tokio::task::spawn_blocking(move || job.run(&input, &output, filename))
            .await
            .map_err(|e| Error::Other(anyhow::anyhow!("Redaction task failed: {}", e)))?
    }

    fn ensure_ocr(&self) -> sani_core::Result<()> {
        if self.ocr.is_available() {
            Ok(())
        } else {
            Err(Error::OcrUnavailable(
                "no OCR engine is configured for image processing".to_string(),
            ))
        }
    }
}

const SIGNATURE_CONTENT: &str = "signature detected";

/// Owned handles for one redaction, moved onto a blocking thread.
struct RedactionJob {
    patterns: Arc<PatternSet>,
    recognizer: Option<Arc<dyn EntityRecognizer>>,
    ocr: Arc<dyn OcrEngine>,
    signatures: Arc<dyn SignatureDetector>,
    audit: Arc<AuditLog>,
    method: RedactionMethod,
}

impl RedactionJob {
    fn run(&self, input: &Path, output: &Path, filename: String) -> sani_core::Result<ProcessReport> {
        let start = Instant::now();

        let mut image = image::open(input).map_err(|e| {
            Error::Image(format!("failed to open {}: {}", input.display(), e))
        })?;

        let (detected, boxes) = self.find_regions(&image);

        let (status, redacted_file) = if boxes.is_empty() {
            (ProcessStatus::NoPiiFound, None)
        } else {
            let applied = redact_boxes(&mut image, &boxes, self.method);
            save_redacted(&image, output)?;
            tracing::info!(
                "Redacted {} regions in '{}' -> {}",
                applied,
                filename,
                output.display()
            );
            let name = output
                .file_name()
                .map(|n| n.to_string_lossy().into_owned());
            (ProcessStatus::Redacted, name)
        };

        Ok(ProcessReport {
            filename,
            status,
            redacted_file,
            processing_time: round_seconds(start.elapsed().as_secs_f64()),
            pii_detected: detected,
        })
    }

    fn find_regions(&self, image: &DynamicImage) -> (Vec<DetectedItem>, Vec<BoundingBox>) {
        let words = match self.ocr.recognize(image) {
            Ok(words) => words,
            Err(e) => {
                tracing::warn!("OCR failed, treating image as text-free: {}", e);
                Vec::new()
            }
        };
        let joined = OcrPage::new(words).joined();

        let mut detected = Vec::new();
        let mut boxes = Vec::new();

        // Every category claim is reported, but a span shared by several
        // categories is boxed and audited once.
        let result = self.patterns.detect(&joined.text);
        for (category, matches) in result.iter() {
            for m in matches {
                detected.push(DetectedItem::new(&m.text, category.as_str(), DetectionSource::Regex));
            }
        }
        for (category, m) in result.distinct_spans() {
            let regions = joined.boxes_overlapping(m.start, m.end);
            self.mark(category.as_str(), &m.text, regions, &mut boxes);
        }

        if let Some(recognizer) = &self.recognizer {
            for span in recognizer.recognize(&joined.text) {
                let kind = span.label.as_str();
                detected.push(DetectedItem::new(&span.text, kind, DetectionSource::Ner));
                let regions = joined.boxes_overlapping(span.start, span.end);
                self.mark(kind, &span.text, regions, &mut boxes);
            }
        }

        for region in self.signatures.detect(image) {
            detected.push(DetectedItem::new(
                SIGNATURE_CONTENT,
                "signature",
                DetectionSource::Signature,
            ));
            self.mark("signature", SIGNATURE_CONTENT, vec![region], &mut boxes);
        }

        (detected, boxes)
    }

    /// Audit and queue every region of one detection.
    fn mark(&self, kind: &str, text: &str, regions: Vec<BoundingBox>, boxes: &mut Vec<BoundingBox>) {
        for region in regions {
            if let Err(e) = self.audit.record(kind, text, Some(region)) {
                tracing::warn!("Failed to write redaction audit entry: {}", e);
            }
            boxes.push(region);
        }
    }
}

fn round_seconds(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

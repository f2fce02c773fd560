use image::{DynamicImage, Rgb, RgbImage};
use sani_config::Config;
use sani_core::{BoundingBox, OcrWord, ProcessStatus};
use sani_engine::Pipeline;
use sani_vision::OcrEngine;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const PROFILE: &str = r#"{
  "dummy_profiles": [
    {
      "contact": { "phone_number": "+91 90000 00000" },
      "identity": { "aadhaar_number": "1111 2222 3333" }
    }
  ]
}"#;

struct StaticOcr(Vec<OcrWord>);

impl OcrEngine for StaticOcr {
    fn recognize(&self, _image: &DynamicImage) -> sani_core::Result<Vec<OcrWord>> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

fn word(text: &str, bbox: BoundingBox, line: u32) -> OcrWord {
    OcrWord {
        text: text.to_string(),
        confidence: 88.0,
        bbox,
        block: 1,
        paragraph: 1,
        line,
    }
}

fn temp_root() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sani-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn config_in(root: &Path) -> Config {
    let profile = root.join("dummy_data.json");
    std::fs::write(&profile, PROFILE).unwrap();

    let mut config = Config::default();
    config.server.upload_dir = root.join("uploads");
    config.server.processed_dir = root.join("processed");
    config.redaction.audit_log = Some(root.join("redaction_audit.log"));
    config.detection.dummy_profile = Some(profile);
    config.ocr.enabled = false;
    config
}

#[tokio::test]
async fn test_csv_analysis_substitutes_dummy_values() {
    let root = temp_root();
    let pipeline = Pipeline::from_config(&config_in(&root)).unwrap();

    let csv = "name,phone,aadhaar\nAsha,98765 43210,2345 6789 0123\n";
    let report = pipeline
        .analyze_document(csv.as_bytes().to_vec(), "text/csv", None)
        .await;

    assert_eq!(report.original_text, csv);
    assert!(report.pii_count >= 1);
    assert_eq!(
        report.sanitized_text,
        "name,phone,aadhaar\nAsha,+91 90000 00000,1111 2222 3333\n"
    );

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn test_upload_then_redact() {
    let root = temp_root();
    let ocr = StaticOcr(vec![
        word("Name:", BoundingBox::new(5, 5, 45, 20), 1),
        word("Dr.", BoundingBox::new(50, 5, 70, 20), 1),
        word("Meera", BoundingBox::new(75, 5, 115, 20), 1),
        word("SSN", BoundingBox::new(5, 30, 35, 45), 2),
        word("123-45-6789", BoundingBox::new(40, 30, 130, 45), 2),
    ]);
    let pipeline = Pipeline::from_config(&config_in(&root))
        .unwrap()
        .with_ocr(Arc::new(ocr));

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(160, 60, Rgb([250, 250, 250])))
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();

    let stored = pipeline.uploads().save("badge scan.png", &png).await.unwrap();
    let report = pipeline.process_image(&stored.name).await.unwrap();

    assert_eq!(report.status, ProcessStatus::Redacted);
    assert_eq!(report.filename, stored.name);
    let texts: Vec<&str> = report.pii_detected.iter().map(|d| d.text.as_str()).collect();
    assert!(texts.contains(&"123-45-6789"));
    assert!(texts.contains(&"Meera"));

    let redacted = pipeline.uploads().processed_path(&stored.name);
    assert!(redacted.exists());

    let audit = std::fs::read_to_string(root.join("redaction_audit.log")).unwrap();
    for line in audit.lines() {
        let entry: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(entry["timestamp"].is_string());
        assert_eq!(entry["box"].as_array().unwrap().len(), 4);
    }

    std::fs::remove_dir_all(&root).unwrap();
}

use sani_core::{PiiCategory, RedactionMethod};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for sani
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ocr: OcrConfig,

    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub ner: NerConfig,

    #[serde(default)]
    pub redaction: RedactionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,

    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Path to the tesseract binary; looked up on PATH when unset
    #[serde(default)]
    pub binary: Option<PathBuf>,

    #[serde(default)]
    pub tessdata: Option<PathBuf>,

    #[serde(default = "default_lang")]
    pub lang: String,

    #[serde(default = "default_psm")]
    pub psm: u8,

    #[serde(default = "default_oem")]
    pub oem: u8,

    /// Words at or below this confidence (0-100) are dropped
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_categories")]
    pub categories: Vec<PiiCategory>,

    #[serde(default)]
    pub custom_patterns: Vec<CustomPattern>,

    #[serde(default = "default_dummy_profile")]
    pub dummy_profile: Option<PathBuf>,

    /// PII service used when a request does not name one
    #[serde(default = "default_service")]
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPattern {
    pub name: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub people: Vec<String>,

    #[serde(default)]
    pub organizations: Vec<String>,

    #[serde(default)]
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionConfig {
    #[serde(default)]
    pub method: RedactionMethod,

    #[serde(default = "default_audit_log")]
    pub audit_log: Option<PathBuf>,

    #[serde(default)]
    pub signature_model: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            upload_dir: default_upload_dir(),
            processed_dir: default_processed_dir(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            binary: None,
            tessdata: None,
            lang: default_lang(),
            psm: default_psm(),
            oem: default_oem(),
            min_confidence: default_min_confidence(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            custom_patterns: Vec::new(),
            dummy_profile: default_dummy_profile(),
            service: default_service(),
        }
    }
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            people: Vec::new(),
            organizations: Vec::new(),
            locations: Vec::new(),
        }
    }
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            method: RedactionMethod::default(),
            audit_log: default_audit_log(),
            signature_model: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from("processed")
}

fn default_allowed_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "pdf", "docx", "txt", "csv"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_lang() -> String {
    "eng".to_string()
}

fn default_psm() -> u8 {
    3
}

fn default_oem() -> u8 {
    1
}

fn default_min_confidence() -> f32 {
    60.0
}

fn default_categories() -> Vec<PiiCategory> {
    PiiCategory::DEFAULTS.to_vec()
}

fn default_dummy_profile() -> Option<PathBuf> {
    Some(PathBuf::from("dummy_data.json"))
}

fn default_service() -> String {
    "internal_regex".to_string()
}

fn default_audit_log() -> Option<PathBuf> {
    Some(PathBuf::from("redaction_audit.log"))
}

impl Config {
    /// Load config from `path`, writing the defaults there first if it is missing
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "sani", "sani") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.sani/config.toml")
        }
    }

    /// Whether `filename` has one of the allowed upload extensions
    pub fn is_allowed_upload(&self, filename: &str) -> bool {
        let Some((_, ext)) = filename.rsplit_once('.') else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        self.server
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.ocr.min_confidence, 60.0);
        assert_eq!(config.detection.categories.len(), 6);
        assert_eq!(config.detection.service, "internal_regex");
        assert_eq!(config.redaction.method, RedactionMethod::Blackbox);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.detection.categories, config.detection.categories);
    }

    #[test]
    fn test_partial_config_parse() {
        let toml_str = r#"
[server]
port = 5000

[detection]
categories = ["email", "aadhaar", "ip_address"]
custom_patterns = [
    { name = "pan", pattern = "[A-Z]{5}[0-9]{4}[A-Z]" },
]

[redaction]
method = "blur"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(
            config.detection.categories,
            vec![PiiCategory::Email, PiiCategory::NationalId, PiiCategory::IpAddress]
        );
        assert_eq!(config.detection.custom_patterns[0].name, "pan");
        assert_eq!(config.redaction.method, RedactionMethod::Blur);
        assert!(config.ner.enabled);
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.server.port, 8000);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.ocr.lang, "eng");
    }

    #[test]
    fn test_allowed_uploads() {
        let config = Config::default();
        assert!(config.is_allowed_upload("scan.PNG"));
        assert!(config.is_allowed_upload("report.final.pdf"));
        assert!(!config.is_allowed_upload("script.sh"));
        assert!(!config.is_allowed_upload("noextension"));
    }
}

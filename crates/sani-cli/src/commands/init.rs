use anyhow::Result;
use sani_config::Config;
use std::path::{Path, PathBuf};

const SAMPLE_DUMMY_PROFILE: &str = r#"{
  "dummy_profiles": [
    {
      "contact": {
        "phone_number": "+91 90000 00000"
      },
      "identity": {
        "aadhaar_number": "0000 0000 0000",
        "ssn": "000-00-0000"
      },
      "financial": {
        "credit_card_number": "0000-0000-0000-0000",
        "account_number": "000000000000"
      }
    }
  ]
}
"#;

pub fn handle(config_path: &Path, force: bool) -> Result<()> {
    let written = write_defaults(config_path, force)?;
    for path in &written {
        println!("✓ Created {}", path.display());
    }
    println!("  Edit {} to choose PII categories and OCR settings", config_path.display());
    Ok(())
}

/// Write the default config and, next to it, a sample dummy profile.
fn write_defaults(config_path: &Path, force: bool) -> Result<Vec<PathBuf>> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    let profile_path = config_path.with_file_name("dummy_data.json");
    let mut config = Config::default();
    config.detection.dummy_profile = Some(profile_path.clone());
    config.save_to(config_path)?;

    let mut written = vec![config_path.to_path_buf()];
    if force || !profile_path.exists() {
        std::fs::write(&profile_path, SAMPLE_DUMMY_PROFILE)?;
        written.push(profile_path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_config_and_profile() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("sani").join("config.toml");

        let written = write_defaults(&config_path, false).unwrap();
        assert_eq!(written.len(), 2);

        let config = Config::load_from(&config_path).unwrap();
        let profile = config.detection.dummy_profile.unwrap();
        assert_eq!(profile, dir.path().join("sani").join("dummy_data.json"));

        let sample: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(profile).unwrap()).unwrap();
        assert!(sample["dummy_profiles"].is_array());
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[server]\nport = 9000\n").unwrap();

        assert!(write_defaults(&config_path, false).is_err());

        write_defaults(&config_path, true).unwrap();
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.server.port, 8000);
    }
}

use anyhow::{Context, Result};
use sani_config::Config;
use sani_core::{ProcessStatus, RedactionMethod};
use sani_engine::Pipeline;
use std::path::{Path, PathBuf};

pub async fn handle(
    config: &Config,
    image: &Path,
    method: Option<RedactionMethod>,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut pipeline = Pipeline::from_config(config)?;
    if let Some(method) = method {
        pipeline = pipeline.with_method(method);
    }

    let filename = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("Image path has no file name")?;
    let output = output.unwrap_or_else(|| image.with_file_name(format!("redacted_{}", filename)));

    let report = pipeline
        .process_image_at(image.to_path_buf(), output.clone(), filename)
        .await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    match report.status {
        ProcessStatus::Redacted => println!("✓ Wrote {}", output.display()),
        ProcessStatus::NoPiiFound => println!("No PII found"),
    }

    Ok(())
}

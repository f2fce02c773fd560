use anyhow::{Context, Result};
use sani_config::Config;
use sani_engine::Pipeline;
use std::path::Path;

pub async fn handle(
    config: &Config,
    file: &Path,
    content_type: Option<String>,
    service: Option<String>,
    json: bool,
) -> Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let content_type = content_type.unwrap_or_else(|| guess_content_type(file));

    let pipeline = Pipeline::from_config(config)?;
    let report = pipeline
        .analyze_document(bytes, &content_type, service.as_deref())
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} ({})", file.display(), content_type);
    println!("PII matches: {}", report.pii_count);
    for (category, matches) in report.pii_found.iter() {
        println!("  {} ({})", category, matches.len());
        for m in matches {
            println!("    {}", m.text);
        }
    }
    println!();
    println!("{}", report.sanitized_text);

    Ok(())
}

/// MIME type for a file, from its extension only.
pub fn guess_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_content_type() {
        let guess = |name: &str| guess_content_type(Path::new(name));

        assert_eq!(guess("scan.PNG"), "image/png");
        assert_eq!(guess("a/b/report.pdf"), "application/pdf");
        assert_eq!(guess("people.csv"), "text/csv");
        assert!(guess("letter.docx").contains("wordprocessingml"));
        assert_eq!(guess("Makefile"), "application/octet-stream");
    }

    #[test]
    fn test_guesses_reach_an_extractor() {
        let guess = |name: &str| guess_content_type(Path::new(name));

        assert_eq!(guess("scan.webp"), "image/webp");
        assert_eq!(guess("scan.gif"), "image/gif");
        assert!(guess("notes.htm").starts_with("text/"));
        assert!(guess("data.xml").contains("xml"));
        assert!(guess("payload.json").contains("json"));
    }
}

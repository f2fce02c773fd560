//! Append-only redaction audit log
//!
//! Every redacted item is written as one JSON line and mirrored as a
//! `tracing` event on the `redaction_audit` target.

use crate::{Result, StorageError};
use sani_core::{BoundingBox, RedactionLogEntry};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct AuditLog {
    sink: Option<(PathBuf, Mutex<File>)>,
}

impl AuditLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            sink: Some((path, Mutex::new(file))),
        })
    }

    /// Log through `tracing` only.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|(path, _)| path.as_path())
    }

    pub fn record(
        &self,
        item_type: &str,
        content: &str,
        bbox: Option<BoundingBox>,
    ) -> Result<RedactionLogEntry> {
        let entry = RedactionLogEntry::new(item_type, content, bbox);

        tracing::info!(
            target: "redaction_audit",
            item_type = %entry.item_type,
            content = %entry.content,
            bbox = ?entry.bbox,
            "Redacted item"
        );

        if let Some((_, file)) = &self.sink {
            let line = serde_json::to_string(&entry)?;
            let mut file = file
                .lock()
                .map_err(|_| StorageError::Other(anyhow::anyhow!("audit log lock poisoned")))?;
            writeln!(file, "{}", line)?;
        }

        Ok(entry)
    }
}

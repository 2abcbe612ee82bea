//! Report attachment sinks

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::error::HarnessResult;

/// Destination for failure evidence
///
/// One method on purpose: callers hand over bytes, a label, and a
/// media type, and stay ignorant of how reports are stored.
pub trait ReportSink: Send + Sync {
    fn attach(&self, bytes: &[u8], label: &str, media_type: &str) -> HarnessResult<()>;
}

/// One manifest record per attachment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub file: String,
    pub label: String,
    pub media_type: String,
    pub size_bytes: u64,
    pub sha256: String,
    pub attached_at: String,
}

/// Sink writing attachments into a directory with a JSON manifest
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    /// Create the sink, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> HarnessResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read back the manifest (empty when nothing was attached yet)
    pub fn manifest(&self) -> HarnessResult<Vec<ManifestEntry>> {
        let path = self.dir.join("manifest.json");
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read(&path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn append_manifest(&self, entry: ManifestEntry) -> HarnessResult<()> {
        let mut entries = self.manifest()?;
        entries.push(entry);
        fs::write(
            self.dir.join("manifest.json"),
            serde_json::to_vec_pretty(&entries)?,
        )?;
        Ok(())
    }
}

impl ReportSink for DirSink {
    fn attach(&self, bytes: &[u8], label: &str, media_type: &str) -> HarnessResult<()> {
        let file = format!(
            "{}-{}.{}",
            slug(label),
            Uuid::new_v4(),
            extension_for(media_type)
        );
        let path = self.dir.join(&file);
        fs::write(&path, bytes)?;

        self.append_manifest(ManifestEntry {
            file,
            label: label.to_string(),
            media_type: media_type.to_string(),
            size_bytes: bytes.len() as u64,
            sha256: hex::encode(Sha256::digest(bytes)),
            attached_at: Utc::now().to_rfc3339(),
        })?;

        debug!("Attached {} ({} bytes) to {}", label, bytes.len(), path.display());
        Ok(())
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn attach(&self, _bytes: &[u8], _label: &str, _media_type: &str) -> HarnessResult<()> {
        Ok(())
    }
}

/// File-name-safe version of a label
fn slug(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

fn extension_for(media_type: &str) -> &'static str {
    match media_type {
        "image/png" => "png",
        "text/html" => "html",
        "text/plain" => "txt",
        _ => "bin",
    }
}

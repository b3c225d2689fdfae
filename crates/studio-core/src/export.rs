//! Export documents and the sinks that receive them.
//!
//! In the browser an export is a file download. Here the download target is an
//! [`ExportSink`]; the studio only cares that the bytes were handed over.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StudioError};
use crate::intent::{Intent, SignedIntent};

/// Default filename for an unsigned intent export.
pub const INTENT_FILENAME: &str = "intent.json";

/// Default filename for a signed intent export.
pub const SIGNED_INTENT_FILENAME: &str = "signed-intent.json";

/// MIME type for JSON exports.
pub const JSON_MIME: &str = "application/json";

/// MIME type for plain-text exports.
pub const TEXT_MIME: &str = "text/plain";

/// The exported shape of an intent.
///
/// Always an object with a top-level `intent` key. A signed intent exports
/// as-is; a bare intent is wrapped as `{ "intent": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntentExport {
    Signed(SignedIntent),
    Unsigned { intent: Intent },
}

impl IntentExport {
    /// The embedded intent.
    pub fn intent(&self) -> &Intent {
        match self {
            IntentExport::Signed(signed) => &signed.intent,
            IntentExport::Unsigned { intent } => intent,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, IntentExport::Signed(_))
    }

    /// `signed-intent.json` or `intent.json`.
    pub fn default_filename(&self) -> &'static str {
        if self.is_signed() {
            SIGNED_INTENT_FILENAME
        } else {
            INTENT_FILENAME
        }
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<Intent> for IntentExport {
    fn from(intent: Intent) -> Self {
        IntentExport::Unsigned { intent }
    }
}

impl From<SignedIntent> for IntentExport {
    fn from(signed: SignedIntent) -> Self {
        IntentExport::Signed(signed)
    }
}

/// A destination for exported files.
pub trait ExportSink: Send + Sync {
    /// Hand over a file. Returns a locator for the delivered file.
    fn deliver(&self, filename: &str, mime: &str, contents: &[u8]) -> Result<String>;
}

/// Serialize an intent (bare or signed) and deliver it to `sink`.
pub fn export_intent(
    sink: &dyn ExportSink,
    export: impl Into<IntentExport>,
    filename: Option<&str>,
) -> Result<String> {
    let export = export.into();
    let filename = filename.unwrap_or_else(|| export.default_filename());
    let body = export.to_pretty_json()?;
    tracing::debug!(filename, signed = export.is_signed(), "exporting intent");
    sink.deliver(filename, JSON_MIME, body.as_bytes())
}

/// Writes exports into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Create a sink rooted at `root`. The directory is created on first delivery.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&self, filename: &str, _mime: &str, contents: &[u8]) -> Result<String> {
        check_filename(filename)?;
        std::fs::create_dir_all(&self.root)
            .map_err(|e| StudioError::Export(format!("{}: {}", self.root.display(), e)))?;

        let path = self.root.join(filename);
        std::fs::write(&path, contents)
            .map_err(|e| StudioError::Export(format!("{}: {}", path.display(), e)))?;

        tracing::info!(path = %path.display(), bytes = contents.len(), "export written");
        Ok(path.display().to_string())
    }
}

/// A file handed to a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub mime: String,
    pub contents: Vec<u8>,
}

impl ExportedFile {
    /// Contents as UTF-8 text.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.contents).map_err(|e| StudioError::Export(e.to_string()))
    }
}

/// Collects exports in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<ExportedFile>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All delivered files, oldest first.
    pub fn files(&self) -> Vec<ExportedFile> {
        self.files.lock().map(|f| f.clone()).unwrap_or_default()
    }

    /// The most recently delivered file.
    pub fn last(&self) -> Option<ExportedFile> {
        self.files.lock().ok()?.last().cloned()
    }
}

impl ExportSink for MemorySink {
    fn deliver(&self, filename: &str, mime: &str, contents: &[u8]) -> Result<String> {
        check_filename(filename)?;
        let mut files = self
            .files
            .lock()
            .map_err(|_| StudioError::Internal("export sink poisoned".to_string()))?;
        files.push(ExportedFile {
            filename: filename.to_string(),
            mime: mime.to_string(),
            contents: contents.to_vec(),
        });
        Ok(format!("memory:{}", filename))
    }
}

fn check_filename(filename: &str) -> Result<()> {
    let invalid = filename.trim().is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\');
    if invalid {
        return Err(StudioError::Export(format!("invalid filename: {:?}", filename)));
    }
    Ok(())
}

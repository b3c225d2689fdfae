//! HTTP handlers, grouped by concern.

pub mod compile;
pub mod health;
pub mod intent;
pub mod keys;
pub mod simulate;

use axum::body::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use studio_core::export::{ExportSink, MemorySink};

use crate::error::AppError;
use crate::state::AppState;

/// A delivered file, returned inline.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub filename: String,
    pub mime: String,
    pub contents: String,
    /// Where the configured export directory received a copy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Run `write` against an in-memory sink for the response body, and against
/// the export directory when one is configured.
pub(crate) fn deliver<F>(state: &AppState, write: F) -> Result<ExportResponse, AppError>
where
    F: Fn(&dyn ExportSink) -> studio_core::Result<String>,
{
    let memory = MemorySink::new();
    write(&memory)?;
    let file = memory
        .last()
        .ok_or_else(|| AppError::Internal("export produced no file".to_string()))?;

    let location = match &state.exports {
        Some(dir) => Some(write(&**dir)?),
        None => None,
    };

    Ok(ExportResponse {
        contents: file.text()?.to_string(),
        filename: file.filename,
        mime: file.mime,
        location,
    })
}

/// Parse an optional JSON body. An empty body is `None`; anything else must
/// deserialize.
pub(crate) fn optional_json<T: DeserializeOwned>(body: &Bytes) -> Result<Option<T>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
}

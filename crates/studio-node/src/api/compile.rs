//! Compile endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use studio_sandbox::compiler::{export_nockma, NOCKMA_FILENAME};
use studio_sandbox::{artifact_filename, default_source, CompileResult};

use super::{deliver, ExportResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Request to compile a source file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    pub code: String,
    #[serde(default)]
    pub module_name: Option<String>,
    /// Source filename, used to name the artifact.
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResponse {
    #[serde(flatten)]
    pub result: CompileResult,
    pub artifact_filename: String,
}

/// The template a new file opens with.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    pub file_name: &'static str,
    pub code: &'static str,
}

/// Request to export a compiled artifact.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NockmaExportRequest {
    pub nockma: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Compile a source file.
pub async fn compile(
    State(state): State<AppState>,
    Json(req): Json<CompileRequest>,
) -> Json<CompileResponse> {
    let module_name = req.module_name.as_deref().unwrap_or("Main");
    let result = state.compiler.compile(&req.code, module_name).await;
    let artifact_filename = req
        .file_name
        .as_deref()
        .map(artifact_filename)
        .unwrap_or_else(|| NOCKMA_FILENAME.to_string());

    Json(CompileResponse {
        result,
        artifact_filename,
    })
}

pub async fn template() -> Json<TemplateResponse> {
    Json(TemplateResponse {
        file_name: "HelloWorld.juvix",
        code: default_source(),
    })
}

/// Deliver a compiled artifact as a text file.
pub async fn export(
    State(state): State<AppState>,
    Json(req): Json<NockmaExportRequest>,
) -> Result<Json<ExportResponse>, AppError> {
    if req.nockma.is_empty() {
        return Err(AppError::BadRequest("Nothing to export".to_string()));
    }
    let response = deliver(&state, |sink| {
        export_nockma(sink, &req.nockma, req.filename.as_deref())
    })?;
    Ok(Json(response))
}

//! Intent API endpoints.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use studio_core::intent::{HELLO_WORLD_RESOURCE, UNKNOWN_OWNER};
use studio_core::{
    create_intent, export_intent, get_intent_types, Intent, IntentExport, IntentStage,
    IntentType, IntentTypeInfo, Parameters, SignedIntent, ValidationReport,
};
use studio_keys::Verification;

use super::{deliver, optional_json, ExportResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Request to build an intent.
///
/// Either a hand-written intent, taken as-is, or a type and parameters from
/// which a fresh intent is constructed.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CreateIntentRequest {
    Raw {
        intent: Intent,
    },
    Form {
        #[serde(rename = "type", default)]
        kind: String,
        #[serde(default)]
        resource: Option<String>,
        #[serde(default)]
        parameters: Parameters,
    },
}

/// A built intent and where it stands.
#[derive(Debug, Serialize)]
pub struct IntentResponse {
    pub intent: Intent,
    pub validation: ValidationReport,
    pub stage: IntentStage,
}

/// Request to sign. Without an intent the current draft is signed.
#[derive(Debug, Default, Deserialize)]
pub struct SignRequest {
    pub intent: Option<Intent>,
}

/// Outcome of a verification.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub verification: Verification,
}

/// Request to export the current intent.
#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    pub filename: Option<String>,
}

/// List the known intent types.
pub async fn list_intent_types() -> Json<Vec<IntentTypeInfo>> {
    Json(get_intent_types())
}

/// Build and validate an intent, making it the current draft.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateIntentRequest>,
) -> Result<(StatusCode, Json<IntentResponse>), AppError> {
    let intent = match req {
        CreateIntentRequest::Raw { intent } => intent,
        CreateIntentRequest::Form {
            kind,
            resource,
            mut parameters,
        } => {
            // A create without an owner is attributed to the active key.
            if matches!(kind.parse::<IntentType>(), Ok(IntentType::CreateResource))
                && !parameters.contains_key("owner")
            {
                let owner = state
                    .keys
                    .public_key()
                    .await
                    .unwrap_or_else(|| UNKNOWN_OWNER.to_string());
                parameters.insert("owner".to_string(), owner.into());
            }
            create_intent(
                kind,
                resource.unwrap_or_else(|| HELLO_WORLD_RESOURCE.to_string()),
                parameters,
            )
        }
    };

    let validation = intent.validate();
    state
        .session
        .write()
        .await
        .start(intent.clone(), validation.valid);

    if !validation.valid {
        tracing::debug!(errors = ?validation.errors, "intent rejected");
        return Err(AppError::Validation {
            message: validation.first_error().unwrap_or_default().to_string(),
            errors: validation.errors,
        });
    }

    tracing::info!(kind = %intent.kind, nonce = %intent.nonce, "intent drafted");
    Ok((
        StatusCode::CREATED,
        Json(IntentResponse {
            intent,
            validation,
            stage: IntentStage::Validated,
        }),
    ))
}

/// Sign an intent with the active key pair.
pub async fn sign(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SignedIntent>, AppError> {
    let requested = optional_json::<SignRequest>(&body)?.and_then(|req| req.intent);

    let key_pair = state.keys.get().await.ok_or_else(|| {
        AppError::Conflict("No key pair available. Generate or import one first.".to_string())
    })?;

    let intent = match requested {
        Some(intent) => intent,
        None => state
            .session
            .read()
            .await
            .draft
            .clone()
            .ok_or_else(|| AppError::NotFound("No intent to sign".to_string()))?,
    };

    let signed = state.manager.sign_and_wrap(&intent, &key_pair).await?;
    state.session.write().await.record_signed(signed.clone());
    Ok(Json(signed))
}

/// Check a signed intent.
pub async fn verify(
    State(state): State<AppState>,
    Json(signed): Json<SignedIntent>,
) -> Json<VerifyResponse> {
    let verification = state
        .manager
        .verify_detailed(&signed.intent, &signed.signature, &signed.public_key)
        .await;

    Json(VerifyResponse {
        valid: verification.is_valid(),
        verification,
    })
}

/// Export the signed intent if there is one, otherwise the draft.
pub async fn export(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ExportResponse>, AppError> {
    let filename = optional_json::<ExportRequest>(&body)?.and_then(|req| req.filename);

    let document: IntentExport = {
        let session = state.session.read().await;
        match (&session.signed, &session.draft) {
            (Some(signed), _) => signed.clone().into(),
            (None, Some(draft)) => draft.clone().into(),
            (None, None) => return Err(AppError::NotFound("No intent to export".to_string())),
        }
    };

    let response = deliver(&state, |sink| {
        export_intent(sink, document.clone(), filename.as_deref())
    })?;
    state.session.write().await.mark_exported();
    Ok(Json(response))
}

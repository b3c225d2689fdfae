//! Key pair endpoints.
//!
//! The private key never appears in a response except through the explicit
//! export, which returns the key file.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use studio_keys::KeyPair;

use super::{deliver, ExportResponse};
use crate::error::AppError;
use crate::state::AppState;

/// The active public key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    pub public_key: Option<String>,
}

/// Generate a key pair and make it active.
pub async fn generate(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<PublicKeyResponse>), AppError> {
    let key_pair = state.manager.generate_key_pair().await?;
    let public_key = key_pair.public_key.clone();
    state.keys.set(key_pair).await?;

    Ok((
        StatusCode::CREATED,
        Json(PublicKeyResponse {
            public_key: Some(public_key),
        }),
    ))
}

/// The active public key, or `null`.
pub async fn active(State(state): State<AppState>) -> Json<PublicKeyResponse> {
    Json(PublicKeyResponse {
        public_key: state.keys.public_key().await,
    })
}

/// Import a saved key file and make it active.
///
/// The body is the file text as written by the export.
pub async fn import(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<PublicKeyResponse>, AppError> {
    let key_pair = KeyPair::import_json(&body)?;
    let public_key = key_pair.public_key.clone();
    state.keys.set(key_pair).await?;
    tracing::info!(public_key = %public_key, "key pair imported");

    Ok(Json(PublicKeyResponse {
        public_key: Some(public_key),
    }))
}

/// The active key pair as a key file.
pub async fn export(State(state): State<AppState>) -> Result<Json<ExportResponse>, AppError> {
    let key_pair = state
        .keys
        .get()
        .await
        .ok_or_else(|| AppError::NotFound("No key pair available".to_string()))?;

    let response = deliver(&state, |sink| {
        state.manager.save_key_pair(sink, &key_pair, None)
    })?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::create_router;
    use crate::state::AppState;

    async fn server() -> TestServer {
        TestServer::new(create_router(AppState::in_memory().await)).unwrap()
    }

    #[tokio::test]
    async fn test_generate_sets_active() {
        let server = server().await;
        let empty: Value = server.get("/api/keys/active").await.json();
        assert_eq!(empty, json!({ "publicKey": null }));

        let response = server.post("/api/keys").await;
        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();
        let public_key = created["publicKey"].as_str().unwrap();
        assert!(public_key.starts_with("ed25519:"));
        assert_eq!(public_key.len(), "ed25519:".len() + 64);

        let active: Value = server.get("/api/keys/active").await.json();
        assert_eq!(active["publicKey"], public_key);
    }

    #[tokio::test]
    async fn test_export_then_import_restores_key() {
        let server = server().await;
        let first: Value = server.post("/api/keys").await.json();

        let exported: Value = server.get("/api/keys/export").await.json();
        assert_eq!(exported["filename"], "anoma-keypair.json");
        let file = exported["contents"].as_str().unwrap().to_string();

        server.post("/api/keys").await;
        let imported = server.post("/api/keys/import").text(file).await;
        imported.assert_status_ok();
        assert_eq!(imported.json::<Value>()["publicKey"], first["publicKey"]);
    }

    #[tokio::test]
    async fn test_import_rejects_incomplete_file() {
        let server = server().await;
        let response = server
            .post("/api/keys/import")
            .text(r#"{"publicKey":"ed25519:aa"}"#)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "Invalid key pair format");
    }

    #[tokio::test]
    async fn test_export_without_key_is_not_found() {
        let server = server().await;
        server
            .get("/api/keys/export")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

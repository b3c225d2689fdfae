//! Simulation endpoints.

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use studio_sandbox::{ContractFamily, ContractFunction, SimulationResult};

use crate::state::AppState;

const DEFAULT_RESOURCE: &str = "resource_001";

#[derive(Debug, Deserialize)]
pub struct FunctionsQuery {
    #[serde(default)]
    pub file: String,
}

/// The functions offered for a source file.
#[derive(Debug, Serialize)]
pub struct FunctionsResponse {
    pub file: String,
    pub family: ContractFamily,
    pub functions: Vec<ContractFunction>,
}

/// Request to simulate a contract function.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub file_name: String,
    pub function: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

/// Request to run a projection query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub function: String,
    #[serde(default)]
    pub resource_id: Option<String>,
}

/// List the functions offered for `?file=`.
pub async fn list_functions(Query(query): Query<FunctionsQuery>) -> Json<FunctionsResponse> {
    let family = ContractFamily::for_file(&query.file);
    Json(FunctionsResponse {
        file: query.file,
        family,
        functions: family.functions(),
    })
}

/// Simulate a contract function call.
pub async fn simulate(
    State(state): State<AppState>,
    Json(req): Json<SimulateRequest>,
) -> Json<SimulationResult> {
    let result = state
        .simulator
        .simulate(&req.file_name, &req.function, &req.parameters)
        .await;
    tracing::info!(
        simulation = %result.simulation_id,
        function = %result.function,
        success = result.success,
        "simulation finished"
    );
    Json(result)
}

/// Run a projection query against the mock ledger.
pub async fn query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Json<SimulationResult> {
    let resource_id = req.resource_id.as_deref().unwrap_or(DEFAULT_RESOURCE);
    Json(state.simulator.query(&req.function, resource_id).await)
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::create_router;
    use crate::state::AppState;

    async fn server() -> TestServer {
        TestServer::new(create_router(AppState::in_memory().await)).unwrap()
    }

    #[tokio::test]
    async fn test_functions_by_filename() {
        let server = server().await;
        let body: Value = server
            .get("/api/simulate/functions?file=GoldToken.juvix")
            .await
            .json();
        assert_eq!(body["family"], "token");
        assert_eq!(body["functions"][0]["name"], "transferTokens");

        let fallback: Value = server.get("/api/simulate/functions").await.json();
        assert_eq!(fallback["family"], "resource");
    }

    #[tokio::test]
    async fn test_simulate_call() {
        let server = server().await;
        let body: Value = server
            .post("/api/simulate")
            .json(&json!({
                "fileName": "Voting.juvix",
                "function": "castVote",
                "parameters": { "proposalId": "1", "optionIndex": "0" }
            }))
            .await
            .json();
        assert_eq!(body["success"], true);
        assert_eq!(body["result"]["voterChoice"], "Yes");
        assert!(body["simulationId"].is_string());
    }

    #[tokio::test]
    async fn test_query_defaults_to_first_resource() {
        let server = server().await;
        let body: Value = server
            .post("/api/simulate/query")
            .json(&json!({ "function": "getHelloWorldMessage" }))
            .await
            .json();
        assert_eq!(body["result"], "Hello, Anoma!");

        let missing: Value = server
            .post("/api/simulate/query")
            .json(&json!({ "function": "getResourceOwner", "resourceId": "nope" }))
            .await
            .json();
        assert_eq!(missing["success"], false);
        assert_eq!(missing["error"], "Resource nope not found");
    }
}

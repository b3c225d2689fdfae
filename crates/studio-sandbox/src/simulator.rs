//! Stand-in contract simulator.
//!
//! Two lookup tables, no execution: a filename pattern selects a catalog of
//! contract functions with canned results, and a small fixed ledger answers
//! HelloWorld projection queries.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// A parameter a contract function takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub example: String,
}

/// A function offered for simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractFunction {
    pub name: String,
    pub description: String,
    pub parameters: Vec<FunctionParameter>,
    pub what_it_does: String,
}

/// Families of canned contracts, picked from the source filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractFamily {
    Token,
    Voting,
    Marketplace,
    Defi,
    /// Anything else: the HelloWorld resource contract.
    Resource,
}

/// Filename substrings (matched case-insensitively, first hit wins).
const FAMILY_PATTERNS: &[(&[&str], ContractFamily)] = &[
    (&["token", "transfer"], ContractFamily::Token),
    (&["voting"], ContractFamily::Voting),
    (&["marketplace", "market"], ContractFamily::Marketplace),
    (&["defi", "protocol"], ContractFamily::Defi),
];

impl ContractFamily {
    /// Pick the family for a source filename.
    pub fn for_file(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        FAMILY_PATTERNS
            .iter()
            .find(|(patterns, _)| patterns.iter().any(|p| lower.contains(p)))
            .map(|(_, family)| *family)
            .unwrap_or(ContractFamily::Resource)
    }

    /// The functions this family offers.
    pub fn functions(&self) -> Vec<ContractFunction> {
        let table: &[(&str, &str, &[(&str, &str, &str)], &str)] = match self {
            ContractFamily::Token => &[
                (
                    "transferTokens",
                    "Transfer tokens between accounts",
                    &[
                        ("fromAddress", "string", "anoma1abc123..."),
                        ("toAddress", "string", "anoma1def456..."),
                        ("amount", "number", "100"),
                    ],
                    "Moves tokens from one account to another, checking balances and fees",
                ),
                (
                    "getTokenBalance",
                    "Check token balance for an account",
                    &[("address", "string", "anoma1abc123...")],
                    "Returns how many tokens an address owns",
                ),
                (
                    "createToken",
                    "Create new tokens",
                    &[("tokenId", "string", "GOLD"), ("amount", "number", "1000")],
                    "Mints new tokens and assigns them to your account",
                ),
            ],
            ContractFamily::Voting => &[
                (
                    "createProposal",
                    "Create a new voting proposal",
                    &[
                        ("title", "string", "Budget Approval 2024"),
                        ("description", "string", "Approve $1M budget"),
                        ("options", "string", "Yes,No,Abstain"),
                    ],
                    "Creates a new proposal that people can vote on",
                ),
                (
                    "castVote",
                    "Vote on a proposal",
                    &[("proposalId", "number", "1"), ("optionIndex", "number", "0")],
                    "Records your vote choice for a specific proposal",
                ),
                (
                    "getVotingResults",
                    "See voting results",
                    &[("proposalId", "number", "1")],
                    "Shows vote counts and winner for a completed proposal",
                ),
            ],
            ContractFamily::Marketplace => &[
                (
                    "createListing",
                    "Create a new marketplace listing",
                    &[
                        ("itemName", "string", "Vintage Guitar"),
                        ("price", "number", "500"),
                        ("description", "string", "Rare 1960s guitar"),
                    ],
                    "Lists an item for sale in the marketplace",
                ),
                (
                    "buyItem",
                    "Purchase an item from marketplace",
                    &[
                        ("listingId", "string", "listing_123"),
                        ("buyerAddress", "string", "anoma1buyer..."),
                    ],
                    "Buys an item and transfers ownership",
                ),
                (
                    "getListings",
                    "View all marketplace listings",
                    &[],
                    "Shows all items available for purchase",
                ),
            ],
            ContractFamily::Defi => &[
                (
                    "deposit",
                    "Deposit tokens into protocol",
                    &[("amount", "number", "1000"), ("tokenType", "string", "USDC")],
                    "Deposits tokens to earn interest or rewards",
                ),
                (
                    "withdraw",
                    "Withdraw tokens from protocol",
                    &[("amount", "number", "500")],
                    "Withdraws your deposited tokens plus any earned rewards",
                ),
                (
                    "getBalance",
                    "Check your protocol balance",
                    &[("userAddress", "string", "anoma1user...")],
                    "Shows your current deposits and earned rewards",
                ),
            ],
            ContractFamily::Resource => &[
                (
                    "getMessage",
                    "Get the contract's message",
                    &[("resourceId", "string", "resource_001")],
                    "Returns the stored message from your contract",
                ),
                (
                    "updateMessage",
                    "Change the contract's message",
                    &[("newMessage", "string", "Hello, Anoma!")],
                    "Updates the message stored in your contract",
                ),
                (
                    "createResource",
                    "Create a new resource",
                    &[
                        ("resourceType", "string", "UserData"),
                        ("initialValue", "string", "Initial content"),
                    ],
                    "Creates a new resource on the blockchain",
                ),
                (
                    "validateResource",
                    "Check if resource is valid",
                    &[("resourceId", "string", "resource_001")],
                    "Validates the resource follows all rules and constraints",
                ),
            ],
        };

        table
            .iter()
            .map(|(name, description, params, what_it_does)| ContractFunction {
                name: name.to_string(),
                description: description.to_string(),
                parameters: params
                    .iter()
                    .map(|(name, kind, example)| FunctionParameter {
                        name: name.to_string(),
                        kind: kind.to_string(),
                        example: example.to_string(),
                    })
                    .collect(),
                what_it_does: what_it_does.to_string(),
            })
            .collect()
    }
}

/// The functions offered for a source file.
pub fn contract_functions(file_name: &str) -> Vec<ContractFunction> {
    ContractFamily::for_file(file_name).functions()
}

/// Outcome of one simulated call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub simulation_id: Uuid,
    pub function: String,
    pub parameters: Vec<String>,
    pub result: Value,
    pub execution_time_ms: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A resource in the fixed mock ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerResource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub timestamp: i64,
    pub owner: String,
}

/// The projection queries the ledger answers.
pub const QUERY_FUNCTIONS: [&str; 4] = [
    "getHelloWorldMessage",
    "getAllResources",
    "getResourceOwner",
    "getResourceTimestamp",
];

/// The fixed ledger projection queries run against.
pub fn mock_ledger() -> Vec<LedgerResource> {
    vec![
        LedgerResource {
            id: "resource_001".to_string(),
            kind: "HelloWorldResource".to_string(),
            message: "Hello, Anoma!".to_string(),
            timestamp: 1_704_067_200,
            owner: "ed25519:A1B2C3D4E5F6...".to_string(),
        },
        LedgerResource {
            id: "resource_002".to_string(),
            kind: "HelloWorldResource".to_string(),
            message: "Welcome to the future!".to_string(),
            timestamp: 1_704_067_300,
            owner: "ed25519:F6E5D4C3B2A1...".to_string(),
        },
    ]
}

/// Simulator configuration.
#[derive(Debug, Clone, Default)]
pub struct SimulatorConfig {
    /// Artificial delay before a result is returned.
    pub latency: Duration,
}

/// The stand-in simulator.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Run `function` from the catalog selected by `file_name`.
    pub async fn simulate(
        &self,
        file_name: &str,
        function: &str,
        params: &BTreeMap<String, String>,
    ) -> SimulationResult {
        self.delay().await;

        let catalog = contract_functions(file_name);
        let Some(entry) = catalog.iter().find(|f| f.name == function) else {
            tracing::debug!(file_name, function, "function not in catalog");
            return SimulationResult {
                simulation_id: Uuid::new_v4(),
                function: function.to_string(),
                parameters: params.values().cloned().collect(),
                result: Value::Null,
                execution_time_ms: 0.0,
                success: false,
                error: Some(format!("Unknown function {} for {}", function, file_name)),
            };
        };

        let parameters = entry
            .parameters
            .iter()
            .filter_map(|p| params.get(&p.name).cloned())
            .collect();

        SimulationResult {
            simulation_id: Uuid::new_v4(),
            function: function.to_string(),
            parameters,
            result: mock_result(file_name, function, params),
            execution_time_ms: f64::from(rand::thread_rng().gen_range(100u32..600)),
            success: true,
            error: None,
        }
    }

    /// Run a projection query against the mock ledger.
    pub async fn query(&self, function: &str, resource_id: &str) -> SimulationResult {
        self.delay().await;

        let ledger = mock_ledger();
        let resource = ledger.iter().find(|r| r.id == resource_id);
        let not_found = || format!("Resource {} not found", resource_id);

        let outcome: Result<Value, String> = match function {
            "getHelloWorldMessage" => resource.map(|r| json!(r.message)).ok_or_else(not_found),
            "getAllResources" => Ok(Value::Array(
                ledger
                    .iter()
                    .map(|r| json!({ "id": r.id, "type": r.kind, "message": r.message }))
                    .collect(),
            )),
            "getResourceOwner" => resource.map(|r| json!(r.owner)).ok_or_else(not_found),
            "getResourceTimestamp" => resource.map(|r| json!(r.timestamp)).ok_or_else(not_found),
            _ => Err("Unknown function".to_string()),
        };

        let parameters = if function == "getAllResources" {
            Vec::new()
        } else {
            vec![resource_id.to_string()]
        };
        let execution_time_ms = rand::thread_rng().gen_range(0.0..10.0);

        match outcome {
            Ok(result) => SimulationResult {
                simulation_id: Uuid::new_v4(),
                function: function.to_string(),
                parameters,
                result,
                execution_time_ms,
                success: true,
                error: None,
            },
            Err(error) => SimulationResult {
                simulation_id: Uuid::new_v4(),
                function: function.to_string(),
                parameters,
                result: Value::Null,
                execution_time_ms,
                success: false,
                error: Some(error),
            },
        }
    }

    async fn delay(&self) {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
    }
}

/// Canned result for a catalog function.
pub fn mock_result(file_name: &str, function: &str, params: &BTreeMap<String, String>) -> Value {
    let param = |name: &str| params.get(name).cloned();
    let now = Utc::now().to_rfc3339();
    let mut rng = rand::thread_rng();

    match function {
        "transferTokens" => json!({
            "success": true,
            "transactionId": format!("tx_{}", random_base36(9)),
            "fromBalance": "900 GOLD",
            "toBalance": "1100 GOLD",
            "fee": "5 GOLD",
        }),
        "getTokenBalance" => json!({
            "address": param("address"),
            "balance": format!("{} GOLD", rng.gen_range(0..1000)),
            "lastUpdate": now,
        }),
        "createToken" => json!({
            "tokenId": param("tokenId"),
            "amount": param("amount"),
            "owner": "anoma1your_address...",
            "created": now,
        }),
        "createProposal" => json!({
            "proposalId": rng.gen_range(1..=100),
            "title": param("title"),
            "status": "active",
            "votingEnds": (Utc::now() + ChronoDuration::days(7)).to_rfc3339(),
        }),
        "castVote" => {
            let choice = match param("optionIndex").as_deref() {
                Some("0") => "Yes",
                Some("1") => "No",
                _ => "Abstain",
            };
            json!({
                "proposalId": param("proposalId"),
                "voterChoice": choice,
                "voteWeight": 1,
                "timestamp": now,
            })
        }
        "getVotingResults" => json!({
            "proposalId": param("proposalId"),
            "totalVotes": 247,
            "results": { "Yes": 156, "No": 73, "Abstain": 18 },
            "winner": "Yes",
            "status": "completed",
        }),
        "createResource" => json!({
            "resourceId": format!("resource_{}", random_base36(9)),
            "resourceType": non_empty(param("resourceType")).unwrap_or_else(|| "UserData".to_string()),
            "initialValue": non_empty(param("initialValue")).unwrap_or_else(|| "Default content".to_string()),
            "created": now,
            "contract": file_name,
            "status": "created",
        }),
        _ => json!({
            "message": non_empty(param("newMessage"))
                .or_else(|| non_empty(param("initialValue")))
                .unwrap_or_else(|| "Hello, Anoma Network!".to_string()),
            "timestamp": now,
            "contract": file_name,
            "userInput": params,
        }),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn random_base36(len: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_family_lookup() {
        assert_eq!(ContractFamily::for_file("MyToken.juvix"), ContractFamily::Token);
        assert_eq!(ContractFamily::for_file("Transfer.juvix"), ContractFamily::Token);
        assert_eq!(ContractFamily::for_file("VOTING.juvix"), ContractFamily::Voting);
        assert_eq!(ContractFamily::for_file("Market.juvix"), ContractFamily::Marketplace);
        assert_eq!(ContractFamily::for_file("DefiVault.juvix"), ContractFamily::Defi);
        assert_eq!(ContractFamily::for_file("Protocol.juvix"), ContractFamily::Defi);
        assert_eq!(ContractFamily::for_file("HelloWorld.juvix"), ContractFamily::Resource);
        // first pattern wins
        assert_eq!(ContractFamily::for_file("TokenMarket.juvix"), ContractFamily::Token);
    }

    #[test]
    fn test_catalogs() {
        let names: Vec<String> = contract_functions("HelloWorld.juvix")
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            names,
            vec!["getMessage", "updateMessage", "createResource", "validateResource"]
        );

        let market = contract_functions("Marketplace.juvix");
        let listings = market.iter().find(|f| f.name == "getListings").unwrap();
        assert!(listings.parameters.is_empty());

        let value = serde_json::to_value(&market[0]).unwrap();
        assert_eq!(value["whatItDoes"], "Lists an item for sale in the marketplace");
        assert_eq!(value["parameters"][1]["type"], "number");
    }

    #[tokio::test]
    async fn test_simulate_cast_vote() {
        let simulator = Simulator::default();
        let result = simulator
            .simulate(
                "Voting.juvix",
                "castVote",
                &params(&[("optionIndex", "1"), ("proposalId", "3")]),
            )
            .await;

        assert!(result.success);
        assert_eq!(result.parameters, vec!["3", "1"]);
        assert_eq!(result.result["voterChoice"], "No");
        assert_eq!(result.result["proposalId"], "3");
        assert!((100.0..600.0).contains(&result.execution_time_ms));
    }

    #[tokio::test]
    async fn test_simulate_transfer_tokens_has_transaction_id() {
        let simulator = Simulator::default();
        let result = simulator
            .simulate("Token.juvix", "transferTokens", &BTreeMap::new())
            .await;
        let tx = result.result["transactionId"].as_str().unwrap();
        assert!(tx.starts_with("tx_"));
        assert_eq!(tx.len(), 12);
    }

    #[tokio::test]
    async fn test_simulate_default_result_echoes_input() {
        let simulator = Simulator::default();
        let result = simulator
            .simulate(
                "HelloWorld.juvix",
                "updateMessage",
                &params(&[("newMessage", "gm")]),
            )
            .await;
        assert_eq!(result.result["message"], "gm");
        assert_eq!(result.result["contract"], "HelloWorld.juvix");
        assert_eq!(result.result["userInput"]["newMessage"], "gm");
    }

    #[tokio::test]
    async fn test_simulate_create_resource_defaults() {
        let simulator = Simulator::default();
        let result = simulator
            .simulate("HelloWorld.juvix", "createResource", &BTreeMap::new())
            .await;
        assert_eq!(result.result["resourceType"], "UserData");
        assert_eq!(result.result["initialValue"], "Default content");
        assert_eq!(result.result["status"], "created");
    }

    #[tokio::test]
    async fn test_simulate_function_outside_catalog() {
        let simulator = Simulator::default();
        let result = simulator
            .simulate("HelloWorld.juvix", "castVote", &BTreeMap::new())
            .await;
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Unknown function castVote for HelloWorld.juvix")
        );
    }

    #[tokio::test]
    async fn test_projection_queries() {
        let simulator = Simulator::default();

        let message = simulator.query("getHelloWorldMessage", "resource_001").await;
        assert!(message.success);
        assert_eq!(message.result, json!("Hello, Anoma!"));
        assert_eq!(message.parameters, vec!["resource_001"]);

        let owner = simulator.query("getResourceOwner", "resource_002").await;
        assert_eq!(owner.result, json!("ed25519:F6E5D4C3B2A1..."));

        let timestamp = simulator.query("getResourceTimestamp", "resource_001").await;
        assert_eq!(timestamp.result, json!(1_704_067_200));

        let all = simulator.query("getAllResources", "ignored").await;
        assert!(all.parameters.is_empty());
        assert_eq!(all.result.as_array().unwrap().len(), 2);
        assert_eq!(all.result[1]["message"], "Welcome to the future!");
    }

    #[tokio::test]
    async fn test_projection_query_failures() {
        let simulator = Simulator::default();

        let missing = simulator.query("getHelloWorldMessage", "resource_999").await;
        assert!(!missing.success);
        assert_eq!(missing.result, Value::Null);
        assert_eq!(missing.error.as_deref(), Some("Resource resource_999 not found"));

        let unknown = simulator.query("dropTables", "resource_001").await;
        assert_eq!(unknown.error.as_deref(), Some("Unknown function"));
    }

    #[test]
    fn test_random_base36() {
        let id = random_base36(9);
        assert_eq!(id.len(), 9);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}

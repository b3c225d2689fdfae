//! Application state.

use std::sync::Arc;

use studio_core::export::DirectorySink;
use studio_core::{Intent, IntentStage, SignedIntent};
use studio_keys::{ActiveKeyPair, FileStorage, InMemoryStorage, KeyManager, LocalStorage};
use studio_sandbox::{Compiler, CompilerConfig, Simulator, SimulatorConfig};
use tokio::sync::RwLock;

use crate::config::NodeConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The active key pair, persisted to local storage.
    pub keys: ActiveKeyPair,

    pub manager: KeyManager,

    pub compiler: Compiler,

    pub simulator: Simulator,

    /// Where exports are written besides the response body.
    pub exports: Option<Arc<DirectorySink>>,

    /// The intent currently being built.
    pub session: Arc<RwLock<IntentSession>>,
}

/// The intent builder's working set.
///
/// Building a new draft discards any signature over the previous one.
#[derive(Debug, Clone, Default)]
pub struct IntentSession {
    pub draft: Option<Intent>,
    pub signed: Option<SignedIntent>,
    pub stage: Option<IntentStage>,
}

impl IntentSession {
    /// Replace the draft. Clears the previous signature.
    pub fn start(&mut self, intent: Intent, valid: bool) {
        self.draft = Some(intent);
        self.signed = None;
        self.stage = Some(if valid {
            IntentStage::Validated
        } else {
            IntentStage::Draft
        });
    }

    pub fn record_signed(&mut self, signed: SignedIntent) {
        self.draft = Some(signed.intent.clone());
        self.signed = Some(signed);
        self.stage = Some(IntentStage::Signed);
    }

    pub fn mark_exported(&mut self) {
        if self.draft.is_some() {
            self.stage = Some(IntentStage::Exported);
        }
    }
}

impl AppState {
    /// Build state from configuration, opening local storage if configured.
    pub async fn from_config(config: &NodeConfig) -> studio_core::Result<Self> {
        let storage: Arc<dyn LocalStorage> = match &config.storage_path {
            Some(path) => {
                tracing::info!("storage: file at {}", path.display());
                Arc::new(FileStorage::open(path).await?)
            }
            None => {
                tracing::info!("storage: in-memory (key pair will not survive restart)");
                Arc::new(InMemoryStorage::new())
            }
        };

        let exports = config.export_dir.as_ref().map(|dir| {
            tracing::info!("exports: also written to {}", dir.display());
            Arc::new(DirectorySink::new(dir))
        });

        Ok(Self::with_storage(storage, config, exports).await)
    }

    /// State over the given storage.
    pub async fn with_storage(
        storage: Arc<dyn LocalStorage>,
        config: &NodeConfig,
        exports: Option<Arc<DirectorySink>>,
    ) -> Self {
        Self {
            keys: ActiveKeyPair::load(storage).await,
            manager: KeyManager::new().with_timeout(config.crypto_timeout),
            compiler: Compiler::new(CompilerConfig {
                latency: config.compile_latency,
            }),
            simulator: Simulator::new(SimulatorConfig {
                latency: config.compile_latency,
            }),
            exports,
            session: Arc::new(RwLock::new(IntentSession::default())),
        }
    }

    /// In-memory state with default settings.
    pub async fn in_memory() -> Self {
        Self::with_storage(
            Arc::new(InMemoryStorage::new()),
            &NodeConfig::default(),
            None,
        )
        .await
    }
}

//! # Hangman Transaction Processor Service
//!
//! `HangmanProcessor::process` is the consensus-critical entry point. Every
//! validator re-executes it, so it is a pure function of the transaction and
//! the state the backend returns:
//!
//! 1. Check the header names the `hm` family.
//! 2. Decode and validate the payload.
//! 3. Read the current snapshot and run the game rules.
//! 4. Append the next snapshot, or clear the address on delete.
//!
//! Nothing is written unless steps 1-3 succeed.

use crate::domain::{apply, GameAction, Transition};
use crate::errors::ProcessError;
use crate::ports::{StateBackend, TransactionHandler, TransactionRequest};
use crate::store::{VersionedStateStore, STATE_TIMEOUT};

use async_trait::async_trait;
use hm_shared_types::{Action, Game, Payload, FAMILY_NAME, FAMILY_VERSION, NAMESPACE};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Processor configuration.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Bound on each state backend request.
    pub state_timeout: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            state_timeout: STATE_TIMEOUT,
        }
    }
}

/// Counters for processed transactions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessorStats {
    /// Transactions applied to state.
    pub applied: u64,
    /// Transactions rejected as invalid.
    pub rejected: u64,
    /// Transactions aborted on a backend failure.
    pub failed: u64,
}

/// Transaction handler of the `hm` family.
pub struct HangmanProcessor<B: StateBackend> {
    config: ProcessorConfig,
    store: VersionedStateStore<B>,
    stats: Arc<RwLock<ProcessorStats>>,
}

impl<B: StateBackend> HangmanProcessor<B> {
    pub fn new(backend: Arc<B>, config: ProcessorConfig) -> Self {
        Self {
            store: VersionedStateStore::new(backend, config.state_timeout),
            config,
            stats: Arc::new(RwLock::new(ProcessorStats::default())),
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// The store the processor reads and writes through.
    pub fn store(&self) -> &VersionedStateStore<B> {
        &self.store
    }

    pub async fn stats(&self) -> ProcessorStats {
        self.stats.read().await.clone()
    }

    /// Validate and apply one transaction.
    #[instrument(skip(self, request), fields(signer = %short_key(&request.header.signer_public_key)))]
    pub async fn process(&self, request: &TransactionRequest) -> Result<(), ProcessError> {
        let result = self.execute(request).await;

        let mut stats = self.stats.write().await;
        match &result {
            Ok(()) => stats.applied += 1,
            Err(err) if err.is_invalid_transaction() => {
                stats.rejected += 1;
                warn!(reason = %err, "transaction rejected");
            }
            Err(err) => {
                stats.failed += 1;
                error!(error = %err, "transaction aborted");
            }
        }
        result
    }

    async fn execute(&self, request: &TransactionRequest) -> Result<(), ProcessError> {
        let header = &request.header;
        if header.family_name != FAMILY_NAME || header.family_version != FAMILY_VERSION {
            return Err(ProcessError::UnsupportedFamily {
                name: header.family_name.clone(),
                version: header.family_version.clone(),
            });
        }

        let payload = Payload::decode(&request.payload)?;
        let action = GameAction::from_payload(&payload)?;
        let current = self.store.get(&payload.name).await?;

        match apply(
            &payload.name,
            current.as_ref(),
            &action,
            &header.signer_public_key,
        )? {
            Transition::Append(game) => {
                log_snapshot(&payload, &game);
                self.store.put(&payload.name, game).await?;
            }
            Transition::Remove => {
                info!(game = %payload.name, "game deleted");
                self.store.remove(&payload.name).await?;
            }
        }
        Ok(())
    }
}

fn log_snapshot(payload: &Payload, game: &Game) {
    match payload.action {
        Action::Create => {
            info!(game = %game.name, host = %short_key(&game.host), "game created");
        }
        _ => {
            debug!(
                game = %game.name,
                guess = %payload.guess,
                hits = %game.hits.as_string(),
                misses = %game.misses.as_string(),
                state = %game.state,
                "guess applied"
            );
            if game.state.is_terminal() {
                info!(game = %game.name, state = %game.state, "game finished");
            }
        }
    }
}

/// First 12 hex chars of a public key, for log fields.
fn short_key(key: &str) -> &str {
    key.get(..12).unwrap_or(key)
}

#[async_trait]
impl<B: StateBackend> TransactionHandler for HangmanProcessor<B> {
    fn family_name(&self) -> &str {
        FAMILY_NAME
    }

    fn family_versions(&self) -> Vec<String> {
        vec![FAMILY_VERSION.to_string()]
    }

    fn namespaces(&self) -> Vec<String> {
        vec![NAMESPACE.to_string()]
    }

    async fn apply(&self, request: &TransactionRequest) -> Result<(), ProcessError> {
        self.process(request).await
    }
}

/// Processor over a fresh in-memory backend.
pub fn create_test_processor() -> HangmanProcessor<crate::adapters::InMemoryStateBackend> {
    HangmanProcessor::new(
        Arc::new(crate::adapters::InMemoryStateBackend::new()),
        ProcessorConfig::default(),
    )
}

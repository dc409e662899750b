//! # Hangman Client Service
//!
//! Composes the envelope builder with a `LedgerGateway`:
//!
//! - `send` builds one signed batch and submits it, fire-and-forget.
//! - `wait_for_commit` polls the status link with a bounded budget. A batch
//!   still pending when the budget runs out is reported as `Pending`, which is
//!   inconclusive rather than a failure.
//! - `game`, `history` and `blocks` read ledger state back.

use crate::builder::EnvelopeBuilder;
use crate::domain::{BatchStatus, BlockSummary, ClientError, Submission, SubmissionLink};
use crate::ports::{LedgerGateway, Signer};

use hm_shared_types::{Action, Address, Game, SnapshotLog};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the validator REST API.
    pub rest_api_url: String,
    /// Status queries per `wait_for_commit`.
    pub poll_attempts: u32,
    /// Delay between status queries.
    pub poll_interval: Duration,
    /// Timeout of a single HTTP request.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rest_api_url: "http://rest-api:8008".to_string(),
            poll_attempts: 10,
            poll_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `HM_REST_API_URL`, `HM_POLL_ATTEMPTS` and
    /// `HM_POLL_INTERVAL_MS`. Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("HM_REST_API_URL") {
            config.rest_api_url = url;
        }
        if let Some(raw) = lookup("HM_POLL_ATTEMPTS") {
            match raw.parse() {
                Ok(attempts) => config.poll_attempts = attempts,
                Err(_) => warn!(value = %raw, "HM_POLL_ATTEMPTS must be a non-negative integer"),
            }
        }
        if let Some(raw) = lookup("HM_POLL_INTERVAL_MS") {
            match raw.parse() {
                Ok(ms) => config.poll_interval = Duration::from_millis(ms),
                Err(_) => warn!(value = %raw, "HM_POLL_INTERVAL_MS must be milliseconds"),
            }
        }

        config
    }
}

/// Player-side client of the `hm` family.
pub struct HangmanClient<S: Signer, G: LedgerGateway> {
    config: ClientConfig,
    builder: EnvelopeBuilder<S>,
    gateway: G,
}

impl<S: Signer, G: LedgerGateway> HangmanClient<S, G> {
    pub fn new(signer: S, gateway: G, config: ClientConfig) -> Self {
        Self {
            config,
            builder: EnvelopeBuilder::new(signer),
            gateway,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn builder(&self) -> &EnvelopeBuilder<S> {
        &self.builder
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Public key the client signs with.
    pub fn public_key(&self) -> String {
        self.builder.public_key()
    }

    /// Build, sign and submit one action.
    #[instrument(skip(self, guess))]
    pub async fn send(
        &self,
        name: &str,
        action: Action,
        guess: &str,
    ) -> Result<Submission, ClientError> {
        let envelope = self.builder.build(name, action, guess)?;
        let link = self.gateway.submit_batches(envelope.to_bytes()).await?;
        info!(batch = %envelope.batch_id, %link, "batch submitted");

        Ok(Submission {
            link,
            address: envelope.address,
            transaction_id: envelope.transaction_id,
            batch_id: envelope.batch_id,
        })
    }

    pub async fn create(&self, name: &str, word: &str) -> Result<Submission, ClientError> {
        self.send(name, Action::Create, word).await
    }

    pub async fn delete(&self, name: &str) -> Result<Submission, ClientError> {
        self.send(name, Action::Delete, "").await
    }

    pub async fn guess(&self, name: &str, letter: char) -> Result<Submission, ClientError> {
        self.send(name, Action::Guess, &letter.to_string()).await
    }

    /// Poll until the batch leaves `Pending` or the attempt budget is spent.
    ///
    /// Returns the last status observed; with a zero budget nothing is
    /// queried and the result is `Pending`.
    pub async fn wait_for_commit(
        &self,
        link: &SubmissionLink,
    ) -> Result<BatchStatus, ClientError> {
        let attempts = self.config.poll_attempts;
        for attempt in 1..=attempts {
            let status = self.gateway.batch_status(link).await?;
            debug!(attempt, %status, "batch status");
            if status.is_final() {
                return Ok(status);
            }
            if attempt < attempts {
                tokio::time::sleep(self.config.poll_interval).await;
            }
        }
        info!(%link, attempts, "batch still pending");
        Ok(BatchStatus::Pending)
    }

    /// Current snapshot of game `name`, or `None` if it does not exist.
    pub async fn game(&self, name: &str) -> Result<Option<Game>, ClientError> {
        Ok(self.history(name).await?.and_then(SnapshotLog::into_current))
    }

    /// Every snapshot of game `name`, oldest first.
    pub async fn history(&self, name: &str) -> Result<Option<SnapshotLog>, ClientError> {
        let address = Address::derive(name);
        let Some(bytes) = self.gateway.state(&address).await? else {
            return Ok(None);
        };
        let log = SnapshotLog::from_bytes(&bytes)?;
        Ok((!log.is_empty()).then_some(log))
    }

    /// The most recent `limit` blocks.
    pub async fn blocks(&self, limit: usize) -> Result<Vec<BlockSummary>, ClientError> {
        Ok(self.gateway.blocks(limit).await?)
    }
}

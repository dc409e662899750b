//! `StateBackend` over the validator's transaction context.
//!
//! State calls name the context of the transaction being applied. One
//! processor serves every transaction, so the context id rides in a task-local
//! set by `ValidatorState::scoped` around each `apply`.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hm_01_transaction_processor::prelude::{BackendError, StateBackend};
use hm_shared_types::Address;

use crate::connection::{expect_reply, ConnectionError, ValidatorConnection};
use crate::protocol::{
    content, state_status, MessageType, TpStateDeleteRequest, TpStateDeleteResponse,
    TpStateEntry, TpStateGetRequest, TpStateGetResponse, TpStateSetRequest, TpStateSetResponse,
};

tokio::task_local! {
    static CONTEXT_ID: String;
}

/// Global state as seen by one in-flight transaction.
pub struct ValidatorState {
    connection: Arc<ValidatorConnection>,
}

impl ValidatorState {
    pub fn new(connection: Arc<ValidatorConnection>) -> Self {
        Self { connection }
    }

    /// Run `work` with its state calls bound to `context_id`.
    pub async fn scoped<F: Future>(context_id: String, work: F) -> F::Output {
        CONTEXT_ID.scope(context_id, work).await
    }

    async fn call<M: prost::Message + Default>(
        &self,
        kind: MessageType,
        body: Vec<u8>,
        expected: MessageType,
        what: &'static str,
        timeout: Duration,
    ) -> Result<M, BackendError> {
        let reply = tokio::time::timeout(timeout, self.connection.request(kind, body))
            .await
            .map_err(|_| BackendError::Timeout(timeout))?
            .map_err(unavailable)?;
        expect_reply(&reply, expected, what).map_err(unavailable)
    }
}

fn context_id() -> Result<String, BackendError> {
    CONTEXT_ID
        .try_with(Clone::clone)
        .map_err(|_| BackendError::Unavailable("state call outside a transaction context".into()))
}

fn unavailable(err: ConnectionError) -> BackendError {
    BackendError::Unavailable(err.to_string())
}

fn check_status(status: i32, what: &str) -> Result<(), BackendError> {
    match status {
        state_status::OK => Ok(()),
        state_status::AUTHORIZATION_ERROR => Err(BackendError::Unavailable(format!(
            "{what} refused: address outside the declared inputs or outputs"
        ))),
        other => Err(BackendError::Unavailable(format!(
            "{what} failed with status {other}"
        ))),
    }
}

fn parse_addresses(raw: Vec<String>) -> Result<Vec<Address>, BackendError> {
    raw.into_iter()
        .map(|a| Address::parse(&a).map_err(|e| BackendError::Unavailable(e.to_string())))
        .collect()
}

fn to_strings(addresses: &[Address]) -> Vec<String> {
    addresses.iter().map(ToString::to_string).collect()
}

#[async_trait]
impl StateBackend for ValidatorState {
    async fn get_state(
        &self,
        addresses: &[Address],
        timeout: Duration,
    ) -> Result<BTreeMap<Address, Vec<u8>>, BackendError> {
        let request = TpStateGetRequest {
            context_id: context_id()?,
            addresses: to_strings(addresses),
        };
        let reply: TpStateGetResponse = self
            .call(
                MessageType::TpStateGetRequest,
                content(&request),
                MessageType::TpStateGetResponse,
                "state get response",
                timeout,
            )
            .await?;
        check_status(reply.status, "state get")?;

        let mut found = BTreeMap::new();
        // Unset addresses come back as entries with no data.
        for entry in reply.entries.into_iter().filter(|e| !e.data.is_empty()) {
            let address = Address::parse(&entry.address)
                .map_err(|e| BackendError::Unavailable(e.to_string()))?;
            found.insert(address, entry.data);
        }
        Ok(found)
    }

    async fn set_state(
        &self,
        entries: BTreeMap<Address, Vec<u8>>,
        timeout: Duration,
    ) -> Result<Vec<Address>, BackendError> {
        let request = TpStateSetRequest {
            context_id: context_id()?,
            entries: entries
                .into_iter()
                .map(|(address, data)| TpStateEntry {
                    address: address.to_string(),
                    data,
                })
                .collect(),
        };
        let reply: TpStateSetResponse = self
            .call(
                MessageType::TpStateSetRequest,
                content(&request),
                MessageType::TpStateSetResponse,
                "state set response",
                timeout,
            )
            .await?;
        check_status(reply.status, "state set")?;
        parse_addresses(reply.addresses)
    }

    async fn delete_state(
        &self,
        addresses: &[Address],
        timeout: Duration,
    ) -> Result<Vec<Address>, BackendError> {
        let request = TpStateDeleteRequest {
            context_id: context_id()?,
            addresses: to_strings(addresses),
        };
        let reply: TpStateDeleteResponse = self
            .call(
                MessageType::TpStateDeleteRequest,
                content(&request),
                MessageType::TpStateDeleteResponse,
                "state delete response",
                timeout,
            )
            .await?;
        check_status(reply.status, "state delete")?;
        parse_addresses(reply.addresses)
    }
}

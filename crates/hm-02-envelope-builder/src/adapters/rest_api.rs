//! REST API client for the validator.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use hm_shared_types::Address;
use reqwest::{header::CONTENT_TYPE, Client, Response, StatusCode};
use tracing::debug;

use super::types::*;
use crate::domain::{BatchStatus, BlockSummary, GatewayError, SubmissionLink};
use crate::ports::LedgerGateway;

/// `LedgerGateway` over HTTP.
pub struct RestApiClient {
    client: Client,
    base_url: String,
}

impl RestApiClient {
    /// Create a client for the REST API at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn transport_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_connect() {
            GatewayError::Connection(format!("Cannot connect to {}", self.base_url))
        } else {
            GatewayError::Http(e.to_string())
        }
    }

    async fn get(&self, url: &str) -> Result<Response, GatewayError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))
    }
}

/// Turn a non-2xx reply into `GatewayError::Status`, preferring the API's
/// own error message over the raw body.
async fn ensure_success(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ErrorResponse>(&body)
        .ok()
        .and_then(|reply| reply.describe())
        .unwrap_or(body);
    Err(GatewayError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    response
        .json()
        .await
        .map_err(|e| GatewayError::Parse(e.to_string()))
}

#[async_trait]
impl LedgerGateway for RestApiClient {
    async fn submit_batches(&self, batch_list: Vec<u8>) -> Result<SubmissionLink, GatewayError> {
        let response = self
            .client
            .post(self.url("batches"))
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(batch_list)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let reply: SubmitResponse = parse(ensure_success(response).await?).await?;
        debug!(?reply, "batch list accepted");
        reply
            .link
            .map(SubmissionLink)
            .ok_or_else(|| GatewayError::Parse("Missing link in response".to_string()))
    }

    async fn batch_status(&self, link: &SubmissionLink) -> Result<BatchStatus, GatewayError> {
        let response = ensure_success(self.get(link.as_str()).await?).await?;
        let reply: BatchStatusesResponse = parse(response).await?;
        for entry in &reply.data {
            for txn in &entry.invalid_transactions {
                debug!(batch = %entry.id, transaction = %txn.id, reason = %txn.message, "invalid transaction");
            }
        }
        Ok(reply.status())
    }

    async fn state(&self, address: &Address) -> Result<Option<Vec<u8>>, GatewayError> {
        let response = self.get(&self.url(&format!("state/{address}"))).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let reply: StateResponse = parse(ensure_success(response).await?).await?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(reply.data.as_bytes())
            .map_err(|e| GatewayError::Parse(format!("state is not base64: {e}")))?;
        Ok((!bytes.is_empty()).then_some(bytes))
    }

    async fn blocks(&self, limit: usize) -> Result<Vec<BlockSummary>, GatewayError> {
        let response = self.get(&self.url(&format!("blocks?limit={limit}"))).await?;
        let reply: BlockListResponse = parse(ensure_success(response).await?).await?;
        reply.data.into_iter().map(BlockSummary::try_from).collect()
    }
}

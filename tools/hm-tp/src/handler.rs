//! Turning validator process requests into handler calls and back.

use hm_01_transaction_processor::prelude::{TransactionHandler, TransactionRequest};
use tracing::{debug, warn};

use crate::protocol::{process_status, TpProcessRequest, TpProcessResponse, TpRegisterRequest};

/// One registration per family version the handler serves.
pub fn registrations<H: TransactionHandler>(
    handler: &H,
    max_occupancy: u32,
) -> Vec<TpRegisterRequest> {
    handler
        .family_versions()
        .into_iter()
        .map(|version| TpRegisterRequest {
            family: handler.family_name().to_string(),
            version,
            namespaces: handler.namespaces(),
            max_occupancy,
        })
        .collect()
}

/// Apply one transaction and build the validator's answer.
pub async fn respond<H: TransactionHandler>(
    handler: &H,
    request: TpProcessRequest,
) -> TpProcessResponse {
    let Some(header) = request.header else {
        return TpProcessResponse {
            status: process_status::INVALID_TRANSACTION,
            message: "process request without a transaction header".to_string(),
        };
    };
    let transaction = TransactionRequest::new(
        header.signer_public_key,
        header.family_name,
        header.family_version,
        request.payload,
    );

    match handler.apply(&transaction).await {
        Ok(()) => {
            debug!(signature = %request.signature, "transaction applied");
            TpProcessResponse {
                status: process_status::OK,
                message: String::new(),
            }
        }
        Err(err) if err.is_invalid_transaction() => TpProcessResponse {
            status: process_status::INVALID_TRANSACTION,
            message: err.to_string(),
        },
        Err(err) => {
            warn!(error = %err, signature = %request.signature, "internal error applying transaction");
            TpProcessResponse {
                status: process_status::INTERNAL_ERROR,
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hm_01_transaction_processor::prelude::*;
    use hm_02_envelope_builder::prelude::TransactionHeader;
    use hm_shared_types::{Payload, FAMILY_NAME, FAMILY_VERSION, NAMESPACE};

    fn process_request(payload: &Payload, family_version: &str) -> TpProcessRequest {
        TpProcessRequest {
            header: Some(TransactionHeader {
                signer_public_key: "02".repeat(33),
                family_name: FAMILY_NAME.into(),
                family_version: family_version.into(),
                ..TransactionHeader::default()
            }),
            payload: payload.encode().unwrap(),
            signature: "sig".into(),
            context_id: "ctx".into(),
        }
    }

    #[test]
    fn test_registrations_cover_handler_metadata() {
        let processor = create_test_processor();
        let requests = registrations(&processor, 10);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].family, FAMILY_NAME);
        assert_eq!(requests[0].version, FAMILY_VERSION);
        assert_eq!(requests[0].namespaces, vec![NAMESPACE.to_string()]);
        assert_eq!(requests[0].max_occupancy, 10);
    }

    #[tokio::test]
    async fn test_applied_transaction_is_ok() {
        let processor = create_test_processor();
        let reply = respond(
            &processor,
            process_request(&Payload::create("g1", "cat"), FAMILY_VERSION),
        )
        .await;
        assert_eq!(reply.status, process_status::OK);
        assert_eq!(processor.stats().await.applied, 1);
    }

    #[tokio::test]
    async fn test_rule_violation_is_invalid_transaction() {
        let processor = create_test_processor();
        let reply = respond(
            &processor,
            process_request(&Payload::guess("nope", 'a'), FAMILY_VERSION),
        )
        .await;
        assert_eq!(reply.status, process_status::INVALID_TRANSACTION);
        assert!(!reply.message.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_version_is_invalid_transaction() {
        let processor = create_test_processor();
        let reply = respond(&processor, process_request(&Payload::delete("g1"), "9.9")).await;
        assert_eq!(reply.status, process_status::INVALID_TRANSACTION);
    }

    #[tokio::test]
    async fn test_missing_header_is_invalid_transaction() {
        let processor = create_test_processor();
        let mut request = process_request(&Payload::delete("g1"), FAMILY_VERSION);
        request.header = None;
        let reply = respond(&processor, request).await;
        assert_eq!(reply.status, process_status::INVALID_TRANSACTION);
    }

    #[tokio::test]
    async fn test_backend_failure_is_internal_error() {
        let backend = std::sync::Arc::new(InMemoryStateBackend::new());
        backend.set_available(false);
        let processor = HangmanProcessor::new(backend, ProcessorConfig::default());
        let reply = respond(
            &processor,
            process_request(&Payload::create("g1", "cat"), FAMILY_VERSION),
        )
        .await;
        assert_eq!(reply.status, process_status::INTERNAL_ERROR);
    }
}

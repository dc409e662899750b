//! Request/reply correlation over the validator socket.
//!
//! `ValidatorConnection` hands out correlation ids and parks a oneshot per
//! outstanding request. `run_socket` owns the DEALER socket: it sends what the
//! connection queues and routes each inbound frame either to the request it
//! answers or to the caller's inbox.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use prost::Message as _;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use zeromq::{DealerSocket, SocketRecv, SocketSend, ZmqMessage};

use crate::protocol::{frame, Message, MessageType};

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("validator socket: {0}")]
    Socket(String),

    #[error("connection to the validator is closed")]
    Closed,

    #[error("undecodable {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: prost::DecodeError,
    },

    #[error("expected {expected:?} in reply, got message type {found}")]
    UnexpectedReply { expected: MessageType, found: i32 },
}

impl From<zeromq::ZmqError> for ConnectionError {
    fn from(err: zeromq::ZmqError) -> Self {
        ConnectionError::Socket(err.to_string())
    }
}

/// Shared handle for talking to the validator.
pub struct ValidatorConnection {
    outbound: mpsc::UnboundedSender<Message>,
    pending: Mutex<HashMap<String, oneshot::Sender<Message>>>,
}

impl ValidatorConnection {
    /// A connection and the queue of frames it wants sent.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Message>) {
        let (outbound, queued) = mpsc::unbounded_channel();
        let connection = Self {
            outbound,
            pending: Mutex::new(HashMap::new()),
        };
        (Arc::new(connection), queued)
    }

    /// Send a request and wait for the reply with its correlation id.
    pub async fn request(
        &self,
        kind: MessageType,
        content: Vec<u8>,
    ) -> Result<Message, ConnectionError> {
        let correlation_id = new_correlation_id();
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .map_err(|_| ConnectionError::Closed)?
            .insert(correlation_id.clone(), tx);

        if let Err(err) = self.send(Message::new(kind, correlation_id.clone(), content)) {
            self.forget(&correlation_id);
            return Err(err);
        }
        rx.await.map_err(|_| ConnectionError::Closed)
    }

    /// Answer `to` with a message of type `kind`.
    pub fn reply(
        &self,
        to: &Message,
        kind: MessageType,
        content: Vec<u8>,
    ) -> Result<(), ConnectionError> {
        self.send(Message::new(kind, to.correlation_id.clone(), content))
    }

    fn send(&self, message: Message) -> Result<(), ConnectionError> {
        self.outbound
            .send(message)
            .map_err(|_| ConnectionError::Closed)
    }

    fn forget(&self, correlation_id: &str) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.remove(correlation_id);
        }
    }

    /// Complete the request `message` answers, or hand it back when it
    /// answers nothing we asked.
    pub fn dispatch(&self, message: Message) -> Option<Message> {
        let waiter = match self.pending.lock() {
            Ok(mut pending) => pending.remove(&message.correlation_id),
            Err(_) => None,
        };
        match waiter {
            Some(waiter) => {
                // The requester may have given up; nothing else wants the reply.
                let _ = waiter.send(message);
                None
            }
            None => Some(message),
        }
    }

    /// Requests still waiting for a reply.
    pub fn outstanding(&self) -> usize {
        self.pending.lock().map_or(0, |pending| pending.len())
    }
}

fn new_correlation_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}

/// Decode the reply to a request, checking it is the expected type.
pub fn expect_reply<M: prost::Message + Default>(
    reply: &Message,
    expected: MessageType,
    what: &'static str,
) -> Result<M, ConnectionError> {
    if reply.kind() != Some(expected) {
        return Err(ConnectionError::UnexpectedReply {
            expected,
            found: reply.message_type,
        });
    }
    M::decode(reply.content.as_slice()).map_err(|source| ConnectionError::Decode { what, source })
}

/// Pump frames between `socket` and `connection` until either side closes.
///
/// Frames that answer no outstanding request go to `inbox`.
pub async fn run_socket(
    mut socket: DealerSocket,
    connection: Arc<ValidatorConnection>,
    mut queued: mpsc::UnboundedReceiver<Message>,
    inbox: mpsc::Sender<Message>,
) -> Result<(), ConnectionError> {
    loop {
        tokio::select! {
            next = queued.recv() => {
                let Some(message) = next else {
                    debug!("outbound queue closed");
                    return Ok(());
                };
                socket.send(ZmqMessage::from(frame(&message))).await?;
            }
            received = socket.recv() => {
                let Some(raw) = received?.into_vec().pop() else {
                    continue;
                };
                let message = match Message::decode(raw.as_ref()) {
                    Ok(message) => message,
                    Err(err) => {
                        warn!(error = %err, "dropping undecodable frame");
                        continue;
                    }
                };
                if let Some(unsolicited) = connection.dispatch(message) {
                    if inbox.send(unsolicited).await.is_err() {
                        return Ok(());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{content, TpRegisterResponse};

    #[tokio::test]
    async fn test_reply_completes_matching_request() {
        let (connection, mut queued) = ValidatorConnection::new();
        let requester = Arc::clone(&connection);
        let call = tokio::spawn(async move {
            requester
                .request(MessageType::PingRequest, Vec::new())
                .await
        });

        let sent = queued.recv().await.unwrap();
        assert_eq!(sent.kind(), Some(MessageType::PingRequest));
        assert_eq!(connection.outstanding(), 1);

        let answer = Message::new(MessageType::PingResponse, sent.correlation_id, vec![1]);
        assert!(connection.dispatch(answer.clone()).is_none());
        assert_eq!(call.await.unwrap().unwrap(), answer);
        assert_eq!(connection.outstanding(), 0);
    }

    #[test]
    fn test_unmatched_message_is_handed_back() {
        let (connection, _queued) = ValidatorConnection::new();
        let request = Message::new(MessageType::TpProcessRequest, "from-validator", vec![]);
        assert_eq!(connection.dispatch(request.clone()), Some(request));
    }

    #[test]
    fn test_reply_keeps_correlation_id() {
        let (connection, mut queued) = ValidatorConnection::new();
        let ping = Message::new(MessageType::PingRequest, "c7", vec![]);
        connection
            .reply(&ping, MessageType::PingResponse, Vec::new())
            .unwrap();
        let sent = queued.try_recv().unwrap();
        assert_eq!(sent.correlation_id, "c7");
        assert_eq!(sent.kind(), Some(MessageType::PingResponse));
    }

    #[tokio::test]
    async fn test_request_fails_when_queue_is_gone() {
        let (connection, queued) = ValidatorConnection::new();
        drop(queued);
        let err = connection
            .request(MessageType::PingRequest, Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectionError::Closed));
        assert_eq!(connection.outstanding(), 0);
    }

    #[test]
    fn test_expect_reply_checks_type() {
        let ok = TpRegisterResponse { status: 1 };
        let reply = Message::new(MessageType::TpRegisterResponse, "c1", content(&ok));
        let decoded: TpRegisterResponse =
            expect_reply(&reply, MessageType::TpRegisterResponse, "register response").unwrap();
        assert_eq!(decoded, ok);

        let err = expect_reply::<TpRegisterResponse>(
            &reply,
            MessageType::TpStateGetResponse,
            "state response",
        )
        .unwrap_err();
        assert!(matches!(err, ConnectionError::UnexpectedReply { found: 2, .. }));
    }
}

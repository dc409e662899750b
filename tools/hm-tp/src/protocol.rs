//! Validator component protocol.
//!
//! Every frame on the validator socket is one `Message`; its `content` holds
//! the request or response named by `message_type`. Replies carry the
//! correlation id of the request they answer.

use hm_02_envelope_builder::prelude::TransactionHeader;
use prost::Message as _;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum MessageType {
    Default = 0,
    TpRegisterRequest = 1,
    TpRegisterResponse = 2,
    TpUnregisterRequest = 3,
    TpUnregisterResponse = 4,
    TpProcessRequest = 5,
    TpProcessResponse = 6,
    TpStateGetRequest = 7,
    TpStateGetResponse = 8,
    TpStateSetRequest = 9,
    TpStateSetResponse = 10,
    TpStateDeleteRequest = 11,
    TpStateDeleteResponse = 12,
    PingRequest = 700,
    PingResponse = 701,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Message {
    #[prost(enumeration = "MessageType", tag = "1")]
    pub message_type: i32,
    #[prost(string, tag = "2")]
    pub correlation_id: String,
    #[prost(bytes = "vec", tag = "3")]
    pub content: Vec<u8>,
}

impl Message {
    pub fn new(kind: MessageType, correlation_id: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            message_type: kind as i32,
            correlation_id: correlation_id.into(),
            content,
        }
    }

    /// `None` for types this processor does not know.
    pub fn kind(&self) -> Option<MessageType> {
        MessageType::try_from(self.message_type).ok()
    }
}

/// Status codes shared by the register and unregister responses.
pub mod register_status {
    pub const OK: i32 = 1;
}

/// Status codes of a `TpProcessResponse`.
pub mod process_status {
    pub const OK: i32 = 1;
    pub const INVALID_TRANSACTION: i32 = 2;
    pub const INTERNAL_ERROR: i32 = 3;
}

/// Status codes of the state get, set and delete responses.
pub mod state_status {
    pub const OK: i32 = 1;
    pub const AUTHORIZATION_ERROR: i32 = 2;
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TpRegisterRequest {
    #[prost(string, tag = "1")]
    pub family: String,
    #[prost(string, tag = "2")]
    pub version: String,
    #[prost(string, repeated, tag = "4")]
    pub namespaces: Vec<String>,
    #[prost(uint32, tag = "5")]
    pub max_occupancy: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TpRegisterResponse {
    #[prost(int32, tag = "1")]
    pub status: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TpUnregisterRequest {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TpProcessRequest {
    #[prost(message, optional, tag = "1")]
    pub header: Option<TransactionHeader>,
    #[prost(bytes = "vec", tag = "2")]
    pub payload: Vec<u8>,
    #[prost(string, tag = "3")]
    pub signature: String,
    #[prost(string, tag = "4")]
    pub context_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TpProcessResponse {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(string, tag = "2")]
    pub message: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TpStateEntry {
    #[prost(string, tag = "1")]
    pub address: String,
    #[prost(bytes = "vec", tag = "2")]
    pub data: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TpStateGetRequest {
    #[prost(string, tag = "1")]
    pub context_id: String,
    #[prost(string, repeated, tag = "2")]
    pub addresses: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TpStateGetResponse {
    #[prost(message, repeated, tag = "1")]
    pub entries: Vec<TpStateEntry>,
    #[prost(int32, tag = "2")]
    pub status: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TpStateSetRequest {
    #[prost(string, tag = "1")]
    pub context_id: String,
    #[prost(message, repeated, tag = "2")]
    pub entries: Vec<TpStateEntry>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TpStateSetResponse {
    #[prost(string, repeated, tag = "1")]
    pub addresses: Vec<String>,
    #[prost(int32, tag = "2")]
    pub status: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TpStateDeleteRequest {
    #[prost(string, tag = "1")]
    pub context_id: String,
    #[prost(string, repeated, tag = "2")]
    pub addresses: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TpStateDeleteResponse {
    #[prost(string, repeated, tag = "1")]
    pub addresses: Vec<String>,
    #[prost(int32, tag = "2")]
    pub status: i32,
}

/// Encode a protocol record as message content.
pub fn content<M: prost::Message>(record: &M) -> Vec<u8> {
    record.encode_to_vec()
}

/// Frame bytes for `message`.
pub fn frame(message: &Message) -> Vec<u8> {
    message.encode_to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_message_type_has_no_kind() {
        let message = Message {
            message_type: 4242,
            correlation_id: "c1".into(),
            content: Vec::new(),
        };
        assert_eq!(message.kind(), None);
        let ping = Message::new(MessageType::PingRequest, "c2", Vec::new());
        assert_eq!(ping.kind(), Some(MessageType::PingRequest));
    }

    #[test]
    fn test_message_field_layout() {
        let message = Message::new(MessageType::TpProcessResponse, "ab", vec![7]);
        // tag 1 varint 6, tag 2 "ab", tag 3 [7]
        assert_eq!(frame(&message), vec![0x08, 6, 0x12, 2, b'a', b'b', 0x1a, 1, 7]);
    }

    #[test]
    fn test_process_request_carries_expanded_header() {
        let request = TpProcessRequest {
            header: Some(TransactionHeader {
                signer_public_key: "02ab".into(),
                family_name: "hm".into(),
                family_version: "1.0".into(),
                ..TransactionHeader::default()
            }),
            payload: vec![1, 2, 3],
            signature: "sig".into(),
            context_id: "ctx".into(),
        };
        let decoded = TpProcessRequest::decode(content(&request).as_slice()).unwrap();
        assert_eq!(decoded, request);
    }
}

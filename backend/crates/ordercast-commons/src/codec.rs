//! JSON codec for notification payloads on the channel bus.
//!
//! Both the publisher and every receiving process must agree on this format;
//! a payload that fails to decode is a protocol mismatch and is reported, never
//! silently dropped.

use bytes::Bytes;

use crate::errors::{CodecError, Result};
use crate::models::OrderNotification;

/// Serialize a payload for publishing.
pub fn encode(payload: &OrderNotification) -> Result<Bytes> {
    serde_json::to_vec(payload)
        .map(Bytes::from)
        .map_err(|e| CodecError::Encode(e.to_string()))
}

/// Serialize a payload as the `data` of an SSE event.
pub fn encode_to_string(payload: &OrderNotification) -> Result<String> {
    serde_json::to_string(payload).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Deserialize a payload received from the bus.
pub fn decode(body: &[u8]) -> Result<OrderNotification> {
    serde_json::from_slice(body).map_err(|e| CodecError::Decode(e.to_string()))
}

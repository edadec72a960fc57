//! Outbound payloads and the deliveries that carry them.
//!
//! Every routing decision produces zero or more [`Delivery`] values. The
//! service resolves each [`DeliveryTarget`] against the live connection table
//! and hands the [`OutboundPayload`] to the matching outbound queues.

use serde::{Deserialize, Serialize};

use super::ConnectionId;

/// A chat line attributed to a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Display name of the sender (or the fallback for unregistered senders).
    pub from: String,
    /// Message body.
    pub text: String,
}

impl ChatMessage {
    /// Creates a message from `from` with body `text`.
    #[must_use]
    pub fn new(from: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            text: text.into(),
        }
    }
}

/// Payload pushed to clients.
///
/// Serialized as `{"event": "<kind>", "data": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundPayload {
    /// Full replacement of the online roster.
    UserListUpdate(Vec<String>),
    /// Message broadcast to every connection.
    PublicMsg(ChatMessage),
    /// Message addressed to one user, echoed to its sender.
    PrivateMsg(ChatMessage),
}

impl OutboundPayload {
    /// Returns the event name as a static string slice.
    #[must_use]
    pub const fn event_str(&self) -> &'static str {
        match self {
            Self::UserListUpdate(_) => "user_list_update",
            Self::PublicMsg(_) => "public_msg",
            Self::PrivateMsg(_) => "private_msg",
        }
    }
}

/// Where a payload should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryTarget {
    /// Every live connection, registered or not.
    All,
    /// Exactly one connection.
    Connection(ConnectionId),
}

/// One payload bound for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Recipient set.
    pub target: DeliveryTarget,
    /// Payload to deliver.
    pub payload: OutboundPayload,
}

impl Delivery {
    /// Creates a delivery to every live connection.
    #[must_use]
    pub const fn broadcast(payload: OutboundPayload) -> Self {
        Self {
            target: DeliveryTarget::All,
            payload,
        }
    }

    /// Creates a delivery to a single connection.
    #[must_use]
    pub const fn to(connection: ConnectionId, payload: OutboundPayload) -> Self {
        Self {
            target: DeliveryTarget::Connection(connection),
            payload,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn public_msg_wire_shape() {
        let payload = OutboundPayload::PublicMsg(ChatMessage::new("alice", "hi"));
        let Ok(value) = serde_json::to_value(&payload) else {
            panic!("serialization failed");
        };
        assert_eq!(
            value,
            serde_json::json!({"event": "public_msg", "data": {"from": "alice", "text": "hi"}})
        );
    }

    #[test]
    fn user_list_update_wire_shape() {
        let payload = OutboundPayload::UserListUpdate(vec!["alice".into(), "bob".into()]);
        let Ok(value) = serde_json::to_value(&payload) else {
            panic!("serialization failed");
        };
        assert_eq!(
            value,
            serde_json::json!({"event": "user_list_update", "data": ["alice", "bob"]})
        );
        assert_eq!(payload.event_str(), "user_list_update");
    }

    #[test]
    fn private_msg_parses_back() {
        let json = r#"{"event":"private_msg","data":{"from":"bob","text":"yo"}}"#;
        let Ok(payload) = serde_json::from_str::<OutboundPayload>(json) else {
            panic!("deserialization failed");
        };
        assert_eq!(
            payload,
            OutboundPayload::PrivateMsg(ChatMessage::new("bob", "yo"))
        );
    }
}

//! Message classification: broadcast vs. private `@name` delivery.
//!
//! [`MessageRouter`] is stateless per call. It reads the [`Registry`] and
//! returns the deliveries an inbound line produces; it never touches a
//! socket or reports an error to the client.

use super::outbound::{ChatMessage, Delivery, OutboundPayload};
use super::{ConnectionId, Registry};

/// Display name used for senders that never registered.
pub const DEFAULT_FALLBACK_USERNAME: &str = "unknown";

/// Decides the delivery set for inbound chat lines.
#[derive(Debug, Clone)]
pub struct MessageRouter {
    fallback_username: String,
}

impl MessageRouter {
    /// Creates a router attributing unregistered senders to
    /// `fallback_username`.
    #[must_use]
    pub fn new(fallback_username: impl Into<String>) -> Self {
        Self {
            fallback_username: fallback_username.into(),
        }
    }

    /// Routes one inbound line from `sender`.
    ///
    /// - `@name body` goes to `name` and back to `sender` (two deliveries),
    ///   or nowhere if `name` is not online.
    /// - `@name` without a body produces nothing.
    /// - Anything else is broadcast, including an empty line.
    #[must_use]
    pub fn route(&self, registry: &Registry, sender: ConnectionId, raw: &str) -> Vec<Delivery> {
        let text = raw.trim();
        let from = registry
            .lookup(sender)
            .unwrap_or(self.fallback_username.as_str())
            .to_string();

        let Some(addressed) = text.strip_prefix('@') else {
            tracing::debug!(%sender, from = %from, "broadcasting public message");
            return vec![Delivery::broadcast(OutboundPayload::PublicMsg(
                ChatMessage::new(from, text),
            ))];
        };

        let Some((target, body)) = addressed.split_once(char::is_whitespace) else {
            tracing::debug!(%sender, reason = "missing body", "dropping private message");
            return Vec::new();
        };

        let Some(recipient) = registry.lookup_by_username(target) else {
            tracing::debug!(
                %sender,
                recipient = target,
                reason = "unknown recipient",
                "dropping private message"
            );
            return Vec::new();
        };

        tracing::debug!(%sender, %recipient, from = %from, "routing private message");
        let payload = OutboundPayload::PrivateMsg(ChatMessage::new(from, body.trim_start()));
        vec![
            Delivery::to(recipient, payload.clone()),
            Delivery::to(sender, payload),
        ]
    }
}

impl Default for MessageRouter {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_USERNAME)
    }
}

/// Builds the full-roster broadcast sent after every roster change.
#[must_use]
pub fn roster_update(registry: &Registry) -> Delivery {
    Delivery::broadcast(OutboundPayload::UserListUpdate(registry.snapshot()))
}

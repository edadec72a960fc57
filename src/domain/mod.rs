//! Domain layer: connection identity, the online registry, and routing.
//!
//! This module holds the relay's in-memory model: the opaque connection
//! handle, the bidirectional username registry, the outbound payload types,
//! and the stateless router that turns an inbound line into deliveries.

pub mod connection_id;
pub mod outbound;
pub mod registry;
pub mod router;

pub use connection_id::ConnectionId;
pub use outbound::{ChatMessage, Delivery, DeliveryTarget, OutboundPayload};
pub use registry::Registry;
pub use router::MessageRouter;

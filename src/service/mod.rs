//! Service layer: the relay that applies transport events.

pub mod relay_service;

pub use relay_service::{Outbound, RelayService, RelaySnapshot};

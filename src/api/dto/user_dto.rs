//! Roster DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body for `GET /api/v1/users`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RosterResponse {
    /// Registered usernames, unordered.
    pub users: Vec<String>,
    /// Number of registered users.
    pub count: usize,
    /// Number of live connections, registered or not.
    pub connections: usize,
    /// When the snapshot was taken.
    pub generated_at: DateTime<Utc>,
}

/// Response body for `GET /api/v1/users/{username}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserStatusResponse {
    /// Username that was looked up.
    pub username: String,
    /// Always `true`; offline users yield 404.
    pub online: bool,
}

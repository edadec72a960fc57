//! Request and response DTOs for the REST API.

pub mod user_dto;

pub use user_dto::{RosterResponse, UserStatusResponse};

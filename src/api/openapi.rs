//! OpenAPI document for the REST endpoints.

use utoipa::OpenApi;

use crate::api::dto::{RosterResponse, UserStatusResponse};
use crate::api::handlers::system::HealthResponse;
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification, served by Swagger UI when the
/// `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "chat-relay", description = "Real-time chat relay inspection API"),
    paths(
        crate::api::handlers::system::health_handler,
        crate::api::handlers::users::list_users,
        crate::api::handlers::users::get_user,
    ),
    components(schemas(
        HealthResponse,
        RosterResponse,
        UserStatusResponse,
        ErrorResponse,
        ErrorBody
    )),
    tags(
        (name = "System", description = "Service status"),
        (name = "Users", description = "Online roster")
    )
)]
pub struct ApiDoc;

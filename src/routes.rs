//! Top-level router composition.

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the full application: REST API, `/ws` endpoint, Swagger UI (with
/// the `swagger-ui` feature), tracing and CORS layers.
pub fn build_app(state: AppState) -> Router {
    let router = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
        )
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::api::dto::{RosterResponse, UserStatusResponse};
    use crate::domain::MessageRouter;
    use crate::service::RelayService;

    fn state() -> AppState {
        AppState::new(RelayService::new(MessageRouter::default(), 8))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
            panic!("request should build");
        };
        let Ok(response) = app.oneshot(request).await;
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should read");
        };
        let Ok(value) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            panic!("body should be JSON");
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let (status, body) = get_json(build_app(state()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn users_lists_roster_and_connections() {
        let state = state();
        let (alice, _rx_a) = state.relay.connect().await;
        let (_, _rx_b) = state.relay.connect().await;
        state.relay.register(alice, "alice").await;

        let (status, body) = get_json(build_app(state), "/api/v1/users").await;
        assert_eq!(status, StatusCode::OK);
        let Ok(roster) = serde_json::from_value::<RosterResponse>(body) else {
            panic!("roster should decode");
        };
        assert_eq!(roster.users, vec!["alice".to_string()]);
        assert_eq!(roster.count, 1);
        assert_eq!(roster.connections, 2);
    }

    #[tokio::test]
    async fn known_user_is_online() {
        let state = state();
        let (bob, _rx) = state.relay.connect().await;
        state.relay.register(bob, "bob").await;

        let (status, body) = get_json(build_app(state), "/api/v1/users/bob").await;
        assert_eq!(status, StatusCode::OK);
        let Ok(user) = serde_json::from_value::<UserStatusResponse>(body) else {
            panic!("status should decode");
        };
        assert_eq!(user.username, "bob");
        assert!(user.online);
    }

    #[tokio::test]
    async fn unknown_user_is_404() {
        let (status, body) = get_json(build_app(state()), "/api/v1/users/ghost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 2001);
        assert_eq!(body["error"]["message"], "user not online: ghost");
    }
}

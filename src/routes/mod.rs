use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::controllers::health;
use crate::state::AppState;

pub mod auth_routes;
pub mod poll_routes;

/// The full application router, without CORS (added by the binary).
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .nest("/api/auth", auth_routes::auth_routes(state.clone()))
        .nest("/api/polls", poll_routes::poll_routes(state))
        .layer(TraceLayer::new_for_http())
}

use axum::{Router, middleware, routing::get};
use crate::controllers::poll_controllers::{cast_vote, check_vote, create_poll, get_poll, polls};
use crate::middleware::jwt::jwt_auth;
use crate::state::AppState;

pub fn poll_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(polls::get_all_polls).post(create_poll::create_poll))
        .route("/:poll_id", get(get_poll::get_poll))
        .route(
            "/:poll_id/vote",
            get(check_vote::check_user_vote).post(cast_vote::cast_vote),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth))
        .with_state(state)
}

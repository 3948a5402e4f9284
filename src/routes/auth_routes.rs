use axum::{Router, middleware, routing::{get, post}};
use crate::controllers::auth_controllers::{current_user, signin, signout, signup};
use crate::middleware::jwt::jwt_auth;
use crate::state::AppState;

pub fn auth_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/currentuser", get(current_user::current_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth));

    Router::new()
        .route("/signup", post(signup::signup))
        .route("/signin", post(signin::signin))
        .route("/signout", post(signout::signout))
        .merge(protected)
        .with_state(state)
}

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::state::AppState;
use crate::utils::{error::AppError, session::SESSION_COOKIE};

/// Rejects requests without a valid session cookie; otherwise stores the
/// session [`Claims`](crate::utils::session::Claims) in the request extensions.
pub async fn jwt_auth(
    State(state): State<AppState>,
    cookie_jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = cookie_jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| AppError::AuthenticationError("User not authenticated".to_string()))?;

    let claims = state.sessions.verify_token(&token)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

use axum::{Json, extract::State, response::Response};

use crate::{
    controllers::auth_controllers::{
        models::{AuthResponse, CredentialsRequest},
        with_cookie,
    },
    state::AppState,
    utils::{
        error::{AppError, AppResult},
        json::AppJson,
    },
};

pub async fn signin(
    State(state): State<AppState>,
    AppJson(body): AppJson<CredentialsRequest>,
) -> AppResult<Response> {
    let username = body.username.trim();

    if username.is_empty() || body.password.is_empty() {
        return Err(AppError::ValidationError("All fields are required".to_string()));
    }

    let user = state
        .users
        .find_user_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let password_matches = state
        .passwords
        .verify(body.password, user.password_hash.clone())
        .await
        .map_err(|e| AppError::InternalError(format!("Stored hash for {}: {}", user.id, e)))?;

    if !password_matches {
        tracing::warn!(user_id = %user.id, "Sign-in with wrong password");
        return Err(AppError::AuthenticationError("Password incorrect".to_string()));
    }

    let token = state.sessions.create_token(&user.id.to_hex())?;
    let cookie = state.sessions.session_cookie(&token);

    tracing::info!(user_id = %user.id, "User signed in");

    let response = AuthResponse {
        success: true,
        user: user.into(),
        token,
    };

    with_cookie(Json(response), &cookie)
}

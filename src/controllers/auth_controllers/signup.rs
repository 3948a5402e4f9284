use axum::{Json, extract::State, http::StatusCode, response::Response};

use crate::{
    controllers::auth_controllers::{
        models::{AuthResponse, CredentialsRequest},
        with_cookie,
    },
    models::user_models::User,
    state::AppState,
    utils::{
        error::{AppError, AppResult},
        json::AppJson,
        password::MIN_PASSWORD_LEN,
    },
};

pub async fn signup(
    State(state): State<AppState>,
    AppJson(body): AppJson<CredentialsRequest>,
) -> AppResult<Response> {
    let username = body.username.trim();

    if username.is_empty() || body.password.is_empty() {
        return Err(AppError::ValidationError("All fields are required".to_string()));
    }

    if body.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::ValidationError(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if state.users.find_user_by_username(username).await?.is_some() {
        return Err(AppError::Conflict("Username already in use".to_string()));
    }

    let password_hash = state.passwords.hash(body.password).await?;
    let user = User::new(username.to_string(), password_hash);

    // The unique index still decides if two sign-ups race for one name.
    state.users.insert_user(&user).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    let token = state.sessions.create_token(&user.id.to_hex())?;
    let cookie = state.sessions.session_cookie(&token);

    let response = AuthResponse {
        success: true,
        user: user.into(),
        token,
    };

    with_cookie((StatusCode::CREATED, Json(response)), &cookie)
}

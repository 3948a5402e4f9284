use axum::{
    Json,
    extract::{Extension, State},
};

use crate::controllers::auth_controllers::models::UserResponse;
use crate::state::AppState;
use crate::utils::auth::current_user_id;
use crate::utils::error::{AppError, AppResult};
use crate::utils::session::Claims;

pub async fn current_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<UserResponse>> {
    let user_id = current_user_id(&claims)?;

    let user = state
        .users
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
};

use crate::controllers::poll_controllers::models::{CreatePollRequest, OptionInput, PollResponse};
use crate::services::poll_service;
use crate::state::AppState;
use crate::utils::auth::current_user_id;
use crate::utils::error::AppResult;
use crate::utils::json::AppJson;
use crate::utils::session::Claims;

pub async fn create_poll(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<CreatePollRequest>,
) -> AppResult<(StatusCode, Json<PollResponse>)> {
    let owner_id = current_user_id(&claims)?;

    let options: Vec<String> = payload
        .options
        .into_iter()
        .map(OptionInput::into_text)
        .collect();

    let poll = poll_service::create_poll(
        state.polls.as_ref(),
        owner_id,
        &payload.question,
        &options,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(poll.into())))
}

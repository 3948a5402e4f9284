use axum::{
    Json,
    extract::{Path, State},
};

use crate::controllers::poll_controllers::{models::PollResponse, parse_poll_id};
use crate::services::poll_service;
use crate::state::AppState;
use crate::utils::error::AppResult;

pub async fn get_poll(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<PollResponse>> {
    let poll_id = parse_poll_id(&poll_id)?;

    let poll = poll_service::get_poll(state.polls.as_ref(), poll_id).await?;

    Ok(Json(poll.into()))
}

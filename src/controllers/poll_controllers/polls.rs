use axum::{
    Json,
    extract::State,
};

use crate::controllers::poll_controllers::models::PollResponse;
use crate::services::poll_service;
use crate::state::AppState;
use crate::utils::error::AppResult;

pub async fn get_all_polls(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PollResponse>>> {
    let polls = poll_service::list_polls(state.polls.as_ref()).await?;

    Ok(Json(polls.into_iter().map(PollResponse::from).collect()))
}

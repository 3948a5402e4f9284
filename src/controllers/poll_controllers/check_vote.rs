use axum::{
    Json,
    extract::{Extension, Path, State},
};

use crate::controllers::poll_controllers::{models::VoteStatusResponse, parse_poll_id};
use crate::services::poll_service;
use crate::state::AppState;
use crate::utils::auth::current_user_id;
use crate::utils::error::AppResult;
use crate::utils::session::Claims;

pub async fn check_user_vote(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<VoteStatusResponse>> {
    let user_id = current_user_id(&claims)?;
    let poll_id = parse_poll_id(&poll_id)?;

    let option_index = poll_service::vote_of(state.polls.as_ref(), poll_id, user_id).await?;

    Ok(Json(VoteStatusResponse {
        has_voted: option_index.is_some(),
        option_index,
    }))
}

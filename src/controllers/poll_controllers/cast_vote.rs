use axum::{
    Json,
    extract::{Extension, Path, State},
};

use crate::controllers::poll_controllers::{
    models::{CastVoteRequest, PollResponse},
    parse_poll_id,
};
use crate::services::poll_service;
use crate::state::AppState;
use crate::utils::auth::current_user_id;
use crate::utils::error::{AppError, AppResult};
use crate::utils::json::AppJson;
use crate::utils::session::Claims;

pub async fn cast_vote(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<AppJson<CastVoteRequest>, AppError>,
) -> AppResult<Json<PollResponse>> {
    let user_id = current_user_id(&claims)?;
    let poll_id = parse_poll_id(&poll_id)?;

    // An unreadable body is an invalid index, reported only once the poll is known to exist.
    let option_index = match payload {
        Ok(AppJson(body)) => body.option_index(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable vote body");
            None
        }
    };

    let poll = poll_service::cast_vote(
        state.polls.as_ref(),
        poll_id,
        user_id,
        option_index,
    )
    .await?;

    Ok(Json(poll.into()))
}

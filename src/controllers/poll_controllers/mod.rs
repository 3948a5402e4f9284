use mongodb::bson::oid::ObjectId;

use crate::utils::error::{AppError, AppResult};

pub mod cast_vote;
pub mod check_vote;
pub mod create_poll;
pub mod get_poll;
pub mod models;
pub mod polls;

/// A poll id that cannot be parsed names no poll.
pub(crate) fn parse_poll_id(poll_id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(poll_id).map_err(|_| AppError::NotFound("Poll not found".to_string()))
}

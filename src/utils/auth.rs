use mongodb::bson::oid::ObjectId;

use crate::utils::error::{AppError, AppResult};
use crate::utils::session::Claims;

/// The authenticated caller's user id, as placed in the request by `jwt_auth`.
pub fn current_user_id(claims: &Claims) -> AppResult<ObjectId> {
    ObjectId::parse_str(&claims.sub)
        .map_err(|_| AppError::AuthenticationError("Invalid session subject".to_string()))
}

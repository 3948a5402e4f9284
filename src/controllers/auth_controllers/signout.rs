use axum::Json;
use axum::response::Response;

use crate::controllers::auth_controllers::with_cookie;
use crate::utils::error::AppResult;
use crate::utils::session::SessionManager;

pub async fn signout() -> AppResult<Response> {
    let resp = Json(serde_json::json!({
        "success": true,
        "message": "Logged out successfully"
    }));

    with_cookie(resp, &SessionManager::cleared_cookie())
}

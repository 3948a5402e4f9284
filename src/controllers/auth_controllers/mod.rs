use axum::{
    http::{header::SET_COOKIE, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::utils::error::{AppError, AppResult};

pub mod current_user;
pub mod models;
pub mod signin;
pub mod signout;
pub mod signup;

pub(crate) fn with_cookie(response: impl IntoResponse, cookie_value: &str) -> AppResult<Response> {
    let mut resp = response.into_response();
    resp.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(cookie_value)
            .map_err(|e| AppError::InternalError(format!("Failed to create cookie header: {}", e)))?,
    );
    Ok(resp)
}

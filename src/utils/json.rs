use axum::extract::FromRequest;

use crate::utils::error::AppError;

/// `axum::Json` whose rejections (missing content type, malformed or mistyped body)
/// come back as `VALIDATION_ERROR` instead of plain-text 415/422 responses.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

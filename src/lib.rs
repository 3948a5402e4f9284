//! Polling app backend.
//!
//! Users sign up, create polls with a fixed list of options and cast one vote per
//! poll. The vote path lives in [`services::poll_service`]; storage sits behind the
//! [`store::PollStore`] and [`store::UserStore`] traits.

#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::unwrap_in_result)
)]

pub mod config;
pub mod controllers;
pub mod db;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

pub use config::{Config, ConfigError, StoreBackend};
pub use routes::app_router;
pub use state::AppState;
pub use utils::error::{AppError, AppResult};

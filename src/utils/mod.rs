pub mod auth;
pub mod error;
pub mod json;
pub mod password;
pub mod session;

use std::sync::Arc;

use crate::store::{Backend, PollStore, UserStore};
use crate::utils::{password::PasswordHasher, session::SessionManager};

#[derive(Clone)]
pub struct AppState {
    pub polls: Arc<dyn PollStore>,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<SessionManager>,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(backend: &Backend, sessions: SessionManager, passwords: PasswordHasher) -> Self {
        Self {
            polls: backend.polls(),
            users: backend.users(),
            sessions: Arc::new(sessions),
            passwords,
        }
    }
}

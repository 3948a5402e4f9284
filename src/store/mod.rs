//! Persistence for polls, vote records and users.
//!
//! Two backends implement the same traits: [`mongo::MongoStore`] for deployments and
//! [`memory::MemoryStore`] for tests and local development. Both treat
//! "insert vote record + increment option counter" as a single unit.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{poll_models::Poll, user_models::User, vote_record_models::VoteRecord};

pub mod memory;
pub mod mongo;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a vote already exists for this poll and user")]
    DuplicateVote,

    #[error("username already taken")]
    DuplicateUsername,

    #[error("poll not found")]
    PollNotFound,

    #[error("option {0} does not exist on this poll")]
    OptionOutOfRange(u32),

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait PollStore: Send + Sync {
    async fn insert_poll(&self, poll: &Poll) -> StoreResult<()>;

    async fn find_poll(&self, poll_id: ObjectId) -> StoreResult<Option<Poll>>;

    /// All polls, newest first.
    async fn list_polls(&self) -> StoreResult<Vec<Poll>>;

    /// Inserts `vote` and increments the chosen option's counter as one unit.
    ///
    /// Returns the poll as it stands after the increment. Fails with
    /// [`StoreError::DuplicateVote`] when the user already voted on the poll, in
    /// which case neither write takes effect.
    async fn record_vote(&self, vote: &VoteRecord) -> StoreResult<Poll>;

    async fn find_vote(&self, poll_id: ObjectId, user_id: ObjectId)
        -> StoreResult<Option<VoteRecord>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::DuplicateUsername`] when the name is taken.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_id(&self, user_id: ObjectId) -> StoreResult<Option<User>>;
}

/// The opened storage backend, held for the lifetime of the process.
#[derive(Clone)]
pub enum Backend {
    Mongo(Arc<mongo::MongoStore>),
    Memory(Arc<memory::MemoryStore>),
}

impl Backend {
    pub fn polls(&self) -> Arc<dyn PollStore> {
        match self {
            Backend::Mongo(store) => store.clone() as Arc<dyn PollStore>,
            Backend::Memory(store) => store.clone() as Arc<dyn PollStore>,
        }
    }

    pub fn users(&self) -> Arc<dyn UserStore> {
        match self {
            Backend::Mongo(store) => store.clone() as Arc<dyn UserStore>,
            Backend::Memory(store) => store.clone() as Arc<dyn UserStore>,
        }
    }

    pub async fn close(self) {
        match self {
            Backend::Mongo(store) => store.shutdown().await,
            Backend::Memory(_) => tracing::debug!("In-memory store dropped"),
        }
    }
}

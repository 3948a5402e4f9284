//! In-process store for tests and local development.
//!
//! Each poll lives behind its own mutex together with the votes cast on it, so the
//! uniqueness check, the vote insert and the counter increment happen under one
//! lock while unrelated polls proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use parking_lot::{Mutex, RwLock};

use super::{PollStore, StoreError, StoreResult, UserStore};
use crate::models::{poll_models::Poll, user_models::User, vote_record_models::VoteRecord};

struct PollEntry {
    poll: Poll,
    votes: HashMap<ObjectId, VoteRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    polls: RwLock<HashMap<ObjectId, Arc<Mutex<PollEntry>>>>,
    users: RwLock<HashMap<ObjectId, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, poll_id: ObjectId) -> Option<Arc<Mutex<PollEntry>>> {
        self.polls.read().get(&poll_id).cloned()
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn insert_poll(&self, poll: &Poll) -> StoreResult<()> {
        let entry = PollEntry {
            poll: poll.clone(),
            votes: HashMap::new(),
        };
        self.polls
            .write()
            .insert(poll.id, Arc::new(Mutex::new(entry)));
        Ok(())
    }

    async fn find_poll(&self, poll_id: ObjectId) -> StoreResult<Option<Poll>> {
        let Some(entry) = self.entry(poll_id) else {
            return Ok(None);
        };
        let poll = entry.lock().poll.clone();
        Ok(Some(poll))
    }

    async fn list_polls(&self) -> StoreResult<Vec<Poll>> {
        let entries: Vec<_> = self.polls.read().values().cloned().collect();
        let mut polls: Vec<Poll> = entries
            .iter()
            .map(|entry| entry.lock().poll.clone())
            .collect();
        polls.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(polls)
    }

    async fn record_vote(&self, vote: &VoteRecord) -> StoreResult<Poll> {
        let entry = self.entry(vote.poll_id).ok_or(StoreError::PollNotFound)?;
        let mut entry = entry.lock();

        if entry.votes.contains_key(&vote.user_id) {
            return Err(StoreError::DuplicateVote);
        }

        let option = entry
            .poll
            .options
            .get_mut(vote.option_index as usize)
            .ok_or(StoreError::OptionOutOfRange(vote.option_index))?;
        option.votes += 1;
        entry.votes.insert(vote.user_id, vote.clone());

        Ok(entry.poll.clone())
    }

    async fn find_vote(
        &self,
        poll_id: ObjectId,
        user_id: ObjectId,
    ) -> StoreResult<Option<VoteRecord>> {
        let Some(entry) = self.entry(poll_id) else {
            return Ok(None);
        };
        let vote = entry.lock().votes.get(&user_id).cloned();
        Ok(vote)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write();
        if users.values().any(|existing| existing.username == user.username) {
            return Err(StoreError::DuplicateUsername);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_user_by_id(&self, user_id: ObjectId) -> StoreResult<Option<User>> {
        Ok(self.users.read().get(&user_id).cloned())
    }
}

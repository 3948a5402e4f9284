//! MongoDB-backed store.
//!
//! Votes are written inside a multi-document transaction: the vote record insert and
//! the `$inc` on the chosen option commit together or not at all. The unique index on
//! `vote_records(poll_id, user_id)` is what rejects a second vote, including one that
//! races the first. Transactions need a replica set (a single-node one is enough).

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    error::{ErrorKind, WriteFailure, TRANSIENT_TRANSACTION_ERROR, UNKNOWN_TRANSACTION_COMMIT_RESULT},
    options::{IndexOptions, ReturnDocument},
    Client, ClientSession, Collection, Database, IndexModel,
};

use super::{PollStore, StoreError, StoreResult, UserStore};
use crate::db::connection::init_client;
use crate::models::{poll_models::Poll, user_models::User, vote_record_models::VoteRecord};

const POLLS: &str = "polls";
const VOTE_RECORDS: &str = "vote_records";
const USERS: &str = "users";

const DUPLICATE_KEY: i32 = 11000;
const MAX_TRANSACTION_ATTEMPTS: u32 = 10;
const RETRY_BACKOFF: Duration = Duration::from_millis(5);
const MAX_COMMIT_ATTEMPTS: u32 = 3;

pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    pub async fn connect(mongo_uri: &str, db_name: &str) -> StoreResult<Self> {
        let client = init_client(mongo_uri).await?;
        let db = client.database(db_name);
        let store = Self { client, db };
        store.ensure_indexes().await?;
        tracing::info!(db = db_name, "Database connection successful");
        Ok(store)
    }

    /// Creates the indexes the uniqueness guarantees rely on. Safe to run repeatedly.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let unique = IndexOptions::builder().unique(true).build();

        self.votes()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "poll_id": 1, "user_id": 1 })
                    .options(unique.clone())
                    .build(),
            )
            .await?;

        self.users()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "username": 1 })
                    .options(unique)
                    .build(),
            )
            .await?;

        self.polls()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "created_at": -1, "_id": -1 })
                    .build(),
            )
            .await?;

        Ok(())
    }

    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client shut down");
    }

    fn polls(&self) -> Collection<Poll> {
        self.db.collection::<Poll>(POLLS)
    }

    fn votes(&self) -> Collection<VoteRecord> {
        self.db.collection::<VoteRecord>(VOTE_RECORDS)
    }

    fn users(&self) -> Collection<User> {
        self.db.collection::<User>(USERS)
    }

    async fn record_vote_once(&self, vote: &VoteRecord) -> StoreResult<Poll> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        match self.apply_vote(&mut session, vote).await {
            Ok(poll) => {
                commit_with_retry(&mut session).await?;
                Ok(poll)
            }
            Err(e) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    tracing::debug!(error = %abort_err, "Abort after failed vote transaction");
                }
                Err(e)
            }
        }
    }

    async fn apply_vote(&self, session: &mut ClientSession, vote: &VoteRecord) -> StoreResult<Poll> {
        self.votes()
            .insert_one(vote)
            .session(&mut *session)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    StoreError::DuplicateVote
                } else {
                    StoreError::Database(e)
                }
            })?;

        let option_path = format!("options.{}", vote.option_index);

        let mut filter = doc! { "_id": vote.poll_id };
        filter.insert(option_path.clone(), doc! { "$exists": true });

        let mut increment = Document::new();
        increment.insert(format!("{option_path}.votes"), 1_i64);

        let updated = self
            .polls()
            .find_one_and_update(filter, doc! { "$inc": increment })
            .return_document(ReturnDocument::After)
            .session(&mut *session)
            .await?;

        match updated {
            Some(poll) => Ok(poll),
            None => {
                let exists = self
                    .polls()
                    .find_one(doc! { "_id": vote.poll_id })
                    .session(&mut *session)
                    .await?
                    .is_some();
                if exists {
                    Err(StoreError::OptionOutOfRange(vote.option_index))
                } else {
                    Err(StoreError::PollNotFound)
                }
            }
        }
    }
}

async fn commit_with_retry(session: &mut ClientSession) -> StoreResult<()> {
    let mut attempt = 1;
    loop {
        match session.commit_transaction().await {
            Ok(()) => return Ok(()),
            Err(e)
                if e.contains_label(UNKNOWN_TRANSACTION_COMMIT_RESULT)
                    && attempt < MAX_COMMIT_ATTEMPTS =>
            {
                tracing::warn!(attempt, error = %e, "Commit result unknown, retrying commit");
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => {
            write_error.code == DUPLICATE_KEY
        }
        ErrorKind::Command(ref command_error) => command_error.code == DUPLICATE_KEY,
        _ => false,
    }
}

#[async_trait]
impl PollStore for MongoStore {
    async fn insert_poll(&self, poll: &Poll) -> StoreResult<()> {
        self.polls().insert_one(poll).await?;
        Ok(())
    }

    async fn find_poll(&self, poll_id: ObjectId) -> StoreResult<Option<Poll>> {
        Ok(self.polls().find_one(doc! { "_id": poll_id }).await?)
    }

    async fn list_polls(&self) -> StoreResult<Vec<Poll>> {
        let cursor = self
            .polls()
            .find(doc! {})
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn record_vote(&self, vote: &VoteRecord) -> StoreResult<Poll> {
        let mut attempt = 1;
        loop {
            match self.record_vote_once(vote).await {
                Err(StoreError::Database(e))
                    if e.contains_label(TRANSIENT_TRANSACTION_ERROR)
                        && attempt < MAX_TRANSACTION_ATTEMPTS =>
                {
                    tracing::debug!(
                        attempt,
                        poll_id = %vote.poll_id,
                        error = %e,
                        "Transient vote transaction error, retrying"
                    );
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    async fn find_vote(
        &self,
        poll_id: ObjectId,
        user_id: ObjectId,
    ) -> StoreResult<Option<VoteRecord>> {
        Ok(self
            .votes()
            .find_one(doc! { "poll_id": poll_id, "user_id": user_id })
            .await?)
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.users().insert_one(user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                StoreError::DuplicateUsername
            } else {
                StoreError::Database(e)
            }
        })?;
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.users().find_one(doc! { "username": username }).await?)
    }

    async fn find_user_by_id(&self, user_id: ObjectId) -> StoreResult<Option<User>> {
        Ok(self.users().find_one(doc! { "_id": user_id }).await?)
    }
}

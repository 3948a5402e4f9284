//! Poll creation, retrieval and vote casting.
//!
//! Everything here works against an injected [`PollStore`]; the caller's identity is
//! taken as given.

use mongodb::bson::oid::ObjectId;

use crate::models::{poll_models::Poll, vote_record_models::VoteRecord};
use crate::store::{PollStore, StoreError};
use crate::utils::error::{AppError, AppResult};

pub const MIN_OPTIONS: usize = 2;

pub async fn create_poll(
    store: &dyn PollStore,
    owner_id: ObjectId,
    question: &str,
    options: &[String],
) -> AppResult<Poll> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::ValidationError("Question is required".to_string()));
    }

    let options: Vec<String> = options
        .iter()
        .map(|option| option.trim())
        .filter(|option| !option.is_empty())
        .map(str::to_string)
        .collect();

    if options.len() < MIN_OPTIONS {
        return Err(AppError::ValidationError(
            "Enter at least 2 options for the user to select from".to_string(),
        ));
    }

    let poll = Poll::new(owner_id, question.to_string(), options);
    store.insert_poll(&poll).await?;

    tracing::info!(poll_id = %poll.id, owner_id = %owner_id, options = poll.options.len(), "Poll created");

    Ok(poll)
}

pub async fn list_polls(store: &dyn PollStore) -> AppResult<Vec<Poll>> {
    Ok(store.list_polls().await?)
}

pub async fn get_poll(store: &dyn PollStore, poll_id: ObjectId) -> AppResult<Poll> {
    store
        .find_poll(poll_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Poll not found".to_string()))
}

/// Casts `user_id`'s vote for `option_index` on the poll.
///
/// Checks run in order: the poll must exist, the index must be in range, and the user
/// must not have voted on this poll yet. `option_index` is `None` when the caller
/// sent something that is not an integer.
pub async fn cast_vote(
    store: &dyn PollStore,
    poll_id: ObjectId,
    user_id: ObjectId,
    option_index: Option<i64>,
) -> AppResult<Poll> {
    let poll = get_poll(store, poll_id).await?;

    let position = option_index
        .and_then(|index| poll.option_position(index))
        .and_then(|position| u32::try_from(position).ok())
        .ok_or_else(|| AppError::ValidationError("Invalid option index".to_string()))?;

    let vote = VoteRecord::new(poll_id, user_id, position);

    match store.record_vote(&vote).await {
        Ok(updated) => {
            tracing::info!(poll_id = %poll_id, user_id = %user_id, option = position, "Vote recorded");
            Ok(updated)
        }
        Err(StoreError::DuplicateVote) => {
            tracing::warn!(poll_id = %poll_id, user_id = %user_id, "Rejected repeat vote");
            Err(StoreError::DuplicateVote.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// The option index `user_id` picked on the poll, if they have voted.
pub async fn vote_of(
    store: &dyn PollStore,
    poll_id: ObjectId,
    user_id: ObjectId,
) -> AppResult<Option<u32>> {
    get_poll(store, poll_id).await?;
    Ok(store
        .find_vote(poll_id, user_id)
        .await?
        .map(|vote| vote.option_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    async fn red_blue(store: &MemoryStore) -> Poll {
        create_poll(store, ObjectId::new(), "Favourite colour?", &strings(&["Red", "Blue"]))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_poll_trims_and_drops_blank_options() {
        let store = MemoryStore::new();
        let poll = create_poll(
            &store,
            ObjectId::new(),
            "  Lunch?  ",
            &strings(&[" pizza ", "", "   ", "tacos"]),
        )
        .await
        .unwrap();

        assert_eq!(poll.question, "Lunch?");
        let texts: Vec<_> = poll.options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["pizza", "tacos"]);
        assert!(poll.options.iter().all(|o| o.votes == 0));
    }

    #[tokio::test]
    async fn create_poll_needs_two_non_blank_options() {
        let store = MemoryStore::new();
        let err = create_poll(&store, ObjectId::new(), "Q?", &strings(&["a", "", " "]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(store.list_polls().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_poll_needs_a_question() {
        let store = MemoryStore::new();
        let err = create_poll(&store, ObjectId::new(), "   ", &strings(&["a", "b"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn vote_on_missing_poll_is_not_found() {
        let store = MemoryStore::new();
        let err = cast_vote(&store, ObjectId::new(), ObjectId::new(), Some(99))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn out_of_range_index_changes_nothing() {
        let store = MemoryStore::new();
        let poll = red_blue(&store).await;
        let voter = ObjectId::new();

        for index in [Some(-1), Some(2), Some(i64::MAX), None] {
            let err = cast_vote(&store, poll.id, voter, index).await.unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)), "index {index:?}");
        }

        let stored = get_poll(&store, poll.id).await.unwrap();
        assert_eq!(stored.total_votes(), 0);
        assert_eq!(vote_of(&store, poll.id, voter).await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalid_index_is_reported_before_repeat_vote() {
        let store = MemoryStore::new();
        let poll = red_blue(&store).await;
        let voter = ObjectId::new();

        cast_vote(&store, poll.id, voter, Some(0)).await.unwrap();
        let err = cast_vote(&store, poll.id, voter, Some(7)).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn red_blue_scenario() {
        let store = MemoryStore::new();
        let poll = red_blue(&store).await;
        let (first, second) = (ObjectId::new(), ObjectId::new());

        cast_vote(&store, poll.id, first, Some(0)).await.unwrap();
        let updated = cast_vote(&store, poll.id, second, Some(1)).await.unwrap();
        assert_eq!(updated.options[0].votes, 1);
        assert_eq!(updated.options[1].votes, 1);

        for index in [0, 1] {
            let err = cast_vote(&store, poll.id, first, Some(index)).await.unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)));
        }

        let fetched = get_poll(&store, poll.id).await.unwrap();
        let listed = list_polls(&store).await.unwrap();
        for poll in [&fetched, &listed[0]] {
            assert_eq!(poll.options[0].votes, 1);
            assert_eq!(poll.options[1].votes, 1);
        }
        assert_eq!(vote_of(&store, poll.id, second).await.unwrap(), Some(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_votes_by_one_user_count_once() {
        let store = Arc::new(MemoryStore::new());
        let poll = red_blue(&store).await;
        let voter = ObjectId::new();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { cast_vote(store.as_ref(), poll.id, voter, Some(0)).await })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AppError::Conflict(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 15);
        let stored = get_poll(store.as_ref(), poll.id).await.unwrap();
        assert_eq!(stored.options[0].votes, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_votes_by_many_users_are_all_counted() {
        let store = Arc::new(MemoryStore::new());
        let poll = red_blue(&store).await;
        let voters = 200;

        let handles: Vec<_> = (0..voters)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    cast_vote(store.as_ref(), poll.id, ObjectId::new(), Some(i % 2)).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = get_poll(store.as_ref(), poll.id).await.unwrap();
        assert_eq!(stored.total_votes(), voters);
        assert_eq!(stored.options[0].votes, voters / 2);
        assert_eq!(stored.options[1].votes, voters / 2);
    }
}

#![allow(clippy::unwrap_used, clippy::expect_used)]
//! MongoDB store tests.
//!
//! Ignored by default: they need a MongoDB replica set (transactions) reachable at
//! `MONGO_TEST_URI`, e.g. `mongodb://localhost:27017/?replicaSet=rs0`.
//! Run with `cargo test --test mongo_store_tests -- --ignored`.

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use polling_app::{
    models::{poll_models::Poll, user_models::User, vote_record_models::VoteRecord},
    store::{PollStore, StoreError, UserStore, mongo::MongoStore},
};

async fn setup_store() -> Arc<MongoStore> {
    let uri = std::env::var("MONGO_TEST_URI").expect("MONGO_TEST_URI must be set");
    // Fresh database per test so runs never see each other's data.
    let db_name = format!("polling_app_test_{}", ObjectId::new().to_hex());
    let store = MongoStore::connect(&uri, &db_name)
        .await
        .expect("Failed to connect to test database");
    Arc::new(store)
}

fn red_blue() -> Poll {
    Poll::new(
        ObjectId::new(),
        "Favourite colour?".to_string(),
        vec!["Red".to_string(), "Blue".to_string()],
    )
}

#[tokio::test]
#[ignore = "Requires a MongoDB replica set at MONGO_TEST_URI"]
async fn test_vote_and_duplicate() {
    let store = setup_store().await;
    let poll = red_blue();
    store.insert_poll(&poll).await.unwrap();

    let voter = ObjectId::new();
    let updated = store
        .record_vote(&VoteRecord::new(poll.id, voter, 1))
        .await
        .unwrap();
    assert_eq!(updated.options[1].votes, 1);

    let err = store
        .record_vote(&VoteRecord::new(poll.id, voter, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateVote));

    let stored = store.find_poll(poll.id).await.unwrap().unwrap();
    assert_eq!(stored.options[0].votes, 0);
    assert_eq!(stored.options[1].votes, 1);
}

#[tokio::test]
#[ignore = "Requires a MongoDB replica set at MONGO_TEST_URI"]
async fn test_missing_option_is_rejected_without_a_vote() {
    let store = setup_store().await;
    let poll = red_blue();
    store.insert_poll(&poll).await.unwrap();

    let voter = ObjectId::new();
    let err = store
        .record_vote(&VoteRecord::new(poll.id, voter, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::OptionOutOfRange(5)));

    // The transaction rolled back the vote record along with the increment.
    assert!(store.find_vote(poll.id, voter).await.unwrap().is_none());
    let stored = store.find_poll(poll.id).await.unwrap().unwrap();
    assert_eq!(stored.options.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "Requires a MongoDB replica set at MONGO_TEST_URI"]
async fn test_concurrent_voters_are_all_counted() {
    let store = setup_store().await;
    let poll = red_blue();
    store.insert_poll(&poll).await.unwrap();

    let handles: Vec<_> = (0..20u32)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .record_vote(&VoteRecord::new(poll.id, ObjectId::new(), i % 2))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = store.find_poll(poll.id).await.unwrap().unwrap();
    assert_eq!(stored.total_votes(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "Requires a MongoDB replica set at MONGO_TEST_URI"]
async fn test_concurrent_same_user_counts_once() {
    let store = setup_store().await;
    let poll = red_blue();
    store.insert_poll(&poll).await.unwrap();
    let voter = ObjectId::new();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.record_vote(&VoteRecord::new(poll.id, voter, 0)).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(StoreError::DuplicateVote) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    let stored = store.find_poll(poll.id).await.unwrap().unwrap();
    assert_eq!(stored.options[0].votes, 1);
}

#[tokio::test]
#[ignore = "Requires a MongoDB replica set at MONGO_TEST_URI"]
async fn test_usernames_are_unique() {
    let store = setup_store().await;
    store
        .insert_user(&User::new("alice".to_string(), "hash".to_string()))
        .await
        .unwrap();

    let err = store
        .insert_user(&User::new("alice".to_string(), "hash".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateUsername));
}

//! Behaviour every [`FeedStore`] implementation must show.

use std::sync::mpsc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::storage::traits::{FeedStore, LocalFeedItem, RetrievalOutcome};
use crate::test_support::{any_url, unique_feed};

const TIMEOUT: Duration = Duration::from_secs(10);

pub fn unique_cache() -> (Vec<LocalFeedItem>, DateTime<Utc>) {
    (unique_feed().1, Utc::now())
}

pub fn retrieve<S: FeedStore>(store: &S) -> RetrievalOutcome {
    let (tx, rx) = mpsc::channel();
    store.retrieve(Box::new(move |outcome| {
        let _ = tx.send(outcome);
    }));
    rx.recv_timeout(TIMEOUT).expect("Timed out waiting for retrieval")
}

pub fn insert<S: FeedStore>(
    store: &S,
    feed: Vec<LocalFeedItem>,
    timestamp: DateTime<Utc>,
) -> Result<(), StoreError> {
    let (tx, rx) = mpsc::channel();
    store.insert(
        feed,
        timestamp,
        Box::new(move |result| {
            let _ = tx.send(result);
        }),
    );
    rx.recv_timeout(TIMEOUT).expect("Timed out waiting for insertion")
}

pub fn delete<S: FeedStore>(store: &S) -> Result<(), StoreError> {
    let (tx, rx) = mpsc::channel();
    store.delete(Box::new(move |result| {
        let _ = tx.send(result);
    }));
    rx.recv_timeout(TIMEOUT).expect("Timed out waiting for deletion")
}

fn assert_found<S: FeedStore>(store: &S, feed: &[LocalFeedItem], timestamp: DateTime<Utc>) {
    match retrieve(store) {
        RetrievalOutcome::Found(record) => {
            assert_eq!(record.feed, feed);
            assert_eq!(record.timestamp, timestamp);
        }
        other => panic!("Expected found cache, got {:?}", other),
    }
}

fn assert_empty<S: FeedStore>(store: &S) {
    let outcome = retrieve(store);
    assert!(
        matches!(outcome, RetrievalOutcome::Empty),
        "Expected empty cache, got {:?}",
        outcome
    );
}

pub fn assert_retrieve_delivers_empty_on_empty_cache<S: FeedStore>(store: &S) {
    assert_empty(store);
}

pub fn assert_retrieve_has_no_side_effects_on_empty_cache<S: FeedStore>(store: &S) {
    assert_empty(store);
    assert_empty(store);
}

pub fn assert_retrieve_delivers_found_values_on_non_empty_cache<S: FeedStore>(store: &S) {
    let (feed, timestamp) = unique_cache();
    insert(store, feed.clone(), timestamp).unwrap();

    assert_found(store, &feed, timestamp);
}

pub fn assert_retrieve_has_no_side_effects_on_non_empty_cache<S: FeedStore>(store: &S) {
    let (feed, timestamp) = unique_cache();
    insert(store, feed.clone(), timestamp).unwrap();

    assert_found(store, &feed, timestamp);
    assert_found(store, &feed, timestamp);
}

pub fn assert_insert_delivers_no_error_on_empty_cache<S: FeedStore>(store: &S) {
    let (feed, timestamp) = unique_cache();
    assert!(insert(store, feed, timestamp).is_ok());
}

pub fn assert_insert_overrides_previously_inserted_cache<S: FeedStore>(store: &S) {
    let (first, first_timestamp) = unique_cache();
    insert(store, first, first_timestamp).unwrap();

    let (latest, latest_timestamp) = unique_cache();
    assert!(insert(store, latest.clone(), latest_timestamp).is_ok());

    assert_found(store, &latest, latest_timestamp);
}

pub fn assert_delete_delivers_no_error_on_empty_cache<S: FeedStore>(store: &S) {
    assert!(delete(store).is_ok());
    assert_empty(store);
}

pub fn assert_delete_empties_previously_inserted_cache<S: FeedStore>(store: &S) {
    let (feed, timestamp) = unique_cache();
    insert(store, feed, timestamp).unwrap();

    assert!(delete(store).is_ok());
    assert_empty(store);
}

enum Event {
    Inserted(Result<(), StoreError>),
    Retrieved(RetrievalOutcome),
}

fn large_cache(len: usize) -> (Vec<LocalFeedItem>, DateTime<Utc>) {
    let feed = (0..len)
        .map(|i| LocalFeedItem {
            id: Uuid::new_v4(),
            description: Some(format!("description {}", i)),
            location: None,
            url: any_url(),
        })
        .collect();
    (feed, Utc::now())
}

/// Interleaves writes with reads; every read must see either nothing or one
/// complete record that was actually written.
pub fn assert_concurrent_reads_never_observe_partial_writes<S: FeedStore>(store: &S) {
    let caches: Vec<_> = (0..5).map(|_| large_cache(200)).collect();
    let (tx, rx) = mpsc::channel();
    let mut pending = 0;

    for (feed, timestamp) in &caches {
        let inserted = tx.clone();
        store.insert(
            feed.clone(),
            *timestamp,
            Box::new(move |result| {
                let _ = inserted.send(Event::Inserted(result));
            }),
        );
        pending += 1;

        for _ in 0..4 {
            let retrieved = tx.clone();
            store.retrieve(Box::new(move |outcome| {
                let _ = retrieved.send(Event::Retrieved(outcome));
            }));
            pending += 1;
        }
    }
    drop(tx);

    for _ in 0..pending {
        match rx.recv_timeout(TIMEOUT).expect("Timed out waiting for store") {
            Event::Inserted(result) => assert!(result.is_ok(), "Insert failed: {:?}", result),
            Event::Retrieved(RetrievalOutcome::Empty) => {}
            Event::Retrieved(RetrievalOutcome::Found(record)) => assert!(
                caches
                    .iter()
                    .any(|(feed, timestamp)| *feed == record.feed && *timestamp == record.timestamp),
                "Observed a record that was never written"
            ),
            Event::Retrieved(RetrievalOutcome::Failure(e)) => panic!("Retrieval failed: {}", e),
        }
    }
}

//! Shared doubles and fixtures for unit tests.

pub mod store_contract;

use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use url::Url;
use uuid::Uuid;

use crate::api::{HttpClient, HttpClientTask, HttpCompletion, HttpResponse};
use crate::domain::FeedItem;
use crate::errors::{FeederError, StoreError};
use crate::storage::traits::{
    DeletionCompletion, FeedStore, InsertionCompletion, LocalFeedItem, RetrievalCompletion,
    RetrievalOutcome,
};

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(5);

pub type Completion<T> = Box<dyn FnOnce(T) + Send>;

/// Runs `start` with a completion and waits for it to be invoked.
pub fn expect_completion<T, F>(start: F) -> T
where
    T: Send + 'static,
    F: FnOnce(Completion<T>),
{
    let (tx, rx) = mpsc::channel();
    start(Box::new(move |value| {
        let _ = tx.send(value);
    }));
    rx.recv_timeout(COMPLETION_TIMEOUT)
        .expect("Expected completion to be invoked")
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
}

pub fn minus_feed_cache_max_age(date: DateTime<Utc>) -> DateTime<Utc> {
    date - chrono::Duration::days(7)
}

pub fn any_url() -> Url {
    Url::parse("https://any-url.com").unwrap()
}

pub fn any_store_error() -> StoreError {
    StoreError::Io(io::Error::new(io::ErrorKind::Other, "any error"))
}

pub fn unique_item() -> FeedItem {
    FeedItem::new(Uuid::new_v4(), any_url())
}

pub fn unique_feed() -> (Vec<FeedItem>, Vec<LocalFeedItem>) {
    let models = vec![
        unique_item(),
        unique_item()
            .with_description(Some("a description".to_string()))
            .with_location(Some("a location".to_string())),
    ];
    let local = models.iter().cloned().map(LocalFeedItem::from).collect();
    (models, local)
}

/// Builds a domain item and its wire JSON, omitting absent optional keys.
pub fn make_item(description: Option<&str>, location: Option<&str>, image: &str) -> (FeedItem, Value) {
    let item = FeedItem::new(Uuid::new_v4(), Url::parse(image).unwrap())
        .with_description(description.map(str::to_string))
        .with_location(location.map(str::to_string));

    let mut json = json!({
        "id": item.id.to_string(),
        "image": image,
    });
    if let Some(description) = description {
        json["description"] = json!(description);
    }
    if let Some(location) = location {
        json["location"] = json!(location);
    }

    (item, json)
}

pub fn make_items_json(items: &[Value]) -> Vec<u8> {
    serde_json::to_vec(&json!({ "items": items })).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReceivedMessage {
    Retrieve,
    Insert(Vec<LocalFeedItem>, DateTime<Utc>),
    Delete,
}

/// Records every store message and holds completions until the test
/// decides how each one finishes.
#[derive(Default)]
pub struct FeedStoreSpy {
    messages: Mutex<Vec<ReceivedMessage>>,
    retrievals: Mutex<Vec<Option<RetrievalCompletion>>>,
    insertions: Mutex<Vec<Option<InsertionCompletion>>>,
    deletions: Mutex<Vec<Option<DeletionCompletion>>>,
}

impl FeedStoreSpy {
    pub fn received_messages(&self) -> Vec<ReceivedMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn complete_retrieval(&self, outcome: RetrievalOutcome, index: usize) {
        let completion = self.retrievals.lock().unwrap()[index]
            .take()
            .expect("Retrieval already completed");
        completion(outcome);
    }

    pub fn complete_insertion(&self, result: Result<(), StoreError>, index: usize) {
        let completion = self.insertions.lock().unwrap()[index]
            .take()
            .expect("Insertion already completed");
        completion(result);
    }

    pub fn complete_deletion(&self, result: Result<(), StoreError>, index: usize) {
        let completion = self.deletions.lock().unwrap()[index]
            .take()
            .expect("Deletion already completed");
        completion(result);
    }
}

impl FeedStore for FeedStoreSpy {
    fn retrieve(&self, completion: RetrievalCompletion) {
        self.messages.lock().unwrap().push(ReceivedMessage::Retrieve);
        self.retrievals.lock().unwrap().push(Some(completion));
    }

    fn insert(&self, feed: Vec<LocalFeedItem>, timestamp: DateTime<Utc>, completion: InsertionCompletion) {
        self.messages
            .lock()
            .unwrap()
            .push(ReceivedMessage::Insert(feed, timestamp));
        self.insertions.lock().unwrap().push(Some(completion));
    }

    fn delete(&self, completion: DeletionCompletion) {
        self.messages.lock().unwrap().push(ReceivedMessage::Delete);
        self.deletions.lock().unwrap().push(Some(completion));
    }
}

#[derive(Default)]
pub struct HttpClientSpy {
    requests: Mutex<Vec<(Url, Option<HttpCompletion>)>>,
    cancelled: Arc<Mutex<Vec<Url>>>,
}

struct TaskSpy {
    url: Url,
    cancelled: Arc<Mutex<Vec<Url>>>,
}

impl HttpClientTask for TaskSpy {
    fn cancel(&self) {
        self.cancelled.lock().unwrap().push(self.url.clone());
    }
}

impl HttpClientSpy {
    pub fn requested_urls(&self) -> Vec<Url> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn cancelled_urls(&self) -> Vec<Url> {
        self.cancelled.lock().unwrap().clone()
    }

    pub fn complete_with_error(&self, index: usize) {
        let completion = self.take_completion(index);
        completion(Err(FeederError::Io(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "offline",
        ))));
    }

    pub fn complete_with_status(&self, status: u16, body: Vec<u8>, index: usize) {
        let completion = self.take_completion(index);
        completion(Ok(HttpResponse { status, body }));
    }

    fn take_completion(&self, index: usize) -> HttpCompletion {
        self.requests.lock().unwrap()[index]
            .1
            .take()
            .expect("Request already completed")
    }
}

impl HttpClient for HttpClientSpy {
    fn get(&self, url: &Url, completion: HttpCompletion) -> Box<dyn HttpClientTask> {
        self.requests
            .lock()
            .unwrap()
            .push((url.clone(), Some(completion)));
        Box::new(TaskSpy {
            url: url.clone(),
            cancelled: Arc::clone(&self.cancelled),
        })
    }
}

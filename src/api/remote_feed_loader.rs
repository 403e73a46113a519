use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::api::feed_items_mapper::FeedItemsMapper;
use crate::api::http_client::{HttpClient, HttpClientTask};
use crate::domain::{FeedItem, FeedLoader, FeedLoaderCompletion};
use crate::errors::RemoteFeedError;

pub type RemoteLoadResult = Result<Vec<FeedItem>, RemoteFeedError>;

struct Inner<C> {
    url: Url,
    client: C,
}

/// Fetches the feed from a fixed endpoint through an injected HTTP client.
pub struct RemoteFeedLoader<C: HttpClient> {
    inner: Arc<Inner<C>>,
}

/// Returned by [`RemoteFeedLoader::load`]. A completion that has not started
/// by the time `cancel` is observed is never invoked. A cancel racing with a
/// response that is already being delivered does not stop that delivery.
pub struct RemoteFeedLoaderTask {
    cancelled: Arc<AtomicBool>,
    wrapped: Box<dyn HttpClientTask>,
}

impl HttpClientTask for RemoteFeedLoaderTask {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.wrapped.cancel();
    }
}

impl<C: HttpClient + 'static> RemoteFeedLoader<C> {
    pub fn new(url: Url, client: C) -> Self {
        Self {
            inner: Arc::new(Inner { url, client }),
        }
    }

    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    pub fn load<F>(&self, completion: F) -> RemoteFeedLoaderTask
    where
        F: FnOnce(RemoteLoadResult) + Send + 'static,
    {
        let loader = Arc::downgrade(&self.inner);
        let cancelled = Arc::new(AtomicBool::new(false));
        let observed = Arc::clone(&cancelled);

        debug!(url = %self.inner.url, "Requesting remote feed");
        let wrapped = self.inner.client.get(
            &self.inner.url,
            Box::new(move |result| {
                if loader.upgrade().is_none() || observed.load(Ordering::SeqCst) {
                    return;
                }

                match result {
                    Ok(response) => completion(FeedItemsMapper::map(&response.body, response.status)),
                    Err(e) => {
                        warn!(error = %e, "Remote feed request failed");
                        completion(Err(RemoteFeedError::Connectivity))
                    }
                }
            }),
        );

        RemoteFeedLoaderTask { cancelled, wrapped }
    }
}

impl<C: HttpClient + 'static> FeedLoader for RemoteFeedLoader<C> {
    fn load(&self, completion: FeedLoaderCompletion) {
        // The cancel handle is only reachable through the inherent method.
        let _task = RemoteFeedLoader::load(self, move |result| completion(result.map_err(Into::into)));
    }
}

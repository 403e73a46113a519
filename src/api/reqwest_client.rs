use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

use crate::api::http_client::{HttpClient, HttpClientResult, HttpClientTask, HttpCompletion, HttpResponse};
use crate::errors::FeederResult;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`HttpClient`] over a blocking reqwest client. Each request runs on its
/// own thread so `get` returns immediately.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

struct ReqwestTask {
    cancelled: Arc<AtomicBool>,
}

impl HttpClientTask for ReqwestTask {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl ReqwestHttpClient {
    pub fn new() -> FeederResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> FeederResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn execute(client: &Client, url: Url) -> HttpClientResult {
        let response = client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get(&self, url: &Url, completion: HttpCompletion) -> Box<dyn HttpClientTask> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let observed = Arc::clone(&cancelled);
        let client = self.client.clone();
        let url = url.clone();

        thread::spawn(move || {
            let result = Self::execute(&client, url.clone());
            if observed.load(Ordering::SeqCst) {
                debug!(url = %url, "Dropping response of cancelled request");
                return;
            }
            completion(result);
        });

        Box::new(ReqwestTask { cancelled })
    }
}

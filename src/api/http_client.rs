use std::sync::Arc;

use url::Url;

use crate::errors::FeederResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

pub type HttpClientResult = FeederResult<HttpResponse>;
pub type HttpCompletion = Box<dyn FnOnce(HttpClientResult) + Send>;

/// Handle to an in-flight request.
pub trait HttpClientTask: Send + Sync {
    fn cancel(&self);
}

/// Minimal HTTP capability the feed pipeline depends on.
pub trait HttpClient: Send + Sync {
    /// Issues a GET request. The completion may run on any thread; callers
    /// dispatch to their own context if they need to.
    fn get(&self, url: &Url, completion: HttpCompletion) -> Box<dyn HttpClientTask>;
}

impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    fn get(&self, url: &Url, completion: HttpCompletion) -> Box<dyn HttpClientTask> {
        (**self).get(url, completion)
    }
}

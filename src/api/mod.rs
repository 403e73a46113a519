pub mod http_client;
pub mod feed_items_mapper;
pub mod remote_feed_loader;
pub mod reqwest_client;

pub use http_client::{HttpClient, HttpClientResult, HttpClientTask, HttpCompletion, HttpResponse};
pub use feed_items_mapper::FeedItemsMapper;
pub use remote_feed_loader::{RemoteFeedLoader, RemoteFeedLoaderTask, RemoteLoadResult};
pub use reqwest_client::ReqwestHttpClient;

use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use crate::domain::FeedItem;
use crate::errors::RemoteFeedError;

const OK_200: u16 = 200;

#[derive(Deserialize)]
struct Root {
    items: Vec<RemoteFeedItem>,
}

/// Wire representation; `image` is what the domain calls `url`.
#[derive(Deserialize)]
struct RemoteFeedItem {
    id: Uuid,
    description: Option<String>,
    location: Option<String>,
    image: Url,
}

impl From<RemoteFeedItem> for FeedItem {
    fn from(item: RemoteFeedItem) -> Self {
        FeedItem::new(item.id, item.image)
            .with_description(item.description)
            .with_location(item.location)
    }
}

pub struct FeedItemsMapper;

impl FeedItemsMapper {
    /// Validates the status and decodes the body into feed items, keeping
    /// the order (and any duplicates) of the payload.
    pub fn map(body: &[u8], status: u16) -> Result<Vec<FeedItem>, RemoteFeedError> {
        if status != OK_200 {
            return Err(RemoteFeedError::InvalidData);
        }

        let root: Root = serde_json::from_slice(body).map_err(|_| RemoteFeedError::InvalidData)?;
        Ok(root.items.into_iter().map(FeedItem::from).collect())
    }
}

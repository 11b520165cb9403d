use crate::error::IndexerError;
use async_trait::async_trait;

mod request;

pub use request::RequestFetcher;

/// Raw answer to a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    /// Only a 200 answer carries data worth parsing.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, IndexerError>;
}

use alloc::string::String;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError<K> {
    /// The page fetch was rejected. The list is back to idle; retrying is left to the caller.
    #[error("failed to fetch page {page} of list {list_key:?}: {reason}")]
    FetchFailed { list_key: K, page: u32, reason: String },
}

impl<K> FeedError<K> {
    pub fn list_key(&self) -> &K {
        match self {
            Self::FetchFailed { list_key, .. } => list_key,
        }
    }
}

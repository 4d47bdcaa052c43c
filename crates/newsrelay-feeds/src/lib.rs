//! Feed retrieval, retry, and near-duplicate collapsing.

pub mod dedup;
pub mod error;
pub mod orchestrator;
pub mod retry;
pub mod rss;
pub mod source;

pub use dedup::{dedupe, DEDUP_THRESHOLD};
pub use error::{FetchError, SourceError};
pub use orchestrator::{FetchOrchestrator, FetchReport};
pub use retry::RetryPolicy;
pub use rss::RssFeedSource;
pub use source::{FeedSource, RawEntry};

//! HTTP implementations of the publishing and image-search capabilities.

pub mod error;
pub mod publisher;
pub mod unsplash;

pub use error::ClientError;
pub use publisher::{DryRunPublisher, HttpPublisher};
pub use unsplash::UnsplashImageSearch;

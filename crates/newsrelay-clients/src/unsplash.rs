//! [`ImageSearch`] backed by the Unsplash photo search API.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use newsrelay_core::{ImageError, ImageSearch};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::ClientError;
use crate::publisher::base_url;

const DEFAULT_BASE_URL: &str = "https://api.unsplash.com/";
const RESULTS_PER_PAGE: &str = "10";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

/// Searches landscape photos for a keyword and downloads one of the top
/// results at random.
pub struct UnsplashImageSearch {
    client: Client,
    access_key: String,
    base_url: Url,
    rng: Mutex<StdRng>,
}

impl UnsplashImageSearch {
    /// Creates a client pointed at the production Unsplash API.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(access_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        Self::with_base_url(access_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        access_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url_raw: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            access_key: access_key.to_owned(),
            base_url: base_url(base_url_raw)?,
            rng: Mutex::new(StdRng::from_os_rng()),
        })
    }

    /// Replace the generator used to pick among search results.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    fn search_url(&self, keyword: &str) -> Result<Url, ImageError> {
        let mut url = self
            .base_url
            .join("search/photos")
            .map_err(|e| ImageError::InvalidResponse(format!("cannot build search URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("query", keyword)
            .append_pair("orientation", "landscape")
            .append_pair("per_page", RESULTS_PER_PAGE)
            .append_pair("order_by", "relevant");
        Ok(url)
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Photo>, ImageError> {
        let response = self
            .client
            .get(self.search_url(keyword)?)
            .header(AUTHORIZATION, format!("Client-ID {}", self.access_key))
            .send()
            .await
            .map_err(|e| ImageError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status(status.as_u16()));
        }
        let body = response
            .text()
            .await
            .map_err(|e| ImageError::Transport(e.to_string()))?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| ImageError::InvalidResponse(e.to_string()))?;
        Ok(parsed.results)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status(status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageSearch for UnsplashImageSearch {
    async fn find(&self, keyword: &str) -> Result<Option<Vec<u8>>, ImageError> {
        let photos = self.search(keyword).await?;
        let chosen = {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            photos.choose(&mut *rng).map(|p| p.urls.regular.clone())
        };
        let Some(image_url) = chosen else {
            tracing::info!(keyword = %keyword, "no images found");
            return Ok(None);
        };

        let bytes = self.download(&image_url).await?;
        tracing::debug!(keyword = %keyword, bytes = bytes.len(), "downloaded image");
        Ok(Some(bytes))
    }
}

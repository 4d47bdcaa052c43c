use thiserror::Error;

/// A single source could not be read.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {url}")]
    RateLimited { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("failed to parse feed from {url}: {reason}")]
    Parse { url: String, reason: String },
}

impl SourceError {
    /// Returns `true` for errors worth retrying after a delay.
    ///
    /// Timeouts, connection failures, 429, and 5xx are transient. Other 4xx
    /// statuses and malformed feeds fail the source immediately.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_body()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            SourceError::RateLimited { .. } => true,
            SourceError::UnexpectedStatus { status, .. } => *status >= 500,
            SourceError::Parse { .. } => false,
        }
    }
}

/// The fetch run as a whole was aborted.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("source {source_name} failed: {source}")]
    SourceFailed {
        source_name: String,
        #[source]
        source: SourceError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> SourceError {
        SourceError::UnexpectedStatus {
            status: code,
            url: "https://feeds.example.com/rss".to_string(),
        }
    }

    #[test]
    fn server_errors_are_transient() {
        assert!(status(500).is_transient());
        assert!(status(503).is_transient());
    }

    #[test]
    fn client_errors_are_permanent() {
        assert!(!status(404).is_transient());
        assert!(!status(403).is_transient());
    }

    #[test]
    fn rate_limit_is_transient() {
        let err = SourceError::RateLimited {
            url: "https://feeds.example.com/rss".to_string(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn parse_error_is_permanent() {
        let err = SourceError::Parse {
            url: "https://feeds.example.com/rss".to_string(),
            reason: "unexpected eof".to_string(),
        };
        assert!(!err.is_transient());
    }
}

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings read from the environment at startup.
///
/// Everything that shapes posting behaviour (sources, pools, limits, schedule)
/// lives in the YAML file at `config_path`; see [`crate::BotConfig`].
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub config_path: PathBuf,
    pub stats_path: PathBuf,
    /// Per-call timeout applied to every outbound network request.
    pub http_timeout_secs: u64,
    pub user_agent: String,
    /// Relay endpoint used by the HTTP publisher. `None` means dry-run posting.
    pub publish_url: Option<String>,
    pub publish_token: Option<String>,
    pub unsplash_access_key: Option<String>,
    /// Fixed seed for all creative randomness. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("config_path", &self.config_path)
            .field("stats_path", &self.stats_path)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("publish_url", &self.publish_url)
            .field(
                "publish_token",
                &self.publish_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "unsplash_access_key",
                &self.unsplash_access_key.as_ref().map(|_| "[redacted]"),
            )
            .field("rng_seed", &self.rng_seed)
            .finish()
    }
}

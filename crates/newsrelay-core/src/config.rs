use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if any value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("NEWSRELAY_ENV", "development"))?;
    let log_level = or_default("NEWSRELAY_LOG_LEVEL", "info");
    let config_path = PathBuf::from(or_default(
        "NEWSRELAY_CONFIG_PATH",
        "./config/newsrelay.yaml",
    ));
    let stats_path = PathBuf::from(or_default("NEWSRELAY_STATS_PATH", "./bot_stats.json"));

    let http_timeout_secs = parse_u64("NEWSRELAY_HTTP_TIMEOUT_SECS", "10")?;
    if http_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEWSRELAY_HTTP_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }
    let user_agent = or_default("NEWSRELAY_USER_AGENT", "newsrelay/0.1 (RSS Feed Reader)");

    let publish_url = optional("NEWSRELAY_PUBLISH_URL");
    if env == Environment::Production && publish_url.is_none() {
        return Err(ConfigError::MissingEnvVar(
            "NEWSRELAY_PUBLISH_URL".to_string(),
        ));
    }
    let publish_token = optional("NEWSRELAY_PUBLISH_TOKEN");
    let unsplash_access_key = optional("UNSPLASH_ACCESS_KEY");

    let rng_seed = match optional("NEWSRELAY_RNG_SEED") {
        Some(raw) => Some(raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: "NEWSRELAY_RNG_SEED".to_string(),
            reason: e.to_string(),
        })?),
        None => None,
    };

    Ok(AppConfig {
        env,
        log_level,
        config_path,
        stats_path,
        http_timeout_secs,
        user_agent,
        publish_url,
        publish_token,
        unsplash_access_key,
        rng_seed,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEWSRELAY_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

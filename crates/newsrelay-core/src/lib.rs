pub mod app_config;
pub mod article;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod schedule;
pub mod settings;

pub use app_config::{AppConfig, Environment};
pub use article::Article;
pub use capabilities::{ImageError, ImageSearch, PostId, PublishError, Publisher};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use schedule::Trigger;
pub use settings::{
    load_bot_config, parse_bot_config, validate_bot_config, Backoff, BotConfig, ContentConfig,
    ErrorConfig, FetchConfig, HistoryConfig, ScheduleConfig, SourceConfig,
};

use std::io::Write;

use super::*;

const MINIMAL_YAML: &str = r##"
sources:
  - name: coindesk
    url: https://www.coindesk.com/arc/outboundfeeds/rss/
hashtags: ["#Bitcoin", "#Crypto"]
"##;

#[test]
fn defaults_validate() {
    validate_bot_config(&BotConfig::default()).unwrap();
}

#[test]
fn minimal_yaml_fills_remaining_sections_with_defaults() {
    let cfg = parse_bot_config(MINIMAL_YAML).unwrap();
    assert_eq!(cfg.sources.len(), 1);
    assert!(cfg.sources[0].enabled);
    assert_eq!(cfg.hashtags, vec!["#Bitcoin", "#Crypto"]);
    assert_eq!(cfg.content, ContentConfig::default());
    assert_eq!(cfg.schedule, ScheduleConfig::default());
    assert_eq!(cfg.errors.max_attempts, 3);
    assert_eq!(cfg.history.cap, 2000);
    assert_eq!(cfg.history.retain, 1000);
    assert_eq!(cfg.fetch.max_entries_per_source, 15);
}

#[test]
fn full_yaml_overrides_every_section() {
    let yaml = r##"
sources:
  - name: decrypt
    url: https://decrypt.co/feed
  - name: cryptonews
    url: https://cryptonews.com/news/feed/
    enabled: false
hashtags: ["#BTC"]
mentions: ["@CoinDesk"]
image_keywords: ["bitcoin"]
schedule:
  post_times: ["09:00", "21:30"]
  min_minutes_between_posts: 30
content:
  max_post_length: 280
  hashtags_per_post: 1
  include_mentions: false
  prefix_probability: 0.0
errors:
  continue_on_source_error: false
  max_attempts: 5
  retry_delay_secs: 1
  backoff: exponential
history:
  cap: 10
  retain: 5
fetch:
  concurrency: 2
"##;
    let cfg = parse_bot_config(yaml).unwrap();
    assert_eq!(cfg.enabled_sources().count(), 1);
    assert_eq!(cfg.schedule.post_times, vec!["09:00", "21:30"]);
    assert_eq!(cfg.schedule.min_minutes_between_posts, 30);
    assert_eq!(cfg.content.max_post_length, 280);
    assert!(!cfg.content.include_mentions);
    assert_eq!(cfg.errors.backoff, Backoff::Exponential);
    assert!(!cfg.errors.continue_on_source_error);
    assert_eq!(cfg.history.cap, 10);
    assert_eq!(cfg.fetch.concurrency, 2);
    assert_eq!(cfg.fetch.max_entries_per_source, 15);
}

#[test]
fn unknown_field_is_a_parse_error() {
    let yaml = format!("{MINIMAL_YAML}\ncontent:\n  max_chars: 10\n");
    assert!(matches!(
        parse_bot_config(&yaml),
        Err(ConfigError::FileParse(_))
    ));
}

#[test]
fn blank_pool_entries_are_dropped() {
    let yaml = r##"
sources:
  - name: decrypt
    url: https://decrypt.co/feed
hashtags: ["#BTC", "  "]
mentions: [""]
"##;
    let cfg = parse_bot_config(yaml).unwrap();
    assert_eq!(cfg.hashtags, vec!["#BTC"]);
    assert!(cfg.mentions.is_empty());
}

#[test]
fn all_sources_disabled_is_rejected() {
    let yaml = r##"
sources:
  - name: decrypt
    url: https://decrypt.co/feed
    enabled: false
"##;
    let err = parse_bot_config(yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("no enabled")),
        "got: {err:?}"
    );
}

#[test]
fn empty_hashtag_pool_is_rejected() {
    let yaml = r##"
sources:
  - name: decrypt
    url: https://decrypt.co/feed
hashtags: []
"##;
    assert!(matches!(
        parse_bot_config(yaml),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn duplicate_source_names_are_rejected_case_insensitively() {
    let mut cfg = BotConfig::default();
    cfg.sources = vec![
        SourceConfig::new("Decrypt", "https://decrypt.co/feed"),
        SourceConfig::new("decrypt", "https://decrypt.co/other"),
    ];
    let err = validate_bot_config(&cfg).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")));
}

#[test]
fn non_http_source_url_is_rejected() {
    let mut cfg = BotConfig::default();
    cfg.sources = vec![SourceConfig::new("local", "file:///tmp/feed.xml")];
    assert!(validate_bot_config(&cfg).is_err());
}

#[test]
fn reserved_chars_must_leave_room_for_content() {
    let mut cfg = BotConfig::default();
    cfg.content.reserved_chars = cfg.content.max_post_length;
    assert!(validate_bot_config(&cfg).is_err());
}

#[test]
fn probability_outside_unit_interval_is_rejected() {
    let mut cfg = BotConfig::default();
    cfg.content.suffix_probability = 1.5;
    let err = validate_bot_config(&cfg).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("suffix_probability")));
}

#[test]
fn invalid_post_time_is_rejected() {
    let mut cfg = BotConfig::default();
    cfg.schedule.post_times = vec!["9am".to_string()];
    assert!(validate_bot_config(&cfg).is_err());
}

#[test]
fn retain_above_cap_is_rejected() {
    let mut cfg = BotConfig::default();
    cfg.history.retain = cfg.history.cap + 1;
    assert!(validate_bot_config(&cfg).is_err());
}

#[test]
fn zero_attempts_is_rejected() {
    let mut cfg = BotConfig::default();
    cfg.errors.max_attempts = 0;
    assert!(validate_bot_config(&cfg).is_err());
}

#[test]
fn shrinking_lookback_window_is_rejected() {
    let mut cfg = BotConfig::default();
    cfg.schedule.extended_lookback_hours = 6;
    assert!(validate_bot_config(&cfg).is_err());
}

#[test]
fn load_bot_config_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(MINIMAL_YAML.as_bytes()).unwrap();
    let cfg = load_bot_config(file.path()).unwrap();
    assert_eq!(cfg.sources[0].name, "coindesk");
}

#[test]
fn load_bot_config_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_bot_config(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileIo { .. }));
}

#[test]
fn parse_post_time_accepts_hh_mm() {
    let t = parse_post_time(" 07:45 ").unwrap();
    assert_eq!(t, NaiveTime::from_hms_opt(7, 45, 0).unwrap());
}

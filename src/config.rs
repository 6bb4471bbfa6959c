//! Command line and environment configuration.

use crate::classify::RuleTable;
use crate::consts::{limits, store};
use crate::network::DeliveryConfig;
use crate::recency::Window;
use clap::Parser;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set (flag or environment)")]
    Missing(&'static str),
    #[error("cannot read rule file {}: {source}", path.display())]
    RulesUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid rule file {}: {source}", path.display())]
    RulesInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "internship_digest",
    version,
    about = "Filter scraped internship listings and post the fresh ones to Telegram"
)]
pub struct Cli {
    /// Bot API token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Numeric chat id (groups and channels are negative) or @channel
    #[arg(long, env = "CHAT_ID", allow_hyphen_values = true)]
    pub chat_id: Option<String>,

    /// Freshness window in days; negative disables date filtering
    #[arg(long, env = "WINDOW_DAYS", default_value_t = limits::DEFAULT_WINDOW_DAYS, allow_negative_numbers = true)]
    pub days: i64,

    /// Only listings posted today (overrides --days)
    #[arg(long)]
    pub today: bool,

    /// No date filtering (overrides --days)
    #[arg(long, conflicts_with = "today")]
    pub all: bool,

    #[arg(long, env = "MAX_ENTRIES", default_value_t = limits::DEFAULT_MAX_ENTRIES)]
    pub max_entries: usize,

    /// Append-only store fed by the scraper
    #[arg(long, env = "RAW_STORE", default_value = store::DEFAULT_RAW_STORE)]
    pub raw_store: PathBuf,

    /// Rewritten on every run with the classified, deduplicated listings
    #[arg(long, env = "FILTERED_STORE", default_value = store::DEFAULT_FILTERED_STORE)]
    pub filtered_store: PathBuf,

    /// JSON rule table replacing the built-in keyword lists
    #[arg(long, env = "RULES_FILE")]
    pub rules: Option<PathBuf>,

    /// Scraper exports to append to the raw store before filtering
    #[arg(long, value_name = "FILE", num_args = 1..)]
    pub ingest: Vec<PathBuf>,

    /// Print the digest instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = limits::REQUEST_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// Where the digest goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    Telegram {
        token: String,
        chat_id: String,
        timeout: Duration,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub window: Window,
    pub max_entries: usize,
    pub raw_store: PathBuf,
    pub filtered_store: PathBuf,
    pub rules: RuleTable,
    pub ingest: Vec<PathBuf>,
    pub sink: Sink,
    pub delivery: DeliveryConfig,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let window = if cli.all {
            Window::Disabled
        } else if cli.today {
            Window::Days(0)
        } else {
            Window::from_days(cli.days)
        };
        let rules = load_rules(cli.rules.as_deref())?;

        let sink = if cli.dry_run {
            Sink::Stdout
        } else {
            if cli.timeout_secs == 0 {
                return Err(ConfigError::ZeroTimeout);
            }
            Sink::Telegram {
                token: non_empty(cli.bot_token).ok_or(ConfigError::Missing("BOT_TOKEN"))?,
                chat_id: non_empty(cli.chat_id).ok_or(ConfigError::Missing("CHAT_ID"))?,
                timeout: Duration::from_secs(cli.timeout_secs),
            }
        };

        Ok(Self {
            window,
            max_entries: cli.max_entries,
            raw_store: cli.raw_store,
            filtered_store: cli.filtered_store,
            rules,
            ingest: cli.ingest,
            sink,
            delivery: DeliveryConfig::default(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Built-in rules unless a file is given
pub fn load_rules(path: Option<&Path>) -> Result<RuleTable, ConfigError> {
    let Some(path) = path else {
        return Ok(RuleTable::default());
    };
    let json = fs::read_to_string(path).map_err(|source| ConfigError::RulesUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = RuleTable::from_json(&json).map_err(|source| ConfigError::RulesInvalid {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded classification rules from {}", path.display());
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["internship_digest"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn explicit_flags_build_telegram_sink() {
        let config = Config::from_cli(cli(&[
            "--bot-token", "123:abc", "--chat-id", "-100", "--days", "5", "--max-entries", "7",
        ]))
        .unwrap();
        assert_eq!(config.window, Window::Days(5));
        assert_eq!(config.max_entries, 7);
        assert_eq!(
            config.sink,
            Sink::Telegram {
                token: "123:abc".into(),
                chat_id: "-100".into(),
                timeout: Duration::from_secs(limits::REQUEST_TIMEOUT_SECS),
            }
        );
    }

    #[test]
    fn today_and_negative_window() {
        let today = Config::from_cli(cli(&["--dry-run", "--days", "9", "--today"])).unwrap();
        assert_eq!(today.window, Window::Days(0));

        let all = Config::from_cli(cli(&["--dry-run", "--days", "-1"])).unwrap();
        assert_eq!(all.window, Window::Disabled);
    }

    #[test]
    fn channel_id_after_flag_is_a_value() {
        let config = Config::from_cli(cli(&["--chat-id", "-1002680765834", "--bot-token", "t"])).unwrap();
        assert!(matches!(config.sink, Sink::Telegram { ref chat_id, .. } if chat_id == "-1002680765834"));
    }

    #[test]
    fn all_disables_the_window() {
        let all = Config::from_cli(cli(&["--dry-run", "--days", "5", "--all"])).unwrap();
        assert_eq!(all.window, Window::Disabled);

        let argv = ["internship_digest", "--dry-run", "--all", "--today"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn dry_run_needs_no_credentials() {
        let config = Config::from_cli(cli(&["--dry-run", "--bot-token", ""])).unwrap();
        assert_eq!(config.sink, Sink::Stdout);
    }

    #[test]
    fn blank_credential_is_missing() {
        let err = Config::from_cli(cli(&["--bot-token", " ", "--chat-id", "@chan"])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("BOT_TOKEN")));
    }

    #[test]
    fn rule_file_errors_are_reported() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(
            load_rules(Some(&missing)),
            Err(ConfigError::RulesUnreadable { .. })
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "[1, 2").unwrap();
        assert!(matches!(load_rules(Some(&bad)), Err(ConfigError::RulesInvalid { .. })));

        let good = dir.path().join("good.json");
        fs::write(&good, r#"{"role_terms": ["Werkstudent"]}"#).unwrap();
        assert_eq!(load_rules(Some(&good)).unwrap().role_terms, vec!["werkstudent".to_string()]);
    }
}

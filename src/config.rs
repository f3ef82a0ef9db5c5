use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_FEEDS: [&str; 3] = [
    "https://medium.com/feed/tag/bug-bounty",
    "https://medium.com/feed/tag/security",
    "https://medium.com/feed/tag/vulnerability",
];

const MAX_OFFSET_MINUTES: i32 = 24 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedConfig>,
    /// Report file that is scanned for prior identifiers and then overwritten
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
    /// Per-request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    /// Pause after each feed in seconds
    #[serde(default = "default_pause")]
    pub pause_secs: u64,
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,
    /// Offset of the timezone used to decide what "today" is
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Optional second report listing the most frequent title keywords
    #[serde(default)]
    pub keyword_report_path: Option<PathBuf>,
    #[serde(default = "default_top_keywords")]
    pub top_keywords: usize,
}

fn default_feeds() -> Vec<FeedConfig> {
    DEFAULT_FEEDS.iter().map(|url| FeedConfig::new(*url)).collect()
}

fn default_report_path() -> PathBuf {
    PathBuf::from("trends.md")
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_pause() -> u64 {
    2
}

fn default_max_title_length() -> usize {
    65
}

fn default_top_keywords() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            report_path: default_report_path(),
            fetch_timeout_secs: default_fetch_timeout(),
            pause_secs: default_pause(),
            max_title_length: default_max_title_length(),
            utc_offset_minutes: 0,
            keyword_report_path: None,
            top_keywords: default_top_keywords(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub url: String,
    /// Display label; the last path segment of `url` when absent
    #[serde(default)]
    pub name: Option<String>,
}

impl FeedConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
        }
    }

    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) => name.as_str(),
            None => self.url.rsplit('/').next().unwrap_or(&self.url),
        }
    }

    /// Markdown link pointing at the feed, used in the report's feed column.
    pub fn label(&self) -> String {
        format!("[{}]({})", self.display_name(), self.url)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load `path` if it exists, otherwise fall back to the built-in feed list.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.utc_offset_minutes.abs() >= MAX_OFFSET_MINUTES {
            anyhow::bail!(
                "utc_offset_minutes must be within +/-{} minutes, got {}",
                MAX_OFFSET_MINUTES,
                self.utc_offset_minutes
            );
        }
        if self.max_title_length == 0 {
            anyhow::bail!("max_title_length must be positive");
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_secs)
    }

    pub fn reference_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or(Utc.fix())
    }
}

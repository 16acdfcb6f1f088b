use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Fixed source of the airing schedule. No other endpoints are consulted.
pub const DEFAULT_SOURCE_URL: &str = "https://next-episode.net";

/// Default daily trigger: 09:00 every day.
pub const DEFAULT_SCHEDULE_TIME: &str = "0 9 * * *";

/// Bound on establishing the HTTP connection to the source.
pub const CONNECT_TIMEOUT_MS: u64 = 30_000;
/// Bound on the whole page request, headers to body.
pub const REQUEST_TIMEOUT_MS: u64 = 60_000;

/// Desktop browser User-Agent sent to the source site.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Top-level config (epiwatch.toml + raw env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpiwatchConfig {
    /// Telegram bot token. Absence is a fatal startup error.
    pub bot_token: String,

    /// Cron pattern driving the daily digest.
    #[serde(default = "default_schedule_time")]
    pub schedule_time: String,

    /// Topic applied when a chat is authorized outside any forum topic.
    #[serde(default)]
    pub default_topic_id: Option<i64>,

    /// Path of the registry storage file (JSON array).
    #[serde(default = "default_storage_path")]
    pub storage_path: String,

    /// Page the schedule is extracted from.
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Signature appended to every digest. `None` disables the footer.
    #[serde(default = "default_footer")]
    pub footer: Option<String>,
}

fn default_schedule_time() -> String {
    DEFAULT_SCHEDULE_TIME.to_string()
}

fn default_storage_path() -> String {
    "data/groups.json".to_string()
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_footer() -> Option<String> {
    Some("@EpiWatch_bot".to_string())
}

impl EpiwatchConfig {
    /// Load config from a TOML file with environment variable overrides.
    ///
    /// Recognised env keys: `BOT_TOKEN`, `SCHEDULE_TIME`, `DEFAULT_TOPIC_ID`,
    /// `STORAGE_PATH`, `SOURCE_URL`, `FOOTER`. A missing `bot_token` in both
    /// sources surfaces as a `Config` error — the caller exits non-zero.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or("epiwatch.toml");

        let config: EpiwatchConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::raw().only(&[
                "BOT_TOKEN",
                "SCHEDULE_TIME",
                "DEFAULT_TOPIC_ID",
                "STORAGE_PATH",
                "SOURCE_URL",
                "FOOTER",
            ]))
            .extract()
            .map_err(|e| crate::error::EpiwatchError::Config(e.to_string()))?;

        Ok(config)
    }
}

use log::LevelFilter;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_WINDOW: usize = 10;
pub const DEFAULT_FOCUS_TEAM: &str = "EDM";

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Recent-games window used by every ranking.
    pub window: usize,
    pub focus_team: String,
    pub today_refresh: Duration,
    pub focus_refresh: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            window: DEFAULT_WINDOW,
            focus_team: DEFAULT_FOCUS_TEAM.to_string(),
            today_refresh: Duration::from_secs(60),
            focus_refresh: Duration::from_secs(30),
        }
    }
}

impl AppSettings {
    /// Read `NHLTUI_*` environment variables. Unset or unparsable values keep
    /// their defaults.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            full_screen: false,
            log_level: get("NHLTUI_LOG_LEVEL").and_then(|v| LevelFilter::from_str(&v).ok()),
            window: get("NHLTUI_WINDOW")
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|w| *w > 0)
                .unwrap_or(defaults.window),
            focus_team: get("NHLTUI_FOCUS_TEAM")
                .map(|t| t.to_ascii_uppercase())
                .unwrap_or(defaults.focus_team),
            today_refresh: seconds(get("NHLTUI_TODAY_REFRESH_SECS"))
                .unwrap_or(defaults.today_refresh),
            focus_refresh: seconds(get("NHLTUI_LIVE_REFRESH_SECS"))
                .unwrap_or(defaults.focus_refresh),
        }
    }
}

fn seconds(value: Option<String>) -> Option<Duration> {
    value
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|s| *s > 0)
        .map(Duration::from_secs)
}

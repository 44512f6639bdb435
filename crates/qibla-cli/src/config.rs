//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use qibla_core::{DEFAULT_TOLERANCE_DEGREES, EventName, SeasonPolicy, Venue};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Half-width of the "aligned" window in degrees.
    pub tolerance_degrees: f64,

    /// Order in which daily events are scanned. The first entry is the
    /// event reported after the last one of the day has passed.
    pub event_order: Vec<EventName>,

    /// Months treated as summer for seasonal iqama rules.
    pub season: SeasonPolicy,

    /// Remote timings service.
    pub times: TimesConfig,

    /// Known venues and their iqama rules.
    #[serde(default)]
    pub venues: Vec<Venue>,
}

/// Settings for the remote timings service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimesConfig {
    pub base_url: String,
    /// Calculation method id understood by the service.
    pub method: u8,
}

impl Default for TimesConfig {
    fn default() -> Self {
        Self {
            base_url: qibla_times::DEFAULT_BASE_URL.to_string(),
            method: qibla_times::DEFAULT_METHOD,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance_degrees: DEFAULT_TOLERANCE_DEGREES,
            event_order: EventName::standard_order(),
            season: SeasonPolicy::default(),
            times: TimesConfig::default(),
            venues: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (QIBLA_*, nested keys split on `__`)
        figment = figment.merge(Env::prefixed("QIBLA_").split("__"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for qibla.
///
/// On Linux: `~/.config/qibla`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("qibla"))
}

use std::path::{Path, PathBuf};

use derive_more::From;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use ricochet::config::{Configuration, ConfigurationError};
use ricochet::{Metric, OnError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use theme::Theme;

pub mod theme;

const SETTINGS_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "AIMTREND_";

/// Location of the stat files inside the game folder
const STATS_SUBPATH: [&str; 2] = ["FPSAimTrainer", "stats"];
/// Location of the playlists inside the game folder
const PLAYLISTS_SUBPATH: [&str; 4] = ["FPSAimTrainer", "Saved", "SaveGames", "Playlists"];

#[derive(Debug, From, Error)]
pub enum ConfigError {
    #[error(
        "Failed to get configuration directory. Please specify the location using the `--config <path>` flag"
    )]
    NoDirectory,

    #[error("Failed to create config directory: {0}")]
    CreateDirectory(std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(Box<figment::Error>),

    #[error("Invalid analysis settings: {0}")]
    Analysis(ConfigurationError),

    #[error(
        "No stats directory configured. Set `kovaaks_dir` or `stats_dir` in settings.toml, or use the `--stats <path>` flag"
    )]
    #[from(skip)]
    NoStatsDirectory,

    #[error(
        "No playlists directory configured. Set `kovaaks_dir` or `playlists_dir` in settings.toml, or use the `--playlists <path>` flag"
    )]
    #[from(skip)]
    NoPlaylistsDirectory,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// The game's install folder
    pub kovaaks_dir: Option<PathBuf>,
    /// Overrides `<kovaaks_dir>/FPSAimTrainer/stats`
    pub stats_dir: Option<PathBuf>,
    /// Overrides `<kovaaks_dir>/FPSAimTrainer/Saved/SaveGames/Playlists`
    pub playlists_dir: Option<PathBuf>,
    /// Stop at the first stat file that fails to parse
    pub abort_on_error: bool,
    pub analysis: AnalysisSettings,
    pub theme: Theme,
}

/// Analysis settings as they are written in `settings.toml`
///
/// Day limit and grouping are switched on and off separately from their values, so
/// disabling one keeps the configured value around.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub metric: Metric,
    pub limit_days: bool,
    pub days: u32,
    pub group_sessions: bool,
    pub group_hours: f64,
    pub average_sessions: usize,
    pub curve_samples: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        let defaults = Configuration::default();
        Self {
            metric: defaults.metric,
            limit_days: defaults.days.is_some(),
            days: defaults.days.unwrap_or(30),
            group_sessions: defaults.group_hours.is_some(),
            group_hours: defaults.group_hours.unwrap_or(8.0),
            average_sessions: defaults.average_sessions,
            curve_samples: defaults.curve_samples,
        }
    }
}

impl AnalysisSettings {
    pub fn to_configuration(&self) -> Result<Configuration, ConfigError> {
        let config = Configuration {
            metric: self.metric,
            days: self.limit_days.then_some(self.days),
            group_hours: self.group_sessions.then_some(self.group_hours),
            average_sessions: self.average_sessions,
            curve_samples: self.curve_samples,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Settings {
    /// Load settings from defaults, `settings.toml` and `AIMTREND_` environment variables
    ///
    /// Nested keys are separated by `__` in the environment, e.g. `AIMTREND_ANALYSIS__DAYS=7`.
    pub fn load(override_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Check for toml file location
        let config_dir = override_path
            .or_else(|| {
                ProjectDirs::from("com", "AimTrend", "AimTrend")
                    .map(|dirs| dirs.config_dir().to_path_buf())
            })
            .ok_or(ConfigError::NoDirectory)?;

        // Ensure path exists
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)?;
        }

        let settings: Self = Self::figment(&config_dir).extract().map_err(Box::new)?;
        log::debug!("Loaded settings from '{}'", config_dir.display());

        Ok(settings)
    }

    fn figment(config_dir: &Path) -> Figment {
        // Grab default configuration
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let settings_toml = config_dir.join(SETTINGS_FILE);
        if settings_toml.exists() {
            figment = figment.merge(Toml::file(settings_toml));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn stats_dir(&self) -> Result<PathBuf, ConfigError> {
        self.stats_dir
            .clone()
            .or_else(|| self.game_path(&STATS_SUBPATH))
            .ok_or(ConfigError::NoStatsDirectory)
    }

    pub fn playlists_dir(&self) -> Result<PathBuf, ConfigError> {
        self.playlists_dir
            .clone()
            .or_else(|| self.game_path(&PLAYLISTS_SUBPATH))
            .ok_or(ConfigError::NoPlaylistsDirectory)
    }

    pub const fn on_error(&self) -> OnError {
        if self.abort_on_error {
            OnError::Abort
        } else {
            OnError::Skip
        }
    }

    fn game_path(&self, subpath: &[&str]) -> Option<PathBuf> {
        let mut path = self.kovaaks_dir.clone()?;
        path.extend(subpath);
        Some(path)
    }
}

use std::path::PathBuf;

use derive_more::From;
use ricochet::{FolderError, ReportError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::playlist::PlaylistError;

#[derive(Debug, From, Error)]
pub enum AppError {
    #[error("{0}")]
    Config(ConfigError),

    #[error("{0}")]
    Folder(FolderError),

    #[error("{0}")]
    Playlist(PlaylistError),

    #[error("Playlist '{0}' not found")]
    #[from(skip)]
    PlaylistNotFound(PathBuf),

    #[error("Failed to report on '{scenario}': {error}")]
    #[from(skip)]
    Report { scenario: String, error: ReportError },

    #[error("Failed to write output: {0}")]
    Output(std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Json(serde_json::Error),

    #[error("Failed to serialize settings: {0}")]
    Toml(toml::ser::Error),
}

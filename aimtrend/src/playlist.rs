use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("Failed to read playlist '{path}': {error}")]
    Read {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Failed to parse playlist '{path}': {error}")]
    Parse {
        path: PathBuf,
        error: serde_json::Error,
    },

    #[error("Failed to read playlists directory '{directory}': {error}")]
    ReadDirectory {
        directory: PathBuf,
        error: std::io::Error,
    },
}

/// A named list of scenarios
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    pub name: String,
    pub scenarios: Vec<String>,
}

/// The playlist file written by the game. Unknown fields are ignored.
#[derive(Deserialize)]
struct KovaaksPlaylist {
    #[serde(rename = "playlistName")]
    name: String,
    #[serde(rename = "scenarioList")]
    scenarios: Vec<KovaaksScenario>,
}

#[derive(Deserialize)]
struct KovaaksScenario {
    #[serde(rename = "scenario_Name")]
    name: String,
}

impl From<KovaaksPlaylist> for Playlist {
    fn from(playlist: KovaaksPlaylist) -> Self {
        Self {
            name: playlist.name,
            scenarios: playlist
                .scenarios
                .into_iter()
                .map(|scenario| scenario.name)
                .collect(),
        }
    }
}

impl Playlist {
    pub fn from_kovaaks_json(path: &Path) -> Result<Self, PlaylistError> {
        let contents = std::fs::read_to_string(path).map_err(|error| PlaylistError::Read {
            path: path.to_path_buf(),
            error,
        })?;

        let playlist: KovaaksPlaylist =
            serde_json::from_str(&contents).map_err(|error| PlaylistError::Parse {
                path: path.to_path_buf(),
                error,
            })?;

        Ok(playlist.into())
    }
}

/// Paths of every `.json` file in the playlists directory, sorted by name
pub fn list_playlists(directory: &Path) -> Result<Vec<PathBuf>, PlaylistError> {
    let read_error = |error| PlaylistError::ReadDirectory {
        directory: directory.to_path_buf(),
        error,
    };

    let mut playlists = Vec::new();
    for entry in directory.read_dir().map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            playlists.push(path);
        }
    }
    playlists.sort();

    Ok(playlists)
}

/// Find a playlist given as a path, or as a file name (with or without `.json`) inside
/// the playlists directory
pub fn resolve(argument: &Path, directory: Option<&Path>) -> Option<PathBuf> {
    if argument.is_file() {
        return Some(argument.to_path_buf());
    }

    let directory = directory?;
    [
        directory.join(argument),
        directory.join(argument).with_extension("json"),
    ]
    .into_iter()
    .find(|path| path.is_file())
}

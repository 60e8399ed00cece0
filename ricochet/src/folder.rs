use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::session::{ParseError, SessionRecord, scenario_from_file_name};

#[derive(Debug, Error)]
pub enum FolderError {
    #[error("Failed to read stats directory '{directory}': {error}")]
    ReadDirectory {
        directory: PathBuf,
        error: std::io::Error,
    },

    #[error("Stats directory '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("Failed to parse '{path}': {error}")]
    Parse { path: PathBuf, error: ParseError },
}

/// What to do with a stat file that fails to parse
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    /// Log a warning and continue with the next file
    #[default]
    Skip,
    /// Stop and return the error
    Abort,
}

/// The game's `stats` folder
#[derive(Debug, Clone)]
pub struct StatsFolder {
    directory: PathBuf,
}

impl StatsFolder {
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, FolderError> {
        let directory = directory.into();
        if !directory.is_dir() {
            return Err(FolderError::NotFound(directory));
        }
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Paths of every regular file in the folder, sorted by name
    pub fn files(&self) -> Result<Vec<PathBuf>, FolderError> {
        let read_error = |error| FolderError::ReadDirectory {
            directory: self.directory.clone(),
            error,
        };

        let mut files = Vec::new();
        for entry in self.directory.read_dir().map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        Ok(files)
    }

    /// Names of every scenario that has a stat file, sorted and without duplicates
    pub fn list_scenarios(&self) -> Result<Vec<String>, FolderError> {
        let names: BTreeSet<String> = self
            .files()?
            .iter()
            .filter_map(|path| path.file_name()?.to_str())
            .map(|name| scenario_from_file_name(name).to_string())
            .collect();

        Ok(names.into_iter().collect())
    }

    /// Parse every stat file, sorted by timestamp
    pub fn load(&self, on_error: OnError) -> Result<Vec<SessionRecord>, FolderError> {
        self.load_filtered(on_error, |_| true)
    }

    /// Parse every stat file of one scenario, sorted by timestamp
    pub fn load_scenario(
        &self,
        scenario_name: &str,
        on_error: OnError,
    ) -> Result<Vec<SessionRecord>, FolderError> {
        self.load_filtered(on_error, |record| record.scenario_name == scenario_name)
    }

    fn load_filtered(
        &self,
        on_error: OnError,
        keep: impl Fn(&SessionRecord) -> bool,
    ) -> Result<Vec<SessionRecord>, FolderError> {
        let mut records = Vec::new();

        for path in self.files()? {
            match SessionRecord::from_file(&path) {
                Ok(record) if keep(&record) => records.push(record),
                Ok(_) => {}
                Err(error) if on_error == OnError::Skip => {
                    log::warn!("Skipping '{}': {error}", path.display());
                }
                Err(error) => return Err(FolderError::Parse { path, error }),
            }
        }

        records.sort_by_key(|record| record.timestamp);
        log::debug!(
            "Loaded {} session(s) from '{}'",
            records.len(),
            self.directory.display()
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, scenario: &str, stamp: &str, score: &str) {
        let contents = format!(
            "Kill #,Timestamp\n1,00:00:01\n\nWeapon,Shots\nLG,1\n\nScore:,{score}\nScenario:,{scenario}\n"
        );
        let name = format!("{scenario} - Challenge - {stamp} Stats.csv");
        std::fs::write(dir.join(name), contents).unwrap();
    }

    fn folder() -> (tempfile::TempDir, StatsFolder) {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Tile Frenzy", "2022.10.20-09.00.00", "700");
        write(dir.path(), "Tile Frenzy", "2022.10.19-09.00.00", "650");
        write(dir.path(), "Close Long Strafes", "2022.10.19-10.00.00", "3000");
        let folder = StatsFolder::new(dir.path()).unwrap();
        (dir, folder)
    }

    #[test]
    fn test_list_scenarios() {
        let (_dir, folder) = folder();
        assert_eq!(
            folder.list_scenarios().unwrap(),
            vec!["Close Long Strafes", "Tile Frenzy"]
        );
    }

    #[test]
    fn test_load_sorts_by_timestamp() {
        let (_dir, folder) = folder();

        let records = folder.load(OnError::Abort).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.windows(2).all(|pair| pair[0].timestamp <= pair[1].timestamp));

        let tile_frenzy = folder.load_scenario("Tile Frenzy", OnError::Abort).unwrap();
        let scores: Vec<String> = tile_frenzy
            .iter()
            .map(|record| record.get("score").unwrap().to_string())
            .collect();
        assert_eq!(scores, vec!["650", "700"]);
    }

    #[test]
    fn test_broken_files() {
        let (dir, folder) = folder();
        std::fs::write(dir.path().join("notes.txt"), "not a stat file").unwrap();

        let records = folder.load(OnError::Skip).unwrap();
        assert_eq!(records.len(), 3);

        assert!(matches!(
            folder.load(OnError::Abort),
            Err(FolderError::Parse {
                error: ParseError::Timestamp { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            StatsFolder::new(dir.path().join("stats")),
            Err(FolderError::NotFound(_))
        ));
    }
}

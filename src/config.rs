use crate::options::Options;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Config {
    /// Gameplay options for new rounds
    #[serde(default)]
    pub(crate) options: Options,

    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("longdog").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist
    /// and `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Return the filepath at which high scores should be stored: the file
    /// given in the configuration or, if that is not set, the default scores
    /// file path.  Return `None` if no path is present in the configuration
    /// and the default path could not be computed.
    pub(crate) fn scores_file(&self) -> Option<Cow<'_, Path>> {
        self.files
            .scores_file
            .as_deref()
            .map(Cow::from)
            .or_else(|| crate::highscores::default_path().map(Cow::from))
    }

    /// Whether high scores should be read from & written to disk at all
    pub(crate) fn save_scores(&self) -> bool {
        self.files.save_scores
    }

    /// Turn off high-score persistence for this run
    pub(crate) fn disable_score_saving(&mut self) {
        self.files.save_scores = false;
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Path at which high scores should be stored
    scores_file: Option<PathBuf>,

    /// Whether to load & save high scores in a file
    save_scores: bool,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            scores_file: None,
            save_scores: true,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RoundSeconds;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_missing_file_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("config.toml"), true).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_missing_file_disallowed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::load(&dir.path().join("config.toml"), false),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            concat!(
                "[options]\n",
                "duration = 90\n",
                "obstacles = false\n",
                "\n",
                "[files]\n",
                "scores-file = \"/tmp/longdog-scores.json\"\n",
                "save-scores = true\n",
            )
        )
        .unwrap();
        let cfg = Config::load(file.path(), false).unwrap();
        assert_eq!(cfg.options.duration, RoundSeconds::new(90).unwrap());
        assert!(!cfg.options.obstacles);
        assert_eq!(
            cfg.scores_file().as_deref(),
            Some(Path::new("/tmp/longdog-scores.json"))
        );
        assert!(cfg.save_scores());
    }

    #[test]
    fn load_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "options = 7").unwrap();
        assert!(matches!(
            Config::load(file.path(), true),
            Err(ConfigError::Parse(_))
        ));
    }
}

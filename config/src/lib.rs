//! Configuration loading and persistence for the Filmot client.
//!
//! The file lives at `~/.config/filmot/config.json` unless `FILMOT_CONFIG`
//! points elsewhere:
//!
//! ```json
//! {
//!     "rapidapi_key": "...",
//!     "rapidapi_host": "filmot-tube-metadata-archive.p.rapidapi.com",
//!     "search": {
//!         "max_concurrency": 100,
//!         "rate_limit": [{ "max_calls": 100, "period_sec": 5 }],
//!         "max_attempts": 3
//!     }
//! }
//! ```
//!
//! Keys this crate does not know about are kept and written back on save.

mod atomic_write;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use filmot_runner::{RunnerConfig, RunnerError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use atomic_write::write_owner_only;

/// RapidAPI host serving the Filmot archive.
pub const DEFAULT_RAPIDAPI_HOST: &str = "filmot-tube-metadata-archive.p.rapidapi.com";
/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "FILMOT_CONFIG";
/// Overrides the stored RapidAPI key.
pub const API_KEY_ENV: &str = "FILMOT_RAPIDAPI_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot locate a home directory for the config file; set FILMOT_CONFIG")]
    NoConfigPath,
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid search settings in {}: {source}", path.display())]
    Search { path: PathBuf, source: RunnerError },
    #[error("failed to create config directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to write config at {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilmotConfig {
    pub rapidapi_key: String,
    pub rapidapi_host: String,
    /// Fan-out settings for `search`; built-in defaults apply when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<RunnerConfig>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl FilmotConfig {
    /// Load from the default location.
    ///
    /// A missing file yields the defaults. A file that cannot be read or
    /// parsed is reported and also yields the defaults.
    #[must_use]
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            tracing::warn!("No home directory; using default Filmot config");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("{err}; using default Filmot config");
                Self::default()
            }
        }
    }

    /// Load from `path`. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file; using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(search) = &config.search {
            search.validate().map_err(|source| ConfigError::Search {
                path: path.to_path_buf(),
                source,
            })?;
        }
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Config file location: `$FILMOT_CONFIG`, else `~/.config/filmot/config.json`.
    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path(std::env::var_os(CONFIG_PATH_ENV))
    }

    /// Write to the default location and return where it went.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::path().ok_or(ConfigError::NoConfigPath)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write to `path`, creating its directory. The file is replaced atomically
    /// and readable only by its owner.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let bytes = self.to_pretty_json()?;
        write_owner_only(path, &bytes).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Store a new key together with the canonical host.
    pub fn set_rapidapi_key(&mut self, key: impl Into<String>) {
        self.rapidapi_key = key.into().trim().to_string();
        self.rapidapi_host = DEFAULT_RAPIDAPI_HOST.to_string();
    }

    /// Configured host, or the canonical one when unset.
    #[must_use]
    pub fn host(&self) -> &str {
        let host = self.rapidapi_host.trim();
        if host.is_empty() {
            DEFAULT_RAPIDAPI_HOST
        } else {
            host
        }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("https://{}", self.host())
    }

    /// Effective key: `$FILMOT_RAPIDAPI_KEY`, else the stored key.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        self.api_key_with(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_with(&self, env_key: Option<String>) -> Option<String> {
        [env_key.as_deref(), Some(self.rapidapi_key.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|key| !key.is_empty())
            .map(str::to_string)
    }

    /// Runner settings for `search`, falling back to `default`.
    #[must_use]
    pub fn search_settings(&self, default: RunnerConfig) -> RunnerConfig {
        self.search.clone().unwrap_or(default)
    }

    fn to_pretty_json(&self) -> Result<Vec<u8>, ConfigError> {
        let mut bytes = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
        self.serialize(&mut serializer)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

fn config_path(env_override: Option<OsString>) -> Option<PathBuf> {
    if let Some(raw) = env_override
        && !raw.is_empty()
    {
        return Some(PathBuf::from(raw));
    }
    dirs::home_dir().map(|home| home.join(".config").join("filmot").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let config = FilmotConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, FilmotConfig::default());
        assert_eq!(config.host(), DEFAULT_RAPIDAPI_HOST);
        assert_eq!(
            config.base_url(),
            "https://filmot-tube-metadata-archive.p.rapidapi.com"
        );
    }

    #[test]
    fn save_then_load_preserves_unknown_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{ "rapidapi_key": "old", "rapidapi_host": "", "theme": "dark" }"#,
        )
        .unwrap();

        let mut config = FilmotConfig::load_from(&path).unwrap();
        config.set_rapidapi_key("  new-key ");
        config.save_to(&path).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["rapidapi_key"], "new-key");
        assert_eq!(raw["rapidapi_host"], DEFAULT_RAPIDAPI_HOST);
        assert_eq!(raw["theme"], "dark");
        assert!(raw.get("search").is_none());
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("config.json");
        let mut config = FilmotConfig::default();
        config.set_rapidapi_key("k");
        config.save_to(&path).unwrap();
        assert_eq!(FilmotConfig::load_from(&path).unwrap().rapidapi_key, "k");
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            FilmotConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn search_section_is_validated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "search": { "rate_limit": [{ "max_calls": 10, "period_sec": 0 }] } }"#,
        )
        .unwrap();
        assert!(matches!(
            FilmotConfig::load_from(&path),
            Err(ConfigError::Search { .. })
        ));

        std::fs::write(
            &path,
            r#"{ "search": { "rate_limit": [{ "max_calls": 10, "period_sec": 1e20 }] } }"#,
        )
        .unwrap();
        assert!(matches!(
            FilmotConfig::load_from(&path),
            Err(ConfigError::Search { .. })
        ));

        std::fs::write(
            &path,
            r#"{ "search": { "max_concurrency": 4, "rate_limit": [{ "max_calls": 10, "period_sec": 1 }] } }"#,
        )
        .unwrap();
        let config = FilmotConfig::load_from(&path).unwrap();
        let search = config.search_settings(RunnerConfig::default());
        assert_eq!(search.max_concurrency, 4);
        assert_eq!(search.rate_windows.len(), 1);
    }

    #[test]
    fn env_key_wins_over_stored_key() {
        let mut config = FilmotConfig::default();
        assert_eq!(config.api_key_with(None), None);

        config.set_rapidapi_key("stored");
        assert_eq!(config.api_key_with(None).as_deref(), Some("stored"));
        assert_eq!(
            config.api_key_with(Some("from-env".into())).as_deref(),
            Some("from-env")
        );
        assert_eq!(
            config.api_key_with(Some("   ".into())).as_deref(),
            Some("stored")
        );
    }

    #[test]
    fn config_path_prefers_env_override() {
        let custom = config_path(Some(OsString::from("/tmp/filmot.json")));
        assert_eq!(custom, Some(PathBuf::from("/tmp/filmot.json")));

        if let Some(default) = config_path(Some(OsString::new())) {
            assert!(default.ends_with(".config/filmot/config.json"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        FilmotConfig::default().save_to(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

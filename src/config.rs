// Configuration loading and parsing (league.toml).

use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Top-level structure of league.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub league: LeagueConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    /// The fixed league identifier this deployment serves.
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Earliest navigable draft year (the league's first draft). The
    /// draft-year navigation runs from this year through the current
    /// calendar year.
    pub origin_draft_year: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// League data service base URL (no trailing slash). Points at the
    /// aggregation tier that enriches the raw Sleeper payloads, not at
    /// Sleeper itself.
    pub base_url: String,
}

/// The evaluation service is optional: with no URL configured, grades and
/// reviews are simply absent from the rendered pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Review cache database path. Empty/absent means the per-user data
    /// directory resolved via `directories`.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            path: None,
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_capacity() -> usize {
    512
}

impl Config {
    /// Resolve the review cache database path: the configured path when
    /// present, otherwise `<data dir>/reviews.db` for this application.
    pub fn cache_db_path(&self) -> String {
        if let Some(path) = &self.cache.path {
            if !path.is_empty() {
                return path.clone();
            }
        }
        match directories::ProjectDirs::from("", "", "dynastydesk") {
            Some(dirs) => {
                let dir = dirs.data_dir();
                let _ = std::fs::create_dir_all(dir);
                dir.join("reviews.db").to_string_lossy().into_owned()
            }
            None => "reviews.db".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");
    let league_text = read_file(&league_path)?;
    let config: Config = toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
        path: league_path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Ensure `config/league.toml` exists by copying it from `defaults/` when
/// missing. Returns the list of files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let default_path = base_dir.join("defaults").join("league.toml");
    let config_dir = base_dir.join("config");
    let target = config_dir.join("league.toml");

    if target.exists() {
        return Ok(vec![]);
    }

    if !default_path.exists() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither config/league.toml nor defaults/league.toml found in {}; \
                 run from the project root or ensure defaults/ is present",
                base_dir.display()
            ),
        });
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    std::fs::copy(&default_path, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {}: {e}", default_path.display()),
    })?;

    Ok(vec![target])
}

/// Convenience wrapper: loads config relative to the current working
/// directory, copying defaults first when needed.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.id.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.id".into(),
            message: "must not be empty".into(),
        });
    }

    let current_year = chrono::Utc::now().year();
    let origin = config.league.origin_draft_year;
    if !(2000..=current_year).contains(&origin) {
        return Err(ConfigError::ValidationError {
            field: "league.origin_draft_year".into(),
            message: format!("must be between 2000 and {current_year}, got {origin}"),
        });
    }

    if config.api.base_url.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: "must not be empty".into(),
        });
    }

    if config.cache.capacity == 0 {
        return Err(ConfigError::ValidationError {
            field: "cache.capacity".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

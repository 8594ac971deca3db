//! Environment-driven engine configuration
//!
//! Values are read from the process environment after loading an optional
//! `.env` file.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DB_PATH_VAR: &str = "FLEXLOG_DB_PATH";
const MAX_CONNECTIONS_VAR: &str = "FLEXLOG_DB_MAX_CONNECTIONS";
const LOG_FILTER_VAR: &str = "FLEXLOG_LOG";

const DEFAULT_DB_FILE: &str = "flexlog.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOG_FILTER: &str = "flexlog=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
  /// SQLite database file
  pub db_path: PathBuf,
  pub max_connections: u32,
  /// `tracing_subscriber::EnvFilter` directive
  pub log_filter: String,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      db_path: PathBuf::from(DEFAULT_DB_FILE),
      max_connections: DEFAULT_MAX_CONNECTIONS,
      log_filter: DEFAULT_LOG_FILTER.to_string(),
    }
  }
}

impl EngineConfig {
  /// Load configuration from `.env` (if present) and the environment
  pub fn from_env() -> Result<Self> {
    dotenvy::dotenv().ok();
    Self::from_vars()
  }

  /// Load variables from a specific dotenv file, then read the environment.
  /// Variables already set in the process keep their values.
  pub fn from_env_file(path: &Path) -> Result<Self> {
    dotenvy::from_path(path)
      .map_err(|e| EngineError::Config(format!("Failed to load {}: {}", path.display(), e)))?;
    Self::from_vars()
  }

  /// Read configuration from the current environment only
  pub fn from_vars() -> Result<Self> {
    let defaults = Self::default();

    let db_path = env::var(DB_PATH_VAR)
      .ok()
      .filter(|p| !p.trim().is_empty())
      .map(PathBuf::from)
      .unwrap_or(defaults.db_path);

    let max_connections = match env::var(MAX_CONNECTIONS_VAR) {
      Ok(raw) => raw
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| {
          EngineError::Config(format!(
            "{} must be a positive integer, got '{}'",
            MAX_CONNECTIONS_VAR, raw
          ))
        })?,
      Err(_) => defaults.max_connections,
    };

    let log_filter = env::var(LOG_FILTER_VAR)
      .ok()
      .filter(|f| !f.trim().is_empty())
      .unwrap_or(defaults.log_filter);

    Ok(Self {
      db_path,
      max_connections,
      log_filter,
    })
  }

  /// SQLite connection URL, creating the file if it does not exist
  pub fn database_url(&self) -> String {
    format!("sqlite://{}?mode=rwc", self.db_path.display())
  }
}

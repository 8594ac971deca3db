use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum EngineError {
  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Database error: {0}")]
  Store(String),

  #[error("Migration failed: {0}")]
  Migration(String),

  #[error("Invalid configuration: {0}")]
  Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

// Convert sqlx::Error to EngineError
impl From<sqlx::Error> for EngineError {
  fn from(e: sqlx::Error) -> Self {
    EngineError::Store(e.to_string())
  }
}

impl From<sqlx::migrate::MigrateError> for EngineError {
  fn from(e: sqlx::migrate::MigrateError) -> Self {
    EngineError::Migration(e.to_string())
  }
}

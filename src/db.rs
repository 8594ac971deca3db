use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;
use tracing::info;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

pub type DbPool = SqlitePool;

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(config: &EngineConfig) -> Result<DbPool> {
  // Create the parent directory if it doesn't exist
  if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)
      .map_err(|e| EngineError::Store(format!("Failed to create data dir: {}", e)))?;
  }

  info!(path = %config.db_path.display(), "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(config.max_connections)
    .connect(&config.database_url())
    .await?;

  run_migrations(&pool).await?;

  info!("Database initialized successfully");

  Ok(pool)
}

/// Apply all pending schema migrations
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
  sqlx::migrate!("./migrations").run(pool).await?;
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Column Encoding
/// ---------------------------------------------------------------------------

/// Fixed-width RFC 3339 text so string comparison in SQL matches time order
pub fn to_db_timestamp(at: &DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn parse_db_timestamp(raw: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(raw)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| EngineError::Store(format!("Invalid timestamp '{}': {}", raw, e)))
}

pub fn parse_optional_timestamp(raw: Option<String>) -> Result<Option<DateTime<Utc>>> {
  raw.as_deref().map(parse_db_timestamp).transpose()
}

pub fn parse_db_id(raw: &str) -> Result<Uuid> {
  Uuid::parse_str(raw).map_err(|e| EngineError::Store(format!("Invalid id '{}': {}", raw, e)))
}

pub fn parse_optional_id(raw: Option<String>) -> Result<Option<Uuid>> {
  raw.as_deref().map(parse_db_id).transpose()
}

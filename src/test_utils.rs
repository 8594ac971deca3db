//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Helper assertions

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::models::{Entry, Exercise, Plan, Session, Template, TemplateRecord};
use crate::store::{RecordStore, SqliteStore};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite store for testing
/// Runs all migrations and returns a ready-to-use store
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqliteStore {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  crate::db::run_migrations(&pool)
    .await
    .expect("Failed to run migrations");

  SqliteStore::new(pool)
}

/// Close a test store
pub async fn teardown_test_db(store: SqliteStore) {
  store.close().await;
}

/// Insert a template with two exercises and return what was written
pub async fn insert_test_template(store: &SqliteStore, name: &str) -> TemplateRecord {
  let record = mock_template(name, Utc::now());
  store
    .insert_template_catalog(std::slice::from_ref(&record))
    .await
    .expect("Failed to insert test template");
  record
}

/// Insert sessions dated `days_ago` days back, one per element
pub async fn seed_test_sessions(store: &SqliteStore, days_ago: &[i64]) -> Vec<Session> {
  let mut sessions = Vec::new();
  for days in days_ago {
    let mut session = mock_session(datetime_days_ago(*days));
    session.entries = vec![mock_entry(session.id, 50.0, 10, 3)];
    store
      .insert_session(&session)
      .await
      .expect("Failed to insert test session");
    sessions.push(session);
  }
  sessions
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn mock_template(name: &str, created_at: DateTime<Utc>) -> TemplateRecord {
  let template_id = Uuid::new_v4();
  let exercises = ["Squat", "Bench Press"]
    .iter()
    .enumerate()
    .map(|(index, exercise)| Exercise {
      id: Uuid::new_v4(),
      template_id,
      name: exercise.to_string(),
      target_muscle: None,
      instructions: None,
      rest_interval_seconds: Some(60),
      order_index: index as i64,
    })
    .collect();

  TemplateRecord {
    template: Template {
      id: template_id,
      name: name.to_string(),
      focus_area: None,
      notes: None,
      color_hex: None,
      created_at,
      updated_at: None,
      is_favorite: false,
    },
    exercises,
  }
}

/// Empty session with no link, no entries and no logged totals
pub fn mock_session(date: DateTime<Utc>) -> Session {
  Session {
    id: Uuid::new_v4(),
    date,
    duration_seconds: 0.0,
    template_id: None,
    template_name: None,
    notes: None,
    mood: None,
    entries: Vec::new(),
    logged_volume: None,
    logged_duration_seconds: None,
    logged_exercise_count: None,
  }
}

pub fn mock_entry(session_id: Uuid, weight: f64, reps: i64, sets: i64) -> Entry {
  Entry {
    id: Uuid::new_v4(),
    session_id,
    exercise_id: None,
    exercise_name: None,
    sets,
    reps,
    weight,
    time_seconds: 0.0,
  }
}

pub fn mock_plan(
  start_date: Option<DateTime<Utc>>,
  end_date: Option<DateTime<Utc>>,
  schedule: Option<&str>,
) -> Plan {
  Plan {
    id: Uuid::new_v4(),
    name: "Test Plan".to_string(),
    start_date,
    end_date,
    schedule: schedule.map(str::to_string),
    notes: None,
    is_active: true,
    template_ids: Vec::new(),
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Midnight UTC on the given calendar day
pub fn utc_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
    .single()
    .expect("valid calendar date")
}

/// Create a DateTime N days ago from now
pub fn datetime_days_ago(days: i64) -> DateTime<Utc> {
  Utc::now() - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let store = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('templates', 'exercises', 'plans', 'plan_templates', 'sessions', 'entries', 'app_flags')",
    )
    .fetch_all(store.pool())
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 7, "Expected 7 tables, got {}", tables.len());

    teardown_test_db(store).await;
  }

  #[tokio::test]
  async fn test_seed_sessions_returns_correct_count() {
    let store = setup_test_db().await;

    let sessions = seed_test_sessions(&store, &[0, 1, 2]).await;
    assert_eq!(sessions.len(), 3);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entries")
      .fetch_one(store.pool())
      .await
      .expect("Failed to count entries");
    assert_eq!(count, 3);

    teardown_test_db(store).await;
  }
}

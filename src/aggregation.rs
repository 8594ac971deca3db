//! Session aggregation
//!
//! Turns a loaded session and its entries into a summary. Logged totals on
//! the session take precedence over anything derived from entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Entry, Session};
use crate::store::{RecordStore, SessionQuery};

/// ---------------------------------------------------------------------------
/// Summaries
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySummary {
  pub id: Uuid,
  /// Empty when the entry has no exercise reference
  pub exercise_name: String,
  pub sets: i64,
  pub reps: i64,
  pub weight: f64,
  pub duration_seconds: f64,
  pub total_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
  pub id: Uuid,
  pub date: DateTime<Utc>,
  /// Raw session duration as recorded
  pub duration_seconds: f64,
  pub template_id: Option<Uuid>,
  pub template_name: Option<String>,
  pub notes: Option<String>,
  pub entries: Vec<EntrySummary>,
  pub logged_volume: Option<f64>,
  pub logged_duration_seconds: Option<f64>,
  pub logged_exercise_count: Option<i64>,

  // Effective values
  pub total_volume: f64,
  pub total_duration_seconds: f64,
  pub total_exercises: i64,
}

impl SessionSummary {
  /// Any evidence of logged work: a positive effective total or an entry
  pub fn has_logged_work(&self) -> bool {
    self.total_duration_seconds > 0.0
      || self.total_volume > 0.0
      || self.total_exercises > 0
      || !self.entries.is_empty()
  }
}

/// weight × reps × sets
pub fn entry_volume(weight: f64, reps: i64, sets: i64) -> f64 {
  weight * reps as f64 * sets as f64
}

pub fn summarize_entry(entry: &Entry) -> EntrySummary {
  EntrySummary {
    id: entry.id,
    exercise_name: entry.exercise_name.clone().unwrap_or_default(),
    sets: entry.sets,
    reps: entry.reps,
    weight: entry.weight,
    duration_seconds: entry.time_seconds,
    total_volume: entry_volume(entry.weight, entry.reps, entry.sets),
  }
}

pub fn summarize_session(session: &Session) -> SessionSummary {
  let entries: Vec<EntrySummary> = session.entries.iter().map(summarize_entry).collect();

  let total_volume = session
    .logged_volume
    .unwrap_or_else(|| entries.iter().map(|e| e.total_volume).sum());

  // The stated duration can undercount the time logged on entries
  let total_duration_seconds = session.logged_duration_seconds.unwrap_or_else(|| {
    let entry_time: f64 = entries.iter().map(|e| e.duration_seconds).sum();
    session.duration_seconds.max(entry_time)
  });

  let total_exercises = session
    .logged_exercise_count
    .unwrap_or(entries.len() as i64);

  SessionSummary {
    id: session.id,
    date: session.date,
    duration_seconds: session.duration_seconds,
    template_id: session.template_id,
    template_name: session.template_name.clone(),
    notes: session.notes.clone(),
    entries,
    logged_volume: session.logged_volume,
    logged_duration_seconds: session.logged_duration_seconds,
    logged_exercise_count: session.logged_exercise_count,
    total_volume,
    total_duration_seconds,
    total_exercises,
  }
}

/// ---------------------------------------------------------------------------
/// Database Operations
/// ---------------------------------------------------------------------------

/// Summaries of every session, newest first, optionally from `since` onwards
pub async fn fetch_sessions<S: RecordStore>(
  store: &S,
  since: Option<DateTime<Utc>>,
) -> Result<Vec<SessionSummary>> {
  let query = SessionQuery {
    since,
    ..SessionQuery::default()
  };
  let sessions = store.fetch_sessions(&query).await?;
  Ok(sessions.iter().map(summarize_session).collect())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use crate::test_utils::{
    datetime_days_ago, mock_entry, mock_session, seed_test_sessions, setup_test_db,
    teardown_test_db, utc_date,
  };

  fn session_with_entries(volumes: &[(f64, i64, i64)]) -> Session {
    let mut session = mock_session(utc_date(2025, 1, 1));
    let session_id = session.id;
    session.entries = volumes
      .iter()
      .map(|(weight, reps, sets)| mock_entry(session_id, *weight, *reps, *sets))
      .collect();
    session
  }

  #[test]
  fn test_entry_volume() {
    assert_approx_eq!(entry_volume(50.0, 10, 3), 1500.0, 1e-9);
    assert_approx_eq!(entry_volume(0.0, 10, 3), 0.0, 1e-9);
    assert_approx_eq!(entry_volume(42.5, 0, 3), 0.0, 1e-9);
  }

  #[test]
  fn test_logged_volume_takes_precedence() {
    // 3 entries summing to 500
    let mut session = session_with_entries(&[(25.0, 10, 1), (50.0, 2, 2), (10.0, 5, 1)]);

    let derived = summarize_session(&session);
    assert_approx_eq!(derived.total_volume, 500.0, 1e-9);

    session.logged_volume = Some(900.0);
    let logged = summarize_session(&session);
    assert_approx_eq!(logged.total_volume, 900.0, 1e-9);
  }

  #[test]
  fn test_duration_uses_max_of_raw_and_entry_time() {
    let mut session = session_with_entries(&[(20.0, 10, 3), (20.0, 10, 3)]);
    session.entries[0].time_seconds = 600.0;
    session.entries[1].time_seconds = 900.0;

    session.duration_seconds = 1200.0;
    assert_approx_eq!(summarize_session(&session).total_duration_seconds, 1500.0, 1e-9);

    session.duration_seconds = 3600.0;
    assert_approx_eq!(summarize_session(&session).total_duration_seconds, 3600.0, 1e-9);

    session.logged_duration_seconds = Some(60.0);
    assert_approx_eq!(summarize_session(&session).total_duration_seconds, 60.0, 1e-9);
  }

  #[test]
  fn test_exercise_count_falls_back_to_entries() {
    let mut session = session_with_entries(&[(1.0, 1, 1), (1.0, 1, 1)]);
    assert_eq!(summarize_session(&session).total_exercises, 2);

    session.logged_exercise_count = Some(0);
    assert_eq!(summarize_session(&session).total_exercises, 0);
  }

  #[test]
  fn test_empty_session_summarizes_to_zero() {
    let summary = summarize_session(&mock_session(utc_date(2025, 1, 1)));
    assert_eq!(summary.total_volume, 0.0);
    assert_eq!(summary.total_duration_seconds, 0.0);
    assert_eq!(summary.total_exercises, 0);
    assert!(!summary.has_logged_work());
  }

  #[test]
  fn test_zero_valued_entry_still_counts_as_work() {
    let session = session_with_entries(&[(0.0, 0, 0)]);
    let summary = summarize_session(&session);
    assert_eq!(summary.total_volume, 0.0);
    assert!(summary.has_logged_work());
  }

  #[test]
  fn test_missing_exercise_name_is_empty() {
    let session = session_with_entries(&[(10.0, 5, 1)]);
    assert_eq!(summarize_session(&session).entries[0].exercise_name, "");
  }

  #[tokio::test]
  async fn test_fetch_sessions_since() {
    let store = setup_test_db().await;
    seed_test_sessions(&store, &[0, 3, 10]).await;

    let all = fetch_sessions(&store, None).await.expect("Should fetch");
    assert_eq!(all.len(), 3);
    assert!(all[0].date > all[1].date && all[1].date > all[2].date);
    assert_approx_eq!(all[0].total_volume, 1500.0, 1e-9);

    let recent = fetch_sessions(&store, Some(datetime_days_ago(5)))
      .await
      .expect("Should fetch");
    assert_eq!(recent.len(), 2);

    teardown_test_db(store).await;
  }
}

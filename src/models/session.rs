use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
  pub id: Uuid,
  pub date: DateTime<Utc>,
  pub duration_seconds: f64,
  /// Weak link; the template may be missing or deleted
  pub template_id: Option<Uuid>,
  /// Resolved from `template_id` when loaded
  pub template_name: Option<String>,
  pub notes: Option<String>,
  pub mood: Option<String>,
  pub entries: Vec<Entry>,
  // Manually logged totals, preferred over entry-derived values
  pub logged_volume: Option<f64>,
  pub logged_duration_seconds: Option<f64>,
  pub logged_exercise_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
  pub id: Uuid,
  pub session_id: Uuid,
  pub exercise_id: Option<Uuid>,
  /// Resolved from `exercise_id` when loaded
  pub exercise_name: Option<String>,
  pub sets: i64,
  pub reps: i64,
  pub weight: f64,
  pub time_seconds: f64,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
  pub id: Uuid,
  pub name: String,
  pub start_date: Option<DateTime<Utc>>,
  pub end_date: Option<DateTime<Utc>>,
  /// Free text such as "4 workouts/week"
  pub schedule: Option<String>,
  pub notes: Option<String>,
  pub is_active: bool,
  /// Referenced templates; empty means every session in the window counts
  pub template_ids: Vec<Uuid>,
}

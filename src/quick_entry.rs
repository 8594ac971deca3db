//! Quick logging of sessions and plans

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::aggregation::{summarize_session, SessionSummary};
use crate::calendar::medium_date;
use crate::error::Result;
use crate::models::{Plan, Session};
use crate::store::RecordStore;

const QUICK_SESSION_NOTES: &str = "Quick log";
const QUICK_PLAN_WEEKS: i64 = 8;

/// Log a session from totals alone.
///
/// The session is linked only when `template_id` resolves; an unknown id is
/// logged and the session is saved unlinked. Store failures propagate.
pub async fn create_quick_session<S: RecordStore>(
  store: &S,
  template_id: Option<Uuid>,
  volume: Option<f64>,
  duration_seconds: Option<f64>,
  exercise_count: Option<i64>,
) -> Result<SessionSummary> {
  let template = match template_id {
    Some(id) => {
      let found = store.fetch_template(id).await?;
      if found.is_none() {
        warn!(template_id = %id, "Quick session template not found, saving unlinked");
      }
      found
    }
    None => None,
  };

  let session = Session {
    id: Uuid::new_v4(),
    date: Utc::now(),
    duration_seconds: 0.0,
    template_id: template.as_ref().map(|t| t.id),
    template_name: template.map(|t| t.name),
    notes: Some(QUICK_SESSION_NOTES.to_string()),
    mood: None,
    entries: Vec::new(),
    logged_volume: volume,
    logged_duration_seconds: duration_seconds,
    logged_exercise_count: exercise_count,
  };

  store.insert_session(&session).await?;
  info!(session_id = %session.id, "Logged quick session");

  Ok(summarize_session(&session))
}

/// Default name for a quick plan, e.g. "Plan Jan 5, 2025"
pub fn quick_plan_name(now: DateTime<Utc>) -> String {
  format!("Plan {}", medium_date(now))
}

/// Create an eight-week plan from weekly targets and return its id
pub async fn create_quick_plan<S: RecordStore>(
  store: &S,
  name: &str,
  workouts_per_week: u32,
  exercises_per_workout: u32,
  target_duration_minutes: u32,
  target_volume: u32,
) -> Result<Uuid> {
  let start = Utc::now();
  let notes = [
    format!("Exercises/workout: {}", exercises_per_workout),
    format!("Target duration: {} min", target_duration_minutes),
    format!("Target volume: {} lbs", target_volume),
  ]
  .join("\n");

  let plan = Plan {
    id: Uuid::new_v4(),
    name: name.to_string(),
    start_date: Some(start),
    end_date: Some(start + Duration::weeks(QUICK_PLAN_WEEKS)),
    schedule: Some(format!("{} workouts/week", workouts_per_week)),
    notes: Some(notes),
    is_active: true,
    template_ids: Vec::new(),
  };

  store.insert_plan(&plan).await?;
  info!(plan_id = %plan.id, name = %plan.name, "Created quick plan");

  Ok(plan.id)
}

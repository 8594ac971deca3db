//! Weekly statistics, streaks and the dashboard/progress read models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregation::SessionSummary;
use crate::calendar::{medium_date_time, same_week, start_of_day};
use crate::templates::TemplateDetail;

const RECOVERY_FOCUS: &str = "Recovery";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStats {
  pub session_count: u32,
  pub total_volume: f64,
}

/// Sessions in the reference's ISO week and their summed effective volume
pub fn compute_weekly_stats(sessions: &[SessionSummary], reference: DateTime<Utc>) -> WeeklyStats {
  sessions
    .iter()
    .filter(|s| same_week(s.date, reference))
    .fold(WeeklyStats::default(), |mut stats, session| {
      stats.session_count += 1;
      stats.total_volume += session.total_volume;
      stats
    })
}

/// Consecutive days with a session, counting back from `today`.
///
/// Several sessions on one day count once. Sessions after `today` are ignored.
pub fn compute_streak(dates: &[DateTime<Utc>], today: DateTime<Utc>) -> u32 {
  let mut days: Vec<DateTime<Utc>> = dates.iter().map(|d| start_of_day(*d)).collect();
  days.sort_unstable_by(|a, b| b.cmp(a));

  let mut cursor = start_of_day(today);
  let mut streak = 0;
  for day in days {
    if day == cursor {
      streak += 1;
      cursor -= Duration::days(1);
    } else if day < cursor {
      break;
    }
  }
  streak
}

/// ---------------------------------------------------------------------------
/// Read Models
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
  pub today_focus: String,
  pub week_sessions: u32,
  pub week_volume: f64,
  pub current_streak: u32,
}

pub fn dashboard_stats(
  sessions: &[SessionSummary],
  templates: &[TemplateDetail],
  reference: DateTime<Utc>,
) -> DashboardStats {
  let week = compute_weekly_stats(sessions, reference);
  let dates: Vec<DateTime<Utc>> = sessions.iter().map(|s| s.date).collect();

  DashboardStats {
    today_focus: templates
      .first()
      .map(|t| t.focus_label().to_string())
      .unwrap_or_else(|| RECOVERY_FOCUS.to_string()),
    week_sessions: week.session_count,
    week_volume: week.total_volume,
    current_streak: compute_streak(&dates, reference),
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMetric {
  pub title: String,
  pub value: String,
  pub trend: String,
}

impl ProgressMetric {
  fn new(title: &str, value: String, trend: String) -> Self {
    Self {
      title: title.to_string(),
      value,
      trend,
    }
  }
}

/// "+N" for a positive value, else empty
fn trend_label(value: f64) -> String {
  if value > 0.0 {
    format!("+{:.0}", value)
  } else {
    String::new()
  }
}

/// Headline metrics for the progress view; empty without sessions
pub fn progress_metrics(sessions: &[SessionSummary], reference: DateTime<Utc>) -> Vec<ProgressMetric> {
  let Some(last) = sessions.iter().max_by_key(|s| s.date) else {
    return Vec::new();
  };

  let week = compute_weekly_stats(sessions, reference);
  let dates: Vec<DateTime<Utc>> = sessions.iter().map(|s| s.date).collect();
  let streak = compute_streak(&dates, reference);

  vec![
    ProgressMetric::new(
      "Weekly Volume",
      format!("{:.0} lbs", week.total_volume),
      trend_label(week.total_volume),
    ),
    ProgressMetric::new(
      "Sessions Completed",
      sessions.len().to_string(),
      trend_label(f64::from(week.session_count)),
    ),
    ProgressMetric::new(
      "Current Streak",
      format!("{} days", streak),
      if streak > 0 { "+1" } else { "0" }.to_string(),
    ),
    ProgressMetric::new("Last Session", medium_date_time(last.date), String::new()),
  ]
}

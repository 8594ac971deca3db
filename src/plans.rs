//! Plan Window Engine
//!
//! Measures a plan's progress against its weekly target:
//! - workouts per week come from the schedule text, else the template count
//! - the window runs from the plan start to the earlier of its end and today
//! - sessions in the window count when linked to one of the plan's templates
//!   or to none at all
//!
//! Days are UTC days.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::aggregation::{summarize_session, SessionSummary};
use crate::calendar::{days_between, medium_date, start_of_day};
use crate::error::Result;
use crate::models::{Plan, Session};
use crate::store::{RecordStore, SessionQuery, TemplateFilter};
use crate::templates::{fetch_template_details, TemplateDetail};

static DIGIT_RUN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[0-9]+").ok());

// ---------------------------------------------------------------------------
/// Schedule Parsing
// ---------------------------------------------------------------------------

/// First run of ASCII digits in the schedule, at least 1.
///
/// Falls back to `template_count` (also at least 1) when there is no schedule,
/// no digits, or a digit run too large for the integer type.
pub fn parse_workouts_per_week(schedule: Option<&str>, template_count: usize) -> u32 {
    let fallback = u32::try_from(template_count).unwrap_or(u32::MAX).max(1);

    let parsed = schedule.and_then(|text| {
        let pattern = DIGIT_RUN.as_ref()?;
        pattern.find(text)?.as_str().parse::<u32>().ok()
    });

    match parsed {
        Some(n) => n.max(1),
        None => fallback,
    }
}

// ---------------------------------------------------------------------------
/// Plan Window
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanWindow {
    /// Midnight of the first day
    pub start: DateTime<Utc>,
    /// Midnight after the last day
    pub end_exclusive: DateTime<Utc>,
    /// Weeks started so far, at least 1
    pub weeks: u32,
}

pub fn plan_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    reference: DateTime<Utc>,
) -> PlanWindow {
    let start_day = start_of_day(start.unwrap_or(reference));
    let end_candidate = end.unwrap_or(reference).min(reference);
    let end_day = start_of_day(start_day.max(end_candidate));

    let day_span = days_between(start_day, end_day);
    let weeks = ((day_span + 1) as u64).div_ceil(7).max(1);

    PlanWindow {
        start: start_day,
        end_exclusive: end_day + Duration::days(1),
        weeks: u32::try_from(weeks).unwrap_or(u32::MAX),
    }
}

impl PlanWindow {
    /// Date predicate for sessions inside this window, restricted to a plan's templates
    pub fn session_query(&self, template_ids: &[Uuid]) -> SessionQuery {
        SessionQuery {
            since: Some(self.start),
            until: Some(self.end_exclusive),
            templates: TemplateFilter::LinkedOrUnassigned(template_ids.to_vec()),
        }
    }
}

// ---------------------------------------------------------------------------
/// Plan Detail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDetail {
    pub id: Uuid,
    pub name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub schedule: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    /// Referenced templates, oldest first
    pub templates: Vec<TemplateDetail>,
    pub window: PlanWindow,
    pub workouts_per_week: u32,
    pub completed_sessions: u32,
    pub total_sessions_target: u32,
}

impl PlanDetail {
    pub fn sessions_per_week(&self) -> u32 {
        let template_count = u32::try_from(self.templates.len()).unwrap_or(u32::MAX);
        self.workouts_per_week.max(template_count)
    }

    /// Completed over target, capped at 1
    pub fn progress(&self) -> f64 {
        if self.total_sessions_target == 0 {
            return 0.0;
        }
        (f64::from(self.completed_sessions) / f64::from(self.total_sessions_target)).min(1.0)
    }

    pub fn timeline(&self) -> String {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => format!("{} – {}", medium_date(start), medium_date(end)),
            (Some(start), None) => format!("From {}", medium_date(start)),
            _ => "No schedule".to_string(),
        }
    }
}

/// Sessions with any logged work
pub fn count_completed(summaries: &[SessionSummary]) -> u32 {
    let completed = summaries.iter().filter(|s| s.has_logged_work()).count();
    u32::try_from(completed).unwrap_or(u32::MAX)
}

/// Derive a plan's detail from its templates and candidate sessions.
///
/// `sessions` may be a superset; only those inside the window and passing the
/// template filter are counted.
pub fn derive_plan_detail(
    plan: &Plan,
    templates: Vec<TemplateDetail>,
    sessions: &[Session],
    reference: DateTime<Utc>,
) -> PlanDetail {
    let workouts_per_week = parse_workouts_per_week(plan.schedule.as_deref(), templates.len());
    let window = plan_window(plan.start_date, plan.end_date, reference);
    let query = window.session_query(&plan.template_ids);

    let summaries: Vec<SessionSummary> = sessions
        .iter()
        .filter(|s| query.matches(s))
        .map(summarize_session)
        .collect();

    let completed_sessions = count_completed(&summaries);
    let total_sessions_target = workouts_per_week.saturating_mul(window.weeks).max(1);

    PlanDetail {
        id: plan.id,
        name: plan.name.clone(),
        start_date: plan.start_date,
        end_date: plan.end_date,
        schedule: plan.schedule.clone(),
        notes: plan.notes.clone(),
        is_active: plan.is_active,
        templates,
        window,
        workouts_per_week,
        completed_sessions,
        total_sessions_target,
    }
}

// ---------------------------------------------------------------------------
/// Database Operations
// ---------------------------------------------------------------------------

/// Every plan, by start date with undated plans last, measured at `reference`
pub async fn fetch_plan_details<S: RecordStore>(
    store: &S,
    reference: DateTime<Utc>,
) -> Result<Vec<PlanDetail>> {
    let plans = store.fetch_plans().await?;
    if plans.is_empty() {
        return Ok(Vec::new());
    }
    let catalog = fetch_template_details(store).await?;

    let mut details = Vec::with_capacity(plans.len());
    for plan in &plans {
        let templates: Vec<TemplateDetail> = catalog
            .iter()
            .filter(|t| plan.template_ids.contains(&t.id))
            .cloned()
            .collect();

        let window = plan_window(plan.start_date, plan.end_date, reference);
        let sessions = store
            .fetch_sessions(&window.session_query(&plan.template_ids))
            .await?;

        let detail = derive_plan_detail(plan, templates, &sessions, reference);
        debug!(
            plan = %detail.name,
            weeks = detail.window.weeks,
            completed = detail.completed_sessions,
            target = detail.total_sessions_target,
            "Derived plan progress"
        );
        details.push(detail);
    }

    Ok(details)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

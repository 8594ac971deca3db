//! FlexLog training engine
//!
//! Aggregates logged training sessions, measures plan progress and seeds a
//! default template catalog on top of a pluggable record store.

pub mod aggregation;
pub mod calendar;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod plans;
pub mod quick_entry;
pub mod seed;
pub mod stats;
pub mod store;
pub mod templates;

#[cfg(test)]
mod test_utils;

pub use aggregation::{fetch_sessions, summarize_session, EntrySummary, SessionSummary};
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use logging::init_logging;
pub use plans::{derive_plan_detail, fetch_plan_details, PlanDetail, PlanWindow};
pub use quick_entry::{create_quick_plan, create_quick_session, quick_plan_name};
pub use seed::{ensure_default_templates_seeded, SeedOutcome};
pub use stats::{compute_streak, compute_weekly_stats, DashboardStats, ProgressMetric, WeeklyStats};
pub use store::{FlagStore, RecordStore, SessionQuery, SqliteStore, TemplateFilter};
pub use templates::{fetch_template_details, filter_templates, template_detail, TemplateDetail};

use tracing::info;

/// Install logging, open the configured database, apply migrations and seed
/// the default templates on first run.
pub async fn bootstrap(config: &EngineConfig) -> Result<SqliteStore> {
  init_logging(&config.log_filter);

  let pool = db::initialize_db(config).await?;
  let store = SqliteStore::new(pool);

  let outcome = ensure_default_templates_seeded(&store).await?;
  info!(?outcome, "Engine ready");

  Ok(store)
}

//! Record store seam
//!
//! Engine operations take a store handle bounded by these traits instead of
//! reaching for a global. [`SqliteStore`] is the bundled implementation.

mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Exercise, Plan, Session, Template, TemplateRecord};

/// Which template links a session query accepts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateFilter {
  #[default]
  Any,
  /// Sessions linked to one of these templates, or to no template at all
  LinkedOrUnassigned(Vec<Uuid>),
}

impl TemplateFilter {
  pub fn accepts(&self, template_id: Option<Uuid>) -> bool {
    match (self, template_id) {
      (TemplateFilter::Any, _) => true,
      (TemplateFilter::LinkedOrUnassigned(ids), Some(id)) => ids.is_empty() || ids.contains(&id),
      (TemplateFilter::LinkedOrUnassigned(_), None) => true,
    }
  }
}

/// Session predicate: `since <= date < until` plus a template filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionQuery {
  pub since: Option<DateTime<Utc>>,
  /// Exclusive upper bound
  pub until: Option<DateTime<Utc>>,
  pub templates: TemplateFilter,
}

impl SessionQuery {
  pub fn matches(&self, session: &Session) -> bool {
    self.since.is_none_or(|since| session.date >= since)
      && self.until.is_none_or(|until| session.date < until)
      && self.templates.accepts(session.template_id)
  }
}

#[allow(async_fn_in_trait)]
pub trait RecordStore {
  async fn count_templates(&self) -> Result<i64>;

  /// All templates, oldest first (insertion order breaks ties)
  async fn fetch_templates(&self) -> Result<Vec<Template>>;

  async fn fetch_template(&self, id: Uuid) -> Result<Option<Template>>;

  /// Exercises of one template in insertion order
  async fn fetch_exercises(&self, template_id: Uuid) -> Result<Vec<Exercise>>;

  async fn count_sessions_for_template(&self, template_id: Uuid) -> Result<i64>;

  /// Write every template and exercise in one atomic save
  async fn insert_template_catalog(&self, catalog: &[TemplateRecord]) -> Result<()>;

  /// All plans by start date, plans without a start date last
  async fn fetch_plans(&self) -> Result<Vec<Plan>>;

  async fn insert_plan(&self, plan: &Plan) -> Result<()>;

  /// Matching sessions with their entries, newest first
  async fn fetch_sessions(&self, query: &SessionQuery) -> Result<Vec<Session>>;

  /// Persist a session and its entries
  async fn insert_session(&self, session: &Session) -> Result<()>;
}

/// Persisted key/value flags
#[allow(async_fn_in_trait)]
pub trait FlagStore {
  async fn get_flag(&self, key: &str) -> Result<Option<String>>;

  async fn set_flag(&self, key: &str, value: &str) -> Result<()>;
}

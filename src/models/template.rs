use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
  pub id: Uuid,
  pub name: String,
  pub focus_area: Option<String>,
  pub notes: Option<String>,
  pub color_hex: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>,
  pub is_favorite: bool,
}

/// One movement inside a template. `order_index` only drives display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  pub id: Uuid,
  pub template_id: Uuid,
  pub name: String,
  pub target_muscle: Option<String>,
  pub instructions: Option<String>,
  pub rest_interval_seconds: Option<i64>,
  pub order_index: i64,
}

/// A template together with the exercises it owns, written in one save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
  pub template: Template,
  pub exercises: Vec<Exercise>,
}

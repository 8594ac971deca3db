//! Template catalog read model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::models::{Exercise, Template};
use crate::store::RecordStore;

const DEFAULT_FOCUS_LABEL: &str = "Full body";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDetail {
  pub id: Uuid,
  pub name: String,
  pub target_muscle: Option<String>,
  pub instructions: Option<String>,
  pub rest_interval_seconds: Option<i64>,
  pub order_index: i64,
}

impl From<Exercise> for ExerciseDetail {
  fn from(exercise: Exercise) -> Self {
    Self {
      id: exercise.id,
      name: exercise.name,
      target_muscle: exercise.target_muscle,
      instructions: exercise.instructions,
      rest_interval_seconds: exercise.rest_interval_seconds,
      order_index: exercise.order_index,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDetail {
  pub id: Uuid,
  pub name: String,
  pub focus_area: Option<String>,
  pub notes: Option<String>,
  pub color_hex: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>,
  pub is_favorite: bool,
  /// Sorted by order index, ties in insertion order
  pub exercises: Vec<ExerciseDetail>,
  /// Sessions linked to this template
  pub session_count: i64,
}

impl TemplateDetail {
  pub fn new(template: Template, exercises: Vec<Exercise>, session_count: i64) -> Self {
    let mut exercises: Vec<ExerciseDetail> = exercises.into_iter().map(ExerciseDetail::from).collect();
    // Stable: equal order indices keep insertion order
    exercises.sort_by_key(|e| e.order_index);

    Self {
      id: template.id,
      name: template.name,
      focus_area: template.focus_area,
      notes: template.notes,
      color_hex: template.color_hex,
      created_at: template.created_at,
      updated_at: template.updated_at,
      is_favorite: template.is_favorite,
      exercises,
      session_count,
    }
  }

  pub fn focus_label(&self) -> &str {
    self.focus_area.as_deref().unwrap_or(DEFAULT_FOCUS_LABEL)
  }

  /// Rough workout length: ten minutes per exercise, at least thirty
  pub fn duration_label(&self) -> String {
    if self.exercises.is_empty() {
      return "45 min".to_string();
    }
    let estimate = (self.exercises.len() * 10).max(30);
    format!("≈ {} min", estimate)
  }
}

/// ---------------------------------------------------------------------------
/// Database Operations
/// ---------------------------------------------------------------------------

async fn load_detail<S: RecordStore>(store: &S, template: Template) -> Result<TemplateDetail> {
  let exercises = store.fetch_exercises(template.id).await?;
  let session_count = store.count_sessions_for_template(template.id).await?;
  Ok(TemplateDetail::new(template, exercises, session_count))
}

/// All templates, oldest first
pub async fn fetch_template_details<S: RecordStore>(store: &S) -> Result<Vec<TemplateDetail>> {
  let templates = store.fetch_templates().await?;
  debug!(count = templates.len(), "Loading template details");

  let mut details = Vec::with_capacity(templates.len());
  for template in templates {
    details.push(load_detail(store, template).await?);
  }
  Ok(details)
}

pub async fn template_detail<S: RecordStore>(store: &S, id: Uuid) -> Result<TemplateDetail> {
  let template = store
    .fetch_template(id)
    .await?
    .ok_or_else(|| EngineError::NotFound(format!("Template not found: {}", id)))?;
  load_detail(store, template).await
}

/// Case-insensitive match on name or focus label; a blank query keeps everything
pub fn filter_templates<'a>(templates: &'a [TemplateDetail], query: &str) -> Vec<&'a TemplateDetail> {
  let needle = query.trim().to_lowercase();
  if needle.is_empty() {
    return templates.iter().collect();
  }

  templates
    .iter()
    .filter(|t| {
      t.name.to_lowercase().contains(&needle) || t.focus_label().to_lowercase().contains(&needle)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{insert_test_template, mock_session, mock_template, setup_test_db, teardown_test_db, utc_date};

  fn exercise(template_id: Uuid, name: &str, order_index: i64) -> Exercise {
    Exercise {
      id: Uuid::new_v4(),
      template_id,
      name: name.to_string(),
      target_muscle: None,
      instructions: None,
      rest_interval_seconds: None,
      order_index,
    }
  }

  #[test]
  fn test_exercises_sorted_stably_by_order() {
    let record = mock_template("Mixed", utc_date(2025, 1, 1));
    let id = record.template.id;
    let exercises = vec![
      exercise(id, "third", 2),
      exercise(id, "first-a", 0),
      exercise(id, "second", 1),
      exercise(id, "first-b", 0),
    ];

    let detail = TemplateDetail::new(record.template, exercises, 0);
    let names: Vec<&str> = detail.exercises.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["first-a", "first-b", "second", "third"]);
  }

  #[test]
  fn test_labels() {
    let record = mock_template("Empty", utc_date(2025, 1, 1));
    let mut detail = TemplateDetail::new(record.template, vec![], 0);
    assert_eq!(detail.focus_label(), "Full body");
    assert_eq!(detail.duration_label(), "45 min");

    let id = detail.id;
    detail.exercises = (0..2).map(|i| exercise(id, "x", i).into()).collect();
    assert_eq!(detail.duration_label(), "≈ 30 min");

    detail.exercises = (0..5).map(|i| exercise(id, "x", i).into()).collect();
    detail.focus_area = Some("Legs & Glutes".to_string());
    assert_eq!(detail.duration_label(), "≈ 50 min");
    assert_eq!(detail.focus_label(), "Legs & Glutes");
  }

  #[test]
  fn test_filter_templates() {
    let mut push = TemplateDetail::new(mock_template("Push Power", utc_date(2025, 1, 1)).template, vec![], 0);
    push.focus_area = Some("Chest & Triceps".to_string());
    let core = TemplateDetail::new(mock_template("Functional Core", utc_date(2025, 1, 2)).template, vec![], 0);
    let templates = vec![push, core];

    assert_eq!(filter_templates(&templates, "   ").len(), 2);
    assert_eq!(filter_templates(&templates, "CHEST")[0].name, "Push Power");
    // Unset focus area matches through the "Full body" label
    assert_eq!(filter_templates(&templates, "full")[0].name, "Functional Core");
    assert!(filter_templates(&templates, "yoga").is_empty());
  }

  #[tokio::test]
  async fn test_template_detail_counts_sessions() {
    let store = setup_test_db().await;
    let record = insert_test_template(&store, "Push Power").await;

    let mut session = mock_session(utc_date(2025, 1, 1));
    session.template_id = Some(record.template.id);
    store.insert_session(&session).await.unwrap();

    let detail = template_detail(&store, record.template.id)
      .await
      .expect("Should load detail");
    assert_eq!(detail.session_count, 1);
    assert_eq!(detail.exercises.len(), 2);

    let all = fetch_template_details(&store).await.expect("Should load all");
    assert_eq!(all, vec![detail]);

    teardown_test_db(store).await;
  }

  #[tokio::test]
  async fn test_template_detail_not_found() {
    let store = setup_test_db().await;

    let result = template_detail(&store, Uuid::new_v4()).await;
    assert!(matches!(result, Err(EngineError::NotFound(_))));

    teardown_test_db(store).await;
  }
}

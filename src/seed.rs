//! Default template catalog seeding
//!
//! Runs once per store: a store that already holds templates, or that has the
//! seeded flag set, is left alone. The flag is written only after the catalog
//! save succeeds, so a failed save is retried on the next call.
//!
//! The template check and the flag check are not atomic. Callers must not
//! seed the same store from two writers at once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Exercise, Template, TemplateRecord};
use crate::store::{FlagStore, RecordStore};

pub const SEEDED_TEMPLATES_FLAG: &str = "flexlog.seededDefaultTemplates";

const SEEDED_NOTES: &str = "Auto-generated default template";

/// (name, target muscle, instructions, rest seconds)
type ExerciseSeed = (&'static str, &'static str, &'static str, i64);

struct TemplateSeed {
  name: &'static str,
  focus: &'static str,
  color: &'static str,
  is_favorite: bool,
  exercises: [ExerciseSeed; 5],
}

const DEFAULT_CATALOG: [TemplateSeed; 3] = [
  TemplateSeed {
    name: "Push Power",
    focus: "Chest & Triceps",
    color: "FF6B35",
    is_favorite: true,
    exercises: [
      ("Barbell Bench Press", "Chest", "4×8 @ moderate weight", 90),
      ("Incline Dumbbell Press", "Chest", "3×10", 75),
      ("Cable Fly", "Chest", "3×15 slow tempo", 60),
      ("Dips", "Triceps", "3×AMRAP", 60),
      ("Overhead Triceps Extension", "Triceps", "3×12", 60),
    ],
  },
  TemplateSeed {
    name: "Lower Body Strength",
    focus: "Legs & Glutes",
    color: "FF8C42",
    is_favorite: false,
    exercises: [
      ("Back Squat", "Quads", "5×5 heavy", 120),
      ("Romanian Deadlift", "Hamstrings", "4×8", 90),
      ("Walking Lunges", "Glutes", "3×12 per leg", 75),
      ("Leg Press", "Quads", "3×15", 60),
      ("Calf Raises", "Calves", "4×20", 45),
    ],
  },
  TemplateSeed {
    name: "Functional Core",
    focus: "Core Stability",
    color: "FFA552",
    is_favorite: true,
    exercises: [
      ("Plank", "Core", "4×60 sec hold", 45),
      ("Hanging Leg Raise", "Core", "4×10", 60),
      ("Cable Woodchopper", "Obliques", "3×12 each side", 60),
      ("Swiss Ball Rollout", "Core", "3×15", 60),
      ("Farmer Carry", "Full Body", "4×40m", 90),
    ],
  },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedOutcome {
  /// The seeded flag was already set
  AlreadySeeded,
  /// Templates exist, so there is nothing to seed
  TemplatesPresent,
  Seeded { templates: usize },
}

/// Build the default catalog with fresh ids, stamped at `now`
pub fn default_catalog(now: DateTime<Utc>) -> Vec<TemplateRecord> {
  DEFAULT_CATALOG
    .iter()
    .map(|seed| {
      let template_id = Uuid::new_v4();
      let exercises = seed
        .exercises
        .iter()
        .enumerate()
        .map(|(index, (name, muscle, instructions, rest))| Exercise {
          id: Uuid::new_v4(),
          template_id,
          name: name.to_string(),
          target_muscle: Some(muscle.to_string()),
          instructions: Some(instructions.to_string()),
          rest_interval_seconds: Some(*rest),
          order_index: index as i64,
        })
        .collect();

      TemplateRecord {
        template: Template {
          id: template_id,
          name: seed.name.to_string(),
          focus_area: Some(seed.focus.to_string()),
          notes: Some(SEEDED_NOTES.to_string()),
          color_hex: Some(seed.color.to_string()),
          created_at: now,
          updated_at: Some(now),
          is_favorite: seed.is_favorite,
        },
        exercises,
      }
    })
    .collect()
}

pub async fn ensure_default_templates_seeded<S>(store: &S) -> Result<SeedOutcome>
where
  S: RecordStore + FlagStore,
{
  if store.count_templates().await? > 0 {
    return Ok(SeedOutcome::TemplatesPresent);
  }
  if store.get_flag(SEEDED_TEMPLATES_FLAG).await?.is_some() {
    return Ok(SeedOutcome::AlreadySeeded);
  }

  let catalog = default_catalog(Utc::now());
  store.insert_template_catalog(&catalog).await?;
  store.set_flag(SEEDED_TEMPLATES_FLAG, "true").await?;

  info!(templates = catalog.len(), "Seeded default workout templates");

  Ok(SeedOutcome::Seeded {
    templates: catalog.len(),
  })
}

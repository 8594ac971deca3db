use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use super::{FlagStore, RecordStore, SessionQuery, TemplateFilter};
use crate::db::{
  parse_db_id, parse_db_timestamp, parse_optional_id, parse_optional_timestamp, to_db_timestamp,
  DbPool,
};
use crate::error::Result;
use crate::models::{Entry, Exercise, Plan, Session, Template, TemplateRecord};

/// SQLite-backed record and flag store over a shared `sqlx` pool
#[derive(Debug, Clone)]
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }

  pub async fn close(self) {
    self.pool.close().await;
  }

  async fn fetch_entries(&self, session_id: Uuid) -> Result<Vec<Entry>> {
    let rows = sqlx::query(
      r#"
      SELECT e.id, e.session_id, e.exercise_id, x.name AS exercise_name,
             e.sets, e.reps, e.weight, e.time_seconds
      FROM entries e
      LEFT JOIN exercises x ON x.id = e.exercise_id
      WHERE e.session_id = ?1
      ORDER BY e.rowid
      "#,
    )
    .bind(session_id.to_string())
    .fetch_all(&self.pool)
    .await?;

    rows.iter().map(entry_from_row).collect()
  }

  async fn fetch_plan_template_ids(&self, plan_id: Uuid) -> Result<Vec<Uuid>> {
    let ids: Vec<String> = sqlx::query_scalar(
      r#"
      SELECT pt.template_id
      FROM plan_templates pt
      JOIN templates t ON t.id = pt.template_id
      WHERE pt.plan_id = ?1
      ORDER BY t.created_at, t.rowid
      "#,
    )
    .bind(plan_id.to_string())
    .fetch_all(&self.pool)
    .await?;

    ids.iter().map(|id| parse_db_id(id)).collect()
  }
}

/// ---------------------------------------------------------------------------
/// Row Mapping
/// ---------------------------------------------------------------------------

fn template_from_row(row: &SqliteRow) -> Result<Template> {
  Ok(Template {
    id: parse_db_id(&row.try_get::<String, _>("id")?)?,
    name: row.try_get("name")?,
    focus_area: row.try_get("focus_area")?,
    notes: row.try_get("notes")?,
    color_hex: row.try_get("color_hex")?,
    created_at: parse_db_timestamp(&row.try_get::<String, _>("created_at")?)?,
    updated_at: parse_optional_timestamp(row.try_get("updated_at")?)?,
    is_favorite: row.try_get("is_favorite")?,
  })
}

fn exercise_from_row(row: &SqliteRow) -> Result<Exercise> {
  Ok(Exercise {
    id: parse_db_id(&row.try_get::<String, _>("id")?)?,
    template_id: parse_db_id(&row.try_get::<String, _>("template_id")?)?,
    name: row.try_get("name")?,
    target_muscle: row.try_get("target_muscle")?,
    instructions: row.try_get("instructions")?,
    rest_interval_seconds: row.try_get("rest_interval_seconds")?,
    order_index: row.try_get("order_index")?,
  })
}

fn entry_from_row(row: &SqliteRow) -> Result<Entry> {
  Ok(Entry {
    id: parse_db_id(&row.try_get::<String, _>("id")?)?,
    session_id: parse_db_id(&row.try_get::<String, _>("session_id")?)?,
    exercise_id: parse_optional_id(row.try_get("exercise_id")?)?,
    exercise_name: row.try_get("exercise_name")?,
    sets: row.try_get("sets")?,
    reps: row.try_get("reps")?,
    weight: row.try_get("weight")?,
    time_seconds: row.try_get("time_seconds")?,
  })
}

fn session_from_row(row: &SqliteRow) -> Result<Session> {
  Ok(Session {
    id: parse_db_id(&row.try_get::<String, _>("id")?)?,
    date: parse_db_timestamp(&row.try_get::<String, _>("date")?)?,
    duration_seconds: row.try_get("duration_seconds")?,
    template_id: parse_optional_id(row.try_get("template_id")?)?,
    template_name: row.try_get("template_name")?,
    notes: row.try_get("notes")?,
    mood: row.try_get("mood")?,
    entries: Vec::new(),
    logged_volume: row.try_get("logged_volume")?,
    logged_duration_seconds: row.try_get("logged_duration_seconds")?,
    logged_exercise_count: row.try_get("logged_exercise_count")?,
  })
}

fn plan_from_row(row: &SqliteRow) -> Result<Plan> {
  Ok(Plan {
    id: parse_db_id(&row.try_get::<String, _>("id")?)?,
    name: row.try_get("name")?,
    start_date: parse_optional_timestamp(row.try_get("start_date")?)?,
    end_date: parse_optional_timestamp(row.try_get("end_date")?)?,
    schedule: row.try_get("schedule")?,
    notes: row.try_get("notes")?,
    is_active: row.try_get("is_active")?,
    template_ids: Vec::new(),
  })
}

/// ---------------------------------------------------------------------------
/// Record Store
/// ---------------------------------------------------------------------------

impl RecordStore for SqliteStore {
  async fn count_templates(&self) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM templates")
      .fetch_one(&self.pool)
      .await?;
    Ok(count)
  }

  async fn fetch_templates(&self) -> Result<Vec<Template>> {
    let rows = sqlx::query(
      r#"
      SELECT id, name, focus_area, notes, color_hex, created_at, updated_at, is_favorite
      FROM templates
      ORDER BY created_at, rowid
      "#,
    )
    .fetch_all(&self.pool)
    .await?;

    rows.iter().map(template_from_row).collect()
  }

  async fn fetch_template(&self, id: Uuid) -> Result<Option<Template>> {
    let row = sqlx::query(
      r#"
      SELECT id, name, focus_area, notes, color_hex, created_at, updated_at, is_favorite
      FROM templates
      WHERE id = ?1
      LIMIT 1
      "#,
    )
    .bind(id.to_string())
    .fetch_optional(&self.pool)
    .await?;

    row.as_ref().map(template_from_row).transpose()
  }

  async fn fetch_exercises(&self, template_id: Uuid) -> Result<Vec<Exercise>> {
    let rows = sqlx::query(
      r#"
      SELECT id, template_id, name, target_muscle, instructions,
             rest_interval_seconds, order_index
      FROM exercises
      WHERE template_id = ?1
      ORDER BY rowid
      "#,
    )
    .bind(template_id.to_string())
    .fetch_all(&self.pool)
    .await?;

    rows.iter().map(exercise_from_row).collect()
  }

  async fn count_sessions_for_template(&self, template_id: Uuid) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE template_id = ?1")
      .bind(template_id.to_string())
      .fetch_one(&self.pool)
      .await?;
    Ok(count)
  }

  async fn insert_template_catalog(&self, catalog: &[TemplateRecord]) -> Result<()> {
    let mut tx = self.pool.begin().await?;

    for record in catalog {
      let template = &record.template;
      sqlx::query(
        r#"
        INSERT INTO templates (
          id, name, focus_area, notes, color_hex, created_at, updated_at, is_favorite
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
      )
      .bind(template.id.to_string())
      .bind(&template.name)
      .bind(&template.focus_area)
      .bind(&template.notes)
      .bind(&template.color_hex)
      .bind(to_db_timestamp(&template.created_at))
      .bind(template.updated_at.as_ref().map(to_db_timestamp))
      .bind(template.is_favorite)
      .execute(&mut *tx)
      .await?;

      for exercise in &record.exercises {
        sqlx::query(
          r#"
          INSERT INTO exercises (
            id, template_id, name, target_muscle, instructions,
            rest_interval_seconds, order_index
          )
          VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
          "#,
        )
        .bind(exercise.id.to_string())
        .bind(template.id.to_string())
        .bind(&exercise.name)
        .bind(&exercise.target_muscle)
        .bind(&exercise.instructions)
        .bind(exercise.rest_interval_seconds)
        .bind(exercise.order_index)
        .execute(&mut *tx)
        .await?;
      }
    }

    // Dropping the transaction on any error above rolls everything back
    tx.commit().await?;
    Ok(())
  }

  async fn fetch_plans(&self) -> Result<Vec<Plan>> {
    let rows = sqlx::query(
      r#"
      SELECT id, name, start_date, end_date, schedule, notes, is_active
      FROM plans
      ORDER BY start_date IS NULL, start_date, rowid
      "#,
    )
    .fetch_all(&self.pool)
    .await?;

    let mut plans = Vec::with_capacity(rows.len());
    for row in &rows {
      let mut plan = plan_from_row(row)?;
      plan.template_ids = self.fetch_plan_template_ids(plan.id).await?;
      plans.push(plan);
    }

    Ok(plans)
  }

  async fn insert_plan(&self, plan: &Plan) -> Result<()> {
    let mut tx = self.pool.begin().await?;

    sqlx::query(
      r#"
      INSERT INTO plans (id, name, start_date, end_date, schedule, notes, is_active)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
      "#,
    )
    .bind(plan.id.to_string())
    .bind(&plan.name)
    .bind(plan.start_date.as_ref().map(to_db_timestamp))
    .bind(plan.end_date.as_ref().map(to_db_timestamp))
    .bind(&plan.schedule)
    .bind(&plan.notes)
    .bind(plan.is_active)
    .execute(&mut *tx)
    .await?;

    for template_id in &plan.template_ids {
      sqlx::query("INSERT INTO plan_templates (plan_id, template_id) VALUES (?1, ?2)")
        .bind(plan.id.to_string())
        .bind(template_id.to_string())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
  }

  async fn fetch_sessions(&self, query: &SessionQuery) -> Result<Vec<Session>> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
      r#"
      SELECT s.id, s.date, s.duration_seconds, s.template_id, t.name AS template_name,
             s.notes, s.mood, s.logged_volume, s.logged_duration_seconds,
             s.logged_exercise_count
      FROM sessions s
      LEFT JOIN templates t ON t.id = s.template_id
      WHERE 1 = 1
      "#,
    );

    if let Some(since) = &query.since {
      builder.push(" AND s.date >= ").push_bind(to_db_timestamp(since));
    }
    if let Some(until) = &query.until {
      builder.push(" AND s.date < ").push_bind(to_db_timestamp(until));
    }
    if let TemplateFilter::LinkedOrUnassigned(ids) = &query.templates {
      if !ids.is_empty() {
        builder.push(" AND (s.template_id IS NULL OR s.template_id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
          separated.push_bind(id.to_string());
        }
        separated.push_unseparated("))");
      }
    }
    builder.push(" ORDER BY s.date DESC, s.rowid DESC");

    let rows = builder.build().fetch_all(&self.pool).await?;

    let mut sessions = Vec::with_capacity(rows.len());
    for row in &rows {
      let mut session = session_from_row(row)?;
      session.entries = self.fetch_entries(session.id).await?;
      sessions.push(session);
    }

    Ok(sessions)
  }

  async fn insert_session(&self, session: &Session) -> Result<()> {
    let mut tx = self.pool.begin().await?;

    sqlx::query(
      r#"
      INSERT INTO sessions (
        id, date, duration_seconds, template_id, notes, mood,
        logged_volume, logged_duration_seconds, logged_exercise_count
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
      "#,
    )
    .bind(session.id.to_string())
    .bind(to_db_timestamp(&session.date))
    .bind(session.duration_seconds)
    .bind(session.template_id.map(|id| id.to_string()))
    .bind(&session.notes)
    .bind(&session.mood)
    .bind(session.logged_volume)
    .bind(session.logged_duration_seconds)
    .bind(session.logged_exercise_count)
    .execute(&mut *tx)
    .await?;

    for entry in &session.entries {
      sqlx::query(
        r#"
        INSERT INTO entries (id, session_id, exercise_id, sets, reps, weight, time_seconds)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
      )
      .bind(entry.id.to_string())
      .bind(session.id.to_string())
      .bind(entry.exercise_id.map(|id| id.to_string()))
      .bind(entry.sets)
      .bind(entry.reps)
      .bind(entry.weight)
      .bind(entry.time_seconds)
      .execute(&mut *tx)
      .await?;
    }

    tx.commit().await?;
    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Flag Store
/// ---------------------------------------------------------------------------

impl FlagStore for SqliteStore {
  async fn get_flag(&self, key: &str) -> Result<Option<String>> {
    let value = sqlx::query_scalar("SELECT value FROM app_flags WHERE key = ?1")
      .bind(key)
      .fetch_optional(&self.pool)
      .await?;
    Ok(value)
  }

  async fn set_flag(&self, key: &str, value: &str) -> Result<()> {
    sqlx::query(
      r#"
      INSERT INTO app_flags (key, value, updated_at)
      VALUES (?1, ?2, ?3)
      ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(key)
    .bind(value)
    .bind(to_db_timestamp(&Utc::now()))
    .execute(&self.pool)
    .await?;

    Ok(())
  }
}

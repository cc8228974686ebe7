use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::event::EventDraft;
use crate::error::{Result, StorageError};
use crate::models::Event;

const EVENT_COLUMNS: &str = r#"
    event_id, name, description, venue, event_date, day, category, rules, prizes,
    fees, team_size, min_team_size, max_team_size, is_variable_team_size,
    registration_open, managed_by, created_at, updated_at
"#;

/// Repository for Event database operations
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all events, earliest festival day first
    pub async fn list(&self) -> Result<Vec<Event>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             ORDER BY day ASC, event_date ASC NULLS LAST, name ASC"
        );
        let events = sqlx::query_as::<_, Event>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(events)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Event> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1");
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    pub async fn create(&self, draft: &EventDraft) -> Result<Event> {
        let sql = format!(
            r#"
            INSERT INTO events (
                name, description, venue, event_date, day, category, rules, prizes, fees,
                team_size, min_team_size, max_team_size, is_variable_team_size,
                registration_open, managed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {EVENT_COLUMNS}
            "#
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(&draft.venue)
            .bind(draft.event_date)
            .bind(draft.day)
            .bind(&draft.category)
            .bind(&draft.rules)
            .bind(&draft.prizes)
            .bind(draft.fees)
            .bind(draft.team_size)
            .bind(draft.min_team_size)
            .bind(draft.max_team_size)
            .bind(draft.is_variable_team_size)
            .bind(draft.registration_open)
            .bind(draft.managed_by)
            .fetch_one(self.pool)
            .await
            .map_err(|e| StorageError::from_write(e, "event"))?;

        Ok(event)
    }

    pub async fn update(&self, id: Uuid, draft: &EventDraft) -> Result<Event> {
        let sql = format!(
            r#"
            UPDATE events
            SET
                name = $2,
                description = $3,
                venue = $4,
                event_date = $5,
                day = $6,
                category = $7,
                rules = $8,
                prizes = $9,
                fees = $10,
                team_size = $11,
                min_team_size = $12,
                max_team_size = $13,
                is_variable_team_size = $14,
                registration_open = $15,
                updated_at = NOW()
            WHERE event_id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(&draft.venue)
            .bind(draft.event_date)
            .bind(draft.day)
            .bind(&draft.category)
            .bind(&draft.rules)
            .bind(&draft.prizes)
            .bind(draft.fees)
            .bind(draft.team_size)
            .bind(draft.min_team_size)
            .bind(draft.max_team_size)
            .bind(draft.is_variable_team_size)
            .bind(draft.registration_open)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| StorageError::from_write(e, "event"))?
            .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    pub async fn toggle_registration(&self, id: Uuid) -> Result<Event> {
        let sql = format!(
            r#"
            UPDATE events
            SET registration_open = NOT registration_open, updated_at = NOW()
            WHERE event_id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    pub async fn assign_manager(&self, id: Uuid, manager_id: Uuid) -> Result<Event> {
        let sql = format!(
            r#"
            UPDATE events
            SET managed_by = $2, updated_at = NOW()
            WHERE event_id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(manager_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    /// Delete an event; its registrations go with it (ON DELETE CASCADE)
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM events
            WHERE event_id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

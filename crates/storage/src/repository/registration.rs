use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::registration::{NewRegistration, RegistrationFilter};
use crate::error::{Result, StorageError};
use crate::models::{
    PaymentStatus, Registration, RegistrationWithEvent, TeamLeaderDetails, TeamMember,
};

const REGISTRATION_COLUMNS: &str = r#"
    r.registration_id, r.event_id, r.team_leader_id, r.leader_college_name, r.leader_usn,
    r.team_name, r.team_members, r.team_size, r.spot_registered_by, r.payment_id,
    r.order_id, r.transaction_id, r.payment_status, r.registered_at, r.updated_at
"#;

#[derive(FromRow)]
struct RegistrationRow {
    registration_id: Uuid,
    event_id: Uuid,
    team_leader_id: Uuid,
    leader_college_name: String,
    leader_usn: String,
    team_name: Option<String>,
    team_members: Json<Vec<TeamMember>>,
    team_size: i32,
    spot_registered_by: Option<Uuid>,
    payment_id: Option<String>,
    order_id: Option<String>,
    transaction_id: Option<String>,
    payment_status: PaymentStatus,
    registered_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Self {
            id: row.registration_id,
            event_id: row.event_id,
            team_leader_id: row.team_leader_id,
            team_leader_details: TeamLeaderDetails {
                college_name: row.leader_college_name,
                usn: row.leader_usn,
            },
            team_name: row.team_name,
            team_members: row.team_members.0,
            team_size: row.team_size,
            spot_registered_by: row.spot_registered_by,
            payment_id: row.payment_id,
            order_id: row.order_id,
            transaction_id: row.transaction_id,
            payment_status: row.payment_status,
            registered_at: row.registered_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct RegistrationWithEventRow {
    #[sqlx(flatten)]
    registration: RegistrationRow,
    event_name: String,
}

impl From<RegistrationWithEventRow> for RegistrationWithEvent {
    fn from(row: RegistrationWithEventRow) -> Self {
        Self {
            registration: row.registration.into(),
            event_name: row.event_name,
        }
    }
}

/// Repository for the registration ledger
pub struct RegistrationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_event_and_leader(
        &self,
        event_id: Uuid,
        team_leader_id: Uuid,
    ) -> Result<Option<Registration>> {
        let sql = format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations r \
             WHERE r.event_id = $1 AND r.team_leader_id = $2"
        );
        let row = sqlx::query_as::<_, RegistrationRow>(&sql)
            .bind(event_id)
            .bind(team_leader_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Registration::from))
    }

    pub async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Registration>> {
        let sql = format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations r \
             WHERE r.order_id = $1 ORDER BY r.registered_at DESC LIMIT 1"
        );
        let row = sqlx::query_as::<_, RegistrationRow>(&sql)
            .bind(order_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Registration::from))
    }

    /// Insert a registration.
    ///
    /// The `unique_event_team_leader` constraint decides concurrent races; the
    /// loser gets `StorageError::DuplicateKey`.
    pub async fn create(&self, new: &NewRegistration) -> Result<Registration> {
        let sql = format!(
            r#"
            INSERT INTO registrations AS r (
                event_id, team_leader_id, leader_college_name, leader_usn, team_name,
                team_members, team_size, spot_registered_by, payment_id, order_id,
                transaction_id, payment_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, RegistrationRow>(&sql)
            .bind(new.event_id)
            .bind(new.team_leader_id)
            .bind(&new.team_leader_details.college_name)
            .bind(&new.team_leader_details.usn)
            .bind(&new.team_name)
            .bind(Json(&new.team_members))
            .bind(new.team_size)
            .bind(new.spot_registered_by)
            .bind(&new.payment_id)
            .bind(&new.order_id)
            .bind(&new.transaction_id)
            .bind(new.payment_status)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                StorageError::from_write(e, "registration for this event and team leader")
            })?;

        Ok(row.into())
    }

    pub async fn update_payment_status(
        &self,
        id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
        payment_id: Option<&str>,
    ) -> Result<Option<Registration>> {
        let sql = format!(
            r#"
            UPDATE registrations AS r
            SET payment_status = $3,
                payment_id = COALESCE($4, r.payment_id),
                updated_at = NOW()
            WHERE r.registration_id = $1 AND r.payment_status = $2
            RETURNING {REGISTRATION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, RegistrationRow>(&sql)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(payment_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Registration::from))
    }

    pub async fn list_for_actor(&self, actor_id: Uuid) -> Result<Vec<RegistrationWithEvent>> {
        let sql = format!(
            r#"
            SELECT {REGISTRATION_COLUMNS}, e.name AS event_name
            FROM registrations r
            INNER JOIN events e ON e.event_id = r.event_id
            WHERE r.team_leader_id = $1 OR r.spot_registered_by = $1
            ORDER BY r.registered_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, RegistrationWithEventRow>(&sql)
            .bind(actor_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(RegistrationWithEvent::from).collect())
    }

    pub async fn list(
        &self,
        filter: &RegistrationFilter,
        pagination: PaginationParams,
    ) -> Result<(Vec<RegistrationWithEvent>, i64)> {
        let total_items = self.count(filter).await?;

        let mut query = QueryBuilder::<Postgres>::new(format!(
            r#"
            SELECT {REGISTRATION_COLUMNS}, e.name AS event_name
            FROM registrations r
            INNER JOIN events e ON e.event_id = r.event_id
            WHERE 1=1
            "#
        ));
        push_filter(&mut query, filter);
        query.push(" ORDER BY r.registered_at DESC LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let rows: Vec<RegistrationWithEventRow> =
            query.build_query_as().fetch_all(self.pool).await?;

        Ok((
            rows.into_iter().map(RegistrationWithEvent::from).collect(),
            total_items,
        ))
    }

    async fn count(&self, filter: &RegistrationFilter) -> Result<i64> {
        let mut query =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM registrations r WHERE 1=1");
        push_filter(&mut query, filter);

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM registrations WHERE registration_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &RegistrationFilter) {
    if let Some(event_id) = filter.event_id {
        query.push(" AND r.event_id = ");
        query.push_bind(event_id);
    }

    if let Some(status) = filter.payment_status {
        query.push(" AND r.payment_status = ");
        query.push_bind(status);
    }
}

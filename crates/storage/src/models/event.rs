use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[sqlx(rename = "event_id")]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub day: i16,
    pub category: String,
    pub rules: Vec<String>,
    pub prizes: Vec<String>,
    pub fees: Decimal,
    pub team_size: i32,
    pub min_team_size: Option<i32>,
    pub max_team_size: Option<i32>,
    pub is_variable_team_size: bool,
    pub registration_open: bool,
    pub managed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Team-size constraint an event imposes on registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSizeRule {
    Between { min: i32, max: i32 },
    AtMost(i32),
    Exactly(i32),
}

impl TeamSizeRule {
    pub fn admits(&self, team_size: i32) -> bool {
        match *self {
            Self::Between { min, max } => (min..=max).contains(&team_size),
            Self::AtMost(max) => team_size <= max,
            Self::Exactly(size) => team_size == size,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Between { min, max } => {
                format!("Team size must be between {min} and {max} members")
            }
            Self::AtMost(max) => format!("Team size cannot exceed {max}"),
            Self::Exactly(size) => format!("Team size must be {size} members"),
        }
    }
}

impl Event {
    /// Explicit min/max bounds take precedence over the legacy size fields.
    pub fn team_size_rule(&self) -> TeamSizeRule {
        match (self.min_team_size, self.max_team_size) {
            (Some(min), Some(max)) => TeamSizeRule::Between { min, max },
            _ if self.is_variable_team_size => TeamSizeRule::AtMost(self.team_size),
            _ => TeamSizeRule::Exactly(self.team_size),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.fees > Decimal::ZERO
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Actor;

/// Payment lifecycle of a registration.
///
/// `pending` may move to `completed` or `failed`; `failed` may still be
/// superseded by a later `completed`. `completed` and `not_required` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    NotRequired,
}

impl PaymentStatus {
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Completed)
                | (Self::Pending, Self::Failed)
                | (Self::Failed, Self::Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::NotRequired)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::NotRequired => "not_required",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamLeaderDetails {
    #[serde(default)]
    pub college_name: String,
    #[serde(default)]
    pub usn: String,
}

impl TeamLeaderDetails {
    pub fn is_complete(&self) -> bool {
        !self.college_name.trim().is_empty() && !self.usn.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    pub usn: Option<String>,
    pub college_name: Option<String>,
}

impl TeamMember {
    /// Name, email and mobile are enough to reach a member at the venue.
    pub fn is_contactable(&self) -> bool {
        [&self.name, &self.email, &self.mobile]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    /// Authenticated user, or a synthetic identity for spot registrations.
    pub team_leader_id: Uuid,
    pub team_leader_details: TeamLeaderDetails,
    pub team_name: Option<String>,
    pub team_members: Vec<TeamMember>,
    pub team_size: i32,
    /// Proxy that created the record at the venue; `None` for self-registration.
    pub spot_registered_by: Option<Uuid>,
    pub payment_id: Option<String>,
    pub order_id: Option<String>,
    pub transaction_id: Option<String>,
    pub payment_status: PaymentStatus,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    pub fn is_spot_registration(&self) -> bool {
        self.spot_registered_by.is_some()
    }

    /// Admins, the team leader, and the proxy that spot-registered the team.
    pub fn is_managed_by(&self, actor: &Actor) -> bool {
        actor.is_admin()
            || self.team_leader_id == actor.id()
            || self.spot_registered_by == Some(actor.id())
    }
}

/// Registration joined with the name of its event, for listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationWithEvent {
    #[serde(flatten)]
    pub registration: Registration,
    pub event_name: String,
}

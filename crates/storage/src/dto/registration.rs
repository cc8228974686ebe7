use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{PaymentStatus, Registration, TeamLeaderDetails, TeamMember};

/// Payload for self-registration and spot registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub team_name: Option<String>,

    #[serde(default)]
    pub team_members: Vec<TeamMember>,

    #[serde(default = "default_team_size")]
    pub team_size: i32,

    pub team_leader_details: Option<TeamLeaderDetails>,

    pub payment_id: Option<String>,

    pub order_id: Option<String>,

    pub transaction_id: Option<String>,
}

fn default_team_size() -> i32 {
    1
}

impl RegistrationRequest {
    pub fn team_name(&self) -> Option<&str> {
        non_blank(self.team_name.as_deref())
    }

    pub fn payment_id(&self) -> Option<&str> {
        non_blank(self.payment_id.as_deref())
    }

    pub fn order_id(&self) -> Option<&str> {
        non_blank(self.order_id.as_deref())
    }

    pub fn transaction_id(&self) -> Option<&str> {
        non_blank(self.transaction_id.as_deref())
    }

    pub fn has_payment_reference(&self) -> bool {
        self.payment_id().is_some() || self.order_id().is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Everything needed to write one ledger row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRegistration {
    pub event_id: Uuid,
    pub team_leader_id: Uuid,
    pub team_leader_details: TeamLeaderDetails,
    pub team_name: Option<String>,
    pub team_members: Vec<TeamMember>,
    pub team_size: i32,
    pub spot_registered_by: Option<Uuid>,
    pub payment_id: Option<String>,
    pub order_id: Option<String>,
    pub transaction_id: Option<String>,
    pub payment_status: PaymentStatus,
}

/// 201 body: the stored registration plus an optional non-fatal warning.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationCreatedResponse {
    #[serde(flatten)]
    pub registration: Registration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDetails {
    pub team_name: Option<String>,
    pub team_size: i32,
    pub registration_date: DateTime<Utc>,
    pub transaction_id: Option<String>,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckRegistrationResponse {
    pub is_registered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_details: Option<RegistrationDetails>,
}

impl From<Option<Registration>> for CheckRegistrationResponse {
    fn from(registration: Option<Registration>) -> Self {
        Self {
            is_registered: registration.is_some(),
            registration_details: registration.map(|r| RegistrationDetails {
                team_name: r.team_name,
                team_size: r.team_size,
                registration_date: r.registered_at,
                transaction_id: r.transaction_id,
                payment_status: r.payment_status,
            }),
        }
    }
}

/// Admin listing filter.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RegistrationFilter {
    pub event_id: Option<Uuid>,
    pub payment_status: Option<PaymentStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

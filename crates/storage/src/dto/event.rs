use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Event;

/// Request payload for creating a new event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    pub description: Option<String>,

    #[validate(length(max = 255))]
    pub venue: Option<String>,

    pub event_date: Option<DateTime<Utc>>,

    #[validate(range(min = 1, max = 2, message = "Day must be 1 or 2"))]
    pub day: Option<i16>,

    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,

    #[serde(default)]
    pub rules: Vec<String>,

    #[serde(default)]
    pub prizes: Vec<String>,

    pub fees: Option<Decimal>,

    #[validate(range(min = 1, message = "Team size must be positive"))]
    pub team_size: Option<i32>,

    #[validate(range(min = 1, message = "Minimum team size must be positive"))]
    pub min_team_size: Option<i32>,

    #[validate(range(min = 1, message = "Maximum team size must be positive"))]
    pub max_team_size: Option<i32>,

    #[serde(default)]
    pub is_variable_team_size: bool,

    pub registration_open: Option<bool>,
}

/// Request payload for editing an event; absent fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(length(max = 255))]
    pub venue: Option<String>,

    pub event_date: Option<DateTime<Utc>>,

    #[validate(range(min = 1, max = 2, message = "Day must be 1 or 2"))]
    pub day: Option<i16>,

    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,

    pub rules: Option<Vec<String>>,

    pub prizes: Option<Vec<String>>,

    pub fees: Option<Decimal>,

    #[validate(range(min = 1, message = "Team size must be positive"))]
    pub team_size: Option<i32>,

    #[validate(range(min = 1, message = "Minimum team size must be positive"))]
    pub min_team_size: Option<i32>,

    #[validate(range(min = 1, message = "Maximum team size must be positive"))]
    pub max_team_size: Option<i32>,

    pub is_variable_team_size: Option<bool>,

    pub registration_open: Option<bool>,
}

/// Fully resolved event fields, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
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
}

impl EventDraft {
    fn check(self) -> Result<Self, String> {
        if self.fees < Decimal::ZERO {
            return Err("Fees cannot be negative".to_string());
        }
        if self.team_size < 1 {
            return Err("Team size must be positive".to_string());
        }
        if let (Some(min), Some(max)) = (self.min_team_size, self.max_team_size)
            && min > max
        {
            return Err(format!(
                "Minimum team size ({min}) cannot exceed maximum team size ({max})"
            ));
        }
        Ok(self)
    }
}

/// Team events (three or more members) track their base size at the minimum.
const TEAM_EVENT_THRESHOLD: i32 = 3;

impl CreateEventRequest {
    pub fn into_draft(self, managed_by: Option<Uuid>) -> Result<EventDraft, String> {
        let mut team_size = self.team_size.unwrap_or(1);
        let min_team_size = self.min_team_size.unwrap_or(team_size);
        let max_team_size = self.max_team_size.unwrap_or(team_size);

        if min_team_size >= TEAM_EVENT_THRESHOLD {
            team_size = min_team_size;
        }

        EventDraft {
            name: self.name,
            description: self.description,
            venue: self.venue,
            event_date: self.event_date,
            day: self.day.unwrap_or(1),
            category: self.category.unwrap_or_else(|| "other".to_string()),
            rules: self.rules,
            prizes: self.prizes,
            fees: self.fees.unwrap_or(Decimal::ZERO),
            team_size,
            min_team_size: Some(min_team_size),
            max_team_size: Some(max_team_size),
            is_variable_team_size: self.is_variable_team_size,
            registration_open: self.registration_open.unwrap_or(true),
            managed_by,
        }
        .check()
    }
}

impl UpdateEventRequest {
    /// Merge the edit over `existing`, keeping team-size fields consistent.
    pub fn merge_into(self, existing: &Event) -> Result<EventDraft, String> {
        let mut team_size = self.team_size;
        let mut min_team_size = self.min_team_size;
        let mut max_team_size = self.max_team_size;

        match (min_team_size, team_size) {
            (Some(min), _) if min >= TEAM_EVENT_THRESHOLD => team_size = Some(min),
            (_, Some(size)) => {
                min_team_size = min_team_size.or(Some(size));
                max_team_size = max_team_size.or(Some(size));
            }
            _ => {}
        }

        EventDraft {
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            description: self.description.or_else(|| existing.description.clone()),
            venue: self.venue.or_else(|| existing.venue.clone()),
            event_date: self.event_date.or(existing.event_date),
            day: self.day.unwrap_or(existing.day),
            category: self.category.unwrap_or_else(|| existing.category.clone()),
            rules: self.rules.unwrap_or_else(|| existing.rules.clone()),
            prizes: self.prizes.unwrap_or_else(|| existing.prizes.clone()),
            fees: self.fees.unwrap_or(existing.fees),
            team_size: team_size.unwrap_or(existing.team_size),
            min_team_size: min_team_size.or(existing.min_team_size),
            max_team_size: max_team_size.or(existing.max_team_size),
            is_variable_team_size: self
                .is_variable_team_size
                .unwrap_or(existing.is_variable_team_size),
            registration_open: self.registration_open.unwrap_or(existing.registration_open),
            managed_by: existing.managed_by,
        }
        .check()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRegistrationResponse {
    pub message: String,
    pub registration_open: bool,
    pub event: Event,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateEventRequest {
        CreateEventRequest {
            name: "Robo Wars".to_string(),
            description: None,
            venue: None,
            event_date: None,
            day: None,
            category: None,
            rules: vec![],
            prizes: vec![],
            fees: None,
            team_size: None,
            min_team_size: None,
            max_team_size: None,
            is_variable_team_size: false,
            registration_open: None,
        }
    }

    #[test]
    fn test_create_defaults() {
        let draft = create_request().into_draft(None).unwrap();
        assert_eq!(draft.team_size, 1);
        assert_eq!(draft.min_team_size, Some(1));
        assert_eq!(draft.max_team_size, Some(1));
        assert_eq!(draft.fees, Decimal::ZERO);
        assert_eq!(draft.day, 1);
        assert_eq!(draft.category, "other");
        assert!(draft.registration_open);
    }

    #[test]
    fn test_team_event_base_size_follows_minimum() {
        let mut req = create_request();
        req.team_size = Some(2);
        req.min_team_size = Some(3);
        req.max_team_size = Some(5);

        let draft = req.into_draft(None).unwrap();
        assert_eq!(draft.team_size, 3);
        assert_eq!(draft.min_team_size, Some(3));
        assert_eq!(draft.max_team_size, Some(5));
    }

    #[test]
    fn test_rejects_inverted_bounds_and_negative_fees() {
        let mut req = create_request();
        req.min_team_size = Some(4);
        req.max_team_size = Some(2);
        assert!(req.into_draft(None).is_err());

        let mut req = create_request();
        req.fees = Some(Decimal::from(-10));
        assert!(req.into_draft(None).is_err());
    }

    #[test]
    fn test_update_team_size_fills_missing_bounds() {
        let existing = create_request().into_draft(None).unwrap();
        let event = Event {
            id: Uuid::new_v4(),
            name: existing.name,
            description: None,
            venue: None,
            event_date: None,
            day: 1,
            category: existing.category,
            rules: vec![],
            prizes: vec![],
            fees: Decimal::ZERO,
            team_size: 1,
            min_team_size: Some(1),
            max_team_size: Some(1),
            is_variable_team_size: false,
            registration_open: true,
            managed_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let patch = UpdateEventRequest {
            team_size: Some(2),
            ..Default::default()
        };
        let draft = patch.merge_into(&event).unwrap();
        assert_eq!(draft.team_size, 2);
        assert_eq!(draft.min_team_size, Some(2));
        assert_eq!(draft.max_team_size, Some(2));

        let patch = UpdateEventRequest {
            team_size: Some(2),
            min_team_size: Some(4),
            max_team_size: Some(6),
            ..Default::default()
        };
        let draft = patch.merge_into(&event).unwrap();
        assert_eq!(draft.team_size, 4);
        assert_eq!(draft.name, "Robo Wars");
    }
}

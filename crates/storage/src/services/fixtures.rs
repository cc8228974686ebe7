use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dto::registration::RegistrationRequest;
use crate::models::{Actor, Event, Principal, TeamLeaderDetails, TeamMember};

/// Open, free event with a fixed team size.
pub(crate) fn free_event(team_size: i32) -> Event {
    Event {
        id: Uuid::new_v4(),
        name: "Code Relay".to_string(),
        description: None,
        venue: Some("Main Auditorium".to_string()),
        event_date: None,
        day: 1,
        category: "technical".to_string(),
        rules: vec![],
        prizes: vec![],
        fees: Decimal::ZERO,
        team_size,
        min_team_size: None,
        max_team_size: None,
        is_variable_team_size: false,
        registration_open: true,
        managed_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub(crate) fn leader() -> TeamLeaderDetails {
    TeamLeaderDetails {
        college_name: "RV College of Engineering".to_string(),
        usn: "1RV21CS001".to_string(),
    }
}

pub(crate) fn member(name: &str) -> TeamMember {
    TeamMember {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        mobile: "9876543210".to_string(),
        usn: None,
        college_name: None,
    }
}

pub(crate) fn request(team_size: i32) -> RegistrationRequest {
    RegistrationRequest {
        team_name: Some("Byte Me".to_string()),
        team_members: vec![],
        team_size,
        team_leader_details: Some(leader()),
        payment_id: None,
        order_id: None,
        transaction_id: None,
    }
}

pub(crate) fn user() -> Actor {
    Actor::RegularUser(Principal::new(Uuid::new_v4()).with_email("participant@example.com"))
}

pub(crate) fn proxy() -> Actor {
    Actor::TeamProxy(Principal::new(Uuid::new_v4()))
}

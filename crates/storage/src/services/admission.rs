use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::registration::{NewRegistration, RegistrationRequest};
use crate::error::{RegistrationError, RegistrationResult};
use crate::models::{Actor, Event, PaymentStatus, Registration, TeamLeaderDetails};
use crate::traits::{EventRegistry, RegistrationLedger};

/// Whether paid events demand a payment reference at registration time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentEnforcement {
    /// A `paymentId` or `orderId` must accompany the request.
    #[default]
    Strict,
    /// Accept without a reference; the record stays `pending` until reconciled.
    Bypass,
}

impl PaymentEnforcement {
    /// Initial payment status of a newly admitted registration.
    pub fn initial_status(self, fees: Decimal) -> PaymentStatus {
        if fees <= Decimal::ZERO {
            return PaymentStatus::NotRequired;
        }
        match self {
            Self::Strict => PaymentStatus::Completed,
            Self::Bypass => PaymentStatus::Pending,
        }
    }
}

impl fmt::Display for PaymentEnforcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Bypass => f.write_str("bypass"),
        }
    }
}

impl FromStr for PaymentEnforcement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "bypass" => Ok(Self::Bypass),
            other => Err(format!(
                "unknown payment enforcement '{other}', expected 'strict' or 'bypass'"
            )),
        }
    }
}

/// Load the event and run the checks every admission path shares:
/// open for registration, team size, team name, leader details.
pub(crate) async fn load_admissible_event(
    events: &dyn EventRegistry,
    event_id: Uuid,
    payload: &RegistrationRequest,
) -> RegistrationResult<(Event, TeamLeaderDetails)> {
    let event = events.find_event(event_id).await?;

    if !event.registration_open {
        return Err(RegistrationError::RegistrationClosed);
    }

    let rule = event.team_size_rule();
    if payload.team_size < 1 || !rule.admits(payload.team_size) {
        return Err(RegistrationError::InvalidTeamSize(rule.describe()));
    }

    if payload.team_size > 2 && payload.team_name().is_none() {
        return Err(RegistrationError::MissingTeamName);
    }

    let leader = match &payload.team_leader_details {
        Some(details) if details.is_complete() => TeamLeaderDetails {
            college_name: details.college_name.trim().to_string(),
            usn: details.usn.trim().to_string(),
        },
        _ => return Err(RegistrationError::MissingLeaderDetails),
    };

    Ok((event, leader))
}

/// Decides whether a self-registration is admitted and writes it to the ledger.
pub struct AdmissionController<'a> {
    events: &'a dyn EventRegistry,
    ledger: &'a dyn RegistrationLedger,
    enforcement: PaymentEnforcement,
}

impl<'a> AdmissionController<'a> {
    pub fn new(
        events: &'a dyn EventRegistry,
        ledger: &'a dyn RegistrationLedger,
        enforcement: PaymentEnforcement,
    ) -> Self {
        Self {
            events,
            ledger,
            enforcement,
        }
    }

    /// Validate and persist a registration led by `actor`.
    ///
    /// Checks run in a fixed order and the first failure is returned: role,
    /// event existence and open flag, team size, team name, leader details,
    /// duplicate, payment reference.
    pub async fn submit_registration(
        &self,
        event_id: Uuid,
        actor: &Actor,
        payload: &RegistrationRequest,
    ) -> RegistrationResult<Registration> {
        let Actor::RegularUser(principal) = actor else {
            return Err(RegistrationError::Forbidden(format!(
                "Direct registration is only available to participants, not the '{}' role",
                actor.role()
            )));
        };

        let (event, leader) = load_admissible_event(self.events, event_id, payload).await?;

        if self
            .ledger
            .find_registration(event.id, principal.id)
            .await?
            .is_some()
        {
            tracing::info!(
                event_id = %event.id,
                user_id = %principal.id,
                "Duplicate registration attempt"
            );
            return Err(RegistrationError::AlreadyRegistered);
        }

        if event.is_paid()
            && self.enforcement == PaymentEnforcement::Strict
            && !payload.has_payment_reference()
        {
            return Err(RegistrationError::PaymentRequired {
                event_fees: event.fees,
            });
        }

        let new = NewRegistration {
            event_id: event.id,
            team_leader_id: principal.id,
            team_leader_details: leader,
            team_name: payload.team_name().map(str::to_string),
            team_members: payload.team_members.clone(),
            team_size: payload.team_size,
            spot_registered_by: None,
            payment_id: payload.payment_id().map(str::to_string),
            order_id: payload.order_id().map(str::to_string),
            transaction_id: payload.transaction_id().map(str::to_string),
            payment_status: self.enforcement.initial_status(event.fees),
        };

        // A concurrent request may have inserted between the check above and
        // this write; the ledger constraint turns that into AlreadyRegistered.
        let registration = self.ledger.insert_registration(&new).await?;

        tracing::info!(
            registration_id = %registration.id,
            event_id = %event.id,
            payment_status = registration.payment_status.as_str(),
            "Registration created"
        );

        Ok(registration)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::memory::MemoryStore;
    use crate::models::Principal;
    use crate::services::fixtures::{free_event, leader, request, user};

    async fn submit(
        store: &MemoryStore,
        enforcement: PaymentEnforcement,
        event_id: Uuid,
        actor: &Actor,
        payload: &RegistrationRequest,
    ) -> RegistrationResult<Registration> {
        AdmissionController::new(store, store, enforcement)
            .submit_registration(event_id, actor, payload)
            .await
    }

    #[tokio::test]
    async fn test_free_event_registration_needs_no_payment() {
        let store = MemoryStore::new();
        let event = store.insert_event(free_event(1));

        let registration =
            submit(&store, PaymentEnforcement::Strict, event.id, &user(), &request(1))
                .await
                .unwrap();

        assert_eq!(registration.payment_status, PaymentStatus::NotRequired);
        assert_eq!(registration.spot_registered_by, None);
        assert_eq!(registration.team_leader_details, leader());
        assert_eq!(store.registration_count(), 1);
    }

    #[tokio::test]
    async fn test_team_size_bounds_are_inclusive() {
        let store = MemoryStore::new();
        let mut event = free_event(3);
        event.min_team_size = Some(3);
        event.max_team_size = Some(5);
        let event = store.insert_event(event);

        for size in [1, 2, 6, 9] {
            let err = submit(&store, PaymentEnforcement::Strict, event.id, &user(), &request(size))
                .await
                .unwrap_err();
            match err {
                RegistrationError::InvalidTeamSize(msg) => {
                    assert_eq!(msg, "Team size must be between 3 and 5 members")
                }
                other => panic!("expected InvalidTeamSize for {size}, got {other:?}"),
            }
        }

        for size in 3..=5 {
            submit(&store, PaymentEnforcement::Strict, event.id, &user(), &request(size))
                .await
                .unwrap();
        }
        assert_eq!(store.registration_count(), 3);
    }

    #[tokio::test]
    async fn test_legacy_variable_team_size_caps_size() {
        let store = MemoryStore::new();
        let mut event = free_event(4);
        event.min_team_size = None;
        event.max_team_size = None;
        event.is_variable_team_size = true;
        let event = store.insert_event(event);

        let err = submit(&store, PaymentEnforcement::Strict, event.id, &user(), &request(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::InvalidTeamSize(ref m) if m == "Team size cannot exceed 4"
        ));

        submit(&store, PaymentEnforcement::Strict, event.id, &user(), &request(2))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_closed_event_rejected_regardless_of_payload() {
        let store = MemoryStore::new();
        let mut event = free_event(2);
        event.registration_open = false;
        let event = store.insert_event(event);

        let mut payload = request(7);
        payload.team_name = None;
        payload.team_leader_details = None;

        let err = submit(&store, PaymentEnforcement::Strict, event.id, &user(), &payload)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::RegistrationClosed));
        assert_eq!(store.registration_count(), 0);
    }

    #[tokio::test]
    async fn test_team_name_required_above_two_members() {
        let store = MemoryStore::new();
        let mut event = free_event(3);
        event.min_team_size = Some(1);
        event.max_team_size = Some(4);
        let event = store.insert_event(event);

        let mut payload = request(3);
        payload.team_name = Some("   ".to_string());
        let err = submit(&store, PaymentEnforcement::Strict, event.id, &user(), &payload)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::MissingTeamName));

        let mut pair = request(2);
        pair.team_name = None;
        submit(&store, PaymentEnforcement::Strict, event.id, &user(), &pair)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_leader_details_required() {
        let store = MemoryStore::new();
        let event = store.insert_event(free_event(1));

        let mut payload = request(1);
        payload.team_leader_details = Some(TeamLeaderDetails {
            college_name: "X".to_string(),
            usn: String::new(),
        });

        let err = submit(&store, PaymentEnforcement::Strict, event.id, &user(), &payload)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::MissingLeaderDetails));
    }

    #[tokio::test]
    async fn test_second_submission_is_already_registered() {
        let store = MemoryStore::new();
        let event = store.insert_event(free_event(1));
        let actor = user();

        submit(&store, PaymentEnforcement::Strict, event.id, &actor, &request(1))
            .await
            .unwrap();
        let err = submit(&store, PaymentEnforcement::Strict, event.id, &actor, &request(1))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrationError::AlreadyRegistered));
        assert_eq!(store.registration_count(), 1);
    }

    #[tokio::test]
    async fn test_racing_submissions_store_exactly_one_record() {
        let store = Arc::new(MemoryStore::with_stale_reads());
        let event_id = store.insert_event(free_event(1)).id;
        let actor = user();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let actor = actor.clone();
            handles.push(tokio::spawn(async move {
                submit(&store, PaymentEnforcement::Strict, event_id, &actor, &request(1)).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(RegistrationError::AlreadyRegistered) => {}
                Err(other) => panic!("race loser must see AlreadyRegistered, got {other:?}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.registration_count(), 1);
    }

    #[tokio::test]
    async fn test_paid_event_without_reference_requires_payment() {
        let store = MemoryStore::new();
        let mut event = free_event(3);
        event.fees = Decimal::from(500);
        event.min_team_size = Some(3);
        event.max_team_size = Some(5);
        let event = store.insert_event(event);

        let mut payload = request(4);
        payload.team_name = Some("Alpha".to_string());
        payload.team_leader_details = Some(TeamLeaderDetails {
            college_name: "X".to_string(),
            usn: "1Y2".to_string(),
        });

        let err = submit(&store, PaymentEnforcement::Strict, event.id, &user(), &payload)
            .await
            .unwrap_err();
        match err {
            RegistrationError::PaymentRequired { event_fees } => {
                assert_eq!(event_fees, Decimal::from(500))
            }
            other => panic!("expected PaymentRequired, got {other:?}"),
        }
        assert_eq!(store.registration_count(), 0);
    }

    #[tokio::test]
    async fn test_paid_event_status_follows_enforcement_mode() {
        let store = MemoryStore::new();
        let mut event = free_event(1);
        event.fees = Decimal::from(100);
        let event = store.insert_event(event);

        let mut with_reference = request(1);
        with_reference.order_id = Some("order_42".to_string());
        let strict = submit(&store, PaymentEnforcement::Strict, event.id, &user(), &with_reference)
            .await
            .unwrap();
        assert_eq!(strict.payment_status, PaymentStatus::Completed);
        assert_eq!(strict.order_id.as_deref(), Some("order_42"));

        let bypass = submit(&store, PaymentEnforcement::Bypass, event.id, &user(), &request(1))
            .await
            .unwrap();
        assert_eq!(bypass.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_only_regular_users_may_self_register() {
        let store = MemoryStore::new();
        let event = store.insert_event(free_event(1));

        for actor in [
            Actor::TeamProxy(Principal::new(Uuid::new_v4())),
            Actor::Admin(Principal::new(Uuid::new_v4())),
        ] {
            let err = submit(&store, PaymentEnforcement::Strict, event.id, &actor, &request(1))
                .await
                .unwrap_err();
            assert!(matches!(err, RegistrationError::Forbidden(_)));
        }
    }

    #[tokio::test]
    async fn test_role_check_precedes_event_lookup() {
        let store = MemoryStore::new();
        let proxy = Actor::TeamProxy(Principal::new(Uuid::new_v4()));

        let err = submit(&store, PaymentEnforcement::Strict, Uuid::new_v4(), &proxy, &request(1))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Forbidden(_)));

        let err = submit(&store, PaymentEnforcement::Strict, Uuid::new_v4(), &user(), &request(1))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::NotFound));
    }

    #[test]
    fn test_enforcement_parsing() {
        assert_eq!("STRICT".parse::<PaymentEnforcement>(), Ok(PaymentEnforcement::Strict));
        assert_eq!(" bypass ".parse::<PaymentEnforcement>(), Ok(PaymentEnforcement::Bypass));
        assert!("lenient".parse::<PaymentEnforcement>().is_err());
    }
}

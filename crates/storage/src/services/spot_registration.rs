use chrono::Utc;
use uuid::Uuid;

use super::admission::{PaymentEnforcement, load_admissible_event};
use super::identity::{IdentityGenerator, spot_payment_reference};
use crate::dto::registration::{NewRegistration, RegistrationRequest};
use crate::error::{RegistrationError, RegistrationResult};
use crate::models::{Actor, Registration};
use crate::traits::{EventRegistry, RegistrationLedger};

/// Venue-side registration by a `team` proxy on behalf of walk-in attendees.
///
/// Each call gets a freshly generated team leader, so spot registrations are
/// not deduplicated against each other.
pub struct SpotRegistrationDelegate<'a> {
    events: &'a dyn EventRegistry,
    ledger: &'a dyn RegistrationLedger,
    identities: &'a dyn IdentityGenerator,
    enforcement: PaymentEnforcement,
}

impl<'a> SpotRegistrationDelegate<'a> {
    pub fn new(
        events: &'a dyn EventRegistry,
        ledger: &'a dyn RegistrationLedger,
        identities: &'a dyn IdentityGenerator,
        enforcement: PaymentEnforcement,
    ) -> Self {
        Self {
            events,
            ledger,
            identities,
            enforcement,
        }
    }

    pub async fn spot_register(
        &self,
        event_id: Uuid,
        proxy: &Actor,
        payload: &RegistrationRequest,
    ) -> RegistrationResult<Registration> {
        let Actor::TeamProxy(principal) = proxy else {
            return Err(RegistrationError::Forbidden(
                "Spot registration is restricted to team accounts".to_string(),
            ));
        };

        let (event, leader) = load_admissible_event(self.events, event_id, payload).await?;

        // No authenticated leader to fall back on: the first member is the contact.
        if !payload
            .team_members
            .first()
            .is_some_and(|member| member.is_contactable())
        {
            return Err(RegistrationError::MissingTeamMember);
        }

        let team_leader_id = self.identities.next_id();

        let (order_id, transaction_id) = if event.is_paid() {
            let reference = spot_payment_reference(principal.id, team_leader_id, Utc::now());
            (
                Some(
                    payload
                        .order_id()
                        .map_or_else(|| reference.clone(), str::to_string),
                ),
                Some(
                    payload
                        .transaction_id()
                        .map_or(reference, str::to_string),
                ),
            )
        } else {
            (
                payload.order_id().map(str::to_string),
                payload.transaction_id().map(str::to_string),
            )
        };

        let new = NewRegistration {
            event_id: event.id,
            team_leader_id,
            team_leader_details: leader,
            team_name: payload.team_name().map(str::to_string),
            team_members: payload.team_members.clone(),
            team_size: payload.team_size,
            spot_registered_by: Some(principal.id),
            payment_id: payload.payment_id().map(str::to_string),
            order_id,
            transaction_id,
            payment_status: self.enforcement.initial_status(event.fees),
        };

        let registration = self.ledger.insert_registration(&new).await?;

        tracing::info!(
            registration_id = %registration.id,
            event_id = %event.id,
            proxy_id = %principal.id,
            "Spot registration created"
        );

        Ok(registration)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::memory::MemoryStore;
    use crate::models::PaymentStatus;
    use crate::services::fixtures::{free_event, member, proxy, request, user};
    use crate::services::identity::RandomIdentity;

    struct FixedIdentity(Uuid);

    impl IdentityGenerator for FixedIdentity {
        fn next_id(&self) -> Uuid {
            self.0
        }
    }

    fn spot_request() -> RegistrationRequest {
        let mut payload = request(1);
        payload.team_members = vec![member("A")];
        payload
    }

    #[tokio::test]
    async fn test_spot_registration_uses_synthetic_leader() {
        let store = MemoryStore::new();
        let event = store.insert_event(free_event(1));
        let proxy = proxy();
        let synthetic = Uuid::new_v4();
        let identities = FixedIdentity(synthetic);

        let registration =
            SpotRegistrationDelegate::new(&store, &store, &identities, PaymentEnforcement::Strict)
                .spot_register(event.id, &proxy, &spot_request())
                .await
                .unwrap();

        assert_eq!(registration.team_leader_id, synthetic);
        assert_ne!(registration.team_leader_id, proxy.id());
        assert_eq!(registration.spot_registered_by, Some(proxy.id()));
        assert_eq!(registration.team_members[0].email, "a@example.com");
        assert_eq!(registration.payment_status, PaymentStatus::NotRequired);
    }

    #[tokio::test]
    async fn test_repeated_spot_registrations_are_not_deduplicated() {
        let store = MemoryStore::new();
        let event = store.insert_event(free_event(1));
        let proxy = proxy();
        let delegate = SpotRegistrationDelegate::new(
            &store,
            &store,
            &RandomIdentity,
            PaymentEnforcement::Strict,
        );

        delegate.spot_register(event.id, &proxy, &spot_request()).await.unwrap();
        delegate.spot_register(event.id, &proxy, &spot_request()).await.unwrap();

        assert_eq!(store.registration_count(), 2);
    }

    #[tokio::test]
    async fn test_requires_contactable_first_member() {
        let store = MemoryStore::new();
        let event = store.insert_event(free_event(1));
        let delegate = SpotRegistrationDelegate::new(
            &store,
            &store,
            &RandomIdentity,
            PaymentEnforcement::Strict,
        );

        let err = delegate
            .spot_register(event.id, &proxy(), &request(1))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::MissingTeamMember));

        let mut payload = spot_request();
        payload.team_members[0].mobile.clear();
        let err = delegate
            .spot_register(event.id, &proxy(), &payload)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::MissingTeamMember));
    }

    #[tokio::test]
    async fn test_shares_event_checks_with_self_registration() {
        let store = MemoryStore::new();
        let mut closed = free_event(1);
        closed.registration_open = false;
        let closed = store.insert_event(closed);
        let fixed = store.insert_event(free_event(2));
        let delegate = SpotRegistrationDelegate::new(
            &store,
            &store,
            &RandomIdentity,
            PaymentEnforcement::Strict,
        );

        let err = delegate
            .spot_register(closed.id, &proxy(), &spot_request())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::RegistrationClosed));

        let err = delegate
            .spot_register(fixed.id, &proxy(), &spot_request())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidTeamSize(_)));
    }

    #[tokio::test]
    async fn test_only_team_proxies_may_spot_register() {
        let store = MemoryStore::new();
        let event = store.insert_event(free_event(1));
        let delegate = SpotRegistrationDelegate::new(
            &store,
            &store,
            &RandomIdentity,
            PaymentEnforcement::Strict,
        );

        let err = delegate
            .spot_register(event.id, &user(), &spot_request())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_paid_spot_registration_synthesizes_offline_reference() {
        let store = MemoryStore::new();
        let mut event = free_event(1);
        event.fees = Decimal::from(200);
        let event = store.insert_event(event);
        let proxy = proxy();

        let registration = SpotRegistrationDelegate::new(
            &store,
            &store,
            &RandomIdentity,
            PaymentEnforcement::Bypass,
        )
        .spot_register(event.id, &proxy, &spot_request())
        .await
        .unwrap();

        let reference = registration.order_id.as_deref().unwrap();
        assert!(reference.starts_with(&format!("spot_{}_", proxy.id().simple())));
        assert!(reference.ends_with(&registration.team_leader_id.simple().to_string()));
        assert_eq!(registration.order_id, registration.transaction_id);
        assert_eq!(registration.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_back_to_back_paid_spot_registrations_get_distinct_references() {
        let store = MemoryStore::new();
        let mut event = free_event(1);
        event.fees = Decimal::from(200);
        let event = store.insert_event(event);
        let proxy = proxy();
        let delegate = SpotRegistrationDelegate::new(
            &store,
            &store,
            &RandomIdentity,
            PaymentEnforcement::Bypass,
        );

        let first = delegate.spot_register(event.id, &proxy, &spot_request()).await.unwrap();
        let second = delegate.spot_register(event.id, &proxy, &spot_request()).await.unwrap();

        assert_ne!(first.order_id, second.order_id);
        assert_ne!(first.transaction_id, second.transaction_id);
    }

    #[tokio::test]
    async fn test_paid_spot_registration_keeps_supplied_transaction_id() {
        let store = MemoryStore::new();
        let mut event = free_event(1);
        event.fees = Decimal::from(200);
        let event = store.insert_event(event);

        let mut payload = spot_request();
        payload.transaction_id = Some("UPI-778899".to_string());

        let registration = SpotRegistrationDelegate::new(
            &store,
            &store,
            &RandomIdentity,
            PaymentEnforcement::Strict,
        )
        .spot_register(event.id, &proxy(), &payload)
        .await
        .unwrap();

        assert_eq!(registration.transaction_id.as_deref(), Some("UPI-778899"));
        assert!(registration.order_id.as_deref().unwrap().starts_with("spot_"));
        assert_eq!(registration.payment_status, PaymentStatus::Completed);
    }
}

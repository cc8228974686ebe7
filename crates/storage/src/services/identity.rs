use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Source of opaque team-leader identities for proxy-created registrations.
///
/// Generated ids are never derived from the proxy's own identity; the proxy is
/// linked only through `Registration::spot_registered_by`.
pub trait IdentityGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdentity;

impl IdentityGenerator for RandomIdentity {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Offline payment reference for a spot registration, tagged with the proxy,
/// the moment it was taken and the generated leader:
/// `spot_<proxy>_<unix millis>_<leader>`.
pub fn spot_payment_reference(proxy_id: Uuid, leader_id: Uuid, at: DateTime<Utc>) -> String {
    format!(
        "spot_{}_{}_{}",
        proxy_id.simple(),
        at.timestamp_millis(),
        leader_id.simple()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_random_identities_differ() {
        let generator = RandomIdentity;
        assert_ne!(generator.next_id(), generator.next_id());
    }

    #[test]
    fn test_spot_reference_is_deterministic() {
        let proxy = Uuid::from_u128(0xabc);
        let leader = Uuid::from_u128(0xdef);
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

        let reference = spot_payment_reference(proxy, leader, at);
        assert_eq!(reference, spot_payment_reference(proxy, leader, at));
        assert_eq!(
            reference,
            "spot_00000000000000000000000000000abc_1700000000123_00000000000000000000000000000def"
        );
    }

    #[test]
    fn test_spot_references_in_same_millisecond_differ_by_leader() {
        let proxy = Uuid::from_u128(0xabc);
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

        assert_ne!(
            spot_payment_reference(proxy, Uuid::from_u128(1), at),
            spot_payment_reference(proxy, Uuid::from_u128(2), at)
        );
    }
}

pub mod admission;
pub mod identity;
pub mod payment;
pub mod spot_registration;

pub use admission::{AdmissionController, PaymentEnforcement};
pub use identity::{IdentityGenerator, RandomIdentity};
pub use payment::{PaymentOutcome, PaymentStateMachine};
pub use spot_registration::SpotRegistrationDelegate;

#[cfg(test)]
pub(crate) mod fixtures;

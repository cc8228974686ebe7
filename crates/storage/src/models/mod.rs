mod actor;
mod event;
mod registration;

pub use actor::{Actor, Principal, Role};
pub use event::{Event, TeamSizeRule};
pub use registration::{
    PaymentStatus, Registration, RegistrationWithEvent, TeamLeaderDetails, TeamMember,
};

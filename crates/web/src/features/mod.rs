pub mod admin;
pub mod events;
pub mod payments;
pub mod registrations;

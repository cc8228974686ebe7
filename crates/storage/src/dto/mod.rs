pub mod common;
pub mod event;
pub mod payment;
pub mod registration;

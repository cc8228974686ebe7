use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::event::EventDraft;
use crate::dto::registration::{NewRegistration, RegistrationFilter};
use crate::error::Result;
use crate::models::{Event, PaymentStatus, Registration, RegistrationWithEvent};

/// Read and admin-write access to event definitions.
#[async_trait]
pub trait EventRegistry: Send + Sync {
    /// Fails with `StorageError::NotFound` for unknown ids.
    async fn find_event(&self, id: Uuid) -> Result<Event>;

    async fn list_events(&self) -> Result<Vec<Event>>;

    async fn create_event(&self, draft: &EventDraft) -> Result<Event>;

    async fn update_event(&self, id: Uuid, draft: &EventDraft) -> Result<Event>;

    /// Flip `registration_open` atomically and return the updated event.
    async fn toggle_registration(&self, id: Uuid) -> Result<Event>;

    async fn assign_manager(&self, id: Uuid, manager_id: Uuid) -> Result<Event>;

    async fn delete_event(&self, id: Uuid) -> Result<()>;
}

/// The set of registration records.
///
/// Implementations must enforce uniqueness of `(event_id, team_leader_id)` at
/// write time and report a lost race as `StorageError::DuplicateKey`.
#[async_trait]
pub trait RegistrationLedger: Send + Sync {
    async fn find_registration(
        &self,
        event_id: Uuid,
        team_leader_id: Uuid,
    ) -> Result<Option<Registration>>;

    async fn insert_registration(&self, registration: &NewRegistration) -> Result<Registration>;

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Registration>>;

    /// Compare-and-set on `payment_status`.
    ///
    /// Returns `None` when the row is no longer in `from`, leaving it untouched.
    async fn update_payment_status(
        &self,
        id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
        payment_id: Option<&str>,
    ) -> Result<Option<Registration>>;

    /// Registrations led by, or spot-registered by, `actor_id`; newest first.
    async fn list_for_actor(&self, actor_id: Uuid) -> Result<Vec<RegistrationWithEvent>>;

    async fn list_registrations(
        &self,
        filter: &RegistrationFilter,
        pagination: PaginationParams,
    ) -> Result<(Vec<RegistrationWithEvent>, i64)>;

    async fn delete_registration(&self, id: Uuid) -> Result<()>;
}

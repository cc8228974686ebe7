pub mod event;
pub mod registration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::Database;
use crate::dto::common::PaginationParams;
use crate::dto::event::EventDraft;
use crate::dto::registration::{NewRegistration, RegistrationFilter};
use crate::error::Result;
use crate::models::{Event, PaymentStatus, Registration, RegistrationWithEvent};
use crate::traits::{EventRegistry, RegistrationLedger};

use self::event::EventRepository;
use self::registration::RegistrationRepository;

#[async_trait]
impl EventRegistry for Database {
    async fn find_event(&self, id: Uuid) -> Result<Event> {
        EventRepository::new(self.pool()).find_by_id(id).await
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        EventRepository::new(self.pool()).list().await
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Event> {
        EventRepository::new(self.pool()).create(draft).await
    }

    async fn update_event(&self, id: Uuid, draft: &EventDraft) -> Result<Event> {
        EventRepository::new(self.pool()).update(id, draft).await
    }

    async fn toggle_registration(&self, id: Uuid) -> Result<Event> {
        EventRepository::new(self.pool()).toggle_registration(id).await
    }

    async fn assign_manager(&self, id: Uuid, manager_id: Uuid) -> Result<Event> {
        EventRepository::new(self.pool())
            .assign_manager(id, manager_id)
            .await
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        EventRepository::new(self.pool()).delete(id).await
    }
}

#[async_trait]
impl RegistrationLedger for Database {
    async fn find_registration(
        &self,
        event_id: Uuid,
        team_leader_id: Uuid,
    ) -> Result<Option<Registration>> {
        RegistrationRepository::new(self.pool())
            .find_by_event_and_leader(event_id, team_leader_id)
            .await
    }

    async fn insert_registration(&self, registration: &NewRegistration) -> Result<Registration> {
        RegistrationRepository::new(self.pool())
            .create(registration)
            .await
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Registration>> {
        RegistrationRepository::new(self.pool())
            .find_by_order_id(order_id)
            .await
    }

    async fn update_payment_status(
        &self,
        id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
        payment_id: Option<&str>,
    ) -> Result<Option<Registration>> {
        RegistrationRepository::new(self.pool())
            .update_payment_status(id, from, to, payment_id)
            .await
    }

    async fn list_for_actor(&self, actor_id: Uuid) -> Result<Vec<RegistrationWithEvent>> {
        RegistrationRepository::new(self.pool())
            .list_for_actor(actor_id)
            .await
    }

    async fn list_registrations(
        &self,
        filter: &RegistrationFilter,
        pagination: PaginationParams,
    ) -> Result<(Vec<RegistrationWithEvent>, i64)> {
        RegistrationRepository::new(self.pool())
            .list(filter, pagination)
            .await
    }

    async fn delete_registration(&self, id: Uuid) -> Result<()> {
        RegistrationRepository::new(self.pool()).delete(id).await
    }
}

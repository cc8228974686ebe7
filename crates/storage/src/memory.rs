//! In-memory `EventRegistry` and `RegistrationLedger` for tests.
//!
//! Enforces the same `(event_id, team_leader_id)` uniqueness as the Postgres
//! constraint, atomically under a single lock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::event::EventDraft;
use crate::dto::registration::{NewRegistration, RegistrationFilter};
use crate::error::{Result, StorageError};
use crate::models::{Event, PaymentStatus, Registration, RegistrationWithEvent};
use crate::traits::{EventRegistry, RegistrationLedger};

#[derive(Default)]
struct Inner {
    events: HashMap<Uuid, Event>,
    registrations: Vec<Registration>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    stale_reads: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `find_registration` never sees existing rows, so the
    /// application-level duplicate check always passes and only the insert-time
    /// constraint can stop a second registration. Simulates two requests racing.
    pub fn with_stale_reads() -> Self {
        Self {
            stale_reads: true,
            ..Self::default()
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert_event(&self, event: Event) -> Event {
        self.lock().events.insert(event.id, event.clone());
        event
    }

    pub fn registrations(&self) -> Vec<Registration> {
        self.lock().registrations.clone()
    }

    pub fn registration_count(&self) -> usize {
        self.lock().registrations.len()
    }
}

fn event_from_draft(id: Uuid, draft: &EventDraft) -> Event {
    let now = Utc::now();
    Event {
        id,
        name: draft.name.clone(),
        description: draft.description.clone(),
        venue: draft.venue.clone(),
        event_date: draft.event_date,
        day: draft.day,
        category: draft.category.clone(),
        rules: draft.rules.clone(),
        prizes: draft.prizes.clone(),
        fees: draft.fees,
        team_size: draft.team_size,
        min_team_size: draft.min_team_size,
        max_team_size: draft.max_team_size,
        is_variable_team_size: draft.is_variable_team_size,
        registration_open: draft.registration_open,
        managed_by: draft.managed_by,
        created_at: now,
        updated_at: now,
    }
}

fn with_event_name(inner: &Inner, registration: &Registration) -> RegistrationWithEvent {
    RegistrationWithEvent {
        registration: registration.clone(),
        event_name: inner
            .events
            .get(&registration.event_id)
            .map(|e| e.name.clone())
            .unwrap_or_default(),
    }
}

#[async_trait]
impl EventRegistry for MemoryStore {
    async fn find_event(&self, id: Uuid) -> Result<Event> {
        self.lock()
            .events
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self.lock().events.values().cloned().collect();
        events.sort_by(|a, b| a.day.cmp(&b.day).then_with(|| a.name.cmp(&b.name)));
        Ok(events)
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Event> {
        let event = event_from_draft(Uuid::new_v4(), draft);
        self.lock().events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: Uuid, draft: &EventDraft) -> Result<Event> {
        let mut inner = self.lock();
        let existing = inner.events.get_mut(&id).ok_or(StorageError::NotFound)?;
        let created_at = existing.created_at;
        let managed_by = existing.managed_by;

        *existing = event_from_draft(id, draft);
        existing.created_at = created_at;
        existing.managed_by = managed_by;
        Ok(existing.clone())
    }

    async fn toggle_registration(&self, id: Uuid) -> Result<Event> {
        let mut inner = self.lock();
        let event = inner.events.get_mut(&id).ok_or(StorageError::NotFound)?;
        event.registration_open = !event.registration_open;
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    async fn assign_manager(&self, id: Uuid, manager_id: Uuid) -> Result<Event> {
        let mut inner = self.lock();
        let event = inner.events.get_mut(&id).ok_or(StorageError::NotFound)?;
        event.managed_by = Some(manager_id);
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        let mut inner = self.lock();
        inner.events.remove(&id).ok_or(StorageError::NotFound)?;
        inner.registrations.retain(|r| r.event_id != id);
        Ok(())
    }
}

#[async_trait]
impl RegistrationLedger for MemoryStore {
    async fn find_registration(
        &self,
        event_id: Uuid,
        team_leader_id: Uuid,
    ) -> Result<Option<Registration>> {
        if self.stale_reads {
            return Ok(None);
        }

        Ok(self
            .lock()
            .registrations
            .iter()
            .find(|r| r.event_id == event_id && r.team_leader_id == team_leader_id)
            .cloned())
    }

    async fn insert_registration(&self, new: &NewRegistration) -> Result<Registration> {
        let mut inner = self.lock();

        if !inner.events.contains_key(&new.event_id) {
            return Err(StorageError::ConstraintViolation(
                "registration: referenced row missing".to_string(),
            ));
        }

        if inner
            .registrations
            .iter()
            .any(|r| r.event_id == new.event_id && r.team_leader_id == new.team_leader_id)
        {
            return Err(StorageError::DuplicateKey(
                "registration for this event and team leader".to_string(),
            ));
        }

        let now = Utc::now();
        let registration = Registration {
            id: Uuid::new_v4(),
            event_id: new.event_id,
            team_leader_id: new.team_leader_id,
            team_leader_details: new.team_leader_details.clone(),
            team_name: new.team_name.clone(),
            team_members: new.team_members.clone(),
            team_size: new.team_size,
            spot_registered_by: new.spot_registered_by,
            payment_id: new.payment_id.clone(),
            order_id: new.order_id.clone(),
            transaction_id: new.transaction_id.clone(),
            payment_status: new.payment_status,
            registered_at: now,
            updated_at: now,
        };
        inner.registrations.push(registration.clone());
        Ok(registration)
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Registration>> {
        Ok(self
            .lock()
            .registrations
            .iter()
            .rev()
            .find(|r| r.order_id.as_deref() == Some(order_id))
            .cloned())
    }

    async fn update_payment_status(
        &self,
        id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
        payment_id: Option<&str>,
    ) -> Result<Option<Registration>> {
        let mut inner = self.lock();
        let Some(registration) = inner
            .registrations
            .iter_mut()
            .find(|r| r.id == id && r.payment_status == from)
        else {
            return Ok(None);
        };

        registration.payment_status = to;
        if let Some(payment_id) = payment_id {
            registration.payment_id = Some(payment_id.to_string());
        }
        registration.updated_at = Utc::now();
        Ok(Some(registration.clone()))
    }

    async fn list_for_actor(&self, actor_id: Uuid) -> Result<Vec<RegistrationWithEvent>> {
        let inner = self.lock();
        let mut rows: Vec<RegistrationWithEvent> = inner
            .registrations
            .iter()
            .filter(|r| r.team_leader_id == actor_id || r.spot_registered_by == Some(actor_id))
            .map(|r| with_event_name(&inner, r))
            .collect();
        rows.sort_by(|a, b| b.registration.registered_at.cmp(&a.registration.registered_at));
        Ok(rows)
    }

    async fn list_registrations(
        &self,
        filter: &RegistrationFilter,
        pagination: PaginationParams,
    ) -> Result<(Vec<RegistrationWithEvent>, i64)> {
        let inner = self.lock();
        let mut matching: Vec<&Registration> = inner
            .registrations
            .iter()
            .filter(|r| filter.event_id.is_none_or(|id| r.event_id == id))
            .filter(|r| filter.payment_status.is_none_or(|s| r.payment_status == s))
            .collect();
        matching.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .map(|r| with_event_name(&inner, r))
            .collect();
        Ok((page, total))
    }

    async fn delete_registration(&self, id: Uuid) -> Result<()> {
        let mut inner = self.lock();
        let before = inner.registrations.len();
        inner.registrations.retain(|r| r.id != id);
        if inner.registrations.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

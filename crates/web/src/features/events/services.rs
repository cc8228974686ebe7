use storage::{
    dto::event::CreateEventRequest,
    models::{Actor, Event},
    traits::EventRegistry,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

/// List all events
pub async fn list_events(events: &dyn EventRegistry) -> WebResult<Vec<Event>> {
    Ok(events.list_events().await?)
}

/// Get event by id
pub async fn get_event(events: &dyn EventRegistry, id: Uuid) -> WebResult<Event> {
    Ok(events.find_event(id).await?)
}

/// Create an event managed by `actor`. Admins and team accounts only.
pub async fn create_event(
    events: &dyn EventRegistry,
    actor: &Actor,
    request: CreateEventRequest,
) -> WebResult<Event> {
    let managed_by = match actor {
        Actor::Admin(p) | Actor::TeamProxy(p) => p.id,
        Actor::RegularUser(_) => {
            return Err(WebError::Forbidden(
                "Only admin and team accounts can create events".to_string(),
            ));
        }
    };

    let draft = request
        .into_draft(Some(managed_by))
        .map_err(WebError::BadRequest)?;

    let event = events.create_event(&draft).await?;
    tracing::info!(event_id = %event.id, created_by = %managed_by, "Event created");
    Ok(event)
}

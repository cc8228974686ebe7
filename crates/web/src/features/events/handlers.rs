use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{dto::event::CreateEventRequest, models::{Actor, Event}};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "List all events successfully", body = Vec<Event>)
    ),
    tag = "events"
)]
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, WebError> {
    let events = services::list_events(state.events.as_ref()).await?;

    Ok(Json(events))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let event = services::get_event(state.events.as_ref(), id).await?;

    Ok(Json(event).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Event created successfully", body = Event),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only admin and team accounts can create events")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let event = services::create_event(state.events.as_ref(), &actor, req).await?;

    Ok((StatusCode::CREATED, Json(event)).into_response())
}

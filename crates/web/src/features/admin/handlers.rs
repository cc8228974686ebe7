use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use storage::{
    dto::{
        common::PaginatedResponse,
        event::{ToggleRegistrationResponse, UpdateEventRequest},
        registration::RegistrationFilter,
    },
    models::{Event, RegistrationWithEvent},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    put,
    path = "/api/admin/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    request_body = UpdateEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event updated successfully", body = Event),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Event not found")
    ),
    tag = "admin"
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update_req): Json<UpdateEventRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_event(state.events.as_ref(), id, update_req).await?;

    Ok(Json(updated).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/admin/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Event and its registrations deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Event not found")
    ),
    tag = "admin"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_event(state.events.as_ref(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    patch,
    path = "/api/admin/events/{id}/toggle-registration",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Registration flag flipped", body = ToggleRegistrationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Event not found")
    ),
    tag = "admin"
)]
pub async fn toggle_registration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleRegistrationResponse>, WebError> {
    let response = services::toggle_registration(state.events.as_ref(), id).await?;

    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/admin/events/{id}/manager/{user_id}",
    params(
        ("id" = Uuid, Path, description = "Event id"),
        ("user_id" = Uuid, Path, description = "Account that will manage the event")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Manager assigned", body = Event),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Event not found")
    ),
    tag = "admin"
)]
pub async fn assign_manager(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Event>, WebError> {
    let event = services::assign_manager(state.events.as_ref(), id, user_id).await?;

    Ok(Json(event))
}

#[utoipa::path(
    get,
    path = "/api/admin/registrations",
    params(RegistrationFilter),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Registrations retrieved successfully", body = PaginatedResponse<RegistrationWithEvent>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "admin"
)]
pub async fn list_registrations(
    State(state): State<AppState>,
    Query(filter): Query<RegistrationFilter>,
) -> Result<Response, WebError> {
    let response = services::list_registrations(state.ledger.as_ref(), &filter).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/registrations/export",
    params(RegistrationFilter),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All matching registrations as CSV", body = String, content_type = "text/csv"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "admin"
)]
pub async fn export_registrations(
    State(state): State<AppState>,
    Query(filter): Query<RegistrationFilter>,
) -> Result<Response, WebError> {
    let csv = services::export_registrations(state.ledger.as_ref(), &filter).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"registrations.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/admin/registrations/{id}",
    params(
        ("id" = Uuid, Path, description = "Registration id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Registration deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Registration not found")
    ),
    tag = "admin"
)]
pub async fn delete_registration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_registration(state.ledger.as_ref(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

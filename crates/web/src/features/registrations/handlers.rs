use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::registration::{
        CheckRegistrationResponse, RegistrationCreatedResponse, RegistrationRequest,
    },
    models::{Actor, RegistrationWithEvent},
};
use uuid::Uuid;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/registrations/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    request_body = RegistrationRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Registration created", body = RegistrationCreatedResponse),
        (status = 400, description = "Team rules violated, payment missing or already registered"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Wrong role or registration closed"),
        (status = 404, description = "Event not found")
    ),
    tag = "registrations"
)]
pub async fn submit_registration(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<RegistrationRequest>,
) -> Result<Response, WebError> {
    let created = services::submit_registration(&state, event_id, &actor, &req).await?;

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/registrations/spot/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    request_body = RegistrationRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Spot registration created", body = RegistrationCreatedResponse),
        (status = 400, description = "Team rules violated"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a team account or registration closed"),
        (status = 404, description = "Event not found")
    ),
    tag = "registrations"
)]
pub async fn spot_register(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<RegistrationRequest>,
) -> Result<Response, WebError> {
    let created = services::spot_register(&state, event_id, &actor, &req).await?;

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/registrations/me",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Registrations led or spot-registered by the caller", body = Vec<RegistrationWithEvent>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "registrations"
)]
pub async fn list_my_registrations(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<RegistrationWithEvent>>, WebError> {
    let registrations = services::list_my_registrations(&state, &actor).await?;

    Ok(Json(registrations))
}

#[utoipa::path(
    get,
    path = "/api/registrations/check/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Registration status for the caller", body = CheckRegistrationResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "registrations"
)]
pub async fn check_registration(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<CheckRegistrationResponse>, WebError> {
    let status = services::check_registration(&state, event_id, &actor).await?;

    Ok(Json(status))
}

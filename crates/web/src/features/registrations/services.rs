use storage::{
    dto::registration::{
        CheckRegistrationResponse, RegistrationCreatedResponse, RegistrationRequest,
    },
    models::{Actor, Registration, RegistrationWithEvent},
    services::{AdmissionController, SpotRegistrationDelegate},
};
use uuid::Uuid;

use crate::error::WebResult;
use crate::notifier::Confirmation;
use crate::state::AppState;

const CONFIRMATION_NOT_SENT: &str =
    "Registration saved, but the confirmation email could not be sent";
const CONFIRMATION_NO_ADDRESS: &str =
    "Registration saved, but no email address is available for the confirmation";

/// Register the authenticated participant as team leader.
pub async fn submit_registration(
    state: &AppState,
    event_id: Uuid,
    actor: &Actor,
    request: &RegistrationRequest,
) -> WebResult<RegistrationCreatedResponse> {
    let controller =
        AdmissionController::new(state.events.as_ref(), state.ledger.as_ref(), state.enforcement);

    let registration = controller
        .submit_registration(event_id, actor, request)
        .await?;

    let warning = send_confirmation(state, &registration, actor.email(), None).await;

    Ok(RegistrationCreatedResponse {
        registration,
        warning,
    })
}

/// Register a walk-in team on behalf of its members.
pub async fn spot_register(
    state: &AppState,
    event_id: Uuid,
    proxy: &Actor,
    request: &RegistrationRequest,
) -> WebResult<RegistrationCreatedResponse> {
    let delegate = SpotRegistrationDelegate::new(
        state.events.as_ref(),
        state.ledger.as_ref(),
        state.identities.as_ref(),
        state.enforcement,
    );

    let registration = delegate.spot_register(event_id, proxy, request).await?;

    let contact = registration.team_members.first().cloned();
    let warning = send_confirmation(
        state,
        &registration,
        contact.as_ref().map(|m| m.email.as_str()),
        contact.as_ref().map(|m| m.name.as_str()),
    )
    .await;

    Ok(RegistrationCreatedResponse {
        registration,
        warning,
    })
}

pub async fn list_my_registrations(
    state: &AppState,
    actor: &Actor,
) -> WebResult<Vec<RegistrationWithEvent>> {
    Ok(state.ledger.list_for_actor(actor.id()).await?)
}

pub async fn check_registration(
    state: &AppState,
    event_id: Uuid,
    actor: &Actor,
) -> WebResult<CheckRegistrationResponse> {
    let registration = state.ledger.find_registration(event_id, actor.id()).await?;

    Ok(CheckRegistrationResponse::from(registration))
}

/// Best effort: the registration already stands, so any failure here is
/// reported as a warning instead of an error.
async fn send_confirmation(
    state: &AppState,
    registration: &Registration,
    to: Option<&str>,
    recipient_name: Option<&str>,
) -> Option<String> {
    let Some(to) = to.map(str::trim).filter(|to| !to.is_empty()) else {
        tracing::warn!(registration_id = %registration.id, "No address for confirmation");
        return Some(CONFIRMATION_NO_ADDRESS.to_string());
    };

    let event_name = match state.events.find_event(registration.event_id).await {
        Ok(event) => event.name,
        Err(e) => {
            tracing::warn!(
                registration_id = %registration.id,
                "Event lookup for confirmation failed: {}",
                e
            );
            return Some(CONFIRMATION_NOT_SENT.to_string());
        }
    };

    let confirmation = Confirmation {
        to: to.to_string(),
        recipient_name: recipient_name.map(str::to_string),
        event_name,
        registration_id: registration.id,
        team_name: registration.team_name.clone(),
        team_size: registration.team_size,
        payment_status: registration.payment_status,
    };

    match tokio::time::timeout(
        state.notify_timeout,
        state.notifier.send_confirmation(&confirmation),
    )
    .await
    {
        Ok(Ok(())) => None,
        Ok(Err(e)) => {
            tracing::warn!(registration_id = %registration.id, "Confirmation failed: {}", e);
            Some(CONFIRMATION_NOT_SENT.to_string())
        }
        Err(_) => {
            tracing::warn!(
                registration_id = %registration.id,
                timeout_secs = state.notify_timeout.as_secs(),
                "Confirmation timed out"
            );
            Some(CONFIRMATION_NOT_SENT.to_string())
        }
    }
}

use storage::{
    dto::{
        common::{MAX_PAGE_SIZE, PaginatedResponse, PaginationParams},
        event::{ToggleRegistrationResponse, UpdateEventRequest},
        registration::RegistrationFilter,
    },
    models::{Event, Registration, RegistrationWithEvent},
    traits::{EventRegistry, RegistrationLedger},
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

/// Update an event; absent fields keep their current value
pub async fn update_event(
    events: &dyn EventRegistry,
    id: Uuid,
    request: UpdateEventRequest,
) -> WebResult<Event> {
    let existing = events.find_event(id).await?;
    let draft = request
        .merge_into(&existing)
        .map_err(WebError::BadRequest)?;

    Ok(events.update_event(id, &draft).await?)
}

pub async fn toggle_registration(
    events: &dyn EventRegistry,
    id: Uuid,
) -> WebResult<ToggleRegistrationResponse> {
    let event = events.toggle_registration(id).await?;
    tracing::info!(event_id = %id, open = event.registration_open, "Registration toggled");

    Ok(ToggleRegistrationResponse {
        message: format!(
            "Registration {} for {}",
            if event.registration_open { "opened" } else { "closed" },
            event.name
        ),
        registration_open: event.registration_open,
        event,
    })
}

pub async fn assign_manager(
    events: &dyn EventRegistry,
    id: Uuid,
    manager_id: Uuid,
) -> WebResult<Event> {
    let event = events.assign_manager(id, manager_id).await?;
    tracing::info!(event_id = %id, manager_id = %manager_id, "Event manager assigned");
    Ok(event)
}

/// Delete an event together with its registrations
pub async fn delete_event(events: &dyn EventRegistry, id: Uuid) -> WebResult<()> {
    events.delete_event(id).await?;
    tracing::info!(event_id = %id, "Event deleted");
    Ok(())
}

pub async fn list_registrations(
    ledger: &dyn RegistrationLedger,
    filter: &RegistrationFilter,
) -> WebResult<PaginatedResponse<RegistrationWithEvent>> {
    let pagination = PaginationParams::new(filter.page, filter.page_size);
    pagination.validate().map_err(WebError::BadRequest)?;

    let (registrations, total_items) = ledger.list_registrations(filter, pagination).await?;

    Ok(PaginatedResponse::new(registrations, pagination, total_items))
}

pub async fn delete_registration(ledger: &dyn RegistrationLedger, id: Uuid) -> WebResult<()> {
    ledger.delete_registration(id).await?;
    tracing::info!(registration_id = %id, "Registration deleted by admin");
    Ok(())
}

const EXPORT_HEADERS: [&str; 16] = [
    "registrationId",
    "eventName",
    "teamName",
    "teamSize",
    "leaderCollege",
    "leaderUsn",
    "contactName",
    "contactEmail",
    "contactMobile",
    "members",
    "paymentStatus",
    "orderId",
    "paymentId",
    "transactionId",
    "spotRegisteredBy",
    "registeredAt",
];

fn export_record(entry: &RegistrationWithEvent) -> [String; 16] {
    let Registration {
        id,
        team_leader_details,
        team_name,
        team_members,
        team_size,
        spot_registered_by,
        payment_id,
        order_id,
        transaction_id,
        payment_status,
        registered_at,
        ..
    } = &entry.registration;
    let contact = team_members.first();
    let members = team_members
        .iter()
        .map(|m| format!("{} <{}> {}", m.name, m.email, m.mobile))
        .collect::<Vec<_>>()
        .join("; ");

    [
        id.to_string(),
        entry.event_name.clone(),
        team_name.clone().unwrap_or_default(),
        team_size.to_string(),
        team_leader_details.college_name.clone(),
        team_leader_details.usn.clone(),
        contact.map(|m| m.name.clone()).unwrap_or_default(),
        contact.map(|m| m.email.clone()).unwrap_or_default(),
        contact.map(|m| m.mobile.clone()).unwrap_or_default(),
        members,
        payment_status.as_str().to_string(),
        order_id.clone().unwrap_or_default(),
        payment_id.clone().unwrap_or_default(),
        transaction_id.clone().unwrap_or_default(),
        spot_registered_by.map(|id| id.to_string()).unwrap_or_default(),
        registered_at.to_rfc3339(),
    ]
}

fn export_error(e: impl std::fmt::Display) -> WebError {
    tracing::error!("Registration export failed: {}", e);
    WebError::InternalServerError(e.to_string())
}

/// Every registration matching the filter as CSV, newest first.
///
/// `page` and `pageSize` on the filter are ignored; the ledger is walked page
/// by page until exhausted.
pub async fn export_registrations(
    ledger: &dyn RegistrationLedger,
    filter: &RegistrationFilter,
) -> WebResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS).map_err(export_error)?;

    let mut page = 1;
    let mut exported = 0usize;
    loop {
        let pagination = PaginationParams::new(Some(page), Some(MAX_PAGE_SIZE));
        let (registrations, total_items) = ledger.list_registrations(filter, pagination).await?;

        for entry in &registrations {
            writer
                .write_record(export_record(entry))
                .map_err(export_error)?;
        }
        exported += registrations.len();

        if registrations.len() < MAX_PAGE_SIZE as usize
            || i64::try_from(exported).unwrap_or(i64::MAX) >= total_items
        {
            break;
        }
        page += 1;
    }

    tracing::info!(
        event_id = ?filter.event_id,
        rows = exported,
        "Registrations exported"
    );

    writer.into_inner().map_err(export_error)
}

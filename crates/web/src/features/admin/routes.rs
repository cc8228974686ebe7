use axum::{
    Router, middleware,
    routing::{delete, get, patch, put},
};

use super::handlers::{
    assign_manager, delete_event, delete_registration, export_registrations, list_registrations,
    toggle_registration, update_event,
};
use crate::middleware::auth::{JwtKeys, require_admin, require_auth};
use crate::state::AppState;

pub fn routes(keys: JwtKeys) -> Router<AppState> {
    Router::new()
        .route("/events/:id", put(update_event).delete(delete_event))
        .route("/events/:id/toggle-registration", patch(toggle_registration))
        .route("/events/:id/manager/:user_id", put(assign_manager))
        .route("/registrations", get(list_registrations))
        .route("/registrations/export", get(export_registrations))
        .route("/registrations/:id", delete(delete_registration))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(keys, require_auth))
}

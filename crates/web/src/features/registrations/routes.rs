use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{
    check_registration, list_my_registrations, spot_register, submit_registration,
};
use crate::middleware::auth::{JwtKeys, require_auth};
use crate::state::AppState;

pub fn routes(keys: JwtKeys) -> Router<AppState> {
    Router::new()
        .route("/me", get(list_my_registrations))
        .route("/check/:event_id", get(check_registration))
        .route("/spot/:event_id", post(spot_register))
        .route("/:event_id", post(submit_registration))
        .route_layer(middleware::from_fn_with_state(keys, require_auth))
}

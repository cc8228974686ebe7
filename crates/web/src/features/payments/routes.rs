use axum::{Router, middleware, routing::post};

use super::handlers::{create_order, record_failure, verify_payment};
use crate::middleware::auth::{JwtKeys, require_auth};
use crate::state::AppState;

pub fn routes(keys: JwtKeys) -> Router<AppState> {
    Router::new()
        .route("/create-order/:event_id", post(create_order))
        .route("/verify", post(verify_payment))
        .route("/failure", post(record_failure))
        .route_layer(middleware::from_fn_with_state(keys, require_auth))
}

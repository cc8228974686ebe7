use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{create_event, get_event, list_events};
use crate::middleware::auth::{JwtKeys, require_auth};
use crate::state::AppState;

pub fn routes(keys: JwtKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_event))
        .route_layer(middleware::from_fn_with_state(keys, require_auth));

    Router::new()
        .route("/", get(list_events))
        .route("/:id", get(get_event))
        .merge(protected)
}

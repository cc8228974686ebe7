use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::features::{admin, events, payments, registrations};
use crate::middleware::auth::JwtKeys;
use crate::state::AppState;


#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up")
    ),
    tag = "health"
)]
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router(state: AppState, keys: JwtKeys) -> Router {
    let api = Router::new()
        .nest("/events", events::routes::routes(keys.clone()))
        .nest("/registrations", registrations::routes::routes(keys.clone()))
        .nest("/payments", payments::routes::routes(keys.clone()))
        .nest("/admin", admin::routes::routes(keys));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

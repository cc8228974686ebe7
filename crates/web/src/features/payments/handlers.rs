use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use storage::{
    dto::payment::{
        CreateOrderResponse, FreeEventResponse, PaymentFailureRequest, VerifyPaymentRequest,
        VerifyPaymentResponse,
    },
    models::Actor,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services::{self, OrderResult};

#[utoipa::path(
    post,
    path = "/api/payments/create-order/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Gateway order created, or `freeEvent: true` when the event costs nothing", body = CreateOrderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found"),
        (status = 502, description = "Payment gateway unavailable")
    ),
    tag = "payments"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    match services::create_order(&state, event_id, &actor).await? {
        OrderResult::Free => Ok(Json(FreeEventResponse::default()).into_response()),
        OrderResult::Created(order) => Ok(Json(order).into_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/payments/verify",
    request_body = VerifyPaymentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Signature valid, ledger updated where an order matched", body = VerifyPaymentResponse),
        (status = 400, description = "Invalid signature"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "payments"
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    if !state.gateway.verify_signature(
        &req.razorpay_order_id,
        &req.razorpay_payment_id,
        &req.razorpay_signature,
    ) {
        tracing::warn!(order_id = %req.razorpay_order_id, "Payment signature mismatch");
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Invalid payment signature"
            })),
        )
            .into_response());
    }

    let response =
        services::verify_payment(&state, &req.razorpay_order_id, &req.razorpay_payment_id).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/payments/failure",
    request_body = PaymentFailureRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Failure recorded where the order was pending", body = VerifyPaymentResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller does not manage the registration for this order")
    ),
    tag = "payments"
)]
pub async fn record_failure(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<PaymentFailureRequest>,
) -> Result<Json<VerifyPaymentResponse>, WebError> {
    req.validate()?;

    let response = services::record_failure(&state, &req.razorpay_order_id, &actor).await?;

    Ok(Json(response))
}

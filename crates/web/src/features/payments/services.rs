use chrono::Utc;
use storage::{
    dto::payment::{CreateOrderResponse, VerifyPaymentResponse},
    models::Actor,
    services::{PaymentOutcome, PaymentStateMachine, payment::OrderQuote},
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::payment_gateway::{OrderNotes, OrderRequest};
use crate::state::AppState;

pub enum OrderResult {
    Free,
    Created(CreateOrderResponse),
}

/// Open a gateway order for the event fee. Free events need none.
pub async fn create_order(
    state: &AppState,
    event_id: Uuid,
    actor: &Actor,
) -> WebResult<OrderResult> {
    let quote = PaymentStateMachine::quote_order(
        state.events.as_ref(),
        event_id,
        actor.id(),
        Utc::now().timestamp(),
    )
    .await?;

    let OrderQuote::Payable { amount, receipt, event } = quote else {
        return Ok(OrderResult::Free);
    };

    let key_id = state
        .gateway
        .key_id()
        .ok_or_else(|| WebError::Upstream("payment gateway is not configured".to_string()))?
        .to_string();

    let request = OrderRequest {
        amount,
        currency: state.currency.clone(),
        receipt,
        notes: OrderNotes {
            event_id: event.id,
            user_id: actor.id(),
        },
    };

    let order = state.gateway.create_order(&request).await.map_err(|e| {
        tracing::error!(
            event_id = %event.id,
            receipt = %request.receipt,
            "Order creation failed: {}",
            e
        );
        WebError::Upstream(e.to_string())
    })?;

    Ok(OrderResult::Created(CreateOrderResponse {
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        key_id,
    }))
}

fn outcome_message(outcome: &PaymentOutcome) -> &'static str {
    match outcome {
        PaymentOutcome::Completed(_) => "Payment verified successfully",
        PaymentOutcome::AlreadyCompleted(_) => "Payment was already verified",
        PaymentOutcome::Failed(_) => "Payment failure recorded",
        PaymentOutcome::Unchanged(_) => "Payment status left unchanged",
        PaymentOutcome::NoMatchingOrder => {
            "Payment verified, no registration is linked to this order yet"
        }
    }
}

/// Apply a gateway-signed payment to the ledger. The signature must already
/// have been checked by the caller.
pub async fn verify_payment(
    state: &AppState,
    order_id: &str,
    payment_id: &str,
) -> WebResult<VerifyPaymentResponse> {
    let outcome = PaymentStateMachine::new(state.ledger.as_ref())
        .verify_payment(order_id, payment_id)
        .await?;

    tracing::info!(order_id, payment_id, outcome = outcome.label(), "Payment verified");

    Ok(VerifyPaymentResponse {
        success: true,
        message: outcome_message(&outcome).to_string(),
        order_id: order_id.to_string(),
        payment_id: Some(payment_id.to_string()),
        outcome: outcome.label().to_string(),
    })
}

/// Mark a pending payment failed on behalf of whoever manages the registration.
pub async fn record_failure(
    state: &AppState,
    order_id: &str,
    reporter: &Actor,
) -> WebResult<VerifyPaymentResponse> {
    let outcome = PaymentStateMachine::new(state.ledger.as_ref())
        .record_failure(order_id, reporter)
        .await?;

    tracing::info!(
        order_id,
        reporter_id = %reporter.id(),
        outcome = outcome.label(),
        "Payment failure reported"
    );

    Ok(VerifyPaymentResponse {
        success: true,
        message: outcome_message(&outcome).to_string(),
        order_id: order_id.to_string(),
        payment_id: None,
        outcome: outcome.label().to_string(),
    })
}

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

use crate::error::{RegistrationError, RegistrationResult, Result, StorageError};
use crate::models::{Actor, Event, PaymentStatus, Registration};
use crate::traits::{EventRegistry, RegistrationLedger};

/// What the gateway should be asked to collect for an event.
#[derive(Debug, Clone)]
pub enum OrderQuote {
    Free,
    Payable {
        /// Smallest currency unit.
        amount: i64,
        receipt: String,
        event: Box<Event>,
    },
}

/// Result of applying a payment callback to the ledger.
#[derive(Debug, Clone)]
pub enum PaymentOutcome {
    Completed(Registration),
    AlreadyCompleted(Registration),
    Failed(Registration),
    /// The registration is in a state the callback cannot move it from.
    Unchanged(Registration),
    NoMatchingOrder,
}

impl PaymentOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::AlreadyCompleted(_) => "already_completed",
            Self::Failed(_) => "failed",
            Self::Unchanged(_) => "unchanged",
            Self::NoMatchingOrder => "no_matching_order",
        }
    }

    pub fn registration(&self) -> Option<&Registration> {
        match self {
            Self::Completed(r)
            | Self::AlreadyCompleted(r)
            | Self::Failed(r)
            | Self::Unchanged(r) => Some(r),
            Self::NoMatchingOrder => None,
        }
    }
}

/// Gateway receipt ids are capped at 40 characters.
const MAX_RECEIPT_LEN: usize = 40;

/// `rcpt_<unix seconds>_<last six characters of the payer id>`.
pub fn receipt_id(payer_id: Uuid, unix_seconds: i64) -> String {
    let payer = payer_id.simple().to_string();
    let tail = &payer[payer.len() - 6..];
    let mut receipt = format!("rcpt_{unix_seconds}_{tail}");
    receipt.truncate(MAX_RECEIPT_LEN);
    receipt
}

/// Fees are stored in major units; gateways take minor units.
pub fn to_minor_units(fees: Decimal) -> Option<i64> {
    (fees * Decimal::ONE_HUNDRED).round().to_i64()
}

/// Drives `Registration::payment_status` from gateway callbacks.
pub struct PaymentStateMachine<'a> {
    ledger: &'a dyn RegistrationLedger,
}

impl<'a> PaymentStateMachine<'a> {
    pub fn new(ledger: &'a dyn RegistrationLedger) -> Self {
        Self { ledger }
    }

    /// Pure read of the event fee. Free events need no order.
    pub async fn quote_order(
        events: &dyn EventRegistry,
        event_id: Uuid,
        payer_id: Uuid,
        unix_seconds: i64,
    ) -> RegistrationResult<OrderQuote> {
        let event = events.find_event(event_id).await?;

        if !event.is_paid() {
            return Ok(OrderQuote::Free);
        }

        let amount = to_minor_units(event.fees).ok_or_else(|| {
            RegistrationError::Storage(StorageError::ConstraintViolation(format!(
                "event fee {} does not fit a payment amount",
                event.fees
            )))
        })?;

        Ok(OrderQuote::Payable {
            amount,
            receipt: receipt_id(payer_id, unix_seconds),
            event: Box::new(event),
        })
    }

    /// Apply a verified payment to the registration holding `order_id`.
    ///
    /// An unknown order is a normal outcome, not an error: the callback can
    /// arrive before, or without, a registration.
    pub async fn verify_payment(&self, order_id: &str, payment_id: &str) -> Result<PaymentOutcome> {
        let Some(registration) = self.ledger.find_by_order_id(order_id).await? else {
            tracing::info!(order_id, "No registration found for verified order");
            return Ok(PaymentOutcome::NoMatchingOrder);
        };

        self.transition(registration, PaymentStatus::Completed, Some(payment_id))
            .await
    }

    /// Record a declined or abandoned payment (`pending` to `failed`).
    /// The reporter must manage the registration; there is no gateway
    /// signature on this path.
    pub async fn record_failure(
        &self,
        order_id: &str,
        reporter: &Actor,
    ) -> RegistrationResult<PaymentOutcome> {
        let Some(registration) = self.ledger.find_by_order_id(order_id).await? else {
            return Ok(PaymentOutcome::NoMatchingOrder);
        };

        if !registration.is_managed_by(reporter) {
            tracing::warn!(
                order_id,
                reporter_id = %reporter.id(),
                "Payment failure reported for a registration the caller does not manage"
            );
            return Err(RegistrationError::Forbidden(
                "Only the registering team may report a payment failure".to_string(),
            ));
        }

        Ok(self
            .transition(registration, PaymentStatus::Failed, None)
            .await?)
    }

    async fn transition(
        &self,
        registration: Registration,
        target: PaymentStatus,
        payment_id: Option<&str>,
    ) -> Result<PaymentOutcome> {
        let mut current = registration;

        // Retry once if another callback moved the row between read and write.
        for _ in 0..2 {
            if current.payment_status == PaymentStatus::Completed {
                return Ok(PaymentOutcome::AlreadyCompleted(current));
            }
            if !current.payment_status.can_transition_to(target) {
                return Ok(PaymentOutcome::Unchanged(current));
            }

            match self
                .ledger
                .update_payment_status(current.id, current.payment_status, target, payment_id)
                .await?
            {
                Some(updated) => {
                    tracing::info!(
                        registration_id = %updated.id,
                        order_id = updated.order_id.as_deref().unwrap_or_default(),
                        status = target.as_str(),
                        "Payment status updated"
                    );
                    return Ok(match target {
                        PaymentStatus::Completed => PaymentOutcome::Completed(updated),
                        _ => PaymentOutcome::Failed(updated),
                    });
                }
                None => {
                    let Some(order_id) = current.order_id.clone() else {
                        return Ok(PaymentOutcome::NoMatchingOrder);
                    };
                    match self.ledger.find_by_order_id(&order_id).await? {
                        Some(fresh) => current = fresh,
                        None => return Ok(PaymentOutcome::NoMatchingOrder),
                    }
                }
            }
        }

        Ok(PaymentOutcome::Unchanged(current))
    }
}

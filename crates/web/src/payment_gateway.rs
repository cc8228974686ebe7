//! Razorpay order creation and callback signature checks.

use std::time::Duration;

use async_trait::async_trait;
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

use crate::config::RazorpayConfig;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Payment gateway is not configured")]
    Unconfigured,

    #[error("Gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gateway rejected the order ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderNotes {
    pub event_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    /// Smallest currency unit.
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: OrderNotes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key handed to the checkout widget.
    fn key_id(&self) -> Option<&str>;

    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError>;

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;
}

/// Hex HMAC-SHA256 of `order_id|payment_id`.
pub fn payment_signature(secret: &str, order_id: &str, payment_id: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

pub struct RazorpayGateway {
    client: reqwest::Client,
    config: RazorpayConfig,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> Option<&str> {
        Some(&self.config.key_id)
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/orders", self.config.api_base.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let order: GatewayOrder = response.json().await?;
        tracing::info!(
            order_id = %order.id,
            amount = order.amount,
            receipt = %request.receipt,
            "Gateway order created"
        );
        Ok(order)
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        payment_signature(&self.config.key_secret, order_id, payment_id)
            .is_some_and(|expected| {
                constant_time_eq(expected.as_bytes(), signature.trim().as_bytes())
            })
    }
}

/// Stands in when no key pair is configured; fails closed.
pub struct UnconfiguredGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredGateway {
    fn key_id(&self) -> Option<&str> {
        None
    }

    async fn create_order(&self, _request: &OrderRequest) -> Result<GatewayOrder, GatewayError> {
        Err(GatewayError::Unconfigured)
    }

    fn verify_signature(&self, _order_id: &str, _payment_id: &str, _signature: &str) -> bool {
        false
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FreeEventResponse {
    pub free_event: bool,
    pub message: String,
}

impl Default for FreeEventResponse {
    fn default() -> Self {
        Self {
            free_event: true,
            message: "This is a free event, no payment required".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    /// Smallest currency unit (paise for INR).
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

/// Callback fields posted by the checkout widget after payment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VerifyPaymentRequest {
    #[validate(length(min = 1, max = 255, message = "Order id is required"))]
    pub razorpay_order_id: String,

    #[validate(length(min = 1, max = 255, message = "Payment id is required"))]
    pub razorpay_payment_id: String,

    #[validate(length(min = 1, message = "Signature is required"))]
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PaymentFailureRequest {
    #[validate(length(min = 1, max = 255, message = "Order id is required"))]
    pub razorpay_order_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub outcome: String,
}

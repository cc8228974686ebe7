use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde_json::{Number, Value, json};
use std::fmt;
use storage::error::{RegistrationError, StorageError};
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Registration(RegistrationError),
    Validation(ValidationErrors),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    /// Payment gateway or another remote dependency failed.
    Upstream(String),
    InternalServerError(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Registration(e) => write!(f, "Registration rejected: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            Self::Upstream(msg) => write!(f, "Upstream failure: {}", msg),
            Self::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

fn storage_response(error: &StorageError) -> (StatusCode, Value) {
    match error {
        StorageError::NotFound => (
            StatusCode::NOT_FOUND,
            json!({ "error": "Resource not found" }),
        ),
        StorageError::DuplicateKey(what) => (
            StatusCode::CONFLICT,
            json!({ "error": format!("Duplicate {what}") }),
        ),
        StorageError::ConstraintViolation(msg) => {
            (StatusCode::CONFLICT, json!({ "error": msg }))
        }
        e => {
            tracing::error!("Storage error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "An internal error occurred" }),
            )
        }
    }
}

/// Fees go out as JSON numbers, whole amounts as integers.
fn fee_json(fees: &Decimal) -> Value {
    let number = if fees.fract().is_zero() {
        fees.to_i64().map(Number::from)
    } else {
        fees.to_f64().and_then(Number::from_f64)
    };
    number.map_or_else(|| Value::String(fees.to_string()), Value::Number)
}

fn registration_response(error: &RegistrationError) -> (StatusCode, Value) {
    let message = error.to_string();
    match error {
        RegistrationError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": message })),
        RegistrationError::Forbidden(_) => (StatusCode::FORBIDDEN, json!({ "error": message })),
        RegistrationError::RegistrationClosed => (
            StatusCode::FORBIDDEN,
            json!({ "error": message, "registrationClosed": true }),
        ),
        RegistrationError::InvalidTeamSize(_)
        | RegistrationError::MissingTeamName
        | RegistrationError::MissingLeaderDetails
        | RegistrationError::MissingTeamMember => {
            (StatusCode::BAD_REQUEST, json!({ "error": message }))
        }
        RegistrationError::AlreadyRegistered => (
            StatusCode::BAD_REQUEST,
            json!({ "error": message, "alreadyRegistered": true }),
        ),
        RegistrationError::PaymentRequired { event_fees } => (
            StatusCode::BAD_REQUEST,
            json!({
                "error": message,
                "paymentRequired": true,
                "eventFees": fee_json(event_fees),
            }),
        ),
        RegistrationError::Storage(e) => storage_response(e),
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status_code, body) = match &self {
            Self::Storage(e) => storage_response(e),
            Self::Registration(e) => registration_response(e),
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "Validation failed",
                        "details": field_errors
                    }),
                )
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            Self::Upstream(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "Payment service is currently unavailable" }),
                )
            }
            Self::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal error occurred" }),
                )
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<RegistrationError> for WebError {
    fn from(error: RegistrationError) -> Self {
        Self::Registration(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

pub type WebResult<T> = Result<T, WebError>;

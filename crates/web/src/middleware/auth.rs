use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use storage::models::{Actor, Principal, Role};
use uuid::Uuid;

use crate::error::WebError;

/// Claims carried by the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: usize,
}

impl Claims {
    pub fn into_actor(self) -> Actor {
        let mut principal = Principal::new(self.id);
        principal.email = self.email.filter(|e| !e.trim().is_empty());
        Actor::from_role(self.role, principal)
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the bearer token into an `Actor` request extension.
pub async fn require_auth(
    State(keys): State<JwtKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = bearer_token(&request)
        .ok_or_else(|| WebError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = keys.verify(token).map_err(|e| {
        tracing::warn!("Rejected bearer token: {}", e);
        WebError::Unauthorized("Invalid or expired token".to_string())
    })?;

    let actor = claims.into_actor();
    tracing::debug!(actor_id = %actor.id(), role = %actor.role(), "Authenticated request");
    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}

/// Must run after `require_auth`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, WebError> {
    match request.extensions().get::<Actor>() {
        Some(actor) if actor.is_admin() => Ok(next.run(request).await),
        Some(actor) => {
            tracing::warn!(actor_id = %actor.id(), "Non-admin attempted an admin operation");
            Err(WebError::Forbidden("Admin access required".to_string()))
        }
        None => Err(WebError::Unauthorized("Missing bearer token".to_string())),
    }
}

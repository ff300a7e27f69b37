// Admin sessions.
//
// Tokens are HS256 JWTs minted by the external auth service, which shares a
// secret with this server. We only verify them; there is no password here.

use super::error::ApiError;
use super::state::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Check signature, expiry and role.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, ApiError> {
        let data = decode::<AdminClaims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!("Rejected admin token: {}", e);
            ApiError::Unauthorized
        })?;

        if data.claims.role != ADMIN_ROLE {
            tracing::warn!(sub = %data.claims.sub, role = %data.claims.role, "Non-admin token on admin route");
            return Err(ApiError::Unauthorized);
        }
        Ok(data.claims)
    }
}

/// Extract and validate the admin JWT from the Authorization header.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let claims = state.sessions.verify(token)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

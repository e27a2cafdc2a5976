//! Session token verification
//!
//! Tokens are issued by the auth provider and signed with the shared HS256
//! secret. `sub` is the provider's user id and keys the profile row.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use crate::state::AppState;

/// Claims read from a session token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Auth provider user id
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Authenticated identity, inserted into request extensions by
/// [`require_auth`]
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

/// Verify a session token and return its claims
pub fn verify_token(
    token: &str,
    secret: &str,
    audience: Option<&str>,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    match audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

/// Verify a token against the service settings, mapped to API errors
pub fn authenticate(state: &AppState, token: &str) -> Result<AuthUser, AppError> {
    verify_token(token, &state.jwt_secret, state.jwt_audience.as_deref())
        .map(AuthUser::from)
        .map_err(|e| {
            tracing::debug!("JWT validation failed: {e}");
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })
}

/// Pull the bearer token out of an `Authorization` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that verifies the bearer token and injects [`AuthUser`]
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::not_authenticated)?;

    let token = bearer_token(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    let user = authenticate(&state, token)?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

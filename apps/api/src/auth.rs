//! Caller identity. Sessions are issued elsewhere; this service only verifies
//! the bearer token and reads the user id and role out of it.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::Role;

#[derive(Clone)]
pub struct AuthConfig {
    key: DecodingKey,
    validation: Validation,
}

impl AuthConfig {
    pub fn hs256(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

/// The authenticated user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn require(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            debug!(
                "Rejecting {} caller {} from a {role}-only operation",
                self.role, self.user_id
            );
            Err(AppError::Forbidden)
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AuthConfig::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        verify_token(token, &config)
    }
}

fn verify_token(token: &str, config: &AuthConfig) -> Result<Caller, AppError> {
    let data = decode::<Claims>(token, &config.key, &config.validation).map_err(|err| {
        debug!("Rejected bearer token: {err}");
        AppError::Unauthorized
    })?;

    let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| AppError::Unauthorized)?;

    Ok(Caller {
        user_id,
        role: data.claims.role,
    })
}

use crate::auth::jwt::{bearer_token, JwtService};
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid, // user_id
    pub iss: String,
    pub iat: i64, // issued at timestamp
    pub exp: i64, // expiration timestamp
}

/// The caller, as established by a valid bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl AuthenticatedUser {
    /// Authenticate from raw headers. Upload handlers call this themselves so the
    /// check runs at the right point in their validation order.
    pub fn from_headers(headers: &HeaderMap, jwt: &JwtService) -> Result<Self, HttpAppError> {
        let token = bearer_token(headers)?;
        let claims = jwt.validate_token(token)?;
        Ok(Self {
            user_id: claims.sub,
        })
    }
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers, &state.jwt)
    }
}

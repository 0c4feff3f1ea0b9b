//! Authenticated caller identity.
//!
//! Authentication itself happens upstream; the gateway injects the verified
//! uid as a request header. This extractor only reads it back, so handlers
//! never trust an identity from the request body.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, state::SharedState};

/// Header carrying the uid verified by the upstream authentication layer.
pub const AUTH_UID_HEADER: &str = "x-auth-uid";

/// Uid of the authenticated caller.
pub struct AuthUser(pub String);

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTH_UID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|uid| !uid.is_empty())
            .map(|uid| AuthUser(uid.to_owned()))
            .ok_or_else(|| AppError::Unauthorized("missing authenticated caller identity".into()))
    }
}

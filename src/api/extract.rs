//! Identity extractors
//!
//! Each handler resolves its caller from the request on its own; nothing is
//! carried over from the gatekeeper.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use super::error::ApiError;
use super::mobile::MobileError;
use super::server::SharedState;
use crate::auth::jwt::Claims;
use crate::auth::session::{self, SessionStatus, Transport};

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub claims: Claims,
}

impl Identity {
    fn from_status(status: SessionStatus) -> Option<Self> {
        match status {
            SessionStatus::Valid(claims) => claims.user_id().map(|user_id| Self { user_id, claims }),
            _ => None,
        }
    }
}

/// Caller authenticated by the `token` cookie
#[derive(Debug, Clone)]
pub struct WebIdentity(pub Identity);

impl FromRequestParts<SharedState> for WebIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let status = session::resolve(&parts.headers, Transport::Cookie, &state.tokens);
        Identity::from_status(status)
            .map(WebIdentity)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Caller authenticated by an `Authorization: Bearer` header
#[derive(Debug, Clone)]
pub struct MobileIdentity(pub Identity);

impl FromRequestParts<SharedState> for MobileIdentity {
    type Rejection = MobileError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        match session::resolve(&parts.headers, Transport::Bearer, &state.tokens) {
            SessionStatus::Missing => Err(ApiError::unauthorized("Authentication required").into()),
            status => Identity::from_status(status)
                .map(MobileIdentity)
                .ok_or_else(|| ApiError::unauthorized("Invalid token").into()),
        }
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction and authentication middleware for the server.
//!
//! This module provides Axum extractors for validating bearer session
//! tokens and enforcing authentication at the server boundary.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;
use tracing::{debug, warn};

use admast_api::{AuthenticatedActor, AuthenticationService};
use admast_persistence::OperatorData;

use crate::AppState;

/// Extractor for authenticated operators.
///
/// Validates the `Authorization: Bearer <token>` header against the
/// session store and returns the authenticated operator context.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionOperator(actor, operator): SessionOperator,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
///     // operator: OperatorData
/// }
/// ```
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if the header is missing or
/// malformed, the token is unknown, the session has expired, or the
/// operator has been disabled.
pub struct SessionOperator(pub AuthenticatedActor, pub OperatorData);

impl FromRequestParts<AppState> for SessionOperator {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;

        let mut persistence = state.persistence.lock().await;
        let (actor, operator) =
            AuthenticationService::validate_session(&mut persistence, &token, OffsetDateTime::now_utc())
                .map_err(|e| {
                    warn!(error = %e, "Session validation failed");
                    SessionError::InvalidSession(e.to_string())
                })?;
        drop(persistence);

        debug!(
            login_name = %operator.login_name,
            role = ?actor.role,
            "Session validated"
        );

        Ok(Self(actor, operator))
    }
}

/// Extractor for the raw bearer token, without touching the session
/// store. Used by logout, which needs the token itself.
pub struct BearerToken(pub String);

impl FromRequestParts<AppState> for BearerToken {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token: &str = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header does not start with 'Bearer '");
            SessionError::InvalidAuthorizationHeader
        })?;

        Ok(Self(token.to_string()))
    }
}

/// Session extraction errors.
///
/// These errors are returned when session validation fails and are
/// automatically converted to HTTP responses.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingAuthorizationHeader => {
                (StatusCode::UNAUTHORIZED, "Missing Authorization header")
            }
            Self::InvalidAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            ),
            Self::InvalidSession(reason) => {
                return (
                    StatusCode::UNAUTHORIZED,
                    format!("Session validation failed: {reason}"),
                )
                    .into_response();
            }
        };

        (status, message).into_response()
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admast_domain::DomainError;
use admast_persistence::PersistenceError;

use crate::token::TokenError;

/// Errors that can occur while driving the booking ledger or the
/// discount workflow.
///
/// Token and code failures deliberately collapse into coarse variants:
/// `Unauthorized` never reveals which sub-check failed beyond "invalid
/// or expired".
#[derive(Debug)]
pub enum CoreError {
    /// A request field failed validation.
    Validation(String),
    /// The presented access token is missing, invalid, or expired.
    Unauthorized,
    /// Another lead holds the contended inventory unit.
    Conflict {
        /// The inventory code of the contended unit.
        unit_code: String,
        /// The lead currently holding it.
        holder_lead_id: i64,
    },
    /// The inquiry has already reached a terminal state.
    AlreadyResolved,
    /// The approval code did not match.
    InvalidCode,
    /// The approval code has expired.
    CodeExpired,
    /// The named record does not exist.
    NotFound(String),
    /// The persistence layer failed.
    Store(PersistenceError),
    /// An internal invariant failed (crypto, serialization, timestamps).
    Internal(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "Validation failed: {msg}"),
            Self::Unauthorized => write!(f, "Access link is invalid or expired"),
            Self::Conflict {
                unit_code,
                holder_lead_id,
            } => write!(
                f,
                "Inventory unit {unit_code} is held by lead {holder_lead_id}"
            ),
            Self::AlreadyResolved => write!(f, "Inquiry has already been resolved"),
            Self::InvalidCode => write!(f, "Approval code is invalid"),
            Self::CodeExpired => write!(f, "Approval code has expired"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Store(err) => write!(f, "Storage error: {err}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<PersistenceError> for CoreError {
    fn from(err: PersistenceError) -> Self {
        Self::Store(err)
    }
}

impl From<TokenError> for CoreError {
    fn from(err: TokenError) -> Self {
        Self::Internal(err.to_string())
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use admast::CoreError;

use crate::password_policy::PasswordPolicyError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A discount review access link was rejected.
    ///
    /// Deliberately carries no detail: unknown inquiries, mismatched
    /// tokens, and expired tokens all present identically.
    AccessLinkRejected,
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A business rule was violated.
    RuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// A booking could not be taken because another lead holds the unit.
    BookingConflict {
        /// The inventory code of the contested unit.
        unit_code: String,
        /// The lead currently holding the unit.
        holder_lead_id: i64,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::AccessLinkRejected => {
                write!(f, "Access link is invalid or expired")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::RuleViolation { rule, message } => {
                write!(f, "Rule violation ({rule}): {message}")
            }
            Self::BookingConflict {
                unit_code,
                holder_lead_id,
            } => {
                write!(
                    f,
                    "Unit '{unit_code}' is already booked by lead {holder_lead_id}"
                )
            }
            Self::ResourceNotFound { message } => {
                write!(f, "Not found: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked
/// directly across the API boundary.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::Validation(message) => ApiError::InvalidInput {
            field: String::from("request"),
            message,
        },
        CoreError::Unauthorized => ApiError::AccessLinkRejected,
        CoreError::Conflict {
            unit_code,
            holder_lead_id,
        } => ApiError::BookingConflict {
            unit_code,
            holder_lead_id,
        },
        CoreError::AlreadyResolved => ApiError::RuleViolation {
            rule: String::from("inquiry_already_resolved"),
            message: String::from("This discount request has already been resolved"),
        },
        CoreError::InvalidCode => ApiError::RuleViolation {
            rule: String::from("approval_code_invalid"),
            message: String::from("The approval code does not match"),
        },
        CoreError::CodeExpired => ApiError::RuleViolation {
            rule: String::from("approval_code_expired"),
            message: String::from("The approval code has expired"),
        },
        CoreError::NotFound(message) => ApiError::ResourceNotFound { message },
        CoreError::Store(e) => ApiError::Internal {
            message: format!("Storage error: {e}"),
        },
        CoreError::Internal(message) => ApiError::Internal { message },
    }
}

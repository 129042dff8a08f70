// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use rand::RngExt;
use rand::distr::Alphanumeric;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use admast_audit::Actor;
use admast_persistence::{OperatorData, Persistence, PersistenceError, SessionData};

use crate::error::AuthError;

/// Operator roles for authorization.
///
/// Roles determine what actions an authenticated operator may perform.
/// Roles apply only to operators, never to clients, who stay anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Full authority: operator management, inventory, leads, and
    /// discount oversight.
    SuperAdmin,
    /// Administrative authority over inventory, leads, and discount
    /// oversight, but not over operator accounts.
    Admin,
    /// Salespeople working the lead pipeline. May not touch inventory
    /// structure, operator accounts, or the inquiry overview.
    Sales,
}

impl Role {
    /// The stored string form of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::Sales => "SALES",
        }
    }

    /// Parses a stored role string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is outside the role vocabulary.
    pub fn parse(value: &str) -> Result<Self, AuthError> {
        match value {
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "ADMIN" => Ok(Self::Admin),
            "SALES" => Ok(Self::Sales),
            other => Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {other}"),
            }),
        }
    }
}

/// An authenticated operator with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The operator's login name.
    pub login_name: String,
    /// The role assigned to this operator.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(login_name: String, role: Role) -> Self {
        Self { login_name, role }
    }

    /// Converts this authenticated actor into an audit `Actor`.
    ///
    /// Used when recording activity events to attribute actions to the
    /// authenticated operator.
    #[must_use]
    pub fn to_audit_actor(&self, operator: &OperatorData) -> Actor {
        Actor::operator(operator.operator_id)
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor may create, disable, or enable operators.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is a super admin.
    pub fn authorize_manage_operators(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::SuperAdmin => Ok(()),
            Role::Admin | Role::Sales => Err(AuthError::Unauthorized {
                action: String::from("manage_operators"),
                required_role: String::from("SUPER_ADMIN"),
            }),
        }
    }

    /// Checks if an actor may reset another operator's password.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is a super admin.
    pub fn authorize_reset_password(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::SuperAdmin => Ok(()),
            Role::Admin | Role::Sales => Err(AuthError::Unauthorized {
                action: String::from("reset_password"),
                required_role: String::from("SUPER_ADMIN"),
            }),
        }
    }

    /// Checks if an actor may import, reprice, or archive inventory.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is a salesperson.
    pub fn authorize_manage_inventory(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::SuperAdmin | Role::Admin => Ok(()),
            Role::Sales => Err(AuthError::Unauthorized {
                action: String::from("manage_inventory"),
                required_role: String::from("ADMIN"),
            }),
        }
    }

    /// Checks if an actor may work leads: status changes, campaign
    /// edits, timelines, notes, and handoffs.
    ///
    /// Every role may work leads.
    ///
    /// # Errors
    ///
    /// Never fails; present for symmetry with the other checks.
    pub const fn authorize_work_leads(_actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Ok(())
    }

    /// Checks if an actor may delete a lead.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is a salesperson.
    pub fn authorize_delete_lead(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::SuperAdmin | Role::Admin => Ok(()),
            Role::Sales => Err(AuthError::Unauthorized {
                action: String::from("delete_lead"),
                required_role: String::from("ADMIN"),
            }),
        }
    }

    /// Checks if an actor may browse the discount inquiry overview.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is a salesperson.
    pub fn authorize_view_inquiries(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::SuperAdmin | Role::Admin => Ok(()),
            Role::Sales => Err(AuthError::Unauthorized {
                action: String::from("view_inquiries"),
                required_role: String::from("ADMIN"),
            }),
        }
    }
}

/// Session-based authentication over the operator table.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Length of generated session tokens.
    const SESSION_TOKEN_LENGTH: usize = 48;

    /// Authenticates an operator by login name and password and creates
    /// a session.
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `operator_data`).
    ///
    /// # Errors
    ///
    /// Returns an error if the operator is unknown or disabled, the
    /// password does not match, or session creation fails.
    pub fn login(
        persistence: &mut Persistence,
        login_name: &str,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<(String, AuthenticatedActor, OperatorData), AuthError> {
        let operator: OperatorData = persistence
            .get_operator_by_login(login_name)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| {
                warn!(login_name, "Login attempt for unknown operator");
                AuthError::AuthenticationFailed {
                    reason: String::from("Unknown operator or wrong password"),
                }
            })?;

        if operator.is_disabled {
            warn!(login_name, "Login attempt for disabled operator");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Operator is disabled"),
            });
        }

        let password_ok: bool = persistence
            .verify_password(password, &operator.password_hash)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?;
        if !password_ok {
            warn!(login_name, "Login attempt with wrong password");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Unknown operator or wrong password"),
            });
        }

        let role: Role = Role::parse(&operator.role)?;

        let session_token: String = Self::generate_session_token();
        let expires_at: OffsetDateTime = now + Self::DEFAULT_SESSION_EXPIRATION;
        let expires_at_str: String = format_timestamp(expires_at)?;

        persistence
            .create_session(operator.operator_id, &session_token, &expires_at_str)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        persistence
            .update_last_login(operator.operator_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        info!(login_name, role = role.as_str(), "Operator logged in");

        let authenticated_actor: AuthenticatedActor =
            AuthenticatedActor::new(operator.login_name.clone(), role);

        Ok((session_token, authenticated_actor, operator))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_actor`, `operator_data`).
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or expired, or the
    /// operator no longer exists or is disabled.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
        now: OffsetDateTime,
    ) -> Result<(AuthenticatedActor, OperatorData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(
            &session.expires_at,
            &time::format_description::well_known::Iso8601::DEFAULT,
        )
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to parse session expiration: {e}"),
        })?;

        if now > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let operator: OperatorData = persistence
            .get_operator_by_id(session.operator_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Operator not found"),
            })?;

        if operator.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Operator is disabled"),
            });
        }

        let role: Role = Role::parse(&operator.role)?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        let authenticated_actor: AuthenticatedActor =
            AuthenticatedActor::new(operator.login_name.clone(), role);

        Ok((authenticated_actor, operator))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    /// Generates a random alphanumeric session token.
    fn generate_session_token() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(Self::SESSION_TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}

/// Formats an instant as an ISO 8601 string, the form every stored
/// timestamp takes.
pub(crate) fn format_timestamp(moment: OffsetDateTime) -> Result<String, AuthError> {
    moment
        .format(&time::format_description::well_known::Iso8601::DEFAULT)
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to format timestamp: {e}"),
        })
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator and session mutations.
//!
//! This module contains backend-agnostic mutations for persisting operators
//! and sessions. Most mutations use Diesel DSL, with minimal backend-specific
//! helpers abstracted via the `PersistenceBackend` trait.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{operators, sessions};
use crate::error::PersistenceError;

backend_fn! {
/// Creates a new operator.
///
/// The `login_name` is normalized to uppercase for case-insensitive
/// uniqueness.
///
/// # Errors
///
/// Returns an error if the operator cannot be created or if the login
/// name already exists.
pub fn create_operator(
    conn: &mut _,
    login_name: &str,
    display_name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> Result<i64, PersistenceError> {
    let normalized_login: String = login_name.to_uppercase();

    info!(
        "Creating operator with login_name: {}, role: {}",
        normalized_login, role
    );

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(operators::table)
        .values((
            operators::login_name.eq(&normalized_login),
            operators::display_name.eq(display_name),
            operators::email.eq(email),
            operators::password_hash.eq(&password_hash),
            operators::role.eq(role),
        ))
        .execute(conn)?;

    let operator_id: i64 = conn.get_last_insert_rowid()?;

    info!(operator_id, "Operator created");
    Ok(operator_id)
}
}

backend_fn! {
/// Updates the last login timestamp for an operator.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(conn: &mut _, operator_id: i64) -> Result<(), PersistenceError> {
    debug!("Updating last_login_at for operator ID: {}", operator_id);

    diesel::update(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .set(operators::last_login_at.eq(diesel::dsl::sql::<
            diesel::sql_types::Nullable<diesel::sql_types::Text>,
        >("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Updates an operator's password hash.
///
/// # Errors
///
/// Returns an error if hashing or the database update fails.
pub fn update_password(
    conn: &mut _,
    operator_id: i64,
    new_password: &str,
) -> Result<(), PersistenceError> {
    info!("Updating password for operator ID: {}", operator_id);

    let password_hash: String = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let rows_affected: usize = diesel::update(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .set(operators::password_hash.eq(&password_hash))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::OperatorNotFound(format!(
            "Operator with ID {operator_id} not found"
        )));
    }

    Ok(())
}
}

backend_fn! {
/// Disables an operator.
///
/// This sets `is_disabled` to true and records the `disabled_at` timestamp.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn disable_operator(conn: &mut _, operator_id: i64) -> Result<(), PersistenceError> {
    info!("Disabling operator ID: {}", operator_id);

    diesel::update(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .set((
            operators::is_disabled.eq(1),
            operators::disabled_at.eq(diesel::dsl::sql::<
                diesel::sql_types::Nullable<diesel::sql_types::Text>,
            >("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Re-enables a disabled operator.
///
/// This sets `is_disabled` to false and clears the `disabled_at` timestamp.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn enable_operator(conn: &mut _, operator_id: i64) -> Result<(), PersistenceError> {
    info!("Re-enabling operator ID: {}", operator_id);

    diesel::update(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .set((
            operators::is_disabled.eq(0),
            operators::disabled_at.eq(None::<String>),
        ))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Creates a new session for an operator.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut _,
    operator_id: i64,
    session_token: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!("Creating session for operator ID: {}", operator_id);

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::operator_id.eq(operator_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;
    Ok(session_id)
}
}

backend_fn! {
/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(conn: &mut _, session_id: i64) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
            "CURRENT_TIMESTAMP",
        )))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Deletes a session by token (logout).
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(conn: &mut _, session_token: &str) -> Result<(), PersistenceError> {
    debug!("Deleting session");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Deletes every session that expired before `now`.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(conn: &mut _, now: &str) -> Result<usize, PersistenceError> {
    // ISO 8601 strings order chronologically, so string comparison is safe
    let deleted: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(now))
        .execute(conn)?;

    if deleted > 0 {
        info!(deleted, "Expired sessions removed");
    }
    Ok(deleted)
}
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lead and activity log inserts.
//!
//! Compound ledger operations (status transitions, timeline assignment,
//! campaign edits) live in `mutations::booking`; this module holds the
//! plain inserts they and the lead-capture path build on.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use admast_audit::ActivityEvent;
use admast_domain::Lead;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{activity_log, leads};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a new lead.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_lead(conn: &mut _, lead: &Lead) -> Result<i64, PersistenceError> {
    info!(
        "Creating lead for client: {}, source: {}",
        lead.client_name, lead.source
    );

    diesel::insert_into(leads::table)
        .values((
            leads::client_name.eq(&lead.client_name),
            leads::email.eq(&lead.email),
            leads::phone.eq(&lead.phone),
            leads::company_name.eq(&lead.company_name),
            leads::source.eq(&lead.source),
            leads::status.eq(lead.status.as_str()),
            leads::notes.eq(&lead.notes),
            leads::base_total.eq(lead.base_total),
            leads::discount_percent_applied.eq(lead.discount_percent_applied),
            leads::discount_amount.eq(lead.discount_amount),
            leads::final_total.eq(lead.final_total),
            leads::assigned_to_id.eq(lead.assigned_to_id),
            leads::sales_user_id.eq(lead.sales_user_id),
            leads::finance_user_id.eq(lead.finance_user_id),
            leads::ops_user_id.eq(lead.ops_user_id),
        ))
        .execute(conn)?;

    let lead_id: i64 = conn.get_last_insert_rowid()?;

    info!(lead_id, "Lead created");
    Ok(lead_id)
}
}

backend_fn! {
/// Appends an activity event to a lead's log.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the lead does
/// not exist.
pub fn insert_activity(conn: &mut _, event: &ActivityEvent) -> Result<i64, PersistenceError> {
    debug!(
        "Recording {} activity for lead ID: {}",
        event.action, event.lead_id
    );

    diesel::insert_into(activity_log::table)
        .values((
            activity_log::lead_id.eq(event.lead_id),
            activity_log::actor_id.eq(&event.actor.id),
            activity_log::actor_type.eq(&event.actor.actor_type),
            activity_log::action.eq(event.action.as_str()),
            activity_log::details.eq(&event.details),
        ))
        .execute(conn)?;

    let event_id: i64 = conn.get_last_insert_rowid()?;
    Ok(event_id)
}
}

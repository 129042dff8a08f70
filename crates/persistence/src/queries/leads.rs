// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lead, campaign item, and activity log queries.
//!
//! Backend-agnostic queries over the booking ledger. All queries use
//! Diesel DSL and work across all supported database backends.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use std::str::FromStr;
use tracing::debug;

use admast_audit::{Actor, ActivityEvent, LogAction};
use admast_domain::{CampaignItem, Lead, LeadStatus};

use crate::diesel_schema::{activity_log, campaign_items, leads};
use crate::error::PersistenceError;

/// Diesel Queryable struct for lead rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = leads)]
pub(crate) struct LeadRow {
    lead_id: i64,
    client_name: String,
    email: Option<String>,
    phone: Option<String>,
    company_name: Option<String>,
    source: String,
    status: String,
    notes: Option<String>,
    base_total: i64,
    discount_percent_applied: Option<f64>,
    discount_amount: Option<i64>,
    final_total: i64,
    assigned_to_id: Option<i64>,
    sales_user_id: Option<i64>,
    finance_user_id: Option<i64>,
    ops_user_id: Option<i64>,
}

impl LeadRow {
    /// Converts a stored row into the domain type.
    ///
    /// Fails if the stored status is outside the vocabulary, which
    /// indicates a corrupt row.
    pub(crate) fn into_lead(self) -> Result<Lead, PersistenceError> {
        let status = LeadStatus::from_str(&self.status)?;
        Ok(Lead {
            lead_id: Some(self.lead_id),
            client_name: self.client_name,
            email: self.email,
            phone: self.phone,
            company_name: self.company_name,
            source: self.source,
            status,
            notes: self.notes,
            base_total: self.base_total,
            discount_percent_applied: self.discount_percent_applied,
            discount_amount: self.discount_amount,
            final_total: self.final_total,
            assigned_to_id: self.assigned_to_id,
            sales_user_id: self.sales_user_id,
            finance_user_id: self.finance_user_id,
            ops_user_id: self.ops_user_id,
        })
    }
}

/// Diesel Queryable struct for campaign item rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = campaign_items)]
pub(crate) struct ItemRow {
    item_id: i64,
    lead_id: i64,
    unit_id: i64,
    rate: i64,
    printing_charge: i64,
    total: i64,
    booking_start_date: Option<String>,
    booking_end_date: Option<String>,
    booking_updated_at: Option<String>,
}

impl ItemRow {
    pub(crate) fn into_item(self) -> CampaignItem {
        CampaignItem {
            item_id: Some(self.item_id),
            lead_id: self.lead_id,
            unit_id: self.unit_id,
            rate: self.rate,
            printing_charge: self.printing_charge,
            total: self.total,
            booking_start_date: self.booking_start_date,
            booking_end_date: self.booking_end_date,
            booking_updated_at: self.booking_updated_at,
        }
    }
}

/// Diesel Queryable struct for activity log rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = activity_log)]
struct ActivityRow {
    event_id: i64,
    lead_id: i64,
    actor_id: String,
    actor_type: String,
    action: String,
    details: Option<String>,
    created_at: String,
}

impl ActivityRow {
    fn into_event(self) -> Result<ActivityEvent, PersistenceError> {
        let action = LogAction::from_str(&self.action)
            .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?;
        Ok(ActivityEvent::with_id(
            self.event_id,
            self.lead_id,
            Actor::new(self.actor_id, self.actor_type),
            action,
            self.details,
            Some(self.created_at),
        ))
    }
}

backend_fn! {
/// Retrieves a lead by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the lead is not found.
pub fn get_lead(conn: &mut _, lead_id: i64) -> Result<Option<Lead>, PersistenceError> {
    debug!("Looking up lead by ID: {}", lead_id);

    let result: Result<LeadRow, diesel::result::Error> = leads::table
        .filter(leads::lead_id.eq(lead_id))
        .select(LeadRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_lead()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists leads, newest first, optionally filtered by status.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored status is
/// outside the vocabulary.
pub fn list_leads(conn: &mut _, status: Option<&str>) -> Result<Vec<Lead>, PersistenceError> {
    debug!("Listing leads with status filter: {:?}", status);

    let mut query = leads::table.select(LeadRow::as_select()).into_boxed();

    if let Some(status) = status {
        query = query.filter(leads::status.eq(status.to_string()));
    }

    let rows: Vec<LeadRow> = query.order_by(leads::lead_id.desc()).load(conn)?;

    rows.into_iter().map(LeadRow::into_lead).collect()
}
}

backend_fn! {
/// Lists the campaign items attached to a lead, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_campaign_items(
    conn: &mut _,
    lead_id: i64,
) -> Result<Vec<CampaignItem>, PersistenceError> {
    debug!("Listing campaign items for lead ID: {}", lead_id);

    let rows: Vec<ItemRow> = campaign_items::table
        .filter(campaign_items::lead_id.eq(lead_id))
        .select(ItemRow::as_select())
        .order_by(campaign_items::item_id.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(ItemRow::into_item).collect())
}
}

backend_fn! {
/// Lists the campaign items on a set of units that carry a complete
/// booking window.
///
/// This is the working set for window conflict detection: items without
/// both dates can never collide.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_scheduled_items_for_units(
    conn: &mut _,
    unit_ids: &[i64],
) -> Result<Vec<CampaignItem>, PersistenceError> {
    debug!("Listing scheduled items for {} units", unit_ids.len());

    let rows: Vec<ItemRow> = campaign_items::table
        .filter(campaign_items::unit_id.eq_any(unit_ids))
        .filter(campaign_items::booking_start_date.is_not_null())
        .filter(campaign_items::booking_end_date.is_not_null())
        .select(ItemRow::as_select())
        .order_by(campaign_items::item_id.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(ItemRow::into_item).collect())
}
}

backend_fn! {
/// Lists the activity events recorded against a lead, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored action is
/// outside the vocabulary.
pub fn list_activity(conn: &mut _, lead_id: i64) -> Result<Vec<ActivityEvent>, PersistenceError> {
    debug!("Listing activity for lead ID: {}", lead_id);

    let rows: Vec<ActivityRow> = activity_log::table
        .filter(activity_log::lead_id.eq(lead_id))
        .select(ActivityRow::as_select())
        .order_by(activity_log::event_id.asc())
        .load(conn)?;

    rows.into_iter().map(ActivityRow::into_event).collect()
}
}

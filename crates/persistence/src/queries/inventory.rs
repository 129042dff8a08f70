// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Inventory unit queries.
//!
//! Backend-agnostic queries over the hoarding catalogue. All queries use
//! Diesel DSL and work across all supported database backends.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use std::str::FromStr;
use tracing::debug;

use admast_domain::{AvailabilityStatus, InventoryUnit};

use crate::diesel_schema::{campaign_items, inventory_units};
use crate::error::PersistenceError;

/// Filter for catalogue listings.
///
/// The default filter matches what the public website shows: active units
/// that are not currently booked, capped at 50 rows.
#[derive(Debug, Clone)]
pub struct InventoryFilter {
    /// Include archived units.
    pub include_inactive: bool,
    /// Include units currently held by a lead.
    pub include_booked: bool,
    /// Restrict to a state, when set.
    pub state: Option<String>,
    /// Restrict to a district, when set.
    pub district: Option<String>,
    /// Maximum number of rows returned.
    pub limit: i64,
}

impl Default for InventoryFilter {
    fn default() -> Self {
        Self {
            include_inactive: false,
            include_booked: false,
            state: None,
            district: None,
            limit: 50,
        }
    }
}

/// Diesel Queryable struct for inventory unit rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = inventory_units)]
pub(crate) struct UnitRow {
    unit_id: i64,
    unit_code: String,
    outlet_name: String,
    location_name: String,
    state: String,
    district: String,
    city: Option<String>,
    width_ft: Option<f64>,
    height_ft: Option<f64>,
    rate_per_sqft: Option<i64>,
    discounted_rate: Option<i64>,
    printing_charge: Option<i64>,
    installation_charge: Option<i64>,
    net_total: Option<i64>,
    is_active: i32,
    availability_status: String,
    current_lead_id: Option<i64>,
    booked_at: Option<String>,
}

impl UnitRow {
    /// Converts a stored row into the domain type.
    ///
    /// Fails if the stored availability status is outside the vocabulary,
    /// which indicates a corrupt row.
    pub(crate) fn into_unit(self) -> Result<InventoryUnit, PersistenceError> {
        let availability_status = AvailabilityStatus::from_str(&self.availability_status)?;
        Ok(InventoryUnit {
            unit_id: Some(self.unit_id),
            unit_code: self.unit_code,
            outlet_name: self.outlet_name,
            location_name: self.location_name,
            state: self.state,
            district: self.district,
            city: self.city,
            width_ft: self.width_ft,
            height_ft: self.height_ft,
            rate_per_sqft: self.rate_per_sqft,
            discounted_rate: self.discounted_rate,
            printing_charge: self.printing_charge,
            installation_charge: self.installation_charge,
            net_total: self.net_total,
            is_active: self.is_active != 0,
            availability_status,
            current_lead_id: self.current_lead_id,
            booked_at: self.booked_at,
        })
    }
}

backend_fn! {
/// Retrieves an inventory unit by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the unit is not found.
pub fn get_unit(conn: &mut _, unit_id: i64) -> Result<Option<InventoryUnit>, PersistenceError> {
    debug!("Looking up inventory unit by ID: {}", unit_id);

    let result: Result<UnitRow, diesel::result::Error> = inventory_units::table
        .filter(inventory_units::unit_id.eq(unit_id))
        .select(UnitRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_unit()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves an inventory unit by its inventory code.
///
/// The code is normalized to uppercase for case-insensitive lookup.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the unit is not found.
pub fn get_unit_by_code(
    conn: &mut _,
    unit_code: &str,
) -> Result<Option<InventoryUnit>, PersistenceError> {
    let normalized_code: String = unit_code.trim().to_uppercase();

    debug!("Looking up inventory unit by code: {}", normalized_code);

    let result: Result<UnitRow, diesel::result::Error> = inventory_units::table
        .filter(inventory_units::unit_code.eq(&normalized_code))
        .select(UnitRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_unit()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists catalogue units matching the given filter, ordered by inventory
/// code.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_units(
    conn: &mut _,
    filter: &InventoryFilter,
) -> Result<Vec<InventoryUnit>, PersistenceError> {
    debug!("Listing inventory units with filter: {:?}", filter);

    let mut query = inventory_units::table
        .select(UnitRow::as_select())
        .into_boxed();

    if !filter.include_inactive {
        query = query.filter(inventory_units::is_active.eq(1));
    }
    if !filter.include_booked {
        query = query.filter(inventory_units::availability_status.eq("AVAILABLE"));
    }
    if let Some(state) = &filter.state {
        query = query.filter(inventory_units::state.eq(state.clone()));
    }
    if let Some(district) = &filter.district {
        query = query.filter(inventory_units::district.eq(district.clone()));
    }

    let rows: Vec<UnitRow> = query
        .order_by(inventory_units::unit_code.asc())
        .limit(filter.limit)
        .load(conn)?;

    rows.into_iter().map(UnitRow::into_unit).collect()
}
}

backend_fn! {
/// Retrieves the inventory units named by a set of IDs.
///
/// Missing IDs are silently absent from the result; callers that care
/// must compare lengths.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_units_by_ids(
    conn: &mut _,
    unit_ids: &[i64],
) -> Result<Vec<InventoryUnit>, PersistenceError> {
    debug!("Looking up {} inventory units by ID", unit_ids.len());

    let rows: Vec<UnitRow> = inventory_units::table
        .filter(inventory_units::unit_id.eq_any(unit_ids))
        .select(UnitRow::as_select())
        .order_by(inventory_units::unit_code.asc())
        .load(conn)?;

    rows.into_iter().map(UnitRow::into_unit).collect()
}
}

backend_fn! {
/// Retrieves the inventory units attached to a lead's campaign.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_units_for_lead(
    conn: &mut _,
    lead_id: i64,
) -> Result<Vec<InventoryUnit>, PersistenceError> {
    debug!("Looking up inventory units for lead ID: {}", lead_id);

    let rows: Vec<UnitRow> = campaign_items::table
        .inner_join(inventory_units::table)
        .filter(campaign_items::lead_id.eq(lead_id))
        .select(UnitRow::as_select())
        .order_by(inventory_units::unit_code.asc())
        .load(conn)?;

    rows.into_iter().map(UnitRow::into_unit).collect()
}
}

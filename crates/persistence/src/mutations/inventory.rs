// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalogue mutations.
//!
//! Backend-agnostic mutations for the hoarding catalogue: creation,
//! CSV-driven import and pricing updates, and archival. Availability
//! columns are never touched here; only the booking operations in
//! `mutations::booking` move holds.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use admast_domain::InventoryUnit;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::inventory_units;
use crate::error::PersistenceError;
use crate::mutations::format_timestamp;

/// Outcome of importing a single catalogue row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The inventory code was new; a unit was created.
    Created(i64),
    /// The inventory code existed; catalogue fields were updated in place.
    Updated(i64),
}

backend_fn! {
/// Inserts a new inventory unit.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the inventory
/// code already exists.
pub fn insert_unit(conn: &mut _, unit: &InventoryUnit) -> Result<i64, PersistenceError> {
    info!("Creating inventory unit with code: {}", unit.unit_code);

    diesel::insert_into(inventory_units::table)
        .values((
            inventory_units::unit_code.eq(&unit.unit_code),
            inventory_units::outlet_name.eq(&unit.outlet_name),
            inventory_units::location_name.eq(&unit.location_name),
            inventory_units::state.eq(&unit.state),
            inventory_units::district.eq(&unit.district),
            inventory_units::city.eq(&unit.city),
            inventory_units::width_ft.eq(unit.width_ft),
            inventory_units::height_ft.eq(unit.height_ft),
            inventory_units::rate_per_sqft.eq(unit.rate_per_sqft),
            inventory_units::discounted_rate.eq(unit.discounted_rate),
            inventory_units::printing_charge.eq(unit.printing_charge),
            inventory_units::installation_charge.eq(unit.installation_charge),
            inventory_units::net_total.eq(unit.net_total),
            inventory_units::is_active.eq(i32::from(unit.is_active)),
            inventory_units::availability_status.eq(unit.availability_status.as_str()),
        ))
        .execute(conn)?;

    let unit_id: i64 = conn.get_last_insert_rowid()?;

    info!(unit_id, "Inventory unit created");
    Ok(unit_id)
}
}

backend_fn! {
/// Creates or updates a catalogue unit keyed by inventory code.
///
/// When the code already exists, only catalogue fields are rewritten.
/// Availability state, the holding lead, and the archival flag are
/// preserved so a re-import never clobbers live bookings.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn upsert_unit(
    conn: &mut _,
    unit: &InventoryUnit,
    now: time::OffsetDateTime,
) -> Result<ImportOutcome, PersistenceError> {
    let now_str = format_timestamp(now)?;

    conn.transaction::<ImportOutcome, PersistenceError, _>(|conn| {
        let existing: Option<i64> = inventory_units::table
            .filter(inventory_units::unit_code.eq(&unit.unit_code))
            .select(inventory_units::unit_id)
            .first(conn)
            .optional()?;

        if let Some(unit_id) = existing {
            debug!("Updating catalogue fields for unit code: {}", unit.unit_code);

            diesel::update(inventory_units::table)
                .filter(inventory_units::unit_id.eq(unit_id))
                .set((
                    inventory_units::outlet_name.eq(&unit.outlet_name),
                    inventory_units::location_name.eq(&unit.location_name),
                    inventory_units::state.eq(&unit.state),
                    inventory_units::district.eq(&unit.district),
                    inventory_units::city.eq(&unit.city),
                    inventory_units::width_ft.eq(unit.width_ft),
                    inventory_units::height_ft.eq(unit.height_ft),
                    inventory_units::rate_per_sqft.eq(unit.rate_per_sqft),
                    inventory_units::discounted_rate.eq(unit.discounted_rate),
                    inventory_units::printing_charge.eq(unit.printing_charge),
                    inventory_units::installation_charge.eq(unit.installation_charge),
                    inventory_units::net_total.eq(unit.net_total),
                    inventory_units::updated_at.eq(&now_str),
                ))
                .execute(conn)?;

            return Ok(ImportOutcome::Updated(unit_id));
        }

        info!("Importing new inventory unit with code: {}", unit.unit_code);

        diesel::insert_into(inventory_units::table)
            .values((
                inventory_units::unit_code.eq(&unit.unit_code),
                inventory_units::outlet_name.eq(&unit.outlet_name),
                inventory_units::location_name.eq(&unit.location_name),
                inventory_units::state.eq(&unit.state),
                inventory_units::district.eq(&unit.district),
                inventory_units::city.eq(&unit.city),
                inventory_units::width_ft.eq(unit.width_ft),
                inventory_units::height_ft.eq(unit.height_ft),
                inventory_units::rate_per_sqft.eq(unit.rate_per_sqft),
                inventory_units::discounted_rate.eq(unit.discounted_rate),
                inventory_units::printing_charge.eq(unit.printing_charge),
                inventory_units::installation_charge.eq(unit.installation_charge),
                inventory_units::net_total.eq(unit.net_total),
                inventory_units::is_active.eq(i32::from(unit.is_active)),
                inventory_units::availability_status.eq(unit.availability_status.as_str()),
            ))
            .execute(conn)?;

        let unit_id: i64 = conn.get_last_insert_rowid()?;
        Ok(ImportOutcome::Created(unit_id))
    })
}
}

backend_fn! {
/// Sets the archival flag on a unit.
///
/// Returns `false` if no unit with the given ID exists.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn set_unit_active(
    conn: &mut _,
    unit_id: i64,
    active: bool,
    now: time::OffsetDateTime,
) -> Result<bool, PersistenceError> {
    info!("Setting is_active={} on unit ID: {}", active, unit_id);

    let now_str = format_timestamp(now)?;

    let rows_affected: usize = diesel::update(inventory_units::table)
        .filter(inventory_units::unit_id.eq(unit_id))
        .set((
            inventory_units::is_active.eq(i32::from(active)),
            inventory_units::updated_at.eq(&now_str),
        ))
        .execute(conn)?;

    Ok(rows_affected > 0)
}
}

backend_fn! {
/// Updates the negotiated rate for a unit identified by inventory code.
///
/// Returns `false` if no unit with the given code exists.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_unit_price(
    conn: &mut _,
    unit_code: &str,
    discounted_rate: i64,
    now: time::OffsetDateTime,
) -> Result<bool, PersistenceError> {
    let normalized_code: String = unit_code.trim().to_uppercase();

    debug!(
        "Updating discounted_rate={} for unit code: {}",
        discounted_rate, normalized_code
    );

    let now_str = format_timestamp(now)?;

    let rows_affected: usize = diesel::update(inventory_units::table)
        .filter(inventory_units::unit_code.eq(&normalized_code))
        .set((
            inventory_units::discounted_rate.eq(discounted_rate),
            inventory_units::updated_at.eq(&now_str),
        ))
        .execute(conn)?;

    Ok(rows_affected > 0)
}
}

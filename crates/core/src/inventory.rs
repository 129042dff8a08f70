// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalogue operations: listing, typed imports, archival, and bulk
//! price updates.
//!
//! Imports are typed rows upserted by inventory code; no header
//! guessing happens anywhere. The bulk price CSV names its target
//! column explicitly (`discounted_rate`) and the parsing itself lives
//! at the edge.

use tracing::info;

use admast_domain::{InventoryUnit, validate_unit_code};
use admast_persistence::{ImportOutcome, InventoryFilter, Persistence};

use crate::error::CoreError;

/// Counts from a catalogue import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Rows whose inventory code was new.
    pub created: usize,
    /// Rows that updated an existing unit in place.
    pub updated: usize,
}

/// A single price update from the bulk CSV, already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceUpdate {
    /// The inventory code naming the unit.
    pub unit_code: String,
    /// The new negotiated rate in whole currency units.
    pub discounted_rate: i64,
}

/// Counts from a bulk price update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PriceUpdateSummary {
    /// Units whose rate was updated.
    pub updated: usize,
    /// Inventory codes that matched no unit.
    pub missing: Vec<String>,
}

/// Lists catalogue units matching the given filter.
///
/// # Errors
///
/// Returns an error if the store query fails.
pub fn list_inventory(
    store: &mut Persistence,
    filter: &InventoryFilter,
) -> Result<Vec<InventoryUnit>, CoreError> {
    Ok(store.list_units(filter)?)
}

/// Imports typed catalogue rows, upserting by inventory code.
///
/// Updates preserve availability state and the archival flag; created
/// units start active and available. Admin-gated at the edge.
///
/// # Errors
///
/// Returns `Validation` when a row carries an empty inventory code, and
/// `Store` for persistence failures. Rows before the failing one stay
/// applied.
pub fn import_inventory(
    store: &mut Persistence,
    rows: &[InventoryUnit],
    now: time::OffsetDateTime,
) -> Result<ImportSummary, CoreError> {
    let mut summary = ImportSummary::default();
    for row in rows {
        validate_unit_code(&row.unit_code)?;
        match store.upsert_unit(row, now)? {
            ImportOutcome::Created(_) => summary.created += 1,
            ImportOutcome::Updated(_) => summary.updated += 1,
        }
    }
    info!(
        created = summary.created,
        updated = summary.updated,
        "Catalogue import finished"
    );
    Ok(summary)
}

/// Applies parsed bulk price updates, matching units by inventory code.
///
/// Unknown codes are collected and reported rather than failing the
/// batch. Admin-gated at the edge.
///
/// # Errors
///
/// Returns `Validation` when a row carries an empty inventory code, and
/// `Store` for persistence failures.
pub fn bulk_update_prices(
    store: &mut Persistence,
    updates: &[PriceUpdate],
    now: time::OffsetDateTime,
) -> Result<PriceUpdateSummary, CoreError> {
    let mut summary = PriceUpdateSummary::default();
    for update in updates {
        validate_unit_code(&update.unit_code)?;
        if store.update_unit_price(&update.unit_code, update.discounted_rate, now)? {
            summary.updated += 1;
        } else {
            summary.missing.push(update.unit_code.clone());
        }
    }
    info!(
        updated = summary.updated,
        missing = summary.missing.len(),
        "Bulk price update finished"
    );
    Ok(summary)
}

/// Archives or unarchives a catalogue unit.
///
/// # Errors
///
/// Returns `NotFound` when the unit does not exist.
pub fn set_unit_active(
    store: &mut Persistence,
    unit_id: i64,
    active: bool,
    now: time::OffsetDateTime,
) -> Result<(), CoreError> {
    if store.set_unit_active(unit_id, active, now)? {
        info!(unit_id, active, "Unit archival flag set");
        Ok(())
    } else {
        Err(CoreError::NotFound(format!(
            "Inventory unit {unit_id} not found"
        )))
    }
}

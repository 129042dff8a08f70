// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Compound transactional ledger operations.
//!
//! Every check-then-write sequence in the booking ledger runs here inside
//! a single database transaction: timeline assignment (window conflict
//! check plus date writes), status transitions (hold acquisition or
//! release plus the lead update), campaign edits, and the lead cascade
//! delete. Business outcomes are reported as typed enums; a `Result::Err`
//! always means infrastructure failure and rolls the transaction back.
//!
//! Conflict detection itself is pure domain logic
//! (`admast_domain::find_window_conflict` / `find_hold_conflict`); this
//! module only stages the data and applies the verdict atomically.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use admast_audit::ActivityEvent;
use admast_domain::{
    BookingEffect, BookingWindow, CampaignItem, InventoryUnit, Lead, find_hold_conflict,
    find_window_conflict, recalculate_totals,
};

use crate::diesel_schema::{activity_log, campaign_items, inventory_units, leads};
use crate::error::PersistenceError;
use crate::mutations::format_timestamp;
use crate::queries::inventory::UnitRow;
use crate::queries::leads::{ItemRow, LeadRow};

/// Outcome of a timeline assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineOutcome {
    /// The window was written to every named campaign item.
    Applied { items_updated: usize },
    /// Another lead holds a colliding window on one of the units.
    WindowConflict { unit_id: i64, holder_lead_id: i64 },
    /// A named unit is not part of the lead's campaign.
    UnitNotOnLead { unit_id: i64 },
    /// The lead does not exist.
    LeadMissing,
}

/// Outcome of a status transition or lead update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The lead was updated and any hold changes were applied.
    Applied,
    /// Another lead already holds one of the campaign's units.
    HoldConflict {
        unit_code: String,
        holder_lead_id: i64,
    },
    /// The lead does not exist.
    LeadMissing,
}

/// Outcome of attaching inventory units to a campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddItemsOutcome {
    /// Items were attached and the lead totals recomputed.
    Added {
        attached: usize,
        base_total: i64,
        final_total: i64,
    },
    /// The lead is in a booking status and another lead holds one of the
    /// new units.
    HoldConflict {
        unit_code: String,
        holder_lead_id: i64,
    },
    /// The lead does not exist.
    LeadMissing,
}

/// Outcome of detaching a campaign item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveItemOutcome {
    /// The item was removed and the lead totals recomputed.
    Removed {
        unit_id: i64,
        base_total: i64,
        final_total: i64,
    },
    /// No such item exists on the lead.
    ItemMissing,
}

backend_fn! {
/// Assigns a booking window to a set of the lead's campaign items.
///
/// The window is rejected when any other lead has a colliding window on
/// one of the named units. Endpoints count as collisions. On success the
/// window is written to every named item and the activity event recorded,
/// all in one transaction.
///
/// # Errors
///
/// Returns an error only for infrastructure failures; business rejections
/// are reported through [`TimelineOutcome`].
pub fn assign_timeline(
    conn: &mut _,
    lead_id: i64,
    unit_ids: &[i64],
    window: &BookingWindow,
    now: time::OffsetDateTime,
    event: &ActivityEvent,
) -> Result<TimelineOutcome, PersistenceError> {
    let now_str = format_timestamp(now)?;

    conn.transaction::<TimelineOutcome, PersistenceError, _>(|conn| {
        let lead_exists: Option<i64> = leads::table
            .filter(leads::lead_id.eq(lead_id))
            .select(leads::lead_id)
            .first(conn)
            .optional()?;
        if lead_exists.is_none() {
            return Ok(TimelineOutcome::LeadMissing);
        }

        let own_rows: Vec<ItemRow> = campaign_items::table
            .filter(campaign_items::lead_id.eq(lead_id))
            .select(ItemRow::as_select())
            .load(conn)?;
        let own_items: Vec<CampaignItem> = own_rows.into_iter().map(ItemRow::into_item).collect();

        for &unit_id in unit_ids {
            if !own_items.iter().any(|item| item.unit_id == unit_id) {
                return Ok(TimelineOutcome::UnitNotOnLead { unit_id });
            }
        }

        // Every scheduled window on these units, across all leads
        let scheduled_rows: Vec<ItemRow> = campaign_items::table
            .filter(campaign_items::unit_id.eq_any(unit_ids))
            .filter(campaign_items::booking_start_date.is_not_null())
            .filter(campaign_items::booking_end_date.is_not_null())
            .select(ItemRow::as_select())
            .load(conn)?;
        let scheduled: Vec<CampaignItem> =
            scheduled_rows.into_iter().map(ItemRow::into_item).collect();

        if let Some(conflict) = find_window_conflict(window, lead_id, &scheduled)? {
            debug!(
                "Timeline for lead {} conflicts with lead {} on unit {}",
                lead_id, conflict.lead_id, conflict.unit_id
            );
            return Ok(TimelineOutcome::WindowConflict {
                unit_id: conflict.unit_id,
                holder_lead_id: conflict.lead_id,
            });
        }

        let items_updated: usize = diesel::update(campaign_items::table)
            .filter(campaign_items::lead_id.eq(lead_id))
            .filter(campaign_items::unit_id.eq_any(unit_ids))
            .set((
                campaign_items::booking_start_date.eq(Some(window.start().to_string())),
                campaign_items::booking_end_date.eq(Some(window.end().to_string())),
                campaign_items::booking_updated_at.eq(Some(now_str.clone())),
            ))
            .execute(conn)?;

        diesel::insert_into(activity_log::table)
            .values((
                activity_log::lead_id.eq(event.lead_id),
                activity_log::actor_id.eq(&event.actor.id),
                activity_log::actor_type.eq(&event.actor.actor_type),
                activity_log::action.eq(event.action.as_str()),
                activity_log::details.eq(&event.details),
            ))
            .execute(conn)?;

        info!(lead_id, items_updated, "Booking window assigned");
        Ok(TimelineOutcome::Applied { items_updated })
    })
}
}

backend_fn! {
/// Applies an updated lead row together with its inventory-hold effect.
///
/// When the transition enters the booking family, every unit attached to
/// the lead must be free or already held by it; one foreign hold rejects
/// the whole transition. Leaving the family releases every hold. The lead
/// row update, the hold changes, and the activity events commit
/// atomically.
///
/// # Errors
///
/// Returns an error only for infrastructure failures; business rejections
/// are reported through [`TransitionOutcome`].
pub fn apply_lead_update(
    conn: &mut _,
    lead: &Lead,
    effect: BookingEffect,
    now: time::OffsetDateTime,
    events: &[ActivityEvent],
) -> Result<TransitionOutcome, PersistenceError> {
    let Some(lead_id) = lead.lead_id else {
        return Err(PersistenceError::Other(
            "Cannot update a lead without a persisted ID".to_string(),
        ));
    };
    let now_str = format_timestamp(now)?;

    conn.transaction::<TransitionOutcome, PersistenceError, _>(|conn| {
        let lead_exists: Option<i64> = leads::table
            .filter(leads::lead_id.eq(lead_id))
            .select(leads::lead_id)
            .first(conn)
            .optional()?;
        if lead_exists.is_none() {
            return Ok(TransitionOutcome::LeadMissing);
        }

        match effect {
            BookingEffect::AcquireHolds => {
                let unit_rows: Vec<UnitRow> = campaign_items::table
                    .inner_join(inventory_units::table)
                    .filter(campaign_items::lead_id.eq(lead_id))
                    .select(UnitRow::as_select())
                    .load(conn)?;
                let units: Vec<InventoryUnit> = unit_rows
                    .into_iter()
                    .map(UnitRow::into_unit)
                    .collect::<Result<_, _>>()?;

                if let Some(held) = find_hold_conflict(lead_id, &units) {
                    debug!(
                        "Hold conflict for lead {} on unit {} held by lead {:?}",
                        lead_id, held.unit_code, held.current_lead_id
                    );
                    return Ok(TransitionOutcome::HoldConflict {
                        unit_code: held.unit_code.clone(),
                        holder_lead_id: held.current_lead_id.unwrap_or_default(),
                    });
                }

                let unit_ids: Vec<i64> =
                    units.iter().filter_map(|unit| unit.unit_id).collect();
                let held: usize = diesel::update(inventory_units::table)
                    .filter(inventory_units::unit_id.eq_any(&unit_ids))
                    .set((
                        inventory_units::availability_status.eq("BOOKED"),
                        inventory_units::current_lead_id.eq(Some(lead_id)),
                        inventory_units::booked_at.eq(Some(now_str.clone())),
                        inventory_units::updated_at.eq(&now_str),
                    ))
                    .execute(conn)?;
                info!(lead_id, held, "Inventory holds acquired");
            }
            BookingEffect::ReleaseHolds => {
                let released: usize = diesel::update(inventory_units::table)
                    .filter(inventory_units::current_lead_id.eq(lead_id))
                    .set((
                        inventory_units::availability_status.eq("AVAILABLE"),
                        inventory_units::current_lead_id.eq(None::<i64>),
                        inventory_units::booked_at.eq(None::<String>),
                        inventory_units::updated_at.eq(&now_str),
                    ))
                    .execute(conn)?;
                info!(lead_id, released, "Inventory holds released");
            }
            BookingEffect::NoChange => {}
        }

        diesel::update(leads::table)
            .filter(leads::lead_id.eq(lead_id))
            .set((
                leads::client_name.eq(&lead.client_name),
                leads::email.eq(&lead.email),
                leads::phone.eq(&lead.phone),
                leads::company_name.eq(&lead.company_name),
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
                leads::updated_at.eq(&now_str),
            ))
            .execute(conn)?;

        for event in events {
            diesel::insert_into(activity_log::table)
                .values((
                    activity_log::lead_id.eq(event.lead_id),
                    activity_log::actor_id.eq(&event.actor.id),
                    activity_log::actor_type.eq(&event.actor.actor_type),
                    activity_log::action.eq(event.action.as_str()),
                    activity_log::details.eq(&event.details),
                ))
                .execute(conn)?;
        }

        Ok(TransitionOutcome::Applied)
    })
}
}

backend_fn! {
/// Attaches inventory units to a lead's campaign and recomputes its
/// totals.
///
/// Units already attached are skipped. When the lead sits in a booking
/// status, the new units must be free or already held by it and are
/// booked as part of the same transaction.
///
/// # Errors
///
/// Returns an error only for infrastructure failures; business rejections
/// are reported through [`AddItemsOutcome`].
pub fn add_campaign_items(
    conn: &mut _,
    lead_id: i64,
    items: &[CampaignItem],
    now: time::OffsetDateTime,
    event: &ActivityEvent,
) -> Result<AddItemsOutcome, PersistenceError> {
    let now_str = format_timestamp(now)?;

    conn.transaction::<AddItemsOutcome, PersistenceError, _>(|conn| {
        let lead_row: Option<LeadRow> = leads::table
            .filter(leads::lead_id.eq(lead_id))
            .select(LeadRow::as_select())
            .first(conn)
            .optional()?;
        let Some(lead_row) = lead_row else {
            return Ok(AddItemsOutcome::LeadMissing);
        };
        let lead: Lead = lead_row.into_lead()?;

        let attached_unit_ids: Vec<i64> = campaign_items::table
            .filter(campaign_items::lead_id.eq(lead_id))
            .select(campaign_items::unit_id)
            .load(conn)?;

        let new_items: Vec<&CampaignItem> = items
            .iter()
            .filter(|item| !attached_unit_ids.contains(&item.unit_id))
            .collect();
        let new_unit_ids: Vec<i64> = new_items.iter().map(|item| item.unit_id).collect();

        // A lead already holding its inventory must hold anything newly
        // attached as well, so the conflict test runs before any write.
        if lead.status.is_booking_status() && !new_unit_ids.is_empty() {
            let unit_rows: Vec<UnitRow> = inventory_units::table
                .filter(inventory_units::unit_id.eq_any(&new_unit_ids))
                .select(UnitRow::as_select())
                .load(conn)?;
            let units: Vec<InventoryUnit> = unit_rows
                .into_iter()
                .map(UnitRow::into_unit)
                .collect::<Result<_, _>>()?;

            if let Some(held) = find_hold_conflict(lead_id, &units) {
                return Ok(AddItemsOutcome::HoldConflict {
                    unit_code: held.unit_code.clone(),
                    holder_lead_id: held.current_lead_id.unwrap_or_default(),
                });
            }
        }

        for item in &new_items {
            diesel::insert_into(campaign_items::table)
                .values((
                    campaign_items::lead_id.eq(lead_id),
                    campaign_items::unit_id.eq(item.unit_id),
                    campaign_items::rate.eq(item.rate),
                    campaign_items::printing_charge.eq(item.printing_charge),
                    campaign_items::total.eq(item.total),
                ))
                .execute(conn)?;
        }

        if lead.status.is_booking_status() && !new_unit_ids.is_empty() {
            diesel::update(inventory_units::table)
                .filter(inventory_units::unit_id.eq_any(&new_unit_ids))
                .set((
                    inventory_units::availability_status.eq("BOOKED"),
                    inventory_units::current_lead_id.eq(Some(lead_id)),
                    inventory_units::booked_at.eq(Some(now_str.clone())),
                    inventory_units::updated_at.eq(&now_str),
                ))
                .execute(conn)?;
        }

        let base_total: i64 = campaign_items::table
            .filter(campaign_items::lead_id.eq(lead_id))
            .select(diesel::dsl::sql::<diesel::sql_types::Nullable<diesel::sql_types::BigInt>>(
                "CAST(SUM(total) AS SIGNED)",
            ))
            .first::<Option<i64>>(conn)?
            .unwrap_or(0);
        let totals = recalculate_totals(base_total, lead.discount_percent_applied)?;

        diesel::update(leads::table)
            .filter(leads::lead_id.eq(lead_id))
            .set((
                leads::base_total.eq(totals.base_total),
                leads::discount_amount.eq(totals.discount_amount),
                leads::final_total.eq(totals.final_total),
                leads::updated_at.eq(&now_str),
            ))
            .execute(conn)?;

        diesel::insert_into(activity_log::table)
            .values((
                activity_log::lead_id.eq(event.lead_id),
                activity_log::actor_id.eq(&event.actor.id),
                activity_log::actor_type.eq(&event.actor.actor_type),
                activity_log::action.eq(event.action.as_str()),
                activity_log::details.eq(&event.details),
            ))
            .execute(conn)?;

        info!(
            lead_id,
            attached = new_items.len(),
            base_total = totals.base_total,
            "Campaign items attached"
        );
        Ok(AddItemsOutcome::Added {
            attached: new_items.len(),
            base_total: totals.base_total,
            final_total: totals.final_total,
        })
    })
}
}

backend_fn! {
/// Detaches a campaign item from a lead and recomputes its totals.
///
/// When the lead currently holds the item's unit, the hold is released
/// as part of the same transaction.
///
/// # Errors
///
/// Returns an error only for infrastructure failures; business rejections
/// are reported through [`RemoveItemOutcome`].
pub fn remove_campaign_item(
    conn: &mut _,
    lead_id: i64,
    item_id: i64,
    now: time::OffsetDateTime,
    event: &ActivityEvent,
) -> Result<RemoveItemOutcome, PersistenceError> {
    let now_str = format_timestamp(now)?;

    conn.transaction::<RemoveItemOutcome, PersistenceError, _>(|conn| {
        let unit_id: Option<i64> = campaign_items::table
            .filter(campaign_items::item_id.eq(item_id))
            .filter(campaign_items::lead_id.eq(lead_id))
            .select(campaign_items::unit_id)
            .first(conn)
            .optional()?;
        let Some(unit_id) = unit_id else {
            return Ok(RemoveItemOutcome::ItemMissing);
        };

        diesel::delete(campaign_items::table)
            .filter(campaign_items::item_id.eq(item_id))
            .execute(conn)?;

        // Release the hold if this lead held the unit
        diesel::update(inventory_units::table)
            .filter(inventory_units::unit_id.eq(unit_id))
            .filter(inventory_units::current_lead_id.eq(lead_id))
            .set((
                inventory_units::availability_status.eq("AVAILABLE"),
                inventory_units::current_lead_id.eq(None::<i64>),
                inventory_units::booked_at.eq(None::<String>),
                inventory_units::updated_at.eq(&now_str),
            ))
            .execute(conn)?;

        let lead_row: Option<LeadRow> = leads::table
            .filter(leads::lead_id.eq(lead_id))
            .select(LeadRow::as_select())
            .first(conn)
            .optional()?;
        let Some(lead_row) = lead_row else {
            return Ok(RemoveItemOutcome::ItemMissing);
        };
        let lead: Lead = lead_row.into_lead()?;

        let base_total: i64 = campaign_items::table
            .filter(campaign_items::lead_id.eq(lead_id))
            .select(diesel::dsl::sql::<diesel::sql_types::Nullable<diesel::sql_types::BigInt>>(
                "CAST(SUM(total) AS SIGNED)",
            ))
            .first::<Option<i64>>(conn)?
            .unwrap_or(0);
        let totals = recalculate_totals(base_total, lead.discount_percent_applied)?;

        diesel::update(leads::table)
            .filter(leads::lead_id.eq(lead_id))
            .set((
                leads::base_total.eq(totals.base_total),
                leads::discount_amount.eq(totals.discount_amount),
                leads::final_total.eq(totals.final_total),
                leads::updated_at.eq(&now_str),
            ))
            .execute(conn)?;

        diesel::insert_into(activity_log::table)
            .values((
                activity_log::lead_id.eq(event.lead_id),
                activity_log::actor_id.eq(&event.actor.id),
                activity_log::actor_type.eq(&event.actor.actor_type),
                activity_log::action.eq(event.action.as_str()),
                activity_log::details.eq(&event.details),
            ))
            .execute(conn)?;

        info!(lead_id, unit_id, "Campaign item removed");
        Ok(RemoveItemOutcome::Removed {
            unit_id,
            base_total: totals.base_total,
            final_total: totals.final_total,
        })
    })
}
}

backend_fn! {
/// Deletes a lead and everything attached to it.
///
/// Holds are released, campaign items and the activity log removed, and
/// the lead row deleted, all in one transaction. Returns `false` when the
/// lead does not exist.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_lead(
    conn: &mut _,
    lead_id: i64,
    now: time::OffsetDateTime,
) -> Result<bool, PersistenceError> {
    let now_str = format_timestamp(now)?;

    conn.transaction::<bool, PersistenceError, _>(|conn| {
        let released: usize = diesel::update(inventory_units::table)
            .filter(inventory_units::current_lead_id.eq(lead_id))
            .set((
                inventory_units::availability_status.eq("AVAILABLE"),
                inventory_units::current_lead_id.eq(None::<i64>),
                inventory_units::booked_at.eq(None::<String>),
                inventory_units::updated_at.eq(&now_str),
            ))
            .execute(conn)?;

        diesel::delete(activity_log::table)
            .filter(activity_log::lead_id.eq(lead_id))
            .execute(conn)?;
        diesel::delete(campaign_items::table)
            .filter(campaign_items::lead_id.eq(lead_id))
            .execute(conn)?;
        let rows_deleted: usize = diesel::delete(leads::table)
            .filter(leads::lead_id.eq(lead_id))
            .execute(conn)?;

        if rows_deleted > 0 {
            info!(lead_id, released, "Lead deleted");
        }
        Ok(rows_deleted > 0)
    })
}
}

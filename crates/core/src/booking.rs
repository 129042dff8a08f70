// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The booking ledger engine.
//!
//! Orchestrates leads over the store: quote intake, campaign edits,
//! timeline assignment, status transitions with their inventory-hold
//! effects, handoffs, and cascade deletion. Every mutation is a single
//! store transaction and writes its activity event inside it; conflicts
//! are reported, never silently resolved.

use tracing::info;

use admast_audit::{ActivityEvent, Actor, LogAction};
use admast_domain::{
    BookingWindow, CampaignItem, InventoryUnit, Lead, LeadStatus, recalculate_totals,
    validate_campaign_selection, validate_client_name, validate_email, validate_percent,
};
use admast_persistence::{
    AddItemsOutcome, Persistence, RemoveItemOutcome, TimelineOutcome, TransitionOutcome,
};

use crate::error::CoreError;
use crate::inquiry::designated_approver;
use crate::mail::{self, OutboundMail};

/// Lead source recorded for quote submissions carrying a cart.
pub const SOURCE_CART_QUOTE: &str = "WEBSITE_CART_QUOTE";

/// Lead source recorded for service-interest submissions.
pub const SOURCE_SERVICE_INQUIRY: &str = "WEBSITE_SERVICE_INQUIRY";

/// A public quote submission from the website.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    /// The client's name.
    pub client_name: String,
    /// The client's email address.
    pub email: Option<String>,
    /// The client's phone number.
    pub phone: Option<String>,
    /// The client's company, when given.
    pub company_name: Option<String>,
    /// Where the submission came from.
    pub source: String,
    /// Free-form message attached to the submission.
    pub notes: Option<String>,
    /// The inventory units in the submitted cart, possibly empty.
    pub unit_ids: Vec<i64>,
}

/// The result of quote intake: the new lead's ID and the notification
/// mails awaiting delivery.
#[derive(Debug)]
pub struct CreatedQuote {
    /// The persisted lead's ID.
    pub lead_id: i64,
    /// Admin notification and client confirmation, where addressable.
    pub mails: Vec<OutboundMail>,
}

/// Field changes requested against a lead. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadUpdate {
    /// New pipeline status.
    pub status: Option<LeadStatus>,
    /// New discount percentage. Zero clears the discount.
    pub discount_percent: Option<f64>,
    /// Replacement for the stored notes.
    pub notes: Option<String>,
    /// A remark to append to the activity log without field changes.
    pub remark: Option<String>,
    /// New assignee.
    pub assigned_to_id: Option<i64>,
    /// Finance operator to hand the lead to. Forces `IN_PROGRESS`.
    pub finance_user_id: Option<i64>,
    /// Operations operator to hand the lead to. Forces `HANDOFF_TO_OPS`.
    pub ops_user_id: Option<i64>,
}

/// Recomputed campaign figures after an item change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignChange {
    /// Number of items attached or detached.
    pub affected: usize,
    /// Recomputed sum of item totals, in whole currency units.
    pub base_total: i64,
    /// Recomputed total after discount, in whole currency units.
    pub final_total: i64,
}

/// A lead with its campaign and history, for detail views.
#[derive(Debug)]
pub struct LeadDetail {
    /// The lead itself.
    pub lead: Lead,
    /// Its campaign items.
    pub items: Vec<CampaignItem>,
    /// The inventory units those items book.
    pub units: Vec<InventoryUnit>,
    /// Its activity log, oldest first.
    pub activity: Vec<ActivityEvent>,
}

/// Captures a public quote submission as a `NEW` lead.
///
/// Cart units are attached with their catalogue prices frozen, and the
/// lead's totals derived from them. Composes an admin notification and,
/// when the client left an address, a confirmation mail.
///
/// # Errors
///
/// Returns `Validation` for bad fields or an unknown source, `NotFound`
/// when a cart unit does not exist, and `Store` for persistence
/// failures.
pub fn create_quote_lead(
    store: &mut Persistence,
    fallback_admin: Option<&str>,
    request: &QuoteRequest,
    now: time::OffsetDateTime,
) -> Result<CreatedQuote, CoreError> {
    validate_client_name(&request.client_name)?;
    if let Some(email) = &request.email {
        validate_email(email)?;
    }
    if request.source != SOURCE_CART_QUOTE && request.source != SOURCE_SERVICE_INQUIRY {
        return Err(CoreError::Validation(format!(
            "Unknown lead source: {}",
            request.source
        )));
    }

    let mut lead = Lead::new(request.client_name.trim().to_string(), request.source.clone());
    lead.email = request.email.clone();
    lead.phone = request.phone.clone();
    lead.company_name = request.company_name.clone();
    lead.notes = request.notes.clone();

    let lead_id = store.insert_lead(&lead)?;
    store.record_activity(&ActivityEvent::new(
        lead_id,
        Actor::client(),
        LogAction::LeadCreated,
        Some(format!("Lead captured from {}.", request.source)),
    ))?;

    if !request.unit_ids.is_empty() {
        attach_units(store, Actor::client(), lead_id, &request.unit_ids, now)?;
    }

    let lead = store
        .get_lead(lead_id)?
        .ok_or_else(|| CoreError::Internal(format!("Lead {lead_id} vanished after insert")))?;
    info!(lead_id, source = %lead.source, "Quote lead captured");

    let mut mails = Vec::new();
    if let Some(admin) = designated_approver(store, fallback_admin)? {
        mails.push(mail::quote_received(&admin, &lead, request.unit_ids.len()));
    }
    if let Some(email) = &lead.email {
        mails.push(mail::quote_confirmation(email, &lead));
    }

    Ok(CreatedQuote { lead_id, mails })
}

/// Attaches inventory units to a lead's campaign with their catalogue
/// prices frozen, recomputing the lead's totals.
///
/// # Errors
///
/// Returns `Validation` for an empty selection, `NotFound` when the
/// lead or a unit does not exist, and `Conflict` when the lead is in a
/// booking status and another lead holds one of the units.
pub fn add_units_to_campaign(
    store: &mut Persistence,
    actor: Actor,
    lead_id: i64,
    unit_ids: &[i64],
    now: time::OffsetDateTime,
) -> Result<CampaignChange, CoreError> {
    validate_campaign_selection(unit_ids)?;
    if store.get_lead(lead_id)?.is_none() {
        return Err(CoreError::NotFound(format!("Lead {lead_id} not found")));
    }
    attach_units(store, actor, lead_id, unit_ids, now)
}

/// Shared attach path for quote intake and explicit campaign edits.
fn attach_units(
    store: &mut Persistence,
    actor: Actor,
    lead_id: i64,
    unit_ids: &[i64],
    now: time::OffsetDateTime,
) -> Result<CampaignChange, CoreError> {
    let units = store.get_units_by_ids(unit_ids)?;
    for requested in unit_ids {
        if !units.iter().any(|u| u.unit_id == Some(*requested)) {
            return Err(CoreError::NotFound(format!(
                "Inventory unit {requested} not found"
            )));
        }
    }

    let items: Vec<CampaignItem> = units
        .iter()
        .map(|unit| {
            CampaignItem::priced(
                lead_id,
                unit.unit_id.unwrap_or_default(),
                unit.effective_rate(),
                unit.printing_charge.unwrap_or(0),
            )
        })
        .collect();

    let codes: Vec<&str> = units.iter().map(|u| u.unit_code.as_str()).collect();
    let event = ActivityEvent::new(
        lead_id,
        actor,
        LogAction::CampaignAdd,
        Some(format!("Added units to campaign: {}.", codes.join(", "))),
    );

    match store.add_campaign_items(lead_id, &items, now, &event)? {
        AddItemsOutcome::Added {
            attached,
            base_total,
            final_total,
        } => Ok(CampaignChange {
            affected: attached,
            base_total,
            final_total,
        }),
        AddItemsOutcome::HoldConflict {
            unit_code,
            holder_lead_id,
        } => Err(CoreError::Conflict {
            unit_code,
            holder_lead_id,
        }),
        AddItemsOutcome::LeadMissing => {
            Err(CoreError::NotFound(format!("Lead {lead_id} not found")))
        }
    }
}

/// Detaches a campaign item from a lead, recomputing its totals.
///
/// # Errors
///
/// Returns `NotFound` when the item is not on the lead, and `Store` for
/// persistence failures.
pub fn remove_campaign_item(
    store: &mut Persistence,
    actor: Actor,
    lead_id: i64,
    item_id: i64,
    now: time::OffsetDateTime,
) -> Result<CampaignChange, CoreError> {
    let event = ActivityEvent::new(
        lead_id,
        actor,
        LogAction::CampaignRemove,
        Some(format!("Removed campaign item {item_id}.")),
    );
    match store.remove_campaign_item(lead_id, item_id, now, &event)? {
        RemoveItemOutcome::Removed {
            base_total,
            final_total,
            ..
        } => Ok(CampaignChange {
            affected: 1,
            base_total,
            final_total,
        }),
        RemoveItemOutcome::ItemMissing => Err(CoreError::NotFound(format!(
            "Campaign item {item_id} not found on lead {lead_id}"
        ))),
    }
}

/// Assigns a booking window to a set of the lead's campaign items.
///
/// The window never touches availability; it only schedules. Collisions
/// with any other lead's window on the same unit are rejected with no
/// changes, endpoints included.
///
/// # Errors
///
/// Returns `Validation` for an empty selection, a reversed range, or a
/// unit outside the lead's campaign; `Conflict` naming the contended
/// unit and holder; `NotFound` when the lead does not exist.
pub fn set_timeline(
    store: &mut Persistence,
    actor: Actor,
    lead_id: i64,
    unit_ids: &[i64],
    start: &str,
    end: &str,
    now: time::OffsetDateTime,
) -> Result<usize, CoreError> {
    validate_campaign_selection(unit_ids)?;
    let window = BookingWindow::parse(start, end)?;

    let event = ActivityEvent::new(
        lead_id,
        actor,
        LogAction::TimelineSet,
        Some(format!(
            "Booking window {window} set on {} unit(s).",
            unit_ids.len()
        )),
    );

    match store.assign_timeline(lead_id, unit_ids, &window, now, &event)? {
        TimelineOutcome::Applied { items_updated } => {
            info!(lead_id, items_updated, %window, "Timeline assigned");
            Ok(items_updated)
        }
        TimelineOutcome::WindowConflict {
            unit_id,
            holder_lead_id,
        } => Err(CoreError::Conflict {
            unit_code: unit_code_for(store, unit_id)?,
            holder_lead_id,
        }),
        TimelineOutcome::UnitNotOnLead { unit_id } => Err(CoreError::Validation(format!(
            "Unit {unit_id} is not part of lead {lead_id}'s campaign"
        ))),
        TimelineOutcome::LeadMissing => {
            Err(CoreError::NotFound(format!("Lead {lead_id} not found")))
        }
    }
}

/// Moves a lead to a new pipeline status, applying the inventory-hold
/// effect of crossing the booking boundary.
///
/// # Errors
///
/// Returns `NotFound` when the lead does not exist and `Conflict` when
/// entering a booking status while another lead holds one of the units.
pub fn transition_lead_status(
    store: &mut Persistence,
    actor: Actor,
    lead_id: i64,
    new_status: LeadStatus,
    now: time::OffsetDateTime,
) -> Result<Lead, CoreError> {
    let update = LeadUpdate {
        status: Some(new_status),
        ..LeadUpdate::default()
    };
    update_lead(store, actor, lead_id, &update, now)
}

/// Applies a set of field changes to a lead atomically, with handoff
/// forcing and discount rederivation.
///
/// A finance handoff forces `IN_PROGRESS`; an operations handoff forces
/// `HANDOFF_TO_OPS`; the first handoff snapshots the prior assignee as
/// the lead's salesperson. Status changes carry their inventory-hold
/// effect exactly as [`transition_lead_status`] does.
///
/// # Errors
///
/// Returns `Validation` for a bad discount percentage, `NotFound` when
/// the lead does not exist, and `Conflict` on hold contention.
pub fn update_lead(
    store: &mut Persistence,
    actor: Actor,
    lead_id: i64,
    update: &LeadUpdate,
    now: time::OffsetDateTime,
) -> Result<Lead, CoreError> {
    let lead = store
        .get_lead(lead_id)?
        .ok_or_else(|| CoreError::NotFound(format!("Lead {lead_id} not found")))?;

    let mut updated = lead.clone();
    let mut events: Vec<ActivityEvent> = Vec::new();

    if let Some(status) = update.status {
        updated.status = status;
    }
    if let Some(assignee) = update.assigned_to_id {
        updated.assigned_to_id = Some(assignee);
    }

    if let Some(finance) = update.finance_user_id {
        snapshot_salesperson(&mut updated);
        updated.finance_user_id = Some(finance);
        updated.assigned_to_id = Some(finance);
        updated.status = LeadStatus::InProgress;
        events.push(ActivityEvent::new(
            lead_id,
            actor.clone(),
            LogAction::HandoffFinance,
            Some(format!("Lead handed to finance operator {finance}.")),
        ));
    }
    if let Some(ops) = update.ops_user_id {
        snapshot_salesperson(&mut updated);
        updated.ops_user_id = Some(ops);
        updated.assigned_to_id = Some(ops);
        updated.status = LeadStatus::HandoffToOps;
        events.push(ActivityEvent::new(
            lead_id,
            actor.clone(),
            LogAction::HandoffOps,
            Some(format!("Lead handed to operations operator {ops}.")),
        ));
    }

    if let Some(percent) = update.discount_percent {
        if percent > 0.0 {
            validate_percent(percent)?;
            updated.discount_percent_applied = Some(percent);
        } else {
            updated.discount_percent_applied = None;
        }
        let totals = recalculate_totals(updated.base_total, updated.discount_percent_applied)?;
        updated.discount_amount = totals.discount_amount;
        updated.final_total = totals.final_total;
    }

    if let Some(notes) = &update.notes {
        updated.notes = Some(notes.clone());
        events.push(ActivityEvent::new(
            lead_id,
            actor.clone(),
            LogAction::NoteUpdate,
            Some(String::from("Lead notes updated.")),
        ));
    }
    if let Some(remark) = &update.remark {
        events.push(ActivityEvent::new(
            lead_id,
            actor.clone(),
            LogAction::Note,
            Some(remark.clone()),
        ));
    }

    if updated.status == lead.status && events.is_empty() && updated == lead {
        return Ok(lead);
    }

    if updated.status != lead.status {
        events.push(ActivityEvent::status_change(
            lead_id,
            actor,
            lead.status,
            updated.status,
        ));
    }

    let effect = lead.status.booking_effect(updated.status);
    match store.apply_lead_update(&updated, effect, now, &events)? {
        TransitionOutcome::Applied => {
            info!(lead_id, status = %updated.status, "Lead updated");
            store.get_lead(lead_id)?.ok_or_else(|| {
                CoreError::Internal(format!("Lead {lead_id} vanished mid-update"))
            })
        }
        TransitionOutcome::HoldConflict {
            unit_code,
            holder_lead_id,
        } => Err(CoreError::Conflict {
            unit_code,
            holder_lead_id,
        }),
        TransitionOutcome::LeadMissing => {
            Err(CoreError::NotFound(format!("Lead {lead_id} not found")))
        }
    }
}

/// Deletes a lead, releasing every unit it holds before the dependent
/// records and the lead row disappear. Admin-gated at the edge.
///
/// # Errors
///
/// Returns `NotFound` when the lead does not exist.
pub fn delete_lead(
    store: &mut Persistence,
    lead_id: i64,
    now: time::OffsetDateTime,
) -> Result<(), CoreError> {
    if store.delete_lead(lead_id, now)? {
        info!(lead_id, "Lead deleted");
        Ok(())
    } else {
        Err(CoreError::NotFound(format!("Lead {lead_id} not found")))
    }
}

/// Loads a lead with its campaign items, their units, and its activity
/// log.
///
/// # Errors
///
/// Returns `NotFound` when the lead does not exist.
pub fn get_lead_detail(store: &mut Persistence, lead_id: i64) -> Result<LeadDetail, CoreError> {
    let lead = store
        .get_lead(lead_id)?
        .ok_or_else(|| CoreError::NotFound(format!("Lead {lead_id} not found")))?;
    let items = store.list_campaign_items(lead_id)?;
    let units = store.get_units_for_lead(lead_id)?;
    let activity = store.list_activity(lead_id)?;
    Ok(LeadDetail {
        lead,
        items,
        units,
        activity,
    })
}

/// Lists a lead's campaign items for timeline display. Items without an
/// assigned window are included with empty dates.
///
/// # Errors
///
/// Returns `NotFound` when the lead does not exist.
pub fn get_timeline(
    store: &mut Persistence,
    lead_id: i64,
) -> Result<Vec<CampaignItem>, CoreError> {
    if store.get_lead(lead_id)?.is_none() {
        return Err(CoreError::NotFound(format!("Lead {lead_id} not found")));
    }
    Ok(store.list_campaign_items(lead_id)?)
}

/// Records the prior assignee as the lead's salesperson on the first
/// handoff.
fn snapshot_salesperson(lead: &mut Lead) {
    if lead.sales_user_id.is_none() {
        lead.sales_user_id = lead.assigned_to_id;
    }
}

fn unit_code_for(store: &mut Persistence, unit_id: i64) -> Result<String, CoreError> {
    Ok(store
        .get_unit(unit_id)?
        .map_or_else(|| unit_id.to_string(), |unit| unit.unit_code))
}

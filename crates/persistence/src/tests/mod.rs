// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod backend_validation_tests;
mod inquiry_tests;

use admast_audit::{ActivityEvent, Actor, LogAction};
use admast_domain::{CampaignItem, InventoryUnit, Lead, LeadStatus};

use crate::mutations::{AddItemsOutcome, TransitionOutcome};
use crate::{Persistence, SqlitePersistence};

/// The standard rate every test unit carries, in whole currency units.
pub const TEST_RATE: i64 = 50_000;

/// Returns a fixed wall-clock instant so timestamps are deterministic.
pub fn test_now() -> time::OffsetDateTime {
    time::macros::datetime!(2026-03-01 12:00:00 UTC)
}

/// Formats an instant the way the persistence layer stores timestamps.
pub fn iso(moment: time::OffsetDateTime) -> String {
    moment
        .format(&time::format_description::well_known::Iso8601::DEFAULT)
        .expect("Valid timestamp")
}

pub fn create_test_actor() -> Actor {
    Actor::operator(1)
}

pub fn create_test_event(lead_id: i64) -> ActivityEvent {
    ActivityEvent::new(
        lead_id,
        create_test_actor(),
        LogAction::Update,
        Some(String::from("Test update")),
    )
}

pub fn create_test_unit(unit_code: &str) -> InventoryUnit {
    let mut unit: InventoryUnit = InventoryUnit::new(
        unit_code,
        String::from("Highway Gantry"),
        String::from("NH-44 near toll plaza"),
        String::from("Punjab"),
        String::from("Ludhiana"),
    );
    unit.discounted_rate = Some(TEST_RATE);
    unit
}

/// Inserts a test unit and returns its persisted ID.
pub fn seed_unit(persistence: &mut Persistence, unit_code: &str) -> i64 {
    persistence.insert_unit(&create_test_unit(unit_code)).unwrap()
}

/// Inserts a fresh lead and returns its persisted ID.
pub fn seed_lead(persistence: &mut Persistence, client_name: &str) -> i64 {
    let lead: Lead = Lead::new(
        String::from(client_name),
        String::from("WEBSITE_CART_QUOTE"),
    );
    persistence.insert_lead(&lead).unwrap()
}

/// Attaches a unit to a lead's campaign at the standard test rate.
pub fn attach_unit(persistence: &mut Persistence, lead_id: i64, unit_id: i64) {
    let item: CampaignItem = CampaignItem::priced(lead_id, unit_id, TEST_RATE, 0);
    let outcome: AddItemsOutcome = persistence
        .add_campaign_items(lead_id, &[item], test_now(), &create_test_event(lead_id))
        .unwrap();
    assert!(matches!(outcome, AddItemsOutcome::Added { .. }));
}

/// Moves a lead to `target`, applying whatever hold effect the transition
/// carries, and returns the outcome.
pub fn transition_lead(
    persistence: &mut Persistence,
    lead_id: i64,
    target: LeadStatus,
) -> TransitionOutcome {
    let mut lead: Lead = persistence.get_lead(lead_id).unwrap().unwrap();
    let effect = lead.status.booking_effect(target);
    let event: ActivityEvent =
        ActivityEvent::status_change(lead_id, create_test_actor(), lead.status, target);
    lead.status = target;
    persistence
        .apply_lead_update(&lead, effect, test_now(), &[event])
        .unwrap()
}

/// Creates an in-memory persistence instance for a test.
pub fn create_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().unwrap()
}

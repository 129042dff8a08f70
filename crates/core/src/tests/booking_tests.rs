// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admast_audit::{Actor, LogAction};
use admast_domain::{AvailabilityStatus, LeadStatus};
use admast_persistence::Persistence;

use crate::booking::{
    LeadUpdate, QuoteRequest, SOURCE_CART_QUOTE, SOURCE_SERVICE_INQUIRY, add_units_to_campaign,
    create_quote_lead, delete_lead, get_lead_detail, remove_campaign_item, set_timeline,
    transition_lead_status, update_lead,
};
use crate::error::CoreError;
use crate::tests::{TEST_RATE, create_test_store, seed_operator, seed_unit, test_now};

fn quote_request(unit_ids: Vec<i64>) -> QuoteRequest {
    QuoteRequest {
        client_name: String::from("Acme Traders"),
        email: Some(String::from("buyer@acme.example")),
        phone: Some(String::from("+91 98765 43210")),
        company_name: Some(String::from("Acme Traders Pvt Ltd")),
        source: String::from(SOURCE_CART_QUOTE),
        notes: None,
        unit_ids,
    }
}

/// Captures a quote lead with the given units and returns its ID.
fn seed_quote_lead(store: &mut Persistence, unit_ids: Vec<i64>) -> i64 {
    create_quote_lead(store, None, &quote_request(unit_ids), test_now())
        .unwrap()
        .lead_id
}

fn actor() -> Actor {
    Actor::operator(1)
}

#[test]
fn test_quote_intake_attaches_cart_and_derives_totals() {
    let mut store: Persistence = create_test_store();
    seed_operator(&mut store, "ANITA", "ADMIN");
    let first: i64 = seed_unit(&mut store, "CHD-001");
    let second: i64 = seed_unit(&mut store, "CHD-002");

    let created = create_quote_lead(
        &mut store,
        None,
        &quote_request(vec![first, second]),
        test_now(),
    )
    .unwrap();

    let detail = get_lead_detail(&mut store, created.lead_id).unwrap();
    assert_eq!(detail.lead.status, LeadStatus::New);
    assert_eq!(detail.lead.source, SOURCE_CART_QUOTE);
    assert_eq!(detail.lead.base_total, 2 * TEST_RATE);
    assert_eq!(detail.lead.final_total, 2 * TEST_RATE);
    assert_eq!(detail.items.len(), 2);

    // Admin notification plus client confirmation
    assert_eq!(created.mails.len(), 2);
    assert_eq!(created.mails[0].to, "anita@admast.example");
    assert_eq!(created.mails[1].to, "buyer@acme.example");

    let actions: Vec<LogAction> = detail.activity.iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![LogAction::LeadCreated, LogAction::CampaignAdd]);
}

#[test]
fn test_quote_intake_without_cart_or_admin() {
    let mut store: Persistence = create_test_store();

    let mut request = quote_request(Vec::new());
    request.source = String::from(SOURCE_SERVICE_INQUIRY);
    request.email = None;
    let created = create_quote_lead(&mut store, None, &request, test_now()).unwrap();

    // No admin to notify and no client address to confirm to
    assert!(created.mails.is_empty());
    let detail = get_lead_detail(&mut store, created.lead_id).unwrap();
    assert_eq!(detail.lead.base_total, 0);
    assert!(detail.items.is_empty());
}

#[test]
fn test_quote_intake_rejects_unknown_source() {
    let mut store: Persistence = create_test_store();

    let mut request = quote_request(Vec::new());
    request.source = String::from("COLD_CALL");
    let result = create_quote_lead(&mut store, None, &request, test_now());
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[test]
fn test_quote_intake_rejects_missing_cart_unit() {
    let mut store: Persistence = create_test_store();

    let result = create_quote_lead(&mut store, None, &quote_request(vec![999]), test_now());
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[test]
fn test_transition_into_booking_acquires_holds() {
    let mut store: Persistence = create_test_store();
    let unit_id: i64 = seed_unit(&mut store, "CHD-001");
    let lead_id: i64 = seed_quote_lead(&mut store, vec![unit_id]);

    let lead = transition_lead_status(
        &mut store,
        actor(),
        lead_id,
        LeadStatus::Processing,
        test_now(),
    )
    .unwrap();
    assert_eq!(lead.status, LeadStatus::Processing);

    let unit = store.get_unit(unit_id).unwrap().unwrap();
    assert_eq!(unit.availability_status, AvailabilityStatus::Booked);
    assert_eq!(unit.current_lead_id, Some(lead_id));
}

#[test]
fn test_transition_reports_foreign_hold_and_changes_nothing() {
    let mut store: Persistence = create_test_store();
    let unit_id: i64 = seed_unit(&mut store, "CHD-001");
    let holder: i64 = seed_quote_lead(&mut store, vec![unit_id]);
    let contender: i64 = seed_quote_lead(&mut store, vec![unit_id]);

    transition_lead_status(&mut store, actor(), holder, LeadStatus::Processing, test_now())
        .unwrap();

    let result = transition_lead_status(
        &mut store,
        actor(),
        contender,
        LeadStatus::Processing,
        test_now(),
    );
    match result {
        Err(CoreError::Conflict {
            unit_code,
            holder_lead_id,
        }) => {
            assert_eq!(unit_code, "CHD-001");
            assert_eq!(holder_lead_id, holder);
        }
        other => panic!("Expected a hold conflict, got {other:?}"),
    }

    // The contender was left untouched
    let lead = store.get_lead(contender).unwrap().unwrap();
    assert_eq!(lead.status, LeadStatus::New);
}

#[test]
fn test_leaving_booking_family_releases_every_unit() {
    let mut store: Persistence = create_test_store();
    let first: i64 = seed_unit(&mut store, "CHD-001");
    let second: i64 = seed_unit(&mut store, "CHD-002");
    let lead_id: i64 = seed_quote_lead(&mut store, vec![first, second]);

    transition_lead_status(&mut store, actor(), lead_id, LeadStatus::Processing, test_now())
        .unwrap();
    transition_lead_status(&mut store, actor(), lead_id, LeadStatus::Lost, test_now()).unwrap();

    for unit_id in [first, second] {
        let unit = store.get_unit(unit_id).unwrap().unwrap();
        assert_eq!(unit.availability_status, AvailabilityStatus::Available);
        assert_eq!(unit.current_lead_id, None);
        assert_eq!(unit.booked_at, None);
    }
}

#[test]
fn test_timeline_rejects_overlap_and_accepts_adjacent() {
    let mut store: Persistence = create_test_store();
    let unit_id: i64 = seed_unit(&mut store, "CHD-001");
    let holder: i64 = seed_quote_lead(&mut store, vec![unit_id]);
    let contender: i64 = seed_quote_lead(&mut store, vec![unit_id]);

    set_timeline(
        &mut store,
        actor(),
        holder,
        &[unit_id],
        "2024-01-01",
        "2024-01-31",
        test_now(),
    )
    .unwrap();

    let overlapping = set_timeline(
        &mut store,
        actor(),
        contender,
        &[unit_id],
        "2024-01-15",
        "2024-02-15",
        test_now(),
    );
    match overlapping {
        Err(CoreError::Conflict {
            unit_code,
            holder_lead_id,
        }) => {
            assert_eq!(unit_code, "CHD-001");
            assert_eq!(holder_lead_id, holder);
        }
        other => panic!("Expected a window conflict, got {other:?}"),
    }

    let adjacent = set_timeline(
        &mut store,
        actor(),
        contender,
        &[unit_id],
        "2024-02-01",
        "2024-02-28",
        test_now(),
    )
    .unwrap();
    assert_eq!(adjacent, 1);
}

#[test]
fn test_timeline_rejects_reversed_range() {
    let mut store: Persistence = create_test_store();
    let unit_id: i64 = seed_unit(&mut store, "CHD-001");
    let lead_id: i64 = seed_quote_lead(&mut store, vec![unit_id]);

    let result = set_timeline(
        &mut store,
        actor(),
        lead_id,
        &[unit_id],
        "2024-02-28",
        "2024-02-01",
        test_now(),
    );
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[test]
fn test_timeline_rejects_units_outside_the_campaign() {
    let mut store: Persistence = create_test_store();
    let mine: i64 = seed_unit(&mut store, "CHD-001");
    let foreign: i64 = seed_unit(&mut store, "CHD-002");
    let lead_id: i64 = seed_quote_lead(&mut store, vec![mine]);

    let result = set_timeline(
        &mut store,
        actor(),
        lead_id,
        &[foreign],
        "2024-02-01",
        "2024-02-28",
        test_now(),
    );
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[test]
fn test_finance_handoff_forces_in_progress_and_snapshots_salesperson() {
    let mut store: Persistence = create_test_store();
    let lead_id: i64 = seed_quote_lead(&mut store, Vec::new());

    // A salesperson picks the lead up first
    let assign = LeadUpdate {
        assigned_to_id: Some(7),
        ..LeadUpdate::default()
    };
    update_lead(&mut store, actor(), lead_id, &assign, test_now()).unwrap();

    let handoff = LeadUpdate {
        finance_user_id: Some(20),
        ..LeadUpdate::default()
    };
    let lead = update_lead(&mut store, actor(), lead_id, &handoff, test_now()).unwrap();

    assert_eq!(lead.status, LeadStatus::InProgress);
    assert_eq!(lead.finance_user_id, Some(20));
    assert_eq!(lead.assigned_to_id, Some(20));
    assert_eq!(lead.sales_user_id, Some(7));

    let detail = get_lead_detail(&mut store, lead_id).unwrap();
    assert!(
        detail
            .activity
            .iter()
            .any(|e| e.action == LogAction::HandoffFinance)
    );
}

#[test]
fn test_ops_handoff_forces_handoff_status_and_keeps_first_snapshot() {
    let mut store: Persistence = create_test_store();
    let lead_id: i64 = seed_quote_lead(&mut store, Vec::new());

    let assign = LeadUpdate {
        assigned_to_id: Some(7),
        ..LeadUpdate::default()
    };
    update_lead(&mut store, actor(), lead_id, &assign, test_now()).unwrap();

    let to_finance = LeadUpdate {
        finance_user_id: Some(20),
        ..LeadUpdate::default()
    };
    update_lead(&mut store, actor(), lead_id, &to_finance, test_now()).unwrap();

    let to_ops = LeadUpdate {
        ops_user_id: Some(30),
        ..LeadUpdate::default()
    };
    let lead = update_lead(&mut store, actor(), lead_id, &to_ops, test_now()).unwrap();

    assert_eq!(lead.status, LeadStatus::HandoffToOps);
    assert_eq!(lead.ops_user_id, Some(30));
    assert_eq!(lead.assigned_to_id, Some(30));
    // The salesperson snapshot is taken once, on the first handoff
    assert_eq!(lead.sales_user_id, Some(7));
}

#[test]
fn test_update_applies_and_clears_discount() {
    let mut store: Persistence = create_test_store();
    let first: i64 = seed_unit(&mut store, "CHD-001");
    let second: i64 = seed_unit(&mut store, "CHD-002");
    let lead_id: i64 = seed_quote_lead(&mut store, vec![first, second]);

    let apply = LeadUpdate {
        discount_percent: Some(15.0),
        ..LeadUpdate::default()
    };
    let lead = update_lead(&mut store, actor(), lead_id, &apply, test_now()).unwrap();
    assert_eq!(lead.base_total, 100_000);
    assert_eq!(lead.discount_amount, Some(15_000));
    assert_eq!(lead.final_total, 85_000);

    let clear = LeadUpdate {
        discount_percent: Some(0.0),
        ..LeadUpdate::default()
    };
    let lead = update_lead(&mut store, actor(), lead_id, &clear, test_now()).unwrap();
    assert_eq!(lead.discount_percent_applied, None);
    assert_eq!(lead.discount_amount, None);
    assert_eq!(lead.final_total, 100_000);
}

#[test]
fn test_update_rejects_out_of_range_discount() {
    let mut store: Persistence = create_test_store();
    let lead_id: i64 = seed_quote_lead(&mut store, Vec::new());

    let update = LeadUpdate {
        discount_percent: Some(150.0),
        ..LeadUpdate::default()
    };
    let result = update_lead(&mut store, actor(), lead_id, &update, test_now());
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[test]
fn test_notes_and_remarks_append_log_entries() {
    let mut store: Persistence = create_test_store();
    let lead_id: i64 = seed_quote_lead(&mut store, Vec::new());

    let update = LeadUpdate {
        notes: Some(String::from("Prefers sites near the airport")),
        remark: Some(String::from("Called back, asked for a site visit")),
        ..LeadUpdate::default()
    };
    update_lead(&mut store, actor(), lead_id, &update, test_now()).unwrap();

    let detail = get_lead_detail(&mut store, lead_id).unwrap();
    assert_eq!(
        detail.lead.notes.as_deref(),
        Some("Prefers sites near the airport")
    );
    let actions: Vec<LogAction> = detail.activity.iter().map(|e| e.action).collect();
    assert!(actions.contains(&LogAction::NoteUpdate));
    assert!(actions.contains(&LogAction::Note));
}

#[test]
fn test_campaign_edits_recompute_totals() {
    let mut store: Persistence = create_test_store();
    let first: i64 = seed_unit(&mut store, "CHD-001");
    let second: i64 = seed_unit(&mut store, "CHD-002");
    let lead_id: i64 = seed_quote_lead(&mut store, vec![first]);

    let change = add_units_to_campaign(&mut store, actor(), lead_id, &[second], test_now())
        .unwrap();
    assert_eq!(change.affected, 1);
    assert_eq!(change.base_total, 2 * TEST_RATE);

    let items = store.list_campaign_items(lead_id).unwrap();
    let second_item = items.iter().find(|i| i.unit_id == second).unwrap();
    let change = remove_campaign_item(
        &mut store,
        actor(),
        lead_id,
        second_item.item_id.unwrap(),
        test_now(),
    )
    .unwrap();
    assert_eq!(change.base_total, TEST_RATE);
    assert_eq!(change.final_total, TEST_RATE);
}

#[test]
fn test_remove_missing_item_reports_not_found() {
    let mut store: Persistence = create_test_store();
    let lead_id: i64 = seed_quote_lead(&mut store, Vec::new());

    let result = remove_campaign_item(&mut store, actor(), lead_id, 999, test_now());
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[test]
fn test_delete_releases_holds_before_the_lead_disappears() {
    let mut store: Persistence = create_test_store();
    let unit_id: i64 = seed_unit(&mut store, "CHD-001");
    let lead_id: i64 = seed_quote_lead(&mut store, vec![unit_id]);
    transition_lead_status(&mut store, actor(), lead_id, LeadStatus::Processing, test_now())
        .unwrap();

    delete_lead(&mut store, lead_id, test_now()).unwrap();

    assert!(store.get_lead(lead_id).unwrap().is_none());
    let unit = store.get_unit(unit_id).unwrap().unwrap();
    assert_eq!(unit.availability_status, AvailabilityStatus::Available);
    assert_eq!(unit.current_lead_id, None);

    let result = delete_lead(&mut store, lead_id, test_now());
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[test]
fn test_detail_for_missing_lead_reports_not_found() {
    let mut store: Persistence = create_test_store();

    let result = get_lead_detail(&mut store, 999);
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}

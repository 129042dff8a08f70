// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ActivityEvent, Actor, AuditError, Cause, LogAction};
use admast_domain::LeadStatus;

#[test]
fn test_actor_creation_requires_all_fields() {
    let actor: Actor = Actor::new(String::from("user-123"), String::from("operator"));

    assert_eq!(actor.id, "user-123");
    assert_eq!(actor.actor_type, "operator");
}

#[test]
fn test_operator_actor_round_trips_its_id() {
    let actor: Actor = Actor::operator(42);

    assert_eq!(actor.actor_type, "operator");
    assert_eq!(actor.operator_id(), Some(42));
}

#[test]
fn test_client_actor_has_no_operator_id() {
    let actor: Actor = Actor::client();

    assert_eq!(actor.actor_type, "client");
    assert_eq!(actor.operator_id(), None);
}

#[test]
fn test_cause_creation_requires_all_fields() {
    let cause: Cause = Cause::new(String::from("req-456"), String::from("Operator request"));

    assert_eq!(cause.id, "req-456");
    assert_eq!(cause.description, "Operator request");
}

#[test]
fn test_log_action_round_trips_through_strings() {
    let actions = [
        LogAction::Update,
        LogAction::LeadCreated,
        LogAction::StatusChange,
        LogAction::HandoffFinance,
        LogAction::HandoffOps,
        LogAction::Note,
        LogAction::NoteUpdate,
        LogAction::CampaignAdd,
        LogAction::CampaignRemove,
        LogAction::TimelineSet,
    ];

    for action in actions {
        let parsed: LogAction = action.as_str().parse().unwrap();
        assert_eq!(parsed, action);
    }
}

#[test]
fn test_log_action_rejects_unknown_string() {
    let result = "SHIPPED".parse::<LogAction>();
    assert!(matches!(result, Err(AuditError::InvalidAction(_))));
}

#[test]
fn test_activity_event_creation_requires_all_fields() {
    let actor: Actor = Actor::operator(7);
    let event: ActivityEvent = ActivityEvent::new(
        42,
        actor.clone(),
        LogAction::Note,
        Some(String::from("Remark: called the client")),
    );

    assert_eq!(event.event_id, None);
    assert_eq!(event.lead_id, 42);
    assert_eq!(event.actor, actor);
    assert_eq!(event.action, LogAction::Note);
    assert_eq!(event.details, Some(String::from("Remark: called the client")));
    assert_eq!(event.created_at, None);
}

#[test]
fn test_activity_event_with_id() {
    let event: ActivityEvent = ActivityEvent::with_id(
        9,
        42,
        Actor::operator(7),
        LogAction::CampaignAdd,
        None,
        Some(String::from("2026-03-02T12:00:00Z")),
    );

    assert_eq!(event.event_id, Some(9));
    assert_eq!(event.created_at, Some(String::from("2026-03-02T12:00:00Z")));
}

#[test]
fn test_status_change_event_names_both_statuses() {
    let event: ActivityEvent =
        ActivityEvent::status_change(42, Actor::operator(7), LeadStatus::New, LeadStatus::Processing);

    assert_eq!(event.action, LogAction::StatusChange);
    assert_eq!(
        event.details,
        Some(String::from("Status changed from NEW to PROCESSING."))
    );
}

#[test]
fn test_activity_event_is_immutable_once_created() {
    let event: ActivityEvent = ActivityEvent::new(
        42,
        Actor::operator(7),
        LogAction::StatusChange,
        Some(String::from("Status changed from NEW to PROCESSING.")),
    );

    // Clone the event to verify it can be cloned but not mutated
    let cloned_event: ActivityEvent = event.clone();
    assert_eq!(event, cloned_event);

    assert_eq!(event.lead_id, 42);
    assert_eq!(event.actor.id, "7");
    assert_eq!(event.action.as_str(), "STATUS_CHANGE");
}

#[test]
fn test_actor_equality() {
    let actor1: Actor = Actor::operator(7);
    let actor2: Actor = Actor::operator(7);
    let actor3: Actor = Actor::operator(8);

    assert_eq!(actor1, actor2);
    assert_ne!(actor1, actor3);
}

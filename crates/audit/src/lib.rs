// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use admast_domain::LeadStatus;
use std::str::FromStr;

#[cfg(test)]
mod tests;

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change.
/// This could be an operator, the public website, or a scheduled job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "operator", "client", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// Creates an Actor for a signed-in operator.
    #[must_use]
    pub fn operator(operator_id: i64) -> Self {
        Self::new(operator_id.to_string(), String::from("operator"))
    }

    /// Creates an Actor for an anonymous website visitor.
    #[must_use]
    pub fn client() -> Self {
        Self::new(String::from("website"), String::from("client"))
    }

    /// Returns the operator ID when this actor is a signed-in operator.
    #[must_use]
    pub fn operator_id(&self) -> Option<i64> {
        if self.actor_type == "operator" {
            self.id.parse().ok()
        } else {
            None
        }
    }
}

/// Represents the reason or trigger for an action.
///
/// A cause describes why a state change was initiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID, event ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// The fixed vocabulary of actions recorded against a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogAction {
    /// A lead field changed without a more specific classification.
    #[default]
    Update,
    /// The lead was captured from an intake surface.
    LeadCreated,
    /// The lead's pipeline status changed.
    StatusChange,
    /// The lead was handed to a finance operator.
    HandoffFinance,
    /// The lead was handed to an operations operator.
    HandoffOps,
    /// A remark was recorded without other field changes.
    Note,
    /// The lead's stored notes were rewritten.
    NoteUpdate,
    /// Inventory units were attached to the campaign.
    CampaignAdd,
    /// An inventory unit was detached from the campaign.
    CampaignRemove,
    /// A booking window was assigned to the campaign's units.
    TimelineSet,
}

impl FromStr for LogAction {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UPDATE" => Ok(Self::Update),
            "LEAD_CREATED" => Ok(Self::LeadCreated),
            "STATUS_CHANGE" => Ok(Self::StatusChange),
            "HANDOFF_FINANCE" => Ok(Self::HandoffFinance),
            "HANDOFF_OPS" => Ok(Self::HandoffOps),
            "NOTE" => Ok(Self::Note),
            "NOTE_UPDATE" => Ok(Self::NoteUpdate),
            "CAMPAIGN_ADD" => Ok(Self::CampaignAdd),
            "CAMPAIGN_REMOVE" => Ok(Self::CampaignRemove),
            "TIMELINE_SET" => Ok(Self::TimelineSet),
            _ => Err(AuditError::InvalidAction(s.to_string())),
        }
    }
}

impl std::fmt::Display for LogAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl LogAction {
    /// Converts this action to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "UPDATE",
            Self::LeadCreated => "LEAD_CREATED",
            Self::StatusChange => "STATUS_CHANGE",
            Self::HandoffFinance => "HANDOFF_FINANCE",
            Self::HandoffOps => "HANDOFF_OPS",
            Self::Note => "NOTE",
            Self::NoteUpdate => "NOTE_UPDATE",
            Self::CampaignAdd => "CAMPAIGN_ADD",
            Self::CampaignRemove => "CAMPAIGN_REMOVE",
            Self::TimelineSet => "TIMELINE_SET",
        }
    }
}

/// An immutable activity event recorded against a lead.
///
/// Every successful state change against a lead must produce exactly one
/// activity event. Events are append-only: nothing in the system updates
/// or deletes one except the lead's own cascade delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    /// Canonical numeric identifier assigned by the database.
    /// `None` indicates the event has not been persisted yet.
    pub event_id: Option<i64>,
    /// The lead this event belongs to.
    pub lead_id: i64,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The action that was performed.
    pub action: LogAction,
    /// Human-readable detail of what changed.
    pub details: Option<String>,
    /// When the event was recorded (ISO 8601 datetime string, assigned by
    /// the database).
    pub created_at: Option<String>,
}

impl ActivityEvent {
    /// Creates a new `ActivityEvent` without a persisted ID.
    ///
    /// # Arguments
    ///
    /// * `lead_id` - The lead this event belongs to
    /// * `actor` - The actor who initiated the change
    /// * `action` - The action that was performed
    /// * `details` - Human-readable detail of what changed
    #[must_use]
    pub const fn new(
        lead_id: i64,
        actor: Actor,
        action: LogAction,
        details: Option<String>,
    ) -> Self {
        Self {
            event_id: None,
            lead_id,
            actor,
            action,
            details,
            created_at: None,
        }
    }

    /// Creates an `ActivityEvent` with an existing persisted ID.
    ///
    /// # Arguments
    ///
    /// * `event_id` - The canonical numeric identifier
    /// * `lead_id` - The lead this event belongs to
    /// * `actor` - The actor who initiated the change
    /// * `action` - The action that was performed
    /// * `details` - Human-readable detail of what changed
    /// * `created_at` - When the event was recorded
    #[must_use]
    pub const fn with_id(
        event_id: i64,
        lead_id: i64,
        actor: Actor,
        action: LogAction,
        details: Option<String>,
        created_at: Option<String>,
    ) -> Self {
        Self {
            event_id: Some(event_id),
            lead_id,
            actor,
            action,
            details,
            created_at,
        }
    }

    /// Creates the event recorded when a lead's pipeline status changes.
    ///
    /// # Arguments
    ///
    /// * `lead_id` - The lead whose status changed
    /// * `actor` - The actor who initiated the change
    /// * `from` - The status before the change
    /// * `to` - The status after the change
    #[must_use]
    pub fn status_change(lead_id: i64, actor: Actor, from: LeadStatus, to: LeadStatus) -> Self {
        Self::new(
            lead_id,
            actor,
            LogAction::StatusChange,
            Some(format!("Status changed from {from} to {to}.")),
        )
    }
}

/// Errors that can occur while interpreting recorded activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// A stored action string is not part of the vocabulary.
    InvalidAction(String),
}

impl std::fmt::Display for AuditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAction(action) => write!(f, "Unknown log action: {action}"),
        }
    }
}

impl std::error::Error for AuditError {}

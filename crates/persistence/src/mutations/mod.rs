// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! This module contains all state-changing operations for the persistence
//! layer. Most mutations use Diesel DSL and are backend-agnostic, with
//! minimal use of backend-specific helpers (e.g., `last_insert_rowid()`).
//!
//! ## Module Organization
//!
//! - `inventory` — Catalogue mutations (import, pricing, archival)
//! - `leads` — Lead and activity log inserts
//! - `booking` — Compound transactional ledger operations (timelines,
//!   status transitions, campaign edits, cascade deletes)
//! - `inquiries` — Discount inquiry creation and resolution
//! - `operators` — Operator and session mutations
//!
//! ## Compound Operations
//!
//! Check-then-write sequences (window conflict checks, hold acquisition,
//! code verification) run inside a single database transaction and report
//! their result as a typed outcome enum rather than an error, so callers
//! can distinguish business outcomes from infrastructure failures.

pub mod booking;
pub mod inquiries;
pub mod inventory;
pub mod leads;
pub mod operators;

pub use booking::{
    AddItemsOutcome, RemoveItemOutcome, TimelineOutcome, TransitionOutcome,
    add_campaign_items_mysql, add_campaign_items_sqlite, apply_lead_update_mysql,
    apply_lead_update_sqlite, assign_timeline_mysql, assign_timeline_sqlite, delete_lead_mysql,
    delete_lead_sqlite, remove_campaign_item_mysql, remove_campaign_item_sqlite,
};
pub use inquiries::{
    ResolutionUpdate, ResolveOutcome, create_inquiry_mysql, create_inquiry_sqlite,
    resolve_inquiry_mysql, resolve_inquiry_sqlite, set_inquiry_token_mysql,
    set_inquiry_token_sqlite,
};
pub use inventory::{
    ImportOutcome, insert_unit_mysql, insert_unit_sqlite, set_unit_active_mysql,
    set_unit_active_sqlite, update_unit_price_mysql, update_unit_price_sqlite, upsert_unit_mysql,
    upsert_unit_sqlite,
};
pub use leads::{
    insert_activity_mysql, insert_activity_sqlite, insert_lead_mysql, insert_lead_sqlite,
};
pub use operators::{
    create_operator_mysql, create_operator_sqlite, create_session_mysql, create_session_sqlite,
    delete_expired_sessions_mysql, delete_expired_sessions_sqlite, delete_session_mysql,
    delete_session_sqlite, disable_operator_mysql, disable_operator_sqlite, enable_operator_mysql,
    enable_operator_sqlite, update_last_login_mysql, update_last_login_sqlite,
    update_password_mysql, update_password_sqlite, update_session_activity_mysql,
    update_session_activity_sqlite,
};

use crate::error::PersistenceError;

/// Formats a timestamp for storage as an ISO 8601 string.
///
/// All datetime columns store ISO 8601 text so the two backends behave
/// identically and string comparison orders chronologically.
pub(crate) fn format_timestamp(
    now: time::OffsetDateTime,
) -> Result<String, PersistenceError> {
    now.format(&time::format_description::well_known::Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for the persistence layer.
//!
//! This module contains all read-only queries.
//!
//! ## Module Organization
//!
//! - `inventory` — Inventory unit queries
//! - `leads` — Lead, campaign item, and activity log queries
//! - `inquiries` — Discount inquiry and approval code queries
//! - `operators` — Operator and session queries
//!
//! ## Backend-Specific Functions
//!
//! All query functions are generated in backend-specific monomorphic versions:
//! - Functions suffixed with `_sqlite` for `SQLite`
//! - Functions suffixed with `_mysql` for `MySQL`/`MariaDB`
//!
//! The `Persistence` adapter in `lib.rs` dispatches to the appropriate version
//! based on the active backend connection.

pub mod inquiries;
pub mod inventory;
pub mod leads;
pub mod operators;

pub use inquiries::{
    get_inquiry_auth_mysql, get_inquiry_auth_sqlite, get_inquiry_mysql, get_inquiry_sqlite,
    get_otp_mysql, get_otp_sqlite, list_inquiries_mysql, list_inquiries_sqlite,
};
pub use inventory::{
    InventoryFilter, get_unit_by_code_mysql, get_unit_by_code_sqlite, get_unit_mysql,
    get_unit_sqlite, get_units_by_ids_mysql, get_units_by_ids_sqlite, get_units_for_lead_mysql,
    get_units_for_lead_sqlite, list_units_mysql, list_units_sqlite,
};
pub use leads::{
    get_lead_mysql, get_lead_sqlite, list_activity_mysql, list_activity_sqlite,
    list_campaign_items_mysql, list_campaign_items_sqlite, list_leads_mysql, list_leads_sqlite,
    list_scheduled_items_for_units_mysql, list_scheduled_items_for_units_sqlite,
};
pub use operators::{
    count_operators_mysql, count_operators_sqlite, first_operator_email_with_role_mysql,
    first_operator_email_with_role_sqlite, get_operator_by_id_mysql, get_operator_by_id_sqlite,
    get_operator_by_login_mysql, get_operator_by_login_sqlite, get_session_by_token_mysql,
    get_session_by_token_sqlite, list_operators_mysql, list_operators_sqlite, verify_password,
};

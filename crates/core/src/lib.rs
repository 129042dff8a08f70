// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The AdMast CRM engines.
//!
//! Two subsystems over one injected store:
//!
//! - the **booking ledger** — quote intake, campaign edits, booking
//!   windows, and lead status transitions with their inventory-hold
//!   effects (`booking`, `inventory`)
//! - the **discount authorization workflow** — token- and code-gated
//!   remote approval of discount requests (`inquiry`, `token`)
//!
//! Engines are synchronous and environment-free: they take the store,
//! configuration, and the current instant as arguments, and return any
//! outbound mail as values for the caller to deliver after commit.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod booking;
mod error;
mod inquiry;
mod inventory;
mod mail;
mod token;

#[cfg(test)]
mod tests;

pub use booking::{
    CampaignChange, CreatedQuote, LeadDetail, LeadUpdate, QuoteRequest, SOURCE_CART_QUOTE,
    SOURCE_SERVICE_INQUIRY, add_units_to_campaign, create_quote_lead, delete_lead,
    get_lead_detail, get_timeline, remove_campaign_item, set_timeline, transition_lead_status,
    update_lead,
};
pub use error::CoreError;
pub use inquiry::{
    CartLine, CreatedInquiry, InquiryConfig, InquiryRequest, ResolutionAction, ResolvedInquiry,
    create_inquiry, fetch_for_review, list_inquiries, resolve_inquiry,
};
pub use inventory::{
    ImportSummary, PriceUpdate, PriceUpdateSummary, bulk_update_prices, import_inventory,
    list_inventory, set_unit_active,
};
pub use mail::OutboundMail;
pub use token::{CODE_TTL, TOKEN_SECRET_ENV, TOKEN_TTL, TokenError, TokenSigner, sha256_hex};

/// Formats an instant as an ISO 8601 string, the form every stored
/// timestamp takes.
pub(crate) fn format_timestamp(moment: time::OffsetDateTime) -> Result<String, CoreError> {
    moment
        .format(&time::format_description::well_known::Iso8601::DEFAULT)
        .map_err(|e| CoreError::Internal(format!("Failed to format timestamp: {e}")))
}

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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod booking;
mod discount;
mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use booking::{
    BookingWindow, find_hold_conflict, find_window_conflict, parse_booking_date,
};

// Re-export public types
pub use discount::{
    DiscountFigures, LeadTotals, apply_discount, recalculate_totals, validate_percent,
};
pub use error::DomainError;
pub use types::{
    AdminOtp, AvailabilityStatus, BookingEffect, CampaignItem, DiscountInquiry, InquiryStatus,
    InventoryUnit, Lead, LeadStatus,
};
pub use validation::{
    validate_campaign_selection, validate_client_name, validate_email, validate_unit_code,
};

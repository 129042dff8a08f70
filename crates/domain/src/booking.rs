// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking window rules for inventory holds.
//!
//! A booking window is a closed, date-only interval. Two windows collide
//! when they share at least one calendar day, so back-to-back campaigns
//! must not touch endpoints.
//!
//! ## Invariants
//!
//! - Windows are date-only; any time-of-day component on input is
//!   normalized away before comparison
//! - `start <= end` always holds for a constructed window
//! - Overlap is inclusive on both endpoints
//! - A lead never conflicts with its own holds
//!
//! ## Usage
//!
//! This logic is used by:
//! - Timeline assignment (to reject colliding windows before writing them)
//! - Status transitions into the booking family (to re-assert holds)

use crate::error::DomainError;
use crate::types::{CampaignItem, InventoryUnit};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Calendar date layout used for booking windows.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Represents a closed, date-only booking interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookingWindow {
    /// First booked day.
    start: Date,
    /// Last booked day (inclusive).
    end: Date,
}

impl BookingWindow {
    /// Creates a new `BookingWindow`.
    ///
    /// # Arguments
    ///
    /// * `start` - First booked day
    /// * `end` - Last booked day (inclusive)
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `start` falls after `end`.
    pub fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses a `BookingWindow` from a pair of date strings.
    ///
    /// Each value may carry a trailing time-of-day component, which is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is not a parseable date, or if the
    /// parsed start falls after the parsed end.
    pub fn parse(start: &str, end: &str) -> Result<Self, DomainError> {
        Self::new(parse_booking_date(start)?, parse_booking_date(end)?)
    }

    /// Returns the first booked day.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Returns the last booked day (inclusive).
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Returns whether this window shares at least one calendar day with
    /// `other`.
    ///
    /// Both endpoints count, so a window ending on the day another starts
    /// collides with it.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        other.start <= self.end && other.end >= self.start
    }
}

impl std::fmt::Display for BookingWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Parses a booking date from a string, discarding any time-of-day
/// component after `T` or a space.
///
/// # Arguments
///
/// * `value` - The date string (e.g., "2026-03-02" or "2026-03-02T10:30:00Z")
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the value is not a parseable
/// calendar date.
pub fn parse_booking_date(value: &str) -> Result<Date, DomainError> {
    let trimmed = value.trim();
    let date_part = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    Date::parse(date_part, DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Finds the first campaign item of a different lead whose booking window
/// collides with the requested window.
///
/// Items belonging to `lead_id` and items without a complete window never
/// collide.
///
/// # Arguments
///
/// * `requested` - The window being assigned
/// * `lead_id` - The lead requesting the window (its own items are skipped)
/// * `items` - The campaign items under consideration
///
/// # Errors
///
/// Returns an error if an item carries an unparseable stored window.
pub fn find_window_conflict<'a>(
    requested: &BookingWindow,
    lead_id: i64,
    items: &'a [CampaignItem],
) -> Result<Option<&'a CampaignItem>, DomainError> {
    for item in items {
        if item.lead_id == lead_id {
            continue;
        }
        let (Some(start), Some(end)) = (&item.booking_start_date, &item.booking_end_date) else {
            continue;
        };
        let held = BookingWindow::parse(start, end)?;
        if requested.overlaps(&held) {
            return Ok(Some(item));
        }
    }
    Ok(None)
}

/// Finds the first unit already held by a different lead.
///
/// This is the conflict test applied when a lead enters a booking status:
/// every attached unit must be free or already held by that lead.
///
/// # Arguments
///
/// * `lead_id` - The lead attempting to acquire holds
/// * `units` - The inventory units attached to the lead
#[must_use]
pub fn find_hold_conflict(lead_id: i64, units: &[InventoryUnit]) -> Option<&InventoryUnit> {
    units
        .iter()
        .find(|unit| unit.is_booked() && unit.current_lead_id != Some(lead_id))
}

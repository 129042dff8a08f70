// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents the availability state of an inventory unit.
///
/// A unit is `Booked` exactly while some lead in a booking status holds it,
/// and `current_lead_id` on the unit records the holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    /// The unit is free to be attached to campaigns and booked.
    #[default]
    Available,
    /// The unit is held by a lead in a booking status.
    Booked,
}

impl FromStr for AvailabilityStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "BOOKED" => Ok(Self::Booked),
            _ => Err(DomainError::InvalidAvailabilityStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AvailabilityStatus {
    /// Converts this availability state to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Booked => "BOOKED",
        }
    }
}

/// Represents the pipeline status of a lead.
///
/// Statuses split into two families: early-pipeline statuses, where the
/// lead's inventory selection is tentative, and booking statuses, where
/// the attached units are physically committed to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    /// Freshly captured inquiry. No work done yet.
    #[default]
    New,
    /// A salesperson is actively working the lead.
    InProgress,
    /// The client has expressed concrete interest.
    Interested,
    /// The lead fell through. Inventory must not be held.
    Lost,
    /// The deal is being processed internally. Inventory committed.
    Processing,
    /// Handed to the operations team for execution. Inventory committed.
    HandoffToOps,
    /// Creative material is being printed. Inventory committed.
    UnderPrinting,
    /// Material is being installed on site. Inventory committed.
    UnderInstallation,
    /// The deal is signed and closed. Inventory committed.
    DealClosed,
    /// The campaign has fully concluded. Inventory committed.
    Closed,
}

impl FromStr for LeadStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "INTERESTED" => Ok(Self::Interested),
            "LOST" => Ok(Self::Lost),
            "PROCESSING" => Ok(Self::Processing),
            "HANDOFF_TO_OPS" => Ok(Self::HandoffToOps),
            "UNDER_PRINTING" => Ok(Self::UnderPrinting),
            "UNDER_INSTALLATION" => Ok(Self::UnderInstallation),
            "DEAL_CLOSED" => Ok(Self::DealClosed),
            "CLOSED" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidLeadStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl LeadStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Interested => "INTERESTED",
            Self::Lost => "LOST",
            Self::Processing => "PROCESSING",
            Self::HandoffToOps => "HANDOFF_TO_OPS",
            Self::UnderPrinting => "UNDER_PRINTING",
            Self::UnderInstallation => "UNDER_INSTALLATION",
            Self::DealClosed => "DEAL_CLOSED",
            Self::Closed => "CLOSED",
        }
    }

    /// Returns whether this status commits the lead's inventory units.
    ///
    /// This predicate is the single source of truth for the booking
    /// classification. Entering the booking family acquires holds on the
    /// lead's units; leaving it releases them.
    #[must_use]
    pub const fn is_booking_status(&self) -> bool {
        matches!(
            self,
            Self::Processing
                | Self::HandoffToOps
                | Self::UnderPrinting
                | Self::UnderInstallation
                | Self::DealClosed
                | Self::Closed
        )
    }

    /// Determines the inventory effect of a transition to `target`.
    ///
    /// Holds change only when the transition crosses the family boundary:
    /// - non-booking → booking: holds are acquired, subject to conflicts
    /// - booking → non-booking: holds are released
    /// - transitions within either family leave holds untouched
    #[must_use]
    pub const fn booking_effect(&self, target: Self) -> BookingEffect {
        match (self.is_booking_status(), target.is_booking_status()) {
            (false, true) => BookingEffect::AcquireHolds,
            (true, false) => BookingEffect::ReleaseHolds,
            (false, false) | (true, true) => BookingEffect::NoChange,
        }
    }
}

/// The inventory-hold effect of a lead status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingEffect {
    /// The lead's units must be held, subject to conflict checks.
    AcquireHolds,
    /// Every unit held by the lead must be released.
    ReleaseHolds,
    /// Inventory holds are unaffected.
    NoChange,
}

/// Represents the resolution state of a discount inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquiryStatus {
    /// Awaiting an approver's decision.
    #[default]
    Pending,
    /// Approved with a discount percentage.
    Approved,
    /// Rejected by the approver.
    Rejected,
}

impl FromStr for InquiryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidInquiryStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl InquiryStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// Valid transitions are:
    /// - Pending → Approved
    /// - Pending → Rejected
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }

    /// Returns whether this state is terminal. Terminal inquiries can never
    /// be resolved again.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// Represents a physical advertising unit (a hoarding, pillar, or similar
/// outdoor display).
///
/// `unit_id` is the canonical internal identifier. `unit_code` is the
/// human-facing inventory code, unique across the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryUnit {
    /// Canonical internal identifier (opaque, stable, immutable).
    /// Optional to support creation before persistence.
    pub unit_id: Option<i64>,
    /// The inventory code (e.g., "CHD-001"). Normalized to uppercase.
    pub unit_code: String,
    /// The outlet or site name the unit belongs to.
    pub outlet_name: String,
    /// Free-form location description (street address or landmark).
    pub location_name: String,
    /// The state the unit is located in.
    pub state: String,
    /// The district the unit is located in.
    pub district: String,
    /// Optional city, where it differs from the district.
    pub city: Option<String>,
    /// Display width in feet.
    pub width_ft: Option<f64>,
    /// Display height in feet.
    pub height_ft: Option<f64>,
    /// Rate per square foot in whole currency units.
    pub rate_per_sqft: Option<i64>,
    /// Negotiated rate in whole currency units, when one applies.
    pub discounted_rate: Option<i64>,
    /// Printing charge in whole currency units.
    pub printing_charge: Option<i64>,
    /// Installation charge in whole currency units.
    pub installation_charge: Option<i64>,
    /// Stored net total for the unit in whole currency units.
    pub net_total: Option<i64>,
    /// Whether the unit is part of the active catalogue. Archived units
    /// stay in the ledger but are hidden from selection.
    pub is_active: bool,
    /// Current availability state.
    pub availability_status: AvailabilityStatus,
    /// The lead currently holding this unit, when booked.
    pub current_lead_id: Option<i64>,
    /// When the current hold was taken (ISO 8601 datetime string).
    pub booked_at: Option<String>,
}

impl InventoryUnit {
    /// Creates a new active, available `InventoryUnit` without a persisted ID.
    ///
    /// Inventory codes are normalized to uppercase so that imports and
    /// price updates match case-insensitively.
    ///
    /// # Arguments
    ///
    /// * `unit_code` - The inventory code (will be normalized to uppercase)
    /// * `outlet_name` - The outlet or site name
    /// * `location_name` - Free-form location description
    /// * `state` - The state the unit is located in
    /// * `district` - The district the unit is located in
    #[must_use]
    pub fn new(
        unit_code: &str,
        outlet_name: String,
        location_name: String,
        state: String,
        district: String,
    ) -> Self {
        Self {
            unit_id: None,
            unit_code: unit_code.trim().to_uppercase(),
            outlet_name,
            location_name,
            state,
            district,
            city: None,
            width_ft: None,
            height_ft: None,
            rate_per_sqft: None,
            discounted_rate: None,
            printing_charge: None,
            installation_charge: None,
            net_total: None,
            is_active: true,
            availability_status: AvailabilityStatus::Available,
            current_lead_id: None,
            booked_at: None,
        }
    }

    /// Returns whether the unit is currently held by some lead.
    #[must_use]
    pub const fn is_booked(&self) -> bool {
        matches!(self.availability_status, AvailabilityStatus::Booked)
    }

    /// Returns whether the unit is held by the given lead.
    #[must_use]
    pub const fn is_held_by(&self, lead_id: i64) -> bool {
        self.is_booked() && matches!(self.current_lead_id, Some(id) if id == lead_id)
    }

    /// Returns the effective rate for campaign pricing.
    ///
    /// The discounted rate wins when present; otherwise the stored net
    /// total, then the per-square-foot rate.
    #[must_use]
    pub const fn effective_rate(&self) -> i64 {
        match (self.discounted_rate, self.net_total, self.rate_per_sqft) {
            (Some(rate), _, _) => rate,
            (None, Some(total), _) => total,
            (None, None, Some(rate)) => rate,
            (None, None, None) => 0,
        }
    }
}

/// Represents a sales lead and its campaign money figures.
///
/// `lead_id` is the canonical internal identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Canonical internal identifier (opaque, stable, immutable).
    /// Optional to support creation before persistence.
    pub lead_id: Option<i64>,
    /// The client's name.
    pub client_name: String,
    /// The client's email address.
    pub email: Option<String>,
    /// The client's phone number.
    pub phone: Option<String>,
    /// The client's company, when given.
    pub company_name: Option<String>,
    /// Where the lead came from (e.g., "WEBSITE_CART_QUOTE").
    pub source: String,
    /// Current pipeline status.
    pub status: LeadStatus,
    /// Free-form sales notes.
    pub notes: Option<String>,
    /// Sum of campaign item totals in whole currency units.
    pub base_total: i64,
    /// Discount percentage applied to the base total, when any.
    pub discount_percent_applied: Option<f64>,
    /// Derived discount amount in whole currency units.
    pub discount_amount: Option<i64>,
    /// Base total less discount, in whole currency units.
    pub final_total: i64,
    /// The operator the lead is assigned to.
    pub assigned_to_id: Option<i64>,
    /// Snapshot of the salesperson who worked the lead.
    pub sales_user_id: Option<i64>,
    /// The finance operator the lead was handed to.
    pub finance_user_id: Option<i64>,
    /// The operations operator the lead was handed to.
    pub ops_user_id: Option<i64>,
}

impl Lead {
    /// Creates a new `Lead` without a persisted ID.
    ///
    /// The lead starts in `LeadStatus::New` with zero totals.
    ///
    /// # Arguments
    ///
    /// * `client_name` - The client's name
    /// * `source` - Where the lead came from
    #[must_use]
    pub const fn new(client_name: String, source: String) -> Self {
        Self {
            lead_id: None,
            client_name,
            email: None,
            phone: None,
            company_name: None,
            source,
            status: LeadStatus::New,
            notes: None,
            base_total: 0,
            discount_percent_applied: None,
            discount_amount: None,
            final_total: 0,
            assigned_to_id: None,
            sales_user_id: None,
            finance_user_id: None,
            ops_user_id: None,
        }
    }
}

/// Represents one inventory unit attached to a lead's campaign, with the
/// prices frozen at attach time.
///
/// The campaign item also carries its own booking window. The window is
/// nullable until a timeline is explicitly assigned, and only the
/// timeline operation ever writes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignItem {
    /// Canonical internal identifier (opaque, stable, immutable).
    /// Optional to support creation before persistence.
    pub item_id: Option<i64>,
    /// The lead this item belongs to.
    pub lead_id: i64,
    /// The inventory unit this item books.
    pub unit_id: i64,
    /// Unit rate at attach time, in whole currency units.
    pub rate: i64,
    /// Printing charge at attach time, in whole currency units.
    pub printing_charge: i64,
    /// Line total (rate plus printing charge), in whole currency units.
    pub total: i64,
    /// Booking window start (ISO 8601 date string).
    pub booking_start_date: Option<String>,
    /// Booking window end (ISO 8601 date string).
    pub booking_end_date: Option<String>,
    /// When the booking window was last written (ISO 8601 datetime string).
    pub booking_updated_at: Option<String>,
}

impl CampaignItem {
    /// Creates a new unscheduled `CampaignItem` without a persisted ID,
    /// deriving the line total from the given prices.
    ///
    /// # Arguments
    ///
    /// * `lead_id` - The lead this item belongs to
    /// * `unit_id` - The inventory unit being attached
    /// * `rate` - Unit rate in whole currency units
    /// * `printing_charge` - Printing charge in whole currency units
    #[must_use]
    pub const fn priced(lead_id: i64, unit_id: i64, rate: i64, printing_charge: i64) -> Self {
        Self {
            item_id: None,
            lead_id,
            unit_id,
            rate,
            printing_charge,
            total: rate.saturating_add(printing_charge),
            booking_start_date: None,
            booking_end_date: None,
            booking_updated_at: None,
        }
    }
}

/// Represents a client's request for a discount, awaiting an approver's
/// decision.
///
/// The access token and code hashes that gate resolution are storage
/// concerns and deliberately do not appear on this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountInquiry {
    /// Canonical internal identifier (opaque, stable, immutable).
    /// Optional to support creation before persistence.
    pub inquiry_id: Option<i64>,
    /// The requesting client's name.
    pub client_name: String,
    /// The requesting client's email address.
    pub client_email: String,
    /// The requesting client's phone number.
    pub client_phone: Option<String>,
    /// The requesting client's company, when given.
    pub company_name: Option<String>,
    /// Free-form message attached to the request.
    pub notes: Option<String>,
    /// JSON snapshot of the requested inventory units.
    pub cart_snapshot: String,
    /// Undiscounted total of the snapshotted cart, in whole currency units.
    pub base_total: i64,
    /// The discount percentage the client asked for, when stated.
    /// Informational only; the approver decides the actual figure.
    pub requested_discount: Option<f64>,
    /// Current resolution state.
    pub status: InquiryStatus,
    /// Approved discount percentage, once resolved.
    pub discount_percent: Option<f64>,
    /// Derived discount amount in whole currency units, once resolved.
    pub discount_amount: Option<i64>,
    /// Base total less discount, in whole currency units, once resolved.
    pub final_total: Option<i64>,
    /// Email of the approver the review link was issued to.
    pub approved_by: Option<String>,
    /// When the inquiry reached a terminal state (ISO 8601 datetime string).
    pub resolved_at: Option<String>,
}

impl DiscountInquiry {
    /// Creates a new pending `DiscountInquiry` without a persisted ID.
    ///
    /// # Arguments
    ///
    /// * `client_name` - The requesting client's name
    /// * `client_email` - The requesting client's email address
    /// * `cart_snapshot` - JSON snapshot of the requested inventory units
    /// * `base_total` - Undiscounted total of the snapshotted cart
    #[must_use]
    pub const fn new(
        client_name: String,
        client_email: String,
        cart_snapshot: String,
        base_total: i64,
    ) -> Self {
        Self {
            inquiry_id: None,
            client_name,
            client_email,
            client_phone: None,
            company_name: None,
            notes: None,
            cart_snapshot,
            base_total,
            requested_discount: None,
            status: InquiryStatus::Pending,
            discount_percent: None,
            discount_amount: None,
            final_total: None,
            approved_by: None,
            resolved_at: None,
        }
    }
}

/// Represents a one-time approval code issued alongside a discount inquiry.
///
/// The code hash itself is a storage concern and does not appear here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminOtp {
    /// Canonical internal identifier (opaque, stable, immutable).
    /// Optional to support creation before persistence.
    pub otp_id: Option<i64>,
    /// The inquiry this code gates.
    pub inquiry_id: i64,
    /// When the code stops being usable (ISO 8601 datetime string).
    pub expires_at: String,
    /// When the code was consumed by a successful approval, if ever
    /// (ISO 8601 datetime string).
    pub consumed_at: Option<String>,
    /// Number of failed verification attempts recorded against this code.
    pub attempt_count: i64,
}

impl AdminOtp {
    /// Creates a new unconsumed `AdminOtp` without a persisted ID.
    ///
    /// # Arguments
    ///
    /// * `inquiry_id` - The inquiry this code gates
    /// * `expires_at` - When the code stops being usable (ISO 8601 datetime)
    #[must_use]
    pub const fn new(inquiry_id: i64, expires_at: String) -> Self {
        Self {
            otp_id: None,
            inquiry_id,
            expires_at,
            consumed_at: None,
            attempt_count: 0,
        }
    }

    /// Returns whether the code has already been consumed.
    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// Returns whether the code is expired as of `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored expiry timestamp cannot be parsed.
    pub fn is_expired_at(&self, now: time::OffsetDateTime) -> Result<bool, DomainError> {
        let expires = time::OffsetDateTime::parse(
            &self.expires_at,
            &time::format_description::well_known::Iso8601::DEFAULT,
        )
        .map_err(|e| DomainError::DateParseError {
            date_string: self.expires_at.clone(),
            error: e.to_string(),
        })?;
        Ok(now > expires)
    }

    /// Returns whether the code may still be verified as of `now`.
    ///
    /// A code is usable while it is unconsumed and unexpired.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored expiry timestamp cannot be parsed.
    pub fn is_usable_at(&self, now: time::OffsetDateTime) -> Result<bool, DomainError> {
        Ok(!self.is_consumed() && !self.is_expired_at(now)?)
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Client name is empty or invalid.
    InvalidClientName(String),
    /// Email address is empty or malformed.
    InvalidEmail(String),
    /// Inventory code is empty or invalid.
    InvalidUnitCode(String),
    /// Lead status string is not recognized.
    InvalidLeadStatus(String),
    /// Availability status string is not recognized.
    InvalidAvailabilityStatus(String),
    /// Inquiry status string is not recognized.
    InvalidInquiryStatus(String),
    /// A required field was not supplied.
    MissingRequiredField(&'static str),
    /// Booking window start date falls after its end date.
    InvalidDateRange {
        /// The requested start date.
        start: time::Date,
        /// The requested end date.
        end: time::Date,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Discount percentage is outside the accepted range.
    InvalidDiscountPercent {
        /// Description of the validation error.
        reason: String,
    },
    /// Monetary arithmetic overflow.
    ArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// A campaign operation was requested with no inventory units.
    EmptyCampaignSelection,
    /// A price value could not be parsed for an inventory unit.
    InvalidRate {
        /// The inventory code the price was supplied for.
        unit_code: String,
        /// The unparseable price value.
        value: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidClientName(msg) => write!(f, "Invalid client name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidUnitCode(msg) => write!(f, "Invalid inventory code: {msg}"),
            Self::InvalidLeadStatus(status) => write!(f, "Unknown lead status: {status}"),
            Self::InvalidAvailabilityStatus(status) => {
                write!(f, "Unknown availability status: {status}")
            }
            Self::InvalidInquiryStatus(status) => write!(f, "Unknown inquiry status: {status}"),
            Self::MissingRequiredField(field) => write!(f, "Missing required field: {field}"),
            Self::InvalidDateRange { start, end } => {
                write!(f, "Start date {start} cannot be after end date {end}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidDiscountPercent { reason } => {
                write!(f, "Invalid discount percent: {reason}")
            }
            Self::ArithmeticOverflow { operation } => {
                write!(f, "Arithmetic overflow while {operation}")
            }
            Self::EmptyCampaignSelection => {
                write!(f, "No inventory units were provided")
            }
            Self::InvalidRate { unit_code, value } => {
                write!(f, "Invalid price for {unit_code}: {value}")
            }
        }
    }
}

impl std::error::Error for DomainError {}

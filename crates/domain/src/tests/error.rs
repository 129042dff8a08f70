// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidClientName(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid client name: test");

    let err: DomainError = DomainError::InvalidEmail(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid email: test");

    let err: DomainError = DomainError::InvalidUnitCode(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid inventory code: test");

    let err: DomainError = DomainError::InvalidLeadStatus(String::from("SHIPPED"));
    assert_eq!(format!("{err}"), "Unknown lead status: SHIPPED");

    let err: DomainError = DomainError::InvalidAvailabilityStatus(String::from("FREE"));
    assert_eq!(format!("{err}"), "Unknown availability status: FREE");

    let err: DomainError = DomainError::InvalidInquiryStatus(String::from("OPEN"));
    assert_eq!(format!("{err}"), "Unknown inquiry status: OPEN");

    let err: DomainError = DomainError::MissingRequiredField("percent");
    assert_eq!(format!("{err}"), "Missing required field: percent");

    let err: DomainError = DomainError::DateParseError {
        date_string: String::from("whenever"),
        error: String::from("bad input"),
    };
    assert_eq!(format!("{err}"), "Failed to parse date 'whenever': bad input");

    let err: DomainError = DomainError::InvalidDiscountPercent {
        reason: String::from("too big"),
    };
    assert_eq!(format!("{err}"), "Invalid discount percent: too big");

    let err: DomainError = DomainError::ArithmeticOverflow {
        operation: String::from("widening base total"),
    };
    assert_eq!(
        format!("{err}"),
        "Arithmetic overflow while widening base total"
    );

    let err: DomainError = DomainError::EmptyCampaignSelection;
    assert_eq!(format!("{err}"), "No inventory units were provided");

    let err: DomainError = DomainError::InvalidRate {
        unit_code: String::from("CHD-001"),
        value: String::from("abc"),
    };
    assert_eq!(format!("{err}"), "Invalid price for CHD-001: abc");
}

#[test]
fn test_date_range_error_names_both_dates() {
    let start = time::Date::from_calendar_date(2026, time::Month::March, 10).unwrap();
    let end = time::Date::from_calendar_date(2026, time::Month::March, 2).unwrap();

    let err: DomainError = DomainError::InvalidDateRange { start, end };
    let rendered = format!("{err}");
    assert!(rendered.contains("2026-03-10"));
    assert!(rendered.contains("2026-03-02"));
    assert!(rendered.contains("cannot be after"));
}

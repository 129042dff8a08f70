// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, validate_campaign_selection, validate_client_name, validate_email,
    validate_unit_code,
};

#[test]
fn test_client_name_must_not_be_empty() {
    assert!(validate_client_name("Acme Traders").is_ok());
    assert!(matches!(
        validate_client_name(""),
        Err(DomainError::InvalidClientName(_))
    ));
    assert!(matches!(
        validate_client_name("   "),
        Err(DomainError::InvalidClientName(_))
    ));
}

#[test]
fn test_email_shape_check() {
    assert!(validate_email("buyer@acme.example").is_ok());
    assert!(validate_email("  buyer@acme.example  ").is_ok());

    assert!(matches!(
        validate_email(""),
        Err(DomainError::InvalidEmail(_))
    ));
    assert!(matches!(
        validate_email("buyer.acme.example"),
        Err(DomainError::InvalidEmail(_))
    ));
    assert!(matches!(
        validate_email("@acme.example"),
        Err(DomainError::InvalidEmail(_))
    ));
    assert!(matches!(
        validate_email("buyer@"),
        Err(DomainError::InvalidEmail(_))
    ));
    assert!(matches!(
        validate_email("buyer@acme"),
        Err(DomainError::InvalidEmail(_))
    ));
}

#[test]
fn test_unit_code_must_not_be_empty() {
    assert!(validate_unit_code("CHD-001").is_ok());
    assert!(matches!(
        validate_unit_code(" "),
        Err(DomainError::InvalidUnitCode(_))
    ));
}

#[test]
fn test_campaign_selection_must_not_be_empty() {
    assert!(validate_campaign_selection(&[7, 8]).is_ok());
    assert!(matches!(
        validate_campaign_selection(&[]),
        Err(DomainError::EmptyCampaignSelection)
    ));
}

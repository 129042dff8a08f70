// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Validates that a client name is present.
///
/// # Arguments
///
/// * `name` - The client name to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidClientName` if the name is empty or
/// whitespace only.
pub fn validate_client_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidClientName(String::from(
            "Client name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates that an email address is plausibly deliverable.
///
/// This is a shape check only: a non-empty local part and a domain
/// containing a dot. Actual deliverability is the mailer's problem.
///
/// # Arguments
///
/// * `email` - The email address to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the address is empty or
/// malformed.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email cannot be empty",
        )));
    }
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(DomainError::InvalidEmail(format!(
            "'{trimmed}' is missing an @"
        )));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(DomainError::InvalidEmail(format!(
            "'{trimmed}' is not a valid address"
        )));
    }
    Ok(())
}

/// Validates that an inventory code is present.
///
/// # Arguments
///
/// * `code` - The inventory code to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidUnitCode` if the code is empty or
/// whitespace only.
pub fn validate_unit_code(code: &str) -> Result<(), DomainError> {
    if code.trim().is_empty() {
        return Err(DomainError::InvalidUnitCode(String::from(
            "Inventory code cannot be empty",
        )));
    }
    Ok(())
}

/// Validates that a campaign operation names at least one inventory unit.
///
/// # Arguments
///
/// * `unit_ids` - The inventory units named by the operation
///
/// # Errors
///
/// Returns `DomainError::EmptyCampaignSelection` if the selection is empty.
pub fn validate_campaign_selection(unit_ids: &[i64]) -> Result<(), DomainError> {
    if unit_ids.is_empty() {
        return Err(DomainError::EmptyCampaignSelection);
    }
    Ok(())
}

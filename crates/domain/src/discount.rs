// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Discount arithmetic shared by lead updates and inquiry approval.
//!
//! Monetary amounts are whole currency units held in `i64`. Percentages
//! are `f64` and must lie in `(0, 100]`. Derived amounts round to the
//! nearest whole unit.
//!
//! ## Invariants
//!
//! - `final_total = base_total - discount_amount` always holds exactly
//! - A percentage of zero (or none at all) leaves the base total untouched
//! - The same arithmetic backs lead totals and inquiry approval, so the
//!   two ledgers can never disagree on a figure

use crate::error::DomainError;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

/// The derived money figures for an applied discount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountFigures {
    /// The applied percentage.
    pub percent: f64,
    /// Amount taken off the base total, in whole currency units.
    pub discount_amount: i64,
    /// Base total less discount, in whole currency units.
    pub final_total: i64,
}

/// The recomputed money figures for a lead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeadTotals {
    /// Sum of campaign item totals, in whole currency units.
    pub base_total: i64,
    /// Derived discount amount, when a percentage applies.
    pub discount_amount: Option<i64>,
    /// Base total less discount, in whole currency units.
    pub final_total: i64,
}

/// Validates a requested discount percentage.
///
/// # Arguments
///
/// * `percent` - The requested percentage
///
/// # Errors
///
/// Returns `DomainError::InvalidDiscountPercent` if the value is not a
/// finite number greater than 0 and at most 100.
pub fn validate_percent(percent: f64) -> Result<(), DomainError> {
    if !percent.is_finite() {
        return Err(DomainError::InvalidDiscountPercent {
            reason: format!("value {percent} is not a finite number"),
        });
    }
    if percent <= 0.0 || percent > 100.0 {
        return Err(DomainError::InvalidDiscountPercent {
            reason: format!("value {percent} must be greater than 0 and at most 100"),
        });
    }
    Ok(())
}

/// Applies a discount percentage to a base total.
///
/// The discount amount is `base_total * percent / 100`, rounded to the
/// nearest whole currency unit.
///
/// # Arguments
///
/// * `base_total` - The undiscounted total in whole currency units
/// * `percent` - The percentage to apply
///
/// # Errors
///
/// Returns an error if the percentage is out of range or the arithmetic
/// overflows.
pub fn apply_discount(base_total: i64, percent: f64) -> Result<DiscountFigures, DomainError> {
    validate_percent(percent)?;
    let discount_amount = discount_amount(base_total, percent)?;
    let final_total =
        base_total
            .checked_sub(discount_amount)
            .ok_or_else(|| DomainError::ArithmeticOverflow {
                operation: String::from("subtracting the discount from the base total"),
            })?;
    Ok(DiscountFigures {
        percent,
        discount_amount,
        final_total,
    })
}

/// Recomputes a lead's money figures from its base total and stored
/// discount percentage.
///
/// A missing or zero percentage means no discount: the final total equals
/// the base total and no discount amount is recorded.
///
/// # Arguments
///
/// * `base_total` - Sum of campaign item totals in whole currency units
/// * `percent` - The lead's stored discount percentage, when any
///
/// # Errors
///
/// Returns an error if a positive percentage is out of range or the
/// arithmetic overflows.
pub fn recalculate_totals(base_total: i64, percent: Option<f64>) -> Result<LeadTotals, DomainError> {
    match percent {
        Some(p) if p > 0.0 => {
            let figures = apply_discount(base_total, p)?;
            Ok(LeadTotals {
                base_total,
                discount_amount: Some(figures.discount_amount),
                final_total: figures.final_total,
            })
        }
        _ => Ok(LeadTotals {
            base_total,
            discount_amount: None,
            final_total: base_total,
        }),
    }
}

/// Computes the rounded discount amount for a base total.
fn discount_amount(base_total: i64, percent: f64) -> Result<i64, DomainError> {
    let base = base_total
        .to_f64()
        .ok_or_else(|| DomainError::ArithmeticOverflow {
            operation: format!("widening base total {base_total}"),
        })?;
    (base * percent / 100.0)
        .round()
        .to_i64()
        .ok_or_else(|| DomainError::ArithmeticOverflow {
            operation: format!("computing {percent}% of {base_total}"),
        })
}

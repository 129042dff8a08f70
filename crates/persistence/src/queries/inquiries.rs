// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Discount inquiry and approval code queries.
//!
//! Backend-agnostic queries over the discount authorization workflow.
//! All queries use Diesel DSL and work across all supported backends.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use std::str::FromStr;
use tracing::debug;

use admast_domain::{AdminOtp, DiscountInquiry, InquiryStatus};

use crate::data_models::InquiryAuthData;
use crate::diesel_schema::{admin_otps, discount_inquiries};
use crate::error::PersistenceError;

/// Diesel Queryable struct for discount inquiry rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = discount_inquiries)]
pub(crate) struct InquiryRow {
    inquiry_id: i64,
    client_name: String,
    client_email: String,
    client_phone: Option<String>,
    company_name: Option<String>,
    notes: Option<String>,
    cart_snapshot: String,
    base_total: i64,
    requested_discount: Option<f64>,
    status: String,
    discount_percent: Option<f64>,
    discount_amount: Option<i64>,
    final_total: Option<i64>,
    approved_by: Option<String>,
    resolved_at: Option<String>,
}

impl InquiryRow {
    /// Converts a stored row into the domain type.
    ///
    /// Fails if the stored status is outside the vocabulary, which
    /// indicates a corrupt row.
    pub(crate) fn into_inquiry(self) -> Result<DiscountInquiry, PersistenceError> {
        let status = InquiryStatus::from_str(&self.status)?;
        Ok(DiscountInquiry {
            inquiry_id: Some(self.inquiry_id),
            client_name: self.client_name,
            client_email: self.client_email,
            client_phone: self.client_phone,
            company_name: self.company_name,
            notes: self.notes,
            cart_snapshot: self.cart_snapshot,
            base_total: self.base_total,
            requested_discount: self.requested_discount,
            status,
            discount_percent: self.discount_percent,
            discount_amount: self.discount_amount,
            final_total: self.final_total,
            approved_by: self.approved_by,
            resolved_at: self.resolved_at,
        })
    }
}

/// Diesel Queryable struct for approval code rows, including the stored
/// bcrypt hash.
#[derive(Queryable, Selectable)]
#[diesel(table_name = admin_otps)]
pub(crate) struct OtpRow {
    pub(crate) otp_id: i64,
    pub(crate) inquiry_id: i64,
    pub(crate) code_hash: String,
    pub(crate) expires_at: String,
    pub(crate) consumed_at: Option<String>,
    pub(crate) attempt_count: i64,
}

impl OtpRow {
    pub(crate) fn into_otp(self) -> AdminOtp {
        AdminOtp {
            otp_id: Some(self.otp_id),
            inquiry_id: self.inquiry_id,
            expires_at: self.expires_at,
            consumed_at: self.consumed_at,
            attempt_count: self.attempt_count,
        }
    }
}

backend_fn! {
/// Retrieves a discount inquiry by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the inquiry is not found.
pub fn get_inquiry(
    conn: &mut _,
    inquiry_id: i64,
) -> Result<Option<DiscountInquiry>, PersistenceError> {
    debug!("Looking up discount inquiry by ID: {}", inquiry_id);

    let result: Result<InquiryRow, diesel::result::Error> = discount_inquiries::table
        .filter(discount_inquiries::inquiry_id.eq(inquiry_id))
        .select(InquiryRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_inquiry()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves the token-verification material for a discount inquiry.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the inquiry is not found.
pub fn get_inquiry_auth(
    conn: &mut _,
    inquiry_id: i64,
) -> Result<Option<InquiryAuthData>, PersistenceError> {
    debug!("Looking up token material for inquiry ID: {}", inquiry_id);

    let result: Result<(Option<String>, Option<String>), diesel::result::Error> =
        discount_inquiries::table
        .filter(discount_inquiries::inquiry_id.eq(inquiry_id))
        .select((
            discount_inquiries::token_hash,
            discount_inquiries::token_expires_at,
        ))
        .first(conn);

    match result {
        Ok((token_hash, token_expires_at)) => Ok(Some(InquiryAuthData {
            inquiry_id,
            token_hash,
            token_expires_at,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves the approval code issued for a discount inquiry.
///
/// The stored hash is not exposed; code verification happens inside the
/// resolution mutation.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no code exists for the inquiry.
pub fn get_otp(conn: &mut _, inquiry_id: i64) -> Result<Option<AdminOtp>, PersistenceError> {
    debug!("Looking up approval code for inquiry ID: {}", inquiry_id);

    let result: Result<OtpRow, diesel::result::Error> = admin_otps::table
        .filter(admin_otps::inquiry_id.eq(inquiry_id))
        .select(OtpRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_otp())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists discount inquiries, newest first, optionally filtered by
/// resolution state.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_inquiries(
    conn: &mut _,
    status: Option<&str>,
) -> Result<Vec<DiscountInquiry>, PersistenceError> {
    debug!("Listing discount inquiries with status filter: {:?}", status);

    let mut query = discount_inquiries::table
        .select(InquiryRow::as_select())
        .into_boxed();

    if let Some(status) = status {
        query = query.filter(discount_inquiries::status.eq(status.to_string()));
    }

    let rows: Vec<InquiryRow> = query
        .order_by(discount_inquiries::inquiry_id.desc())
        .load(conn)?;

    rows.into_iter().map(InquiryRow::into_inquiry).collect()
}
}

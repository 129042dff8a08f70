// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Discount inquiry creation and resolution.
//!
//! An inquiry and its one-time approval code are created together; the
//! resolution path verifies the code, moves the inquiry to its terminal
//! state, and consumes the code, all inside a single transaction. A failed
//! code attempt commits the attempt counter even though the inquiry is
//! left untouched.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use admast_domain::{DiscountInquiry, InquiryStatus};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{admin_otps, discount_inquiries};
use crate::error::PersistenceError;
use crate::mutations::format_timestamp;
use crate::queries::inquiries::OtpRow;

/// The terminal state a resolution writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolutionUpdate {
    /// Approve with derived money figures.
    Approve {
        percent: f64,
        discount_amount: i64,
        final_total: i64,
    },
    /// Reject without figures.
    Reject,
}

/// Outcome of a resolution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The inquiry reached its terminal state and the code was consumed.
    Resolved,
    /// The inquiry was already resolved; nothing changed.
    AlreadyResolved,
    /// The approval code has expired.
    CodeExpired,
    /// The approval code did not match; the attempt was counted.
    CodeInvalid,
    /// The inquiry does not exist.
    InquiryMissing,
}

backend_fn! {
/// Creates a discount inquiry together with its one-time approval code.
///
/// Only the bcrypt hash of the code is stored, on the companion
/// `admin_otps` row. The access-token hash is bound to the freshly
/// assigned inquiry ID and written afterwards via `set_inquiry_token`.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn create_inquiry(
    conn: &mut _,
    inquiry: &DiscountInquiry,
    code_hash: &str,
    code_expires_at: &str,
) -> Result<i64, PersistenceError> {
    info!(
        "Creating discount inquiry for client: {}",
        inquiry.client_name
    );

    conn.transaction::<i64, PersistenceError, _>(|conn| {
        diesel::insert_into(discount_inquiries::table)
            .values((
                discount_inquiries::client_name.eq(&inquiry.client_name),
                discount_inquiries::client_email.eq(&inquiry.client_email),
                discount_inquiries::client_phone.eq(&inquiry.client_phone),
                discount_inquiries::company_name.eq(&inquiry.company_name),
                discount_inquiries::notes.eq(&inquiry.notes),
                discount_inquiries::cart_snapshot.eq(&inquiry.cart_snapshot),
                discount_inquiries::base_total.eq(inquiry.base_total),
                discount_inquiries::requested_discount.eq(inquiry.requested_discount),
                discount_inquiries::status.eq(inquiry.status.as_str()),
                discount_inquiries::approved_by.eq(&inquiry.approved_by),
            ))
            .execute(conn)?;

        let inquiry_id: i64 = conn.get_last_insert_rowid()?;

        diesel::insert_into(admin_otps::table)
            .values((
                admin_otps::inquiry_id.eq(inquiry_id),
                admin_otps::code_hash.eq(code_hash),
                admin_otps::expires_at.eq(code_expires_at),
            ))
            .execute(conn)?;

        info!(inquiry_id, "Discount inquiry created");
        Ok(inquiry_id)
    })
}
}

backend_fn! {
/// Stores the access-token hash and expiry for a discount inquiry.
///
/// # Errors
///
/// Returns an error if the update fails, including `NotFound` when the
/// inquiry does not exist.
pub fn set_inquiry_token(
    conn: &mut _,
    inquiry_id: i64,
    token_hash: &str,
    token_expires_at: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(discount_inquiries::table)
        .filter(discount_inquiries::inquiry_id.eq(inquiry_id))
        .set((
            discount_inquiries::token_hash.eq(Some(token_hash)),
            discount_inquiries::token_expires_at.eq(Some(token_expires_at)),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Inquiry with ID {inquiry_id} not found"
        )));
    }
    Ok(())
}
}

backend_fn! {
/// Resolves a pending inquiry.
///
/// Resolution is one-shot: a terminal inquiry reports `AlreadyResolved`
/// no matter what is presented. An approval verifies and consumes the
/// one-time code; a rejection needs no code. A mismatched code increments
/// the attempt counter and commits; an expired code is rejected without
/// consuming anything.
///
/// # Errors
///
/// Returns an error only for infrastructure failures; business rejections
/// are reported through [`ResolveOutcome`].
pub fn resolve_inquiry(
    conn: &mut _,
    inquiry_id: i64,
    code: Option<&str>,
    update: &ResolutionUpdate,
    now: time::OffsetDateTime,
) -> Result<ResolveOutcome, PersistenceError> {
    let now_str = format_timestamp(now)?;

    conn.transaction::<ResolveOutcome, PersistenceError, _>(|conn| {
        let status: Option<String> = discount_inquiries::table
            .filter(discount_inquiries::inquiry_id.eq(inquiry_id))
            .select(discount_inquiries::status)
            .first(conn)
            .optional()?;
        let Some(status) = status else {
            return Ok(ResolveOutcome::InquiryMissing);
        };
        if status != InquiryStatus::Pending.as_str() {
            debug!(inquiry_id, "Inquiry is already {}", status);
            return Ok(ResolveOutcome::AlreadyResolved);
        }

        let ResolutionUpdate::Approve {
            percent,
            discount_amount,
            final_total,
        } = update
        else {
            diesel::update(discount_inquiries::table)
                .filter(discount_inquiries::inquiry_id.eq(inquiry_id))
                .set((
                    discount_inquiries::status.eq(InquiryStatus::Rejected.as_str()),
                    discount_inquiries::resolved_at.eq(Some(now_str.clone())),
                ))
                .execute(conn)?;
            info!(inquiry_id, "Discount inquiry rejected");
            return Ok(ResolveOutcome::Resolved);
        };

        let otp: Option<OtpRow> = admin_otps::table
            .filter(admin_otps::inquiry_id.eq(inquiry_id))
            .select(OtpRow::as_select())
            .first(conn)
            .optional()?;
        let Some(otp) = otp else {
            // A pending inquiry without a code cannot be approved
            return Ok(ResolveOutcome::CodeInvalid);
        };

        if otp.consumed_at.is_some() {
            return Ok(ResolveOutcome::CodeInvalid);
        }

        let expires = time::OffsetDateTime::parse(
            &otp.expires_at,
            &time::format_description::well_known::Iso8601::DEFAULT,
        )
        .map_err(|e| {
            PersistenceError::CorruptRecord(format!(
                "Unparseable code expiry '{}': {e}",
                otp.expires_at
            ))
        })?;
        if now > expires {
            debug!(inquiry_id, "Approval code has expired");
            return Ok(ResolveOutcome::CodeExpired);
        }

        let code_matches: bool = match code {
            Some(code) => bcrypt::verify(code, &otp.code_hash)
                .map_err(|e| PersistenceError::Other(format!("Failed to verify code: {e}")))?,
            None => false,
        };
        if !code_matches {
            diesel::update(admin_otps::table)
                .filter(admin_otps::otp_id.eq(otp.otp_id))
                .set(admin_otps::attempt_count.eq(otp.attempt_count + 1))
                .execute(conn)?;
            debug!(
                inquiry_id,
                attempts = otp.attempt_count + 1,
                "Approval code mismatch"
            );
            return Ok(ResolveOutcome::CodeInvalid);
        }

        diesel::update(admin_otps::table)
            .filter(admin_otps::otp_id.eq(otp.otp_id))
            .set(admin_otps::consumed_at.eq(Some(now_str.clone())))
            .execute(conn)?;

        diesel::update(discount_inquiries::table)
            .filter(discount_inquiries::inquiry_id.eq(inquiry_id))
            .set((
                discount_inquiries::status.eq(InquiryStatus::Approved.as_str()),
                discount_inquiries::discount_percent.eq(Some(*percent)),
                discount_inquiries::discount_amount.eq(Some(*discount_amount)),
                discount_inquiries::final_total.eq(Some(*final_total)),
                discount_inquiries::resolved_at.eq(Some(now_str.clone())),
            ))
            .execute(conn)?;
        info!(inquiry_id, percent, "Discount inquiry approved");

        Ok(ResolveOutcome::Resolved)
    })
}
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The discount authorization workflow engine.
//!
//! A client asks for a non-standard discount on a pending quote; a
//! remote administrator approves or rejects it without being logged in,
//! gated by a signed review token (24 hours) and a one-time 6-digit
//! approval code (10 minutes). `PENDING → {APPROVED, REJECTED}`, both
//! terminal.
//!
//! Every token failure mode collapses into a single `Unauthorized`
//! answer so the review endpoint never leaks which sub-check failed.

use tracing::{debug, info, warn};

use admast_domain::{
    DiscountFigures, DiscountInquiry, InquiryStatus, apply_discount, validate_client_name,
    validate_email,
};
use admast_persistence::{Persistence, ResolutionUpdate, ResolveOutcome};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::format_timestamp;
use crate::mail::{self, OutboundMail};
use crate::token::{CODE_TTL, TOKEN_TTL, TokenSigner, generate_code, sha256_hex, token_matches};

/// One line of the cart snapshot frozen onto an inquiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// The inventory code of the requested unit.
    pub unit_code: String,
    /// The outlet or site name, for human review.
    pub outlet_name: String,
    /// The quoted rate in whole currency units.
    pub rate: i64,
}

/// A client's request for a discount.
#[derive(Debug, Clone, PartialEq)]
pub struct InquiryRequest {
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
    /// The cart the discount is requested against.
    pub cart: Vec<CartLine>,
    /// Undiscounted total of the cart, in whole currency units.
    pub base_total: i64,
    /// The discount percentage the client is asking for, when stated.
    pub requested_discount: Option<f64>,
}

/// Static configuration for the workflow.
#[derive(Debug, Clone)]
pub struct InquiryConfig {
    /// Base URL the review link is built against.
    pub base_url: String,
    /// Approver address used when no eligible operator exists.
    pub fallback_approver: Option<String>,
}

/// The result of creating an inquiry: its ID and the review-request
/// mail awaiting delivery.
#[derive(Debug)]
pub struct CreatedInquiry {
    /// The persisted inquiry's ID.
    pub inquiry_id: i64,
    /// The review request for the approver's inbox.
    pub mail: OutboundMail,
}

/// The approver's decision on a pending inquiry.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionAction {
    /// Approve with the given percentage, gated by the approval code.
    Approve {
        /// The discount percentage, in `(0, 100]`.
        percent: f64,
        /// The one-time approval code from the request mail.
        code: String,
    },
    /// Reject the request. No code needed.
    Reject,
}

/// The result of resolving an inquiry: its final state and the
/// requester notification awaiting delivery.
#[derive(Debug)]
pub struct ResolvedInquiry {
    /// The inquiry in its terminal state.
    pub inquiry: DiscountInquiry,
    /// The outcome notice for the requester's inbox.
    pub mail: OutboundMail,
}

/// Picks the approver the review link is issued to: the oldest enabled
/// `SUPER_ADMIN`, else the oldest enabled `ADMIN`, else the configured
/// fallback address.
pub(crate) fn designated_approver(
    store: &mut Persistence,
    fallback: Option<&str>,
) -> Result<Option<String>, CoreError> {
    if let Some(email) = store.first_operator_email_with_role("SUPER_ADMIN")? {
        return Ok(Some(email));
    }
    if let Some(email) = store.first_operator_email_with_role("ADMIN")? {
        return Ok(Some(email));
    }
    Ok(fallback.map(String::from))
}

/// Creates a pending discount inquiry and composes the review mail.
///
/// The approval code is stored only as a bcrypt hash; the access token
/// only as a SHA-256 hash. Both plaintexts live solely in the returned
/// mail.
///
/// # Errors
///
/// Returns `Validation` for bad request fields or when no approver can
/// be determined, `Store` for persistence failures, and `Internal` for
/// crypto or serialization failures.
pub fn create_inquiry(
    store: &mut Persistence,
    signer: &TokenSigner,
    config: &InquiryConfig,
    request: &InquiryRequest,
    now: time::OffsetDateTime,
) -> Result<CreatedInquiry, CoreError> {
    validate_client_name(&request.client_name)?;
    validate_email(&request.client_email)?;
    if request.cart.is_empty() {
        return Err(CoreError::Validation(String::from(
            "A discount inquiry needs at least one cart line",
        )));
    }

    let Some(approver) = designated_approver(store, config.fallback_approver.as_deref())? else {
        return Err(CoreError::Validation(String::from(
            "No approver is available for discount inquiries",
        )));
    };

    let cart_snapshot = serde_json::to_string(&request.cart)
        .map_err(|e| CoreError::Internal(format!("Failed to serialize cart snapshot: {e}")))?;

    let mut inquiry = DiscountInquiry::new(
        request.client_name.trim().to_string(),
        request.client_email.trim().to_string(),
        cart_snapshot,
        request.base_total,
    );
    inquiry.client_phone = request.client_phone.clone();
    inquiry.company_name = request.company_name.clone();
    inquiry.notes = request.notes.clone();
    inquiry.requested_discount = request.requested_discount;
    inquiry.approved_by = Some(approver.clone());

    let code = generate_code();
    let code_hash = bcrypt::hash(&code, bcrypt::DEFAULT_COST)
        .map_err(|e| CoreError::Internal(format!("Failed to hash approval code: {e}")))?;
    let code_expires = format_timestamp(now + CODE_TTL)?;

    let inquiry_id = store.create_inquiry(&inquiry, &code_hash, &code_expires)?;

    // The token binds to the freshly assigned ID, so it is issued and
    // stored after the insert. A failure in between leaves a pending
    // inquiry that no link can ever open.
    let token_expires = format_timestamp(now + TOKEN_TTL)?;
    let token = signer.issue(inquiry_id, &approver, &token_expires)?;
    store.set_inquiry_token(inquiry_id, &sha256_hex(&token), &token_expires)?;

    let review_url = format!(
        "{}/discount-review/{inquiry_id}?token={token}",
        config.base_url.trim_end_matches('/')
    );
    info!(inquiry_id, %approver, "Discount inquiry created");

    Ok(CreatedInquiry {
        inquiry_id,
        mail: mail::review_request(&approver, &inquiry, &review_url, &code),
    })
}

/// Validates a presented review token against the stored hash and
/// expiry. Every failure mode is the same `Unauthorized`.
fn authorize(
    store: &mut Persistence,
    inquiry_id: i64,
    token: &str,
    now: time::OffsetDateTime,
) -> Result<(), CoreError> {
    let Some(auth) = store.get_inquiry_auth(inquiry_id)? else {
        debug!(inquiry_id, "Token presented for unknown inquiry");
        return Err(CoreError::Unauthorized);
    };
    let (Some(stored_hash), Some(expires_at)) = (auth.token_hash, auth.token_expires_at) else {
        debug!(inquiry_id, "Inquiry has no issued token");
        return Err(CoreError::Unauthorized);
    };
    if !token_matches(token, &stored_hash) {
        debug!(inquiry_id, "Token hash mismatch");
        return Err(CoreError::Unauthorized);
    }
    let expires = time::OffsetDateTime::parse(
        &expires_at,
        &time::format_description::well_known::Iso8601::DEFAULT,
    )
    .map_err(|e| {
        warn!(inquiry_id, "Unparseable token expiry: {e}");
        CoreError::Unauthorized
    })?;
    if now > expires {
        debug!(inquiry_id, "Token has expired");
        return Err(CoreError::Unauthorized);
    }
    Ok(())
}

/// Fetches an inquiry for review, gated by its access token.
///
/// Read-only and idempotent: fetching never consumes anything and can
/// be repeated for as long as the token lives.
///
/// # Errors
///
/// Returns `Unauthorized` when the token is invalid or expired, in any
/// way.
pub fn fetch_for_review(
    store: &mut Persistence,
    inquiry_id: i64,
    token: &str,
    now: time::OffsetDateTime,
) -> Result<DiscountInquiry, CoreError> {
    authorize(store, inquiry_id, token, now)?;
    store
        .get_inquiry(inquiry_id)?
        .ok_or(CoreError::Unauthorized)
}

/// Resolves a pending inquiry, gated by its access token.
///
/// An already-resolved inquiry answers `AlreadyResolved` regardless of
/// the presented arguments. Rejection needs nothing further. Approval
/// requires a valid
/// percentage and the unexpired, unconsumed approval code; on success
/// the derived figures are persisted and the code consumed, atomically.
/// The returned requester mail is sent after commit, best-effort.
///
/// # Errors
///
/// Returns `Unauthorized` for token failures, `Validation` for a bad
/// percentage, `AlreadyResolved` / `CodeExpired` / `InvalidCode` per
/// the workflow rules, and `Store` for persistence failures.
pub fn resolve_inquiry(
    store: &mut Persistence,
    inquiry_id: i64,
    token: &str,
    action: &ResolutionAction,
    now: time::OffsetDateTime,
) -> Result<ResolvedInquiry, CoreError> {
    authorize(store, inquiry_id, token, now)?;

    let inquiry = store
        .get_inquiry(inquiry_id)?
        .ok_or(CoreError::Unauthorized)?;

    // Resolution is one-shot no matter what is presented, so a terminal
    // inquiry answers AlreadyResolved before any argument is looked at.
    // The store transaction re-checks the status against races.
    if inquiry.status.is_terminal() {
        return Err(CoreError::AlreadyResolved);
    }

    let (code, update, figures): (Option<&str>, ResolutionUpdate, Option<DiscountFigures>) =
        match action {
            ResolutionAction::Approve { percent, code } => {
                let figures = apply_discount(inquiry.base_total, *percent)?;
                (
                    Some(code.as_str()),
                    ResolutionUpdate::Approve {
                        percent: figures.percent,
                        discount_amount: figures.discount_amount,
                        final_total: figures.final_total,
                    },
                    Some(figures),
                )
            }
            ResolutionAction::Reject => (None, ResolutionUpdate::Reject, None),
        };

    match store.resolve_inquiry(inquiry_id, code, &update, now)? {
        ResolveOutcome::Resolved => {}
        ResolveOutcome::AlreadyResolved => return Err(CoreError::AlreadyResolved),
        ResolveOutcome::CodeExpired => return Err(CoreError::CodeExpired),
        ResolveOutcome::CodeInvalid => return Err(CoreError::InvalidCode),
        ResolveOutcome::InquiryMissing => return Err(CoreError::Unauthorized),
    }

    let resolved = store
        .get_inquiry(inquiry_id)?
        .ok_or_else(|| CoreError::Internal(format!("Inquiry {inquiry_id} vanished mid-resolve")))?;
    info!(inquiry_id, status = %resolved.status, "Discount inquiry resolved");

    let mail = match figures {
        Some(figures) => mail::approval_notice(&resolved, &figures),
        None => mail::rejection_notice(&resolved),
    };

    Ok(ResolvedInquiry {
        inquiry: resolved,
        mail,
    })
}

/// Lists discount inquiries, newest first, optionally filtered by
/// resolution state. Admin-gated at the edge.
///
/// # Errors
///
/// Returns an error if the store query fails.
pub fn list_inquiries(
    store: &mut Persistence,
    status: Option<InquiryStatus>,
) -> Result<Vec<DiscountInquiry>, CoreError> {
    Ok(store.list_inquiries(status.map(|s| s.as_str()))?)
}

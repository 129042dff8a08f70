// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admast_domain::{AdminOtp, DiscountInquiry, InquiryStatus};

use crate::mutations::{ResolutionUpdate, ResolveOutcome};
use crate::tests::{create_test_persistence, iso, test_now};
use crate::{InquiryAuthData, Persistence, SqlitePersistence};

const TEST_CODE: &str = "482916";
const TEST_TOKEN_HASH: &str = "3f2acc1b5ac0f08dd16631a50b7ac14cc8ae745d2f2f811cdf55eb8a83e908c2";

/// Creates a pending inquiry whose approval code expires at the given
/// instant, and returns its ID.
fn seed_inquiry(persistence: &mut Persistence, code_expires: time::OffsetDateTime) -> i64 {
    let mut inquiry: DiscountInquiry = DiscountInquiry::new(
        String::from("Acme Traders"),
        String::from("buyer@acme.example"),
        String::from(r#"[{"unit_code":"CHD-001","rate":50000}]"#),
        100_000,
    );
    inquiry.requested_discount = Some(20.0);
    // Low cost keeps the test fast; production hashing uses the default
    let code_hash: String = bcrypt::hash(TEST_CODE, 4).unwrap();
    let inquiry_id: i64 = persistence
        .create_inquiry(&inquiry, &code_hash, &iso(code_expires))
        .unwrap();
    persistence
        .set_inquiry_token(
            inquiry_id,
            TEST_TOKEN_HASH,
            &iso(test_now() + time::Duration::hours(24)),
        )
        .unwrap();
    inquiry_id
}

fn approve_update() -> ResolutionUpdate {
    ResolutionUpdate::Approve {
        percent: 15.0,
        discount_amount: 15_000,
        final_total: 85_000,
    }
}

#[test]
fn test_create_and_get_inquiry() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let inquiry_id: i64 = seed_inquiry(
        &mut persistence,
        test_now() + time::Duration::minutes(10),
    );

    let stored: DiscountInquiry = persistence.get_inquiry(inquiry_id).unwrap().unwrap();
    assert_eq!(stored.inquiry_id, Some(inquiry_id));
    assert_eq!(stored.client_name, "Acme Traders");
    assert_eq!(stored.base_total, 100_000);
    assert_eq!(stored.requested_discount, Some(20.0));
    assert_eq!(stored.status, InquiryStatus::Pending);
    assert_eq!(stored.discount_percent, None);
    assert_eq!(stored.resolved_at, None);
}

#[test]
fn test_get_inquiry_missing_returns_none() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    assert!(persistence.get_inquiry(999).unwrap().is_none());
    assert!(persistence.get_inquiry_auth(999).unwrap().is_none());
    assert!(persistence.get_otp(999).unwrap().is_none());
}

#[test]
fn test_inquiry_auth_exposes_token_hash_only() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let inquiry_id: i64 = seed_inquiry(
        &mut persistence,
        test_now() + time::Duration::minutes(10),
    );

    let auth: InquiryAuthData = persistence.get_inquiry_auth(inquiry_id).unwrap().unwrap();
    assert_eq!(auth.inquiry_id, inquiry_id);
    assert_eq!(auth.token_hash.as_deref(), Some(TEST_TOKEN_HASH));
    assert!(auth.token_expires_at.is_some());
}

#[test]
fn test_resolve_approves_and_consumes_code() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let inquiry_id: i64 = seed_inquiry(
        &mut persistence,
        test_now() + time::Duration::minutes(10),
    );

    let outcome: ResolveOutcome = persistence
        .resolve_inquiry(inquiry_id, Some(TEST_CODE), &approve_update(), test_now())
        .unwrap();
    assert_eq!(outcome, ResolveOutcome::Resolved);

    let stored: DiscountInquiry = persistence.get_inquiry(inquiry_id).unwrap().unwrap();
    assert_eq!(stored.status, InquiryStatus::Approved);
    assert_eq!(stored.discount_percent, Some(15.0));
    assert_eq!(stored.discount_amount, Some(15_000));
    assert_eq!(stored.final_total, Some(85_000));
    assert!(stored.resolved_at.is_some());

    let otp: AdminOtp = persistence.get_otp(inquiry_id).unwrap().unwrap();
    assert!(otp.is_consumed());
}

#[test]
fn test_resolution_is_one_shot() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let inquiry_id: i64 = seed_inquiry(
        &mut persistence,
        test_now() + time::Duration::minutes(10),
    );

    persistence
        .resolve_inquiry(inquiry_id, Some(TEST_CODE), &approve_update(), test_now())
        .unwrap();

    // Even the correct code cannot resolve a terminal inquiry again
    let outcome: ResolveOutcome = persistence
        .resolve_inquiry(inquiry_id, Some(TEST_CODE), &ResolutionUpdate::Reject, test_now())
        .unwrap();
    assert_eq!(outcome, ResolveOutcome::AlreadyResolved);

    let stored: DiscountInquiry = persistence.get_inquiry(inquiry_id).unwrap().unwrap();
    assert_eq!(stored.status, InquiryStatus::Approved);
}

#[test]
fn test_resolve_rejects_without_figures() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let inquiry_id: i64 = seed_inquiry(
        &mut persistence,
        test_now() + time::Duration::minutes(10),
    );

    // Rejection needs no code at all
    let outcome: ResolveOutcome = persistence
        .resolve_inquiry(inquiry_id, None, &ResolutionUpdate::Reject, test_now())
        .unwrap();
    assert_eq!(outcome, ResolveOutcome::Resolved);

    let stored: DiscountInquiry = persistence.get_inquiry(inquiry_id).unwrap().unwrap();
    assert_eq!(stored.status, InquiryStatus::Rejected);
    assert_eq!(stored.discount_percent, None);
    assert_eq!(stored.discount_amount, None);
    assert_eq!(stored.final_total, None);
    assert!(stored.resolved_at.is_some());
}

#[test]
fn test_wrong_code_counts_attempt_and_leaves_inquiry_pending() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let inquiry_id: i64 = seed_inquiry(
        &mut persistence,
        test_now() + time::Duration::minutes(10),
    );

    let outcome: ResolveOutcome = persistence
        .resolve_inquiry(inquiry_id, Some("000000"), &approve_update(), test_now())
        .unwrap();
    assert_eq!(outcome, ResolveOutcome::CodeInvalid);

    let otp: AdminOtp = persistence.get_otp(inquiry_id).unwrap().unwrap();
    assert_eq!(otp.attempt_count, 1);
    assert!(!otp.is_consumed());

    let stored: DiscountInquiry = persistence.get_inquiry(inquiry_id).unwrap().unwrap();
    assert_eq!(stored.status, InquiryStatus::Pending);

    // A failed attempt does not lock the code out
    let outcome: ResolveOutcome = persistence
        .resolve_inquiry(inquiry_id, Some(TEST_CODE), &approve_update(), test_now())
        .unwrap();
    assert_eq!(outcome, ResolveOutcome::Resolved);
}

#[test]
fn test_expired_code_is_rejected() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let inquiry_id: i64 = seed_inquiry(
        &mut persistence,
        test_now() - time::Duration::minutes(1),
    );

    let outcome: ResolveOutcome = persistence
        .resolve_inquiry(inquiry_id, Some(TEST_CODE), &approve_update(), test_now())
        .unwrap();
    assert_eq!(outcome, ResolveOutcome::CodeExpired);

    let otp: AdminOtp = persistence.get_otp(inquiry_id).unwrap().unwrap();
    assert!(!otp.is_consumed());
    assert_eq!(otp.attempt_count, 0);
}

#[test]
fn test_resolve_missing_inquiry() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let outcome: ResolveOutcome = persistence
        .resolve_inquiry(999, Some(TEST_CODE), &approve_update(), test_now())
        .unwrap();
    assert_eq!(outcome, ResolveOutcome::InquiryMissing);
}

#[test]
fn test_list_inquiries_filters_by_status_newest_first() {
    let mut persistence: SqlitePersistence = create_test_persistence();

    let first: i64 = seed_inquiry(&mut persistence, test_now() + time::Duration::minutes(10));
    let second: i64 = seed_inquiry(&mut persistence, test_now() + time::Duration::minutes(10));
    persistence
        .resolve_inquiry(first, None, &ResolutionUpdate::Reject, test_now())
        .unwrap();

    let all: Vec<DiscountInquiry> = persistence.list_inquiries(None).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].inquiry_id, Some(second));
    assert_eq!(all[1].inquiry_id, Some(first));

    let pending: Vec<DiscountInquiry> = persistence.list_inquiries(Some("PENDING")).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].inquiry_id, Some(second));
}

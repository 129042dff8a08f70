// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Discount inquiry handler tests.

use admast::OutboundMail;
use admast_persistence::{OperatorData, Persistence};

use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{CartLineInfo, InquirySubmission, ResolveInquiryRequest};
use crate::tests::helpers::{
    actor_for, create_test_store, extract_code, extract_token, seed_operator, test_inquiry_config,
    test_now, test_signer,
};

fn inquiry_submission() -> InquirySubmission {
    InquirySubmission {
        client_name: String::from("Acme Traders"),
        client_email: String::from("buyer@acme.example"),
        client_phone: None,
        company_name: Some(String::from("Acme Traders Pvt Ltd")),
        notes: None,
        cart: vec![CartLineInfo {
            unit_code: String::from("CHD-001"),
            outlet_name: String::from("Sector 17 Gantry"),
            rate: 100_000,
        }],
        base_total: 100_000,
        expected_discount: Some(10.0),
    }
}

/// Seeds an admin approver and submits one inquiry, returning its ID
/// and the review mail.
fn seed_inquiry(store: &mut Persistence) -> (i64, OutboundMail) {
    seed_operator(store, "ANITA", "ADMIN");
    let (response, mail) = handlers::submit_inquiry(
        store,
        &test_signer(),
        &test_inquiry_config(),
        &inquiry_submission(),
        test_now(),
    )
    .unwrap();
    (response.inquiry_id, mail)
}

#[test]
fn test_submit_routes_review_mail_to_admin() {
    let mut store: Persistence = create_test_store();
    let (inquiry_id, mail) = seed_inquiry(&mut store);

    assert!(inquiry_id > 0);
    assert_eq!(mail.to, "anita@admast.example");
    assert!(
        mail.body
            .contains(&format!("https://admast.example/discount-review/{inquiry_id}?token="))
    );

    assert!(mail.body.contains("Requested discount: 10%"));

    let token: String = extract_token(&mail);
    let review = handlers::review_inquiry(&mut store, inquiry_id, &token, test_now()).unwrap();
    assert_eq!(review.inquiry.status, "PENDING");
    assert_eq!(review.inquiry.base_total, 100_000);
    assert_eq!(review.inquiry.requested_discount, Some(10.0));
}

#[test]
fn test_review_with_wrong_token_is_rejected_without_detail() {
    let mut store: Persistence = create_test_store();
    let (inquiry_id, mail) = seed_inquiry(&mut store);

    let result = handlers::review_inquiry(&mut store, inquiry_id, "not-a-token", test_now());
    assert_eq!(result.unwrap_err(), ApiError::AccessLinkRejected);

    // Valid token bound to a different inquiry
    let token: String = extract_token(&mail);
    let result = handlers::review_inquiry(&mut store, 999, &token, test_now());
    assert_eq!(result.unwrap_err(), ApiError::AccessLinkRejected);
}

#[test]
fn test_resolve_validates_decision_shape() {
    let mut store: Persistence = create_test_store();
    let (inquiry_id, mail) = seed_inquiry(&mut store);
    let token: String = extract_token(&mail);
    let code: String = extract_code(&mail);

    let missing_percent = ResolveInquiryRequest {
        decision: String::from("approve"),
        percent: None,
        code: Some(code.clone()),
    };
    let result =
        handlers::resolve_inquiry(&mut store, inquiry_id, &token, &missing_percent, test_now());
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "percent"
    ));

    let missing_code = ResolveInquiryRequest {
        decision: String::from("approve"),
        percent: Some(15.0),
        code: None,
    };
    let result =
        handlers::resolve_inquiry(&mut store, inquiry_id, &token, &missing_code, test_now());
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "code"
    ));

    let unknown = ResolveInquiryRequest {
        decision: String::from("defer"),
        percent: None,
        code: None,
    };
    let result = handlers::resolve_inquiry(&mut store, inquiry_id, &token, &unknown, test_now());
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "decision"
    ));
}

#[test]
fn test_approve_flow_end_to_end() {
    let mut store: Persistence = create_test_store();
    let (inquiry_id, mail) = seed_inquiry(&mut store);
    let token: String = extract_token(&mail);
    let code: String = extract_code(&mail);

    let request = ResolveInquiryRequest {
        decision: String::from("approve"),
        percent: Some(15.0),
        code: Some(code),
    };
    let (response, outcome_mail) =
        handlers::resolve_inquiry(&mut store, inquiry_id, &token, &request, test_now()).unwrap();

    assert_eq!(response.inquiry.status, "APPROVED");
    assert_eq!(response.inquiry.discount_percent, Some(15.0));
    assert_eq!(response.inquiry.discount_amount, Some(15_000));
    assert_eq!(response.inquiry.final_total, Some(85_000));
    assert_eq!(outcome_mail.to, "buyer@acme.example");
}

#[test]
fn test_wrong_code_translates_to_rule_violation() {
    let mut store: Persistence = create_test_store();
    let (inquiry_id, mail) = seed_inquiry(&mut store);
    let token: String = extract_token(&mail);
    let code: String = extract_code(&mail);
    let wrong: String = if code == "000000" {
        String::from("000001")
    } else {
        String::from("000000")
    };

    let request = ResolveInquiryRequest {
        decision: String::from("approve"),
        percent: Some(15.0),
        code: Some(wrong),
    };
    let result = handlers::resolve_inquiry(&mut store, inquiry_id, &token, &request, test_now());
    assert!(matches!(
        result,
        Err(ApiError::RuleViolation { ref rule, .. }) if rule == "approval_code_invalid"
    ));
}

#[test]
fn test_second_resolution_reports_already_resolved() {
    let mut store: Persistence = create_test_store();
    let (inquiry_id, mail) = seed_inquiry(&mut store);
    let token: String = extract_token(&mail);

    let reject = ResolveInquiryRequest {
        decision: String::from("reject"),
        percent: None,
        code: None,
    };
    let (response, _mail) =
        handlers::resolve_inquiry(&mut store, inquiry_id, &token, &reject, test_now()).unwrap();
    assert_eq!(response.inquiry.status, "REJECTED");

    let result = handlers::resolve_inquiry(&mut store, inquiry_id, &token, &reject, test_now());
    assert!(matches!(
        result,
        Err(ApiError::RuleViolation { ref rule, .. }) if rule == "inquiry_already_resolved"
    ));

    // Even an approval with an out-of-range percentage reports the
    // terminal state, not an input complaint
    let bad_approve = ResolveInquiryRequest {
        decision: String::from("approve"),
        percent: Some(200.0),
        code: Some(String::from("000000")),
    };
    let result = handlers::resolve_inquiry(&mut store, inquiry_id, &token, &bad_approve, test_now());
    assert!(matches!(
        result,
        Err(ApiError::RuleViolation { ref rule, .. }) if rule == "inquiry_already_resolved"
    ));
}

#[test]
fn test_list_inquiries_filters_by_status() {
    let mut store: Persistence = create_test_store();
    let (first, mail) = seed_inquiry(&mut store);
    let token: String = extract_token(&mail);
    let reject = ResolveInquiryRequest {
        decision: String::from("reject"),
        percent: None,
        code: None,
    };
    handlers::resolve_inquiry(&mut store, first, &token, &reject, test_now()).unwrap();

    let (second, _mail) = handlers::submit_inquiry(
        &mut store,
        &test_signer(),
        &test_inquiry_config(),
        &inquiry_submission(),
        test_now(),
    )
    .map(|(response, mail)| (response.inquiry_id, mail))
    .unwrap();

    let admin: OperatorData = store.get_operator_by_login("ANITA").unwrap().unwrap();
    let actor = actor_for(&admin);

    let all = handlers::list_inquiries(&mut store, &actor, None).unwrap();
    assert_eq!(all.inquiries.len(), 2);

    let pending = handlers::list_inquiries(&mut store, &actor, Some("PENDING")).unwrap();
    assert_eq!(pending.inquiries.len(), 1);
    assert_eq!(pending.inquiries[0].inquiry_id, Some(second));

    let result = handlers::list_inquiries(&mut store, &actor, Some("STALLED"));
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

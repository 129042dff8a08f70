// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admast_domain::InquiryStatus;
use admast_persistence::Persistence;

use crate::error::CoreError;
use crate::inquiry::{
    CartLine, CreatedInquiry, InquiryConfig, InquiryRequest, ResolutionAction, create_inquiry,
    fetch_for_review, list_inquiries, resolve_inquiry,
};
use crate::tests::{create_test_store, extract_code, extract_token, seed_operator, test_now};
use crate::token::TokenSigner;

fn test_signer() -> TokenSigner {
    TokenSigner::new("test-secret")
}

fn test_config() -> InquiryConfig {
    InquiryConfig {
        base_url: String::from("https://admast.example"),
        fallback_approver: None,
    }
}

fn inquiry_request() -> InquiryRequest {
    InquiryRequest {
        client_name: String::from("Acme Traders"),
        client_email: String::from("buyer@acme.example"),
        client_phone: None,
        company_name: None,
        notes: Some(String::from("Repeat customer, expects a better rate")),
        cart: vec![
            CartLine {
                unit_code: String::from("CHD-001"),
                outlet_name: String::from("Sector 17 Gantry"),
                rate: 60_000,
            },
            CartLine {
                unit_code: String::from("CHD-002"),
                outlet_name: String::from("Airport Road Hoarding"),
                rate: 40_000,
            },
        ],
        base_total: 100_000,
        requested_discount: Some(12.5),
    }
}

/// Seeds an admin and creates a pending inquiry, returning it with the
/// review mail still attached.
fn seed_inquiry(store: &mut Persistence) -> CreatedInquiry {
    seed_operator(store, "ANITA", "ADMIN");
    create_inquiry(
        store,
        &test_signer(),
        &test_config(),
        &inquiry_request(),
        test_now(),
    )
    .unwrap()
}

#[test]
fn test_create_routes_to_super_admin_over_admin() {
    let mut store: Persistence = create_test_store();
    seed_operator(&mut store, "ANITA", "ADMIN");
    let super_admin: String = seed_operator(&mut store, "RAVI", "SUPER_ADMIN");

    let created = create_inquiry(
        &mut store,
        &test_signer(),
        &test_config(),
        &inquiry_request(),
        test_now(),
    )
    .unwrap();

    assert_eq!(created.mail.to, super_admin);
    assert!(created.mail.body.contains(&format!(
        "https://admast.example/discount-review/{}?token=",
        created.inquiry_id
    )));
    assert!(created.mail.body.contains("Requested discount: 12.5%"));

    let stored = store.get_inquiry(created.inquiry_id).unwrap().unwrap();
    assert_eq!(stored.status, InquiryStatus::Pending);
    assert_eq!(stored.approved_by.as_deref(), Some(super_admin.as_str()));
    assert_eq!(stored.requested_discount, Some(12.5));
}

#[test]
fn test_create_uses_fallback_when_no_operators_exist() {
    let mut store: Persistence = create_test_store();

    let config = InquiryConfig {
        base_url: String::from("https://admast.example"),
        fallback_approver: Some(String::from("owner@admast.example")),
    };
    let created = create_inquiry(
        &mut store,
        &test_signer(),
        &config,
        &inquiry_request(),
        test_now(),
    )
    .unwrap();
    assert_eq!(created.mail.to, "owner@admast.example");
}

#[test]
fn test_create_fails_without_any_approver() {
    let mut store: Persistence = create_test_store();

    let result = create_inquiry(
        &mut store,
        &test_signer(),
        &test_config(),
        &inquiry_request(),
        test_now(),
    );
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[test]
fn test_create_rejects_empty_cart() {
    let mut store: Persistence = create_test_store();
    seed_operator(&mut store, "ANITA", "ADMIN");

    let mut request = inquiry_request();
    request.cart.clear();
    let result = create_inquiry(
        &mut store,
        &test_signer(),
        &test_config(),
        &request,
        test_now(),
    );
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[test]
fn test_fetch_for_review_is_idempotent() {
    let mut store: Persistence = create_test_store();
    let created = seed_inquiry(&mut store);
    let token: String = extract_token(&created.mail);

    let first = fetch_for_review(&mut store, created.inquiry_id, &token, test_now()).unwrap();
    let second = fetch_for_review(&mut store, created.inquiry_id, &token, test_now()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.status, InquiryStatus::Pending);
    assert_eq!(first.base_total, 100_000);
}

#[test]
fn test_fetch_rejects_bad_or_expired_tokens_identically() {
    let mut store: Persistence = create_test_store();
    let created = seed_inquiry(&mut store);
    let token: String = extract_token(&created.mail);

    // Wrong token
    let result = fetch_for_review(&mut store, created.inquiry_id, "not-a-token", test_now());
    assert!(matches!(result, Err(CoreError::Unauthorized)));

    // Right token, wrong inquiry
    let result = fetch_for_review(&mut store, 999, &token, test_now());
    assert!(matches!(result, Err(CoreError::Unauthorized)));

    // Right token, past its 24-hour life
    let late = test_now() + time::Duration::hours(25);
    let result = fetch_for_review(&mut store, created.inquiry_id, &token, late);
    assert!(matches!(result, Err(CoreError::Unauthorized)));
}

#[test]
fn test_approve_derives_exact_figures_and_notifies_requester() {
    let mut store: Persistence = create_test_store();
    let created = seed_inquiry(&mut store);
    let token: String = extract_token(&created.mail);
    let code: String = extract_code(&created.mail);

    let resolved = resolve_inquiry(
        &mut store,
        created.inquiry_id,
        &token,
        &ResolutionAction::Approve {
            percent: 15.0,
            code,
        },
        test_now(),
    )
    .unwrap();

    assert_eq!(resolved.inquiry.status, InquiryStatus::Approved);
    assert_eq!(resolved.inquiry.discount_percent, Some(15.0));
    assert_eq!(resolved.inquiry.discount_amount, Some(15_000));
    assert_eq!(resolved.inquiry.final_total, Some(85_000));
    assert_eq!(resolved.mail.to, "buyer@acme.example");
    assert!(resolved.mail.body.contains("85000"));
}

#[test]
fn test_second_resolution_reports_already_resolved() {
    let mut store: Persistence = create_test_store();
    let created = seed_inquiry(&mut store);
    let token: String = extract_token(&created.mail);
    let code: String = extract_code(&created.mail);

    resolve_inquiry(
        &mut store,
        created.inquiry_id,
        &token,
        &ResolutionAction::Approve {
            percent: 15.0,
            code,
        },
        test_now(),
    )
    .unwrap();

    let result = resolve_inquiry(
        &mut store,
        created.inquiry_id,
        &token,
        &ResolutionAction::Reject,
        test_now(),
    );
    assert!(matches!(result, Err(CoreError::AlreadyResolved)));
}

#[test]
fn test_resolved_inquiry_reports_already_resolved_before_argument_checks() {
    let mut store: Persistence = create_test_store();
    let created = seed_inquiry(&mut store);
    let token: String = extract_token(&created.mail);

    resolve_inquiry(
        &mut store,
        created.inquiry_id,
        &token,
        &ResolutionAction::Reject,
        test_now(),
    )
    .unwrap();

    // Even an approval with a wildly invalid percentage and a garbage
    // code answers AlreadyResolved, not a validation complaint
    let result = resolve_inquiry(
        &mut store,
        created.inquiry_id,
        &token,
        &ResolutionAction::Approve {
            percent: 200.0,
            code: String::from("000000"),
        },
        test_now(),
    );
    assert!(matches!(result, Err(CoreError::AlreadyResolved)));
}

#[test]
fn test_reject_needs_no_code() {
    let mut store: Persistence = create_test_store();
    let created = seed_inquiry(&mut store);
    let token: String = extract_token(&created.mail);

    let resolved = resolve_inquiry(
        &mut store,
        created.inquiry_id,
        &token,
        &ResolutionAction::Reject,
        test_now(),
    )
    .unwrap();

    assert_eq!(resolved.inquiry.status, InquiryStatus::Rejected);
    assert_eq!(resolved.inquiry.discount_percent, None);
    assert_eq!(resolved.mail.to, "buyer@acme.example");
}

#[test]
fn test_wrong_code_is_rejected_then_correct_code_works() {
    let mut store: Persistence = create_test_store();
    let created = seed_inquiry(&mut store);
    let token: String = extract_token(&created.mail);
    let code: String = extract_code(&created.mail);
    let wrong: String = if code == "000000" {
        String::from("000001")
    } else {
        String::from("000000")
    };

    let result = resolve_inquiry(
        &mut store,
        created.inquiry_id,
        &token,
        &ResolutionAction::Approve {
            percent: 15.0,
            code: wrong,
        },
        test_now(),
    );
    assert!(matches!(result, Err(CoreError::InvalidCode)));

    let stored = store.get_inquiry(created.inquiry_id).unwrap().unwrap();
    assert_eq!(stored.status, InquiryStatus::Pending);

    resolve_inquiry(
        &mut store,
        created.inquiry_id,
        &token,
        &ResolutionAction::Approve {
            percent: 15.0,
            code,
        },
        test_now(),
    )
    .unwrap();
}

#[test]
fn test_expired_code_fails_even_on_hash_match() {
    let mut store: Persistence = create_test_store();
    let created = seed_inquiry(&mut store);
    let token: String = extract_token(&created.mail);
    let code: String = extract_code(&created.mail);

    // The code lives ten minutes; the token is still good
    let late = test_now() + time::Duration::minutes(11);
    let result = resolve_inquiry(
        &mut store,
        created.inquiry_id,
        &token,
        &ResolutionAction::Approve {
            percent: 15.0,
            code,
        },
        late,
    );
    assert!(matches!(result, Err(CoreError::CodeExpired)));

    let stored = store.get_inquiry(created.inquiry_id).unwrap().unwrap();
    assert_eq!(stored.status, InquiryStatus::Pending);
}

#[test]
fn test_approve_rejects_out_of_range_percent() {
    let mut store: Persistence = create_test_store();
    let created = seed_inquiry(&mut store);
    let token: String = extract_token(&created.mail);
    let code: String = extract_code(&created.mail);

    for percent in [0.0, -5.0, 100.5] {
        let result = resolve_inquiry(
            &mut store,
            created.inquiry_id,
            &token,
            &ResolutionAction::Approve {
                percent,
                code: code.clone(),
            },
            test_now(),
        );
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }
}

#[test]
fn test_list_inquiries_filters_by_status() {
    let mut store: Persistence = create_test_store();
    let first = seed_inquiry(&mut store);
    let token: String = extract_token(&first.mail);
    resolve_inquiry(
        &mut store,
        first.inquiry_id,
        &token,
        &ResolutionAction::Reject,
        test_now(),
    )
    .unwrap();
    let second = create_inquiry(
        &mut store,
        &test_signer(),
        &test_config(),
        &inquiry_request(),
        test_now(),
    )
    .unwrap();

    let all = list_inquiries(&mut store, None).unwrap();
    assert_eq!(all.len(), 2);

    let pending = list_inquiries(&mut store, Some(InquiryStatus::Pending)).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].inquiry_id, Some(second.inquiry_id));
}

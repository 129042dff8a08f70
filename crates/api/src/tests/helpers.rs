// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use admast::{InquiryConfig, OutboundMail, TokenSigner};
use admast_domain::InventoryUnit;
use admast_persistence::{OperatorData, Persistence};

use crate::auth::{AuthenticatedActor, Role};

/// The password every seeded test operator carries.
pub const TEST_PASSWORD: &str = "Correct-Horse-42";

/// The standard rate every test unit carries, in whole currency units.
pub const TEST_RATE: i64 = 50_000;

/// Returns a fixed wall-clock instant so timestamps are deterministic.
pub fn test_now() -> time::OffsetDateTime {
    time::macros::datetime!(2026-03-01 12:00:00 UTC)
}

pub fn create_test_store() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

/// Creates an operator and returns its stored record.
pub fn seed_operator(store: &mut Persistence, login: &str, role: &str) -> OperatorData {
    let email: String = format!("{}@admast.example", login.to_lowercase());
    store
        .create_operator(login, login, &email, TEST_PASSWORD, role)
        .unwrap();
    store.get_operator_by_login(login).unwrap().unwrap()
}

/// Builds an authenticated actor from a stored operator.
pub fn actor_for(operator: &OperatorData) -> AuthenticatedActor {
    let role: Role = Role::parse(&operator.role).unwrap();
    AuthenticatedActor::new(operator.login_name.clone(), role)
}

/// Inserts a test unit and returns its persisted ID.
pub fn seed_unit(store: &mut Persistence, unit_code: &str) -> i64 {
    let mut unit: InventoryUnit = InventoryUnit::new(
        unit_code,
        String::from("Highway Gantry"),
        String::from("NH-44 near toll plaza"),
        String::from("Punjab"),
        String::from("Ludhiana"),
    );
    unit.discounted_rate = Some(TEST_RATE);
    store.insert_unit(&unit).unwrap()
}

/// Returns a token signer with a fixed test secret.
pub fn test_signer() -> TokenSigner {
    TokenSigner::new("test-secret")
}

/// Returns an inquiry config pointing at the test portal.
pub fn test_inquiry_config() -> InquiryConfig {
    InquiryConfig {
        base_url: String::from("https://admast.example"),
        fallback_approver: None,
    }
}

/// Pulls the plaintext approval code out of a review-request mail.
pub fn extract_code(mail: &OutboundMail) -> String {
    mail.body
        .lines()
        .find_map(|line| line.strip_prefix("Approval code (valid for 10 minutes): "))
        .map(str::trim)
        .map(String::from)
        .expect("Review mail carries the approval code")
}

/// Pulls the plaintext access token out of a review-request mail.
pub fn extract_token(mail: &OutboundMail) -> String {
    mail.body
        .lines()
        .find_map(|line| line.split_once("token=").map(|(_, token)| token.trim()))
        .map(String::from)
        .expect("Review mail carries the review link")
}

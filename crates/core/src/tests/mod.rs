// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod booking_tests;
mod inquiry_tests;

use admast_domain::InventoryUnit;
use admast_persistence::Persistence;

use crate::mail::OutboundMail;

/// The standard rate every test unit carries, in whole currency units.
pub const TEST_RATE: i64 = 50_000;

/// Returns a fixed wall-clock instant so timestamps are deterministic.
pub fn test_now() -> time::OffsetDateTime {
    time::macros::datetime!(2026-03-01 12:00:00 UTC)
}

pub fn create_test_store() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

pub fn create_test_unit(unit_code: &str) -> InventoryUnit {
    let mut unit: InventoryUnit = InventoryUnit::new(
        unit_code,
        String::from("Highway Gantry"),
        String::from("NH-44 near toll plaza"),
        String::from("Punjab"),
        String::from("Ludhiana"),
    );
    unit.discounted_rate = Some(TEST_RATE);
    unit
}

/// Inserts a test unit and returns its persisted ID.
pub fn seed_unit(store: &mut Persistence, unit_code: &str) -> i64 {
    store.insert_unit(&create_test_unit(unit_code)).unwrap()
}

/// Creates an operator and returns its email address.
pub fn seed_operator(store: &mut Persistence, login: &str, role: &str) -> String {
    let email: String = format!("{}@admast.example", login.to_lowercase());
    store
        .create_operator(
            login,
            login,
            &email,
            "correct horse battery staple",
            role,
        )
        .unwrap();
    email
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

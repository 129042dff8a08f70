// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Access tokens and one-time approval codes for the discount workflow.
//!
//! The review token is an HMAC-SHA256 tag over
//! `(inquiry_id, approver_email, expires_at)` keyed with a server
//! secret, so a token is bound to exactly one inquiry and one approver
//! and cannot be minted without the secret. Only the SHA-256 hash of the
//! issued token is ever stored; the plaintext exists solely in the
//! review link that is mailed out.
//!
//! Approval codes are 6-digit numerics hashed with bcrypt before
//! storage, verified inside the resolution transaction.

use hmac::{Hmac, Mac};
use rand::RngExt;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Environment variable holding the token-signing secret.
pub const TOKEN_SECRET_ENV: &str = "ADMAST_TOKEN_SECRET";

/// How long a review token stays valid.
pub const TOKEN_TTL: time::Duration = time::Duration::hours(24);

/// How long an approval code stays valid.
pub const CODE_TTL: time::Duration = time::Duration::minutes(10);

/// Errors that can occur while issuing tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The signing key was rejected by the MAC implementation.
    #[error("Token secret rejected: {0}")]
    InvalidSecret(String),
}

/// Issues and verifies review-link access tokens.
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl TokenSigner {
    /// Creates a signer from an explicit secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    /// Creates a signer from the `ADMAST_TOKEN_SECRET` environment
    /// variable. Returns `None` when the variable is unset or empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        match std::env::var(TOKEN_SECRET_ENV) {
            Ok(secret) if !secret.trim().is_empty() => Some(Self::new(&secret)),
            _ => None,
        }
    }

    /// Issues the token for an inquiry's review link.
    ///
    /// The tag covers the inquiry ID, the approver's email, and the
    /// expiry timestamp, so none of the three can be swapped without
    /// invalidating the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is rejected by the MAC
    /// implementation.
    pub fn issue(
        &self,
        inquiry_id: i64,
        approver_email: &str,
        expires_at: &str,
    ) -> Result<String, TokenError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.secret)
            .map_err(|e| TokenError::InvalidSecret(e.to_string()))?;
        mac.update(format!("{inquiry_id}:{approver_email}:{expires_at}").as_bytes());
        Ok(hex_encode(&mac.finalize().into_bytes()))
    }
}

/// Computes the lowercase hex SHA-256 digest of a value.
///
/// This is the form in which issued tokens are stored and compared.
#[must_use]
pub fn sha256_hex(value: &str) -> String {
    let hash = Sha256::digest(value.as_bytes());
    format!("{hash:x}")
}

/// Checks a presented token against a stored hex SHA-256 digest in
/// constant time.
///
/// This is the sole credential check reachable without a session, so
/// the comparison must not leak how many digest bytes matched.
#[must_use]
pub fn token_matches(token: &str, stored_hex: &str) -> bool {
    constant_time_eq(sha256_hex(token).as_bytes(), stored_hex.as_bytes())
}

/// Compares two byte strings without short-circuiting on the first
/// mismatch. Lengths are public (digests are fixed-size), so an early
/// return on length is fine.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Generates a random 6-digit approval code, zero-padded.
#[must_use]
pub fn generate_code() -> String {
    let code: u32 = rand::rng().random_range(0..1_000_000);
    format!("{code:06}")
}

/// Encodes bytes as lowercase hex.
fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        // Writing to a String cannot fail
        let _ = write!(out, "{b:02x}");
    }
    out
}

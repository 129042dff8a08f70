// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Stored representation of an operator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorData {
    pub operator_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_disabled: bool,
    pub created_at: String,
    pub disabled_at: Option<String>,
    pub last_login_at: Option<String>,
}

/// Stored representation of an operator session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub operator_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// Token-verification material for a discount inquiry.
///
/// Only the SHA-256 hash of the issued access token is stored; the
/// plaintext token exists solely in the review link that was mailed out.
/// The fields are `None` for the brief window between inquiry creation
/// and token issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InquiryAuthData {
    pub inquiry_id: i64,
    pub token_hash: Option<String>,
    pub token_expires_at: Option<String>,
}

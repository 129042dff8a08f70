// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the AdMast CRM.
//!
//! This crate sits between the HTTP server and the engines: it owns
//! session authentication, role-based authorization, the wire DTOs,
//! CSV parsing for inventory uploads, and the translation of engine
//! errors into the API error contract. Handlers never deliver mail
//! themselves; outbound messages are returned as values for the server
//! to send after commit.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod csv_import;
mod error;
pub mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
pub use csv_import::{parse_price_rows, parse_unit_rows};
pub use error::{ApiError, AuthError, translate_core_error};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    ActivityInfo, AddCampaignItemsRequest, CampaignChangeResponse, CampaignItemInfo,
    CartLineInfo, ChangePasswordRequest, CreateOperatorRequest, CreateOperatorResponse,
    CsvRowError, ImportUnitsResponse, InquiryInfo, InquiryResponse, InquirySubmission,
    LeadDetailResponse, LeadInfo, ListInquiriesResponse, ListLeadsResponse, ListOperatorsResponse,
    ListUnitsQuery, ListUnitsResponse, LoginRequest, LoginResponse, MessageResponse, OperatorInfo,
    QuoteResponse, QuoteSubmission, ResetPasswordRequest, ResolveInquiryRequest,
    ResolveInquiryResponse, ReviewInquiryResponse, SetTimelineRequest, SetTimelineResponse,
    TimelineResponse, UnitInfo, UpdateLeadRequest, UpdateLeadResponse, UpdatePricesResponse,
    WhoAmIResponse,
};

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response DTOs for the API boundary.
//!
//! These types are distinct from domain types and represent the wire
//! contract. Conversions into and out of domain types live here so the
//! handlers stay focused on orchestration.

use serde::{Deserialize, Serialize};

use admast_audit::ActivityEvent;
use admast_domain::{CampaignItem, DiscountInquiry, InventoryUnit, Lead};
use admast_persistence::{InventoryFilter, OperatorData};

// ---------------------------------------------------------------------------
// Sessions and operators
// ---------------------------------------------------------------------------

/// Request to log in as an operator.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// The operator's login name.
    pub login_name: String,
    /// The operator's password.
    pub password: String,
}

/// Response for a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// The session token to present on subsequent requests.
    pub session_token: String,
    /// The logged-in operator.
    pub operator: OperatorInfo,
}

/// Response describing the operator behind a session.
#[derive(Debug, Clone, Serialize)]
pub struct WhoAmIResponse {
    /// The authenticated operator.
    pub operator: OperatorInfo,
}

/// Operator information for responses.
///
/// Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorInfo {
    /// The operator's canonical ID.
    pub operator_id: i64,
    /// The operator's login name.
    pub login_name: String,
    /// The operator's display name.
    pub display_name: String,
    /// The operator's email address.
    pub email: String,
    /// The operator's role string.
    pub role: String,
    /// Whether the account is disabled.
    pub is_disabled: bool,
    /// When the account was created (ISO 8601).
    pub created_at: String,
    /// When the operator last logged in, if ever (ISO 8601).
    pub last_login_at: Option<String>,
}

impl From<OperatorData> for OperatorInfo {
    fn from(operator: OperatorData) -> Self {
        Self {
            operator_id: operator.operator_id,
            login_name: operator.login_name,
            display_name: operator.display_name,
            email: operator.email,
            role: operator.role,
            is_disabled: operator.is_disabled,
            created_at: operator.created_at,
            last_login_at: operator.last_login_at,
        }
    }
}

/// Request to create a new operator account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOperatorRequest {
    /// The new operator's login name.
    pub login_name: String,
    /// The new operator's display name.
    pub display_name: String,
    /// The new operator's email address.
    pub email: String,
    /// The new operator's password.
    pub password: String,
    /// Confirmation of the password.
    pub password_confirmation: String,
    /// The role string to assign.
    pub role: String,
}

/// Response for a successful operator creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOperatorResponse {
    /// The new operator's canonical ID.
    pub operator_id: i64,
    /// A success message.
    pub message: String,
}

/// Request for an operator to change their own password.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    /// The operator's current password.
    pub current_password: String,
    /// The new password.
    pub new_password: String,
    /// Confirmation of the new password.
    pub new_password_confirmation: String,
}

/// Request for a super admin to reset another operator's password.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    /// The login name of the operator to reset.
    pub login_name: String,
    /// The new password.
    pub new_password: String,
    /// Confirmation of the new password.
    pub new_password_confirmation: String,
}

/// Response carrying only a success message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// A success message.
    pub message: String,
}

/// Response listing all operators.
#[derive(Debug, Clone, Serialize)]
pub struct ListOperatorsResponse {
    /// All operator accounts, including disabled ones.
    pub operators: Vec<OperatorInfo>,
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Query parameters for listing inventory units.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUnitsQuery {
    /// Restrict to a state, when set.
    pub state: Option<String>,
    /// Restrict to a district, when set.
    pub district: Option<String>,
    /// Include archived units.
    #[serde(default)]
    pub include_inactive: bool,
    /// Include units currently held by a lead.
    #[serde(default)]
    pub include_booked: bool,
    /// Maximum number of rows returned.
    pub limit: Option<i64>,
}

impl ListUnitsQuery {
    /// Converts the query into a persistence filter.
    #[must_use]
    pub fn into_filter(self) -> InventoryFilter {
        let defaults: InventoryFilter = InventoryFilter::default();
        InventoryFilter {
            include_inactive: self.include_inactive,
            include_booked: self.include_booked,
            state: self.state,
            district: self.district,
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }
}

/// Inventory unit information for responses.
#[derive(Debug, Clone, Serialize)]
pub struct UnitInfo {
    /// The unit's canonical ID.
    pub unit_id: Option<i64>,
    /// The inventory code.
    pub unit_code: String,
    /// The outlet or site name.
    pub outlet_name: String,
    /// Free-form location description.
    pub location_name: String,
    /// The state the unit is located in.
    pub state: String,
    /// The district the unit is located in.
    pub district: String,
    /// Optional city, where it differs from the district.
    pub city: Option<String>,
    /// Display width in feet.
    pub width_ft: Option<f64>,
    /// Display height in feet.
    pub height_ft: Option<f64>,
    /// Rate per square foot in whole currency units.
    pub rate_per_sqft: Option<i64>,
    /// Negotiated rate in whole currency units, when one applies.
    pub discounted_rate: Option<i64>,
    /// Printing charge in whole currency units.
    pub printing_charge: Option<i64>,
    /// Installation charge in whole currency units.
    pub installation_charge: Option<i64>,
    /// The rate campaign items are priced at.
    pub effective_rate: i64,
    /// Whether the unit is part of the active catalogue.
    pub is_active: bool,
    /// Current availability state string.
    pub availability_status: String,
    /// The lead currently holding this unit, when booked.
    pub current_lead_id: Option<i64>,
    /// When the current hold was taken (ISO 8601).
    pub booked_at: Option<String>,
}

impl From<InventoryUnit> for UnitInfo {
    fn from(unit: InventoryUnit) -> Self {
        let effective_rate: i64 = unit.effective_rate();
        Self {
            unit_id: unit.unit_id,
            unit_code: unit.unit_code,
            outlet_name: unit.outlet_name,
            location_name: unit.location_name,
            state: unit.state,
            district: unit.district,
            city: unit.city,
            width_ft: unit.width_ft,
            height_ft: unit.height_ft,
            rate_per_sqft: unit.rate_per_sqft,
            discounted_rate: unit.discounted_rate,
            printing_charge: unit.printing_charge,
            installation_charge: unit.installation_charge,
            effective_rate,
            is_active: unit.is_active,
            availability_status: unit.availability_status.as_str().to_string(),
            current_lead_id: unit.current_lead_id,
            booked_at: unit.booked_at,
        }
    }
}

/// Response listing inventory units.
#[derive(Debug, Clone, Serialize)]
pub struct ListUnitsResponse {
    /// The matching units.
    pub units: Vec<UnitInfo>,
}

/// Response for an inventory CSV import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportUnitsResponse {
    /// Units created by the import.
    pub created: usize,
    /// Units updated in place by the import.
    pub updated: usize,
    /// Rows that could not be parsed, with their line numbers.
    pub errors: Vec<CsvRowError>,
}

/// Response for a bulk price update from CSV.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePricesResponse {
    /// Units whose price was updated.
    pub updated: usize,
    /// Inventory codes that matched no unit.
    pub missing: Vec<String>,
    /// Rows that could not be parsed, with their line numbers.
    pub errors: Vec<CsvRowError>,
}

/// A CSV row that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvRowError {
    /// The 1-based line number of the offending row.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Leads and campaigns
// ---------------------------------------------------------------------------

/// A website quote submission.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSubmission {
    /// The client's name.
    pub client_name: String,
    /// The client's email address.
    pub email: Option<String>,
    /// The client's phone number.
    pub phone: Option<String>,
    /// The client's company, when given.
    pub company_name: Option<String>,
    /// Where the submission came from.
    pub source: String,
    /// Free-form message attached to the submission.
    pub notes: Option<String>,
    /// The inventory units in the client's cart.
    #[serde(default)]
    pub unit_ids: Vec<i64>,
}

/// Response for a successful quote submission.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    /// The created lead's canonical ID.
    pub lead_id: i64,
    /// A success message.
    pub message: String,
}

/// Lead information for responses.
#[derive(Debug, Clone, Serialize)]
pub struct LeadInfo {
    /// The lead's canonical ID.
    pub lead_id: Option<i64>,
    /// The client's name.
    pub client_name: String,
    /// The client's email address.
    pub email: Option<String>,
    /// The client's phone number.
    pub phone: Option<String>,
    /// The client's company, when given.
    pub company_name: Option<String>,
    /// Where the lead came from.
    pub source: String,
    /// Current pipeline status string.
    pub status: String,
    /// Free-form sales notes.
    pub notes: Option<String>,
    /// Sum of campaign item totals in whole currency units.
    pub base_total: i64,
    /// Discount percentage applied, when any.
    pub discount_percent_applied: Option<f64>,
    /// Derived discount amount in whole currency units.
    pub discount_amount: Option<i64>,
    /// Base total less discount, in whole currency units.
    pub final_total: i64,
    /// The operator the lead is assigned to.
    pub assigned_to_id: Option<i64>,
    /// Snapshot of the salesperson who worked the lead.
    pub sales_user_id: Option<i64>,
    /// The finance operator the lead was handed to.
    pub finance_user_id: Option<i64>,
    /// The operations operator the lead was handed to.
    pub ops_user_id: Option<i64>,
}

impl From<Lead> for LeadInfo {
    fn from(lead: Lead) -> Self {
        Self {
            lead_id: lead.lead_id,
            client_name: lead.client_name,
            email: lead.email,
            phone: lead.phone,
            company_name: lead.company_name,
            source: lead.source,
            status: lead.status.as_str().to_string(),
            notes: lead.notes,
            base_total: lead.base_total,
            discount_percent_applied: lead.discount_percent_applied,
            discount_amount: lead.discount_amount,
            final_total: lead.final_total,
            assigned_to_id: lead.assigned_to_id,
            sales_user_id: lead.sales_user_id,
            finance_user_id: lead.finance_user_id,
            ops_user_id: lead.ops_user_id,
        }
    }
}

/// Response listing leads.
#[derive(Debug, Clone, Serialize)]
pub struct ListLeadsResponse {
    /// The matching leads, newest first.
    pub leads: Vec<LeadInfo>,
}

/// Request to update a lead.
///
/// Every field is optional; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLeadRequest {
    /// New pipeline status string, when changing.
    pub status: Option<String>,
    /// New discount percentage; zero clears any discount.
    pub discount_percent: Option<f64>,
    /// Replacement sales notes.
    pub notes: Option<String>,
    /// A dated remark to append to the activity log.
    pub remark: Option<String>,
    /// Operator to assign the lead to.
    pub assigned_to_id: Option<i64>,
    /// Finance operator to hand the lead to.
    pub finance_user_id: Option<i64>,
    /// Operations operator to hand the lead to.
    pub ops_user_id: Option<i64>,
}

/// Response for a successful lead update.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateLeadResponse {
    /// The lead after the update.
    pub lead: LeadInfo,
}

/// Request to attach inventory units to a lead's campaign.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCampaignItemsRequest {
    /// The units to attach.
    pub unit_ids: Vec<i64>,
}

/// Response for a campaign edit, carrying the recomputed totals.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignChangeResponse {
    /// Items attached or removed.
    pub affected: usize,
    /// The lead's recomputed base total.
    pub base_total: i64,
    /// The lead's recomputed final total.
    pub final_total: i64,
}

/// Request to assign a booking window to campaign items.
#[derive(Debug, Clone, Deserialize)]
pub struct SetTimelineRequest {
    /// The units whose items receive the window.
    pub unit_ids: Vec<i64>,
    /// First booked day (YYYY-MM-DD).
    pub start_date: String,
    /// Last booked day, inclusive (YYYY-MM-DD).
    pub end_date: String,
}

/// Response for a successful timeline assignment.
#[derive(Debug, Clone, Serialize)]
pub struct SetTimelineResponse {
    /// Campaign items that received the window.
    pub items_updated: usize,
}

/// Campaign item information for responses.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignItemInfo {
    /// The item's canonical ID.
    pub item_id: Option<i64>,
    /// The inventory unit the item books.
    pub unit_id: i64,
    /// The rate the item was priced at.
    pub rate: i64,
    /// The printing charge the item was priced at.
    pub printing_charge: i64,
    /// The item total in whole currency units.
    pub total: i64,
    /// First booked day, when a window is assigned.
    pub booking_start_date: Option<String>,
    /// Last booked day, when a window is assigned.
    pub booking_end_date: Option<String>,
}

impl From<CampaignItem> for CampaignItemInfo {
    fn from(item: CampaignItem) -> Self {
        Self {
            item_id: item.item_id,
            unit_id: item.unit_id,
            rate: item.rate,
            printing_charge: item.printing_charge,
            total: item.total,
            booking_start_date: item.booking_start_date,
            booking_end_date: item.booking_end_date,
        }
    }
}

/// Activity log entry for responses.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityInfo {
    /// The event's canonical ID.
    pub event_id: Option<i64>,
    /// Who performed the action.
    pub actor_id: String,
    /// What kind of actor performed it.
    pub actor_type: String,
    /// The action string.
    pub action: String,
    /// Free-form detail attached to the event.
    pub details: Option<String>,
    /// When the event was recorded (ISO 8601).
    pub created_at: Option<String>,
}

impl From<ActivityEvent> for ActivityInfo {
    fn from(event: ActivityEvent) -> Self {
        Self {
            event_id: event.event_id,
            actor_id: event.actor.id,
            actor_type: event.actor.actor_type,
            action: event.action.as_str().to_string(),
            details: event.details,
            created_at: event.created_at,
        }
    }
}

/// Full lead detail: the lead, its campaign, the booked units, and the
/// activity trail.
#[derive(Debug, Clone, Serialize)]
pub struct LeadDetailResponse {
    /// The lead itself.
    pub lead: LeadInfo,
    /// The campaign items attached to the lead.
    pub items: Vec<CampaignItemInfo>,
    /// The inventory units behind those items.
    pub units: Vec<UnitInfo>,
    /// The activity log, oldest first.
    pub activity: Vec<ActivityInfo>,
}

/// Response listing a lead's campaign items with their windows.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineResponse {
    /// The campaign items, oldest first.
    pub items: Vec<CampaignItemInfo>,
}

// ---------------------------------------------------------------------------
// Discount inquiries
// ---------------------------------------------------------------------------

/// A website discount request submission.
#[derive(Debug, Clone, Deserialize)]
pub struct InquirySubmission {
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
    /// The inventory units the request covers.
    pub cart: Vec<CartLineInfo>,
    /// Undiscounted total of the cart, in whole currency units.
    pub base_total: i64,
    /// The discount percentage the client is asking for, when stated.
    pub expected_discount: Option<f64>,
}

/// One line of a discount request's cart.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CartLineInfo {
    /// The inventory code of the requested unit.
    pub unit_code: String,
    /// The outlet name shown to the client.
    pub outlet_name: String,
    /// The quoted rate in whole currency units.
    pub rate: i64,
}

/// Response for a successful discount request submission.
#[derive(Debug, Clone, Serialize)]
pub struct InquiryResponse {
    /// The created inquiry's canonical ID.
    pub inquiry_id: i64,
    /// A success message.
    pub message: String,
}

/// Discount inquiry information for responses.
#[derive(Debug, Clone, Serialize)]
pub struct InquiryInfo {
    /// The inquiry's canonical ID.
    pub inquiry_id: Option<i64>,
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
    /// JSON snapshot of the requested inventory units.
    pub cart_snapshot: String,
    /// Undiscounted total of the snapshotted cart.
    pub base_total: i64,
    /// The discount percentage the client asked for, when stated.
    pub requested_discount: Option<f64>,
    /// Current resolution state string.
    pub status: String,
    /// Approved discount percentage, once resolved.
    pub discount_percent: Option<f64>,
    /// Derived discount amount, once resolved.
    pub discount_amount: Option<i64>,
    /// Base total less discount, once resolved.
    pub final_total: Option<i64>,
    /// Email of the approver the review link was issued to.
    pub approved_by: Option<String>,
    /// When the inquiry reached a terminal state (ISO 8601).
    pub resolved_at: Option<String>,
}

impl From<DiscountInquiry> for InquiryInfo {
    fn from(inquiry: DiscountInquiry) -> Self {
        Self {
            inquiry_id: inquiry.inquiry_id,
            client_name: inquiry.client_name,
            client_email: inquiry.client_email,
            client_phone: inquiry.client_phone,
            company_name: inquiry.company_name,
            notes: inquiry.notes,
            cart_snapshot: inquiry.cart_snapshot,
            base_total: inquiry.base_total,
            requested_discount: inquiry.requested_discount,
            status: inquiry.status.as_str().to_string(),
            discount_percent: inquiry.discount_percent,
            discount_amount: inquiry.discount_amount,
            final_total: inquiry.final_total,
            approved_by: inquiry.approved_by,
            resolved_at: inquiry.resolved_at,
        }
    }
}

/// Response for a token-gated inquiry review fetch.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewInquiryResponse {
    /// The inquiry under review.
    pub inquiry: InquiryInfo,
}

/// Request to resolve a discount inquiry.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveInquiryRequest {
    /// The decision: `"approve"` or `"reject"`.
    pub decision: String,
    /// The discount percentage, required when approving.
    pub percent: Option<f64>,
    /// The emailed approval code, required when approving.
    pub code: Option<String>,
}

/// Response for a successful inquiry resolution.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveInquiryResponse {
    /// The inquiry after resolution.
    pub inquiry: InquiryInfo,
    /// A success message.
    pub message: String,
}

/// Response listing discount inquiries.
#[derive(Debug, Clone, Serialize)]
pub struct ListInquiriesResponse {
    /// The matching inquiries, newest first.
    pub inquiries: Vec<InquiryInfo>,
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers authorize the actor, translate DTOs into core types, run
//! the engine, and translate results and errors back to the wire
//! contract. Outbound mail is returned as values; the server layer is
//! responsible for delivery after the transaction has committed.

use std::str::FromStr;
use time::OffsetDateTime;
use tracing::info;

use admast::{
    CartLine, InquiryConfig, InquiryRequest, LeadUpdate, OutboundMail, QuoteRequest,
    ResolutionAction, TokenSigner,
};
use admast_audit::Actor;
use admast_domain::{InquiryStatus, LeadStatus};
use admast_persistence::{OperatorData, Persistence};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::csv_import::{parse_price_rows, parse_unit_rows};
use crate::error::{ApiError, translate_core_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    ActivityInfo, AddCampaignItemsRequest, CampaignChangeResponse, CampaignItemInfo,
    ChangePasswordRequest,
    CreateOperatorRequest, CreateOperatorResponse, ImportUnitsResponse, InquiryInfo,
    InquiryResponse, InquirySubmission, LeadDetailResponse, LeadInfo, ListInquiriesResponse,
    ListLeadsResponse, ListOperatorsResponse, ListUnitsQuery, ListUnitsResponse, LoginRequest,
    LoginResponse, MessageResponse, OperatorInfo, QuoteResponse, QuoteSubmission,
    ResetPasswordRequest, ResolveInquiryRequest, ResolveInquiryResponse, ReviewInquiryResponse,
    SetTimelineRequest, SetTimelineResponse, TimelineResponse, UnitInfo, UpdateLeadRequest,
    UpdateLeadResponse, UpdatePricesResponse, WhoAmIResponse,
};

// ---------------------------------------------------------------------------
// Sessions and operators
// ---------------------------------------------------------------------------

/// Logs an operator in and opens a session.
///
/// # Errors
///
/// Returns an error if the credentials are wrong or the operator is
/// disabled.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    now: OffsetDateTime,
) -> Result<LoginResponse, ApiError> {
    let (session_token, _actor, operator) = AuthenticationService::login(
        persistence,
        &request.login_name,
        &request.password,
        now,
    )?;

    Ok(LoginResponse {
        session_token,
        operator: OperatorInfo::from(operator),
    })
}

/// Closes the presented session.
///
/// # Errors
///
/// Returns an error if the session deletion fails.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<MessageResponse, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(MessageResponse {
        message: String::from("Logged out"),
    })
}

/// Describes the operator behind the presented session.
#[must_use]
pub fn whoami(operator: &OperatorData) -> WhoAmIResponse {
    WhoAmIResponse {
        operator: OperatorInfo::from(operator.clone()),
    }
}

/// Creates a new operator account.
///
/// # Errors
///
/// Returns an error if the actor is not a super admin, the role string
/// is invalid, or the password fails policy.
pub fn create_operator(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateOperatorRequest,
) -> Result<CreateOperatorResponse, ApiError> {
    AuthorizationService::authorize_manage_operators(actor)?;

    let role = crate::auth::Role::parse(&request.role).map_err(|_| ApiError::InvalidInput {
        field: String::from("role"),
        message: format!("Unknown role: {}", request.role),
    })?;

    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &[
            ("login_name", &request.login_name),
            ("display_name", &request.display_name),
            ("email", &request.email),
        ],
    )?;

    let operator_id: i64 = persistence
        .create_operator(
            &request.login_name,
            &request.display_name,
            &request.email,
            &request.password,
            role.as_str(),
        )
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to create operator: {e}"),
        })?;

    info!(
        login_name = request.login_name,
        role = role.as_str(),
        "Operator created"
    );

    Ok(CreateOperatorResponse {
        operator_id,
        message: format!("Created operator '{}'", request.login_name),
    })
}

/// Lists all operator accounts.
///
/// # Errors
///
/// Returns an error if the actor is not a super admin.
pub fn list_operators(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListOperatorsResponse, ApiError> {
    AuthorizationService::authorize_manage_operators(actor)?;

    let operators = persistence
        .list_operators()
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to list operators: {e}"),
        })?;

    Ok(ListOperatorsResponse {
        operators: operators.into_iter().map(OperatorInfo::from).collect(),
    })
}

/// Disables an operator account, ending its ability to log in.
///
/// An operator may not disable their own account.
///
/// # Errors
///
/// Returns an error if the actor is not a super admin, the target is
/// unknown, or the target is the actor themself.
pub fn disable_operator(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    login_name: &str,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_manage_operators(actor)?;

    if actor.login_name == login_name {
        return Err(ApiError::RuleViolation {
            rule: String::from("operator_self_disable"),
            message: String::from("An operator cannot disable their own account"),
        });
    }

    let target = lookup_operator(persistence, login_name)?;
    persistence
        .disable_operator(target.operator_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to disable operator: {e}"),
        })?;

    info!(login_name, "Operator disabled");
    Ok(MessageResponse {
        message: format!("Disabled operator '{login_name}'"),
    })
}

/// Re-enables a disabled operator account.
///
/// # Errors
///
/// Returns an error if the actor is not a super admin or the target is
/// unknown.
pub fn enable_operator(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    login_name: &str,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_manage_operators(actor)?;

    let target = lookup_operator(persistence, login_name)?;
    persistence
        .enable_operator(target.operator_id)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to enable operator: {e}"),
        })?;

    info!(login_name, "Operator enabled");
    Ok(MessageResponse {
        message: format!("Enabled operator '{login_name}'"),
    })
}

/// Changes the authenticated operator's own password.
///
/// # Errors
///
/// Returns an error if the current password is wrong or the new
/// password fails policy.
pub fn change_password(
    persistence: &mut Persistence,
    operator: &OperatorData,
    request: &ChangePasswordRequest,
) -> Result<MessageResponse, ApiError> {
    let password_ok: bool = persistence
        .verify_password(&request.current_password, &operator.password_hash)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to verify password: {e}"),
        })?;
    if !password_ok {
        return Err(ApiError::AuthenticationFailed {
            reason: String::from("Current password is wrong"),
        });
    }

    PasswordPolicy::default().validate(
        &request.new_password,
        &request.new_password_confirmation,
        &[
            ("login_name", &operator.login_name),
            ("display_name", &operator.display_name),
            ("email", &operator.email),
        ],
    )?;

    persistence
        .update_password(operator.operator_id, &request.new_password)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to update password: {e}"),
        })?;

    info!(login_name = operator.login_name, "Password changed");
    Ok(MessageResponse {
        message: String::from("Password changed"),
    })
}

/// Resets another operator's password.
///
/// # Errors
///
/// Returns an error if the actor is not a super admin, the target is
/// unknown, or the new password fails policy.
pub fn reset_password(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &ResetPasswordRequest,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_reset_password(actor)?;

    let target = lookup_operator(persistence, &request.login_name)?;

    PasswordPolicy::default().validate(
        &request.new_password,
        &request.new_password_confirmation,
        &[
            ("login_name", &target.login_name),
            ("display_name", &target.display_name),
            ("email", &target.email),
        ],
    )?;

    persistence
        .update_password(target.operator_id, &request.new_password)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to update password: {e}"),
        })?;

    info!(login_name = request.login_name, "Password reset");
    Ok(MessageResponse {
        message: format!("Password reset for '{}'", request.login_name),
    })
}

fn lookup_operator(
    persistence: &mut Persistence,
    login_name: &str,
) -> Result<OperatorData, ApiError> {
    persistence
        .get_operator_by_login(login_name)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to look up operator: {e}"),
        })?
        .ok_or_else(|| ApiError::ResourceNotFound {
            message: format!("Operator '{login_name}' not found"),
        })
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Lists inventory units matching a filter.
///
/// Listing is open to every authenticated role.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_units(
    persistence: &mut Persistence,
    query: ListUnitsQuery,
) -> Result<ListUnitsResponse, ApiError> {
    let units = admast::list_inventory(persistence, &query.into_filter())
        .map_err(translate_core_error)?;

    Ok(ListUnitsResponse {
        units: units.into_iter().map(UnitInfo::from).collect(),
    })
}

/// Imports inventory from a CSV file, upserting by inventory code.
///
/// # Errors
///
/// Returns an error if the actor may not manage inventory or the CSV
/// header is malformed.
pub fn import_units(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    csv_content: &str,
    now: OffsetDateTime,
) -> Result<ImportUnitsResponse, ApiError> {
    AuthorizationService::authorize_manage_inventory(actor)?;

    let (rows, errors) = parse_unit_rows(csv_content)?;
    let summary = admast::import_inventory(persistence, &rows, now).map_err(translate_core_error)?;

    info!(
        created = summary.created,
        updated = summary.updated,
        skipped = errors.len(),
        "Inventory import applied"
    );

    Ok(ImportUnitsResponse {
        created: summary.created,
        updated: summary.updated,
        errors,
    })
}

/// Applies a bulk price update from a CSV file.
///
/// # Errors
///
/// Returns an error if the actor may not manage inventory or the CSV
/// header is malformed.
pub fn update_prices(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    csv_content: &str,
    now: OffsetDateTime,
) -> Result<UpdatePricesResponse, ApiError> {
    AuthorizationService::authorize_manage_inventory(actor)?;

    let (updates, errors) = parse_price_rows(csv_content)?;
    let summary =
        admast::bulk_update_prices(persistence, &updates, now).map_err(translate_core_error)?;

    info!(
        updated = summary.updated,
        missing = summary.missing.len(),
        skipped = errors.len(),
        "Bulk price update applied"
    );

    Ok(UpdatePricesResponse {
        updated: summary.updated,
        missing: summary.missing,
        errors,
    })
}

/// Archives or restores an inventory unit.
///
/// # Errors
///
/// Returns an error if the actor may not manage inventory or the unit
/// does not exist.
pub fn set_unit_active(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    unit_id: i64,
    active: bool,
    now: OffsetDateTime,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_manage_inventory(actor)?;

    admast::set_unit_active(persistence, unit_id, active, now).map_err(translate_core_error)?;

    Ok(MessageResponse {
        message: if active {
            format!("Unit {unit_id} restored")
        } else {
            format!("Unit {unit_id} archived")
        },
    })
}

// ---------------------------------------------------------------------------
// Leads and campaigns
// ---------------------------------------------------------------------------

/// Accepts a website quote submission and opens a lead.
///
/// This endpoint is public; no operator session is required. Returned
/// mail is for the server to deliver best-effort after commit.
///
/// # Errors
///
/// Returns an error if the submission fails validation or a cart unit
/// does not exist.
pub fn submit_quote(
    persistence: &mut Persistence,
    fallback_admin: Option<&str>,
    submission: &QuoteSubmission,
    now: OffsetDateTime,
) -> Result<(QuoteResponse, Vec<OutboundMail>), ApiError> {
    let request = QuoteRequest {
        client_name: submission.client_name.clone(),
        email: submission.email.clone(),
        phone: submission.phone.clone(),
        company_name: submission.company_name.clone(),
        source: submission.source.clone(),
        notes: submission.notes.clone(),
        unit_ids: submission.unit_ids.clone(),
    };

    let created = admast::create_quote_lead(persistence, fallback_admin, &request, now)
        .map_err(translate_core_error)?;

    Ok((
        QuoteResponse {
            lead_id: created.lead_id,
            message: String::from("Thank you, our team will reach out shortly"),
        },
        created.mails,
    ))
}

/// Lists leads, optionally filtered by pipeline status.
///
/// # Errors
///
/// Returns an error if the status string is invalid or the query fails.
pub fn list_leads(
    persistence: &mut Persistence,
    status: Option<&str>,
) -> Result<ListLeadsResponse, ApiError> {
    // Validate the filter before it reaches the query
    if let Some(status) = status {
        LeadStatus::from_str(status).map_err(|_| ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown lead status: {status}"),
        })?;
    }

    let leads = persistence
        .list_leads(status)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to list leads: {e}"),
        })?;

    Ok(ListLeadsResponse {
        leads: leads.into_iter().map(LeadInfo::from).collect(),
    })
}

/// Loads a lead with its campaign, booked units, and activity trail.
///
/// # Errors
///
/// Returns an error if the lead does not exist.
pub fn get_lead_detail(
    persistence: &mut Persistence,
    lead_id: i64,
) -> Result<LeadDetailResponse, ApiError> {
    let detail = admast::get_lead_detail(persistence, lead_id).map_err(translate_core_error)?;

    Ok(LeadDetailResponse {
        lead: LeadInfo::from(detail.lead),
        items: detail.items.into_iter().map(CampaignItemInfo::from).collect(),
        units: detail.units.into_iter().map(UnitInfo::from).collect(),
        activity: detail.activity.into_iter().map(ActivityInfo::from).collect(),
    })
}

/// Applies a lead update: status, discount, notes, assignment, and
/// handoffs, with their inventory-hold effects.
///
/// # Errors
///
/// Returns an error if the lead does not exist, a field fails
/// validation, or a required inventory hold is contested.
pub fn update_lead(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    operator: &OperatorData,
    lead_id: i64,
    request: &UpdateLeadRequest,
    now: OffsetDateTime,
) -> Result<UpdateLeadResponse, ApiError> {
    AuthorizationService::authorize_work_leads(actor)?;

    let status: Option<LeadStatus> = match &request.status {
        Some(status) => Some(LeadStatus::from_str(status).map_err(|_| ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown lead status: {status}"),
        })?),
        None => None,
    };

    let update = LeadUpdate {
        status,
        discount_percent: request.discount_percent,
        notes: request.notes.clone(),
        remark: request.remark.clone(),
        assigned_to_id: request.assigned_to_id,
        finance_user_id: request.finance_user_id,
        ops_user_id: request.ops_user_id,
    };

    let audit_actor: Actor = actor.to_audit_actor(operator);
    let lead = admast::update_lead(persistence, audit_actor, lead_id, &update, now)
        .map_err(translate_core_error)?;

    Ok(UpdateLeadResponse {
        lead: LeadInfo::from(lead),
    })
}

/// Deletes a lead, releasing any inventory holds it carries.
///
/// # Errors
///
/// Returns an error if the actor is a salesperson or the lead does not
/// exist.
pub fn delete_lead(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    lead_id: i64,
    now: OffsetDateTime,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_delete_lead(actor)?;

    admast::delete_lead(persistence, lead_id, now).map_err(translate_core_error)?;

    Ok(MessageResponse {
        message: format!("Lead {lead_id} deleted"),
    })
}

/// Attaches inventory units to a lead's campaign.
///
/// # Errors
///
/// Returns an error if the lead or a unit does not exist, or a booked
/// lead's new unit is held elsewhere.
pub fn add_campaign_items(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    operator: &OperatorData,
    lead_id: i64,
    request: &AddCampaignItemsRequest,
    now: OffsetDateTime,
) -> Result<CampaignChangeResponse, ApiError> {
    AuthorizationService::authorize_work_leads(actor)?;

    let audit_actor: Actor = actor.to_audit_actor(operator);
    let change =
        admast::add_units_to_campaign(persistence, audit_actor, lead_id, &request.unit_ids, now)
            .map_err(translate_core_error)?;

    Ok(CampaignChangeResponse {
        affected: change.affected,
        base_total: change.base_total,
        final_total: change.final_total,
    })
}

/// Removes a campaign item from a lead.
///
/// # Errors
///
/// Returns an error if the item does not exist on the lead.
pub fn remove_campaign_item(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    operator: &OperatorData,
    lead_id: i64,
    item_id: i64,
    now: OffsetDateTime,
) -> Result<CampaignChangeResponse, ApiError> {
    AuthorizationService::authorize_work_leads(actor)?;

    let audit_actor: Actor = actor.to_audit_actor(operator);
    let change = admast::remove_campaign_item(persistence, audit_actor, lead_id, item_id, now)
        .map_err(translate_core_error)?;

    Ok(CampaignChangeResponse {
        affected: change.affected,
        base_total: change.base_total,
        final_total: change.final_total,
    })
}

/// Assigns a booking window to campaign items on a lead.
///
/// # Errors
///
/// Returns an error if the dates are malformed or reversed, a unit is
/// not on the lead, or the window collides with another lead's booking.
pub fn set_timeline(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    operator: &OperatorData,
    lead_id: i64,
    request: &SetTimelineRequest,
    now: OffsetDateTime,
) -> Result<SetTimelineResponse, ApiError> {
    AuthorizationService::authorize_work_leads(actor)?;

    let audit_actor: Actor = actor.to_audit_actor(operator);
    let items_updated = admast::set_timeline(
        persistence,
        audit_actor,
        lead_id,
        &request.unit_ids,
        &request.start_date,
        &request.end_date,
        now,
    )
    .map_err(translate_core_error)?;

    Ok(SetTimelineResponse { items_updated })
}

/// Lists a lead's campaign items with their booking windows.
///
/// # Errors
///
/// Returns an error if the lead does not exist.
pub fn get_timeline(
    persistence: &mut Persistence,
    lead_id: i64,
) -> Result<TimelineResponse, ApiError> {
    let items = admast::get_timeline(persistence, lead_id).map_err(translate_core_error)?;

    Ok(TimelineResponse {
        items: items.into_iter().map(CampaignItemInfo::from).collect(),
    })
}

// ---------------------------------------------------------------------------
// Discount inquiries
// ---------------------------------------------------------------------------

/// Accepts a website discount request and issues the review link.
///
/// This endpoint is public; no operator session is required. The
/// returned mail carries the review link and approval code and must be
/// delivered to the designated approver.
///
/// # Errors
///
/// Returns an error if the submission fails validation or no approver
/// can be designated.
pub fn submit_inquiry(
    persistence: &mut Persistence,
    signer: &TokenSigner,
    config: &InquiryConfig,
    submission: &InquirySubmission,
    now: OffsetDateTime,
) -> Result<(InquiryResponse, OutboundMail), ApiError> {
    let request = InquiryRequest {
        client_name: submission.client_name.clone(),
        client_email: submission.client_email.clone(),
        client_phone: submission.client_phone.clone(),
        company_name: submission.company_name.clone(),
        notes: submission.notes.clone(),
        cart: submission
            .cart
            .iter()
            .map(|line| CartLine {
                unit_code: line.unit_code.clone(),
                outlet_name: line.outlet_name.clone(),
                rate: line.rate,
            })
            .collect(),
        base_total: submission.base_total,
        requested_discount: submission.expected_discount,
    };

    let created = admast::create_inquiry(persistence, signer, config, &request, now)
        .map_err(translate_core_error)?;

    Ok((
        InquiryResponse {
            inquiry_id: created.inquiry_id,
            message: String::from("Your discount request has been received"),
        },
        created.mail,
    ))
}

/// Fetches an inquiry for review, gated by its access token.
///
/// # Errors
///
/// Returns `AccessLinkRejected` on any token failure.
pub fn review_inquiry(
    persistence: &mut Persistence,
    inquiry_id: i64,
    token: &str,
    now: OffsetDateTime,
) -> Result<ReviewInquiryResponse, ApiError> {
    let inquiry = admast::fetch_for_review(persistence, inquiry_id, token, now)
        .map_err(translate_core_error)?;

    Ok(ReviewInquiryResponse {
        inquiry: InquiryInfo::from(inquiry),
    })
}

/// Resolves an inquiry, gated by its access token. The returned mail
/// notifies the requesting client of the outcome.
///
/// # Errors
///
/// Returns an error if the token, decision, percent, or approval code
/// is rejected, or the inquiry is already resolved.
pub fn resolve_inquiry(
    persistence: &mut Persistence,
    inquiry_id: i64,
    token: &str,
    request: &ResolveInquiryRequest,
    now: OffsetDateTime,
) -> Result<(ResolveInquiryResponse, OutboundMail), ApiError> {
    let action: ResolutionAction = match request.decision.as_str() {
        "approve" => {
            let percent: f64 = request.percent.ok_or_else(|| ApiError::InvalidInput {
                field: String::from("percent"),
                message: String::from("Approval requires a discount percentage"),
            })?;
            let code: String = request.code.clone().ok_or_else(|| ApiError::InvalidInput {
                field: String::from("code"),
                message: String::from("Approval requires the emailed approval code"),
            })?;
            ResolutionAction::Approve { percent, code }
        }
        "reject" => ResolutionAction::Reject,
        other => {
            return Err(ApiError::InvalidInput {
                field: String::from("decision"),
                message: format!("Unknown decision: {other}"),
            });
        }
    };

    let resolved = admast::resolve_inquiry(persistence, inquiry_id, token, &action, now)
        .map_err(translate_core_error)?;

    let message: String = format!(
        "Discount request {}",
        resolved.inquiry.status.as_str().to_lowercase()
    );

    Ok((
        ResolveInquiryResponse {
            inquiry: InquiryInfo::from(resolved.inquiry),
            message,
        },
        resolved.mail,
    ))
}

/// Lists discount inquiries for the back office.
///
/// # Errors
///
/// Returns an error if the actor is a salesperson or the status string
/// is invalid.
pub fn list_inquiries(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    status: Option<&str>,
) -> Result<ListInquiriesResponse, ApiError> {
    AuthorizationService::authorize_view_inquiries(actor)?;

    let status: Option<InquiryStatus> = match status {
        Some(status) => Some(InquiryStatus::from_str(status).map_err(|_| {
            ApiError::InvalidInput {
                field: String::from("status"),
                message: format!("Unknown inquiry status: {status}"),
            }
        })?),
        None => None,
    };

    let inquiries =
        admast::list_inquiries(persistence, status).map_err(translate_core_error)?;

    Ok(ListInquiriesResponse {
        inquiries: inquiries.into_iter().map(InquiryInfo::from).collect(),
    })
}

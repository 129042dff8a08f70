// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outbound mail content for the two workflows.
//!
//! The engines build mail as plain values; actually delivering them is
//! the server's concern and always best-effort. Bodies are plain text.

use admast_domain::{DiscountFigures, DiscountInquiry, Lead};

/// A composed outbound message awaiting delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Builds the review-request mail sent to the designated approver,
/// carrying the review link and the plaintext approval code.
#[must_use]
pub fn review_request(
    approver_email: &str,
    inquiry: &DiscountInquiry,
    review_url: &str,
    code: &str,
) -> OutboundMail {
    let requested: String = inquiry
        .requested_discount
        .map_or_else(|| String::from("not stated"), |p| format!("{p}%"));
    OutboundMail {
        to: approver_email.to_string(),
        subject: format!("Discount approval requested by {}", inquiry.client_name),
        body: format!(
            "A discount has been requested.\n\n\
             Client: {}\n\
             Email: {}\n\
             Cart total: {}\n\
             Requested discount: {requested}\n\n\
             Review the request here (link valid for 24 hours):\n{}\n\n\
             Approval code (valid for 10 minutes): {}\n",
            inquiry.client_name, inquiry.client_email, inquiry.base_total, review_url, code
        ),
    }
}

/// Builds the mail telling the requester their discount was approved.
#[must_use]
pub fn approval_notice(inquiry: &DiscountInquiry, figures: &DiscountFigures) -> OutboundMail {
    OutboundMail {
        to: inquiry.client_email.clone(),
        subject: String::from("Your discount request has been approved"),
        body: format!(
            "Hello {},\n\n\
             Your discount request has been approved.\n\n\
             Original total: {}\n\
             Discount: {}% ({})\n\
             Final total: {}\n\n\
             Our team will be in touch to finalize your campaign.\n",
            inquiry.client_name,
            inquiry.base_total,
            figures.percent,
            figures.discount_amount,
            figures.final_total
        ),
    }
}

/// Builds the mail telling the requester their discount was declined.
#[must_use]
pub fn rejection_notice(inquiry: &DiscountInquiry) -> OutboundMail {
    OutboundMail {
        to: inquiry.client_email.clone(),
        subject: String::from("Update on your discount request"),
        body: format!(
            "Hello {},\n\n\
             We are unable to offer the requested discount at this time.\n\
             The standard quote of {} remains available.\n\n\
             Our team will be in touch shortly.\n",
            inquiry.client_name, inquiry.base_total
        ),
    }
}

/// Builds the internal notification for a freshly captured quote lead.
#[must_use]
pub fn quote_received(admin_email: &str, lead: &Lead, item_count: usize) -> OutboundMail {
    OutboundMail {
        to: admin_email.to_string(),
        subject: format!("New quote request from {}", lead.client_name),
        body: format!(
            "A new lead has been captured from the website.\n\n\
             Client: {}\n\
             Email: {}\n\
             Phone: {}\n\
             Source: {}\n\
             Units requested: {item_count}\n\
             Quote total: {}\n",
            lead.client_name,
            lead.email.as_deref().unwrap_or("-"),
            lead.phone.as_deref().unwrap_or("-"),
            lead.source,
            lead.final_total
        ),
    }
}

/// Builds the confirmation sent back to the client who submitted a quote.
#[must_use]
pub fn quote_confirmation(client_email: &str, lead: &Lead) -> OutboundMail {
    OutboundMail {
        to: client_email.to_string(),
        subject: String::from("We received your quote request"),
        body: format!(
            "Hello {},\n\n\
             Thank you for your interest. We have received your request\n\
             and a member of our sales team will contact you shortly.\n",
            lead.client_name
        ),
    }
}

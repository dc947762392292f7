// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-lead history: status changes and outbound contact events.

use crate::models::lead::{Lead, LeadStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel a contact message was sent through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactChannel {
    Whatsapp,
    Email,
}

impl ContactChannel {
    /// Wire identifier, as the backend spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactChannel::Whatsapp => "WHATSAPP",
            ContactChannel::Email => "EMAIL",
        }
    }
}

impl fmt::Display for ContactChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal user identity embedded in history items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// One recorded status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStatusHistoryItem {
    pub id: String,
    pub lead_id: String,
    pub old_status: LeadStatus,
    pub new_status: LeadStatus,
    pub changed_by_user_id: String,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: String,
    pub changed_by_user: UserSummary,
}

/// One outbound contact attempt, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactEventItem {
    pub id: String,
    pub lead_id: String,
    pub user_id: String,
    pub channel: ContactChannel,
    pub message_template_version: String,
    pub message_rendered: String,
    pub to_address: String,
    pub success: bool,
    #[serde(default)]
    pub error_reason: Option<String>,
    pub created_at: String,
    pub user: UserSummary,
}

/// Full history of a lead. The envelope keys are snake_case on the wire,
/// unlike the camelCase items inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadHistoryResponse {
    pub lead_id: String,
    pub status_history: Vec<LeadStatusHistoryItem>,
    pub contact_events: Vec<ContactEventItem>,
}

/// Result of asking the backend to render a contact message for a lead.
///
/// Records the contact event server-side and returns the rendered text
/// plus the address to deliver it to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateMessageResponse {
    pub lead: Lead,
    pub template_version: String,
    pub channel: ContactChannel,
    pub to_address: String,
    pub message: String,
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lead entity, list filters, and the request payloads that mutate leads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Status
// ─────────────────────────────────────────────────────────────────────────────

/// Funnel stage of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    New,
    FirstContact,
    Responded,
    NoResponse,
    Won,
    Lost,
}

impl LeadStatus {
    /// All statuses in funnel order.
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::New,
        LeadStatus::FirstContact,
        LeadStatus::Responded,
        LeadStatus::NoResponse,
        LeadStatus::Won,
        LeadStatus::Lost,
    ];

    /// Wire identifier, as the backend spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "NEW",
            LeadStatus::FirstContact => "FIRST_CONTACT",
            LeadStatus::Responded => "RESPONDED",
            LeadStatus::NoResponse => "NO_RESPONSE",
            LeadStatus::Won => "WON",
            LeadStatus::Lost => "LOST",
        }
    }

    /// Operator-facing label shown in listings and timelines.
    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::New => "Novo Lead",
            LeadStatus::FirstContact => "Primeiro contato efetuado",
            LeadStatus::Responded => "Primeiro contato respondido",
            LeadStatus::NoResponse => "Sem resposta",
            LeadStatus::Won => "Lead fechado",
            LeadStatus::Lost => "Ja comprou ou nao retornou",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "NEW" => Ok(LeadStatus::New),
            "FIRST_CONTACT" => Ok(LeadStatus::FirstContact),
            "RESPONDED" => Ok(LeadStatus::Responded),
            "NO_RESPONSE" => Ok(LeadStatus::NoResponse),
            "WON" => Ok(LeadStatus::Won),
            "LOST" => Ok(LeadStatus::Lost),
            other => Err(format!(
                "unknown status '{}', expected one of NEW, FIRST_CONTACT, RESPONDED, NO_RESPONSE, WON, LOST",
                other
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lead entity
// ─────────────────────────────────────────────────────────────────────────────

/// A prospective student, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub partner_id: String,
    pub created_by_user_id: String,
    pub student_name: String,
    pub email: String,
    /// Phone exactly as typed at capture time.
    pub phone_raw: String,
    /// Canonical E.164 number, or empty when normalization failed.
    pub phone_e164: String,
    /// ISO2 country the number was captured under.
    pub phone_country: String,
    pub phone_valid: bool,
    pub school: String,
    pub city: String,
    pub status: LeadStatus,
    #[serde(default)]
    pub first_contacted_at: Option<String>,
    #[serde(default)]
    pub last_contacted_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Pagination envelope on list responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u32,
}

/// Response of the lead listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadsListResponse {
    pub items: Vec<Lead>,
    pub pagination: Pagination,
}

// ─────────────────────────────────────────────────────────────────────────────
// Filters
// ─────────────────────────────────────────────────────────────────────────────

/// Filters for the lead listing. Unset fields are omitted from the query.
#[derive(Debug, Clone, Default)]
pub struct LeadFilters {
    pub search: Option<String>,
    pub status: Option<LeadStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Filters for spreadsheet exports.
#[derive(Debug, Clone, Default)]
pub struct ExportFilters {
    pub partner_id: Option<String>,
    pub status: Option<LeadStatus>,
    pub school: Option<String>,
    pub city: Option<String>,
    pub search: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Mutation payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Payload for creating a lead.
///
/// `partner_id` is omitted for MASTER operators, who create unscoped;
/// PARTNER operators must send their own partner.
#[derive(Debug, Clone, Serialize)]
pub struct CreateLeadRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<String>,
    pub student_name: String,
    pub email: String,
    pub phone_country: String,
    /// National digits only, no mask literals.
    pub phone_national: String,
    pub school: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_duplicates: Option<bool>,
}

/// Partial update of a lead. Unset fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateLeadRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_national: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    /// Free-form note attached to a status change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

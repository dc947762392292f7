// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Partner models.

use serde::{Deserialize, Serialize};

/// A partner school or agency that sources leads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: String,
}

/// The calling user's own partner scope.
///
/// `id` is null for MASTER users, who are not tied to any partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPartner {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub is_active: bool,
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session and authenticated-user models.

use serde::{Deserialize, Serialize};

/// Role granted to an operator account.
///
/// MASTER accounts manage every partner's leads; PARTNER accounts are
/// scoped to their own partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Master,
    Partner,
}

impl UserRole {
    /// Wire identifier, as the backend spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Master => "MASTER",
            UserRole::Partner => "PARTNER",
        }
    }
}

/// The authenticated user carried on a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub role: UserRole,
    /// Partner the account is scoped to. Always null for MASTER users.
    #[serde(default)]
    pub partner_id: Option<String>,
}

/// Token pair plus user identity returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

impl Session {
    /// Whether this session can authenticate requests.
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }
}

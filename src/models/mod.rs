// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wire-format data models for the leads API.

pub mod auth;
pub mod history;
pub mod import;
pub mod lead;
pub mod partner;

pub use auth::{AuthUser, Session, UserRole};
pub use history::{
    ContactChannel, ContactEventItem, GenerateMessageResponse, LeadHistoryResponse,
    LeadStatusHistoryItem, UserSummary,
};
pub use import::{
    AnnotatedImportRow, DuplicateField, ImportConfirmResponse, ImportPreviewResponse, ImportRow,
    ImportRowError, ImportStatus,
};
pub use lead::{
    CreateLeadRequest, ExportFilters, Lead, LeadFilters, LeadStatus, LeadsListResponse, Pagination,
    UpdateLeadRequest,
};
pub use partner::{CurrentPartner, Partner};

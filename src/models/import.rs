// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spreadsheet import: preview and confirmation models.
//!
//! Imports are two-phase. The upload returns a preview with per-row
//! validation and duplicate detection; nothing is written until the
//! import is confirmed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an import job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    Draft,
    Processing,
    Done,
    Failed,
    Canceled,
}

impl ImportStatus {
    /// Wire identifier, as the backend spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Draft => "DRAFT",
            ImportStatus::Processing => "PROCESSING",
            ImportStatus::Done => "DONE",
            ImportStatus::Failed => "FAILED",
            ImportStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which field matched an existing lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateField {
    Phone,
    Email,
    Name,
}

impl DuplicateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateField::Phone => "phone",
            DuplicateField::Email => "email",
            DuplicateField::Name => "name",
        }
    }
}

/// A row as parsed from the uploaded sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    pub student_name: String,
    pub email: String,
    pub phone: String,
    pub school: String,
    pub city: String,
}

/// A row that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRowError {
    pub row_number: u32,
    pub error: String,
}

/// A preview row annotated with duplicate and error findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedImportRow {
    /// 1-based sheet row, so the first data row is 2 (row 1 is the header).
    pub row_number: u32,
    pub student_name: String,
    pub email: String,
    pub phone: String,
    pub school: String,
    pub city: String,
    #[serde(default)]
    pub is_duplicate: bool,
    #[serde(default)]
    pub duplicate_fields: Vec<DuplicateField>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of the import preview endpoint.
///
/// Older backends return only `preview_sample`; newer ones add
/// `preview_rows` with duplicate annotations. Both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportPreviewResponse {
    pub import_id: String,
    pub total_rows: u32,
    pub valid_rows: u32,
    pub invalid_rows: u32,
    #[serde(default)]
    pub duplicate_rows: u32,
    #[serde(default)]
    pub preview_sample: Vec<ImportRow>,
    #[serde(default)]
    pub errors_sample: Vec<ImportRowError>,
    #[serde(default)]
    pub preview_rows: Option<Vec<AnnotatedImportRow>>,
}

impl ImportPreviewResponse {
    /// Rows to show the operator, always in annotated form.
    ///
    /// Falls back to synthesizing annotations from `preview_sample` when
    /// the backend did not send `preview_rows`.
    pub fn annotated_rows(&self) -> Vec<AnnotatedImportRow> {
        if let Some(rows) = &self.preview_rows {
            if !rows.is_empty() {
                return rows.clone();
            }
        }
        self.preview_sample
            .iter()
            .enumerate()
            .map(|(index, row)| AnnotatedImportRow {
                row_number: index as u32 + 2,
                student_name: row.student_name.clone(),
                email: row.email.clone(),
                phone: row.phone.clone(),
                school: row.school.clone(),
                city: row.city.clone(),
                is_duplicate: false,
                duplicate_fields: Vec::new(),
                error: None,
            })
            .collect()
    }

    /// Validation errors worth surfacing.
    ///
    /// Duplicate findings are reported separately via `duplicate_rows`,
    /// so rows flagged only as duplicates are filtered out here.
    pub fn validation_errors(&self) -> Vec<&ImportRowError> {
        self.errors_sample
            .iter()
            .filter(|item| !item.error.starts_with("DUPLICATE_LEAD:"))
            .collect()
    }

    /// Whether confirming requires the operator to opt into skipping
    /// duplicates first.
    pub fn has_duplicates(&self) -> bool {
        self.duplicate_rows > 0
    }
}

/// Response of the import confirmation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfirmResponse {
    pub import_id: String,
    pub status: ImportStatus,
    pub total_rows: u32,
    pub success_rows: u32,
    pub error_rows: u32,
}

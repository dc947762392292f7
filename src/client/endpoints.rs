// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed endpoint wrappers over the request pipeline.
//!
//! Each method maps one backend route. Auth endpoints additionally keep
//! the session store in sync: login stores the returned session, logout
//! always clears it, even when the server call fails.

use crate::client::http::{ApiRequest, FormField, LeadsClient};
use crate::error::Result;
use crate::models::{
    CreateLeadRequest, CurrentPartner, ExportFilters, GenerateMessageResponse,
    ImportConfirmResponse, ImportPreviewResponse, Lead, LeadFilters, LeadHistoryResponse,
    LeadsListResponse, Partner, Session, UpdateLeadRequest,
};

impl LeadsClient {
    // ─── Auth ────────────────────────────────────────────────────────────────

    /// Authenticate and store the returned session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let request = ApiRequest::post("/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))?
            .no_auth();
        let session: Session = self.execute_json(request).await?;
        self.session_store().set(session.clone());
        tracing::info!(user = %session.user.id, "Logged in");
        Ok(session)
    }

    /// Invalidate the session server-side and drop it locally.
    ///
    /// The local session is cleared no matter what the server says; a
    /// failure is still reported to the caller afterwards.
    pub async fn logout(&self) -> Result<()> {
        let result = self.execute_empty(ApiRequest::post("/auth/logout")).await;
        self.session_store().clear();
        result
    }

    // ─── Leads ───────────────────────────────────────────────────────────────

    /// List leads with optional search, status, and paging filters.
    pub async fn leads(&self, filters: &LeadFilters) -> Result<LeadsListResponse> {
        let request = ApiRequest::get("/leads")
            .query("search", filters.search.clone())
            .query("status", filters.status.map(|s| s.to_string()))
            .query("page", filters.page.map(|p| p.to_string()))
            .query("page_size", filters.page_size.map(|p| p.to_string()));
        self.execute_json(request).await
    }

    /// Fetch a single lead.
    pub async fn lead(&self, id: &str) -> Result<Lead> {
        self.execute_json(ApiRequest::get(format!("/leads/{}", id)))
            .await
    }

    /// Fetch a lead's status and contact history.
    pub async fn lead_history(&self, id: &str) -> Result<LeadHistoryResponse> {
        self.execute_json(ApiRequest::get(format!("/leads/{}/history", id)))
            .await
    }

    /// Create a lead.
    pub async fn create_lead(&self, payload: &CreateLeadRequest) -> Result<Lead> {
        self.execute_json(ApiRequest::post("/leads").json(payload)?)
            .await
    }

    /// Apply a partial update to a lead.
    pub async fn update_lead(&self, id: &str, payload: &UpdateLeadRequest) -> Result<Lead> {
        self.execute_json(ApiRequest::patch(format!("/leads/{}", id)).json(payload)?)
            .await
    }

    /// Delete a lead.
    pub async fn delete_lead(&self, id: &str) -> Result<()> {
        self.execute_empty(ApiRequest::delete(format!("/leads/{}", id)))
            .await
    }

    /// Ask the backend to render a contact message for a lead and
    /// record the contact event.
    pub async fn generate_message(&self, id: &str) -> Result<GenerateMessageResponse> {
        self.execute_json(ApiRequest::post(format!("/leads/{}/generate-message", id)))
            .await
    }

    /// Download the filtered lead list as an XLSX workbook.
    pub async fn export_leads_xlsx(&self, filters: &ExportFilters) -> Result<Vec<u8>> {
        self.execute_bytes(export_request("/leads/export/xlsx", filters))
            .await
    }

    /// Download the filtered lead list as CSV.
    pub async fn export_leads_csv(&self, filters: &ExportFilters) -> Result<Vec<u8>> {
        self.execute_bytes(export_request("/leads/export/csv", filters))
            .await
    }

    // ─── Partners ────────────────────────────────────────────────────────────

    /// List all partners.
    pub async fn partners(&self) -> Result<Vec<Partner>> {
        self.execute_json(ApiRequest::get("/partners")).await
    }

    /// The calling user's partner scope.
    pub async fn current_partner(&self) -> Result<CurrentPartner> {
        self.execute_json(ApiRequest::get("/partners/me")).await
    }

    // ─── Imports ─────────────────────────────────────────────────────────────

    /// Upload a spreadsheet for import and get back the validated
    /// preview. Nothing is written until the import is confirmed.
    pub async fn preview_import_xls(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        partner_id: Option<&str>,
    ) -> Result<ImportPreviewResponse> {
        let mut fields = vec![FormField::file("file", file_name, bytes)];
        if let Some(partner_id) = partner_id.filter(|p| !p.is_empty()) {
            fields.push(FormField::text("partner_id", partner_id));
        }
        self.execute_json(ApiRequest::post("/imports/xls/preview").multipart(fields))
            .await
    }

    /// Confirm a previewed import. Duplicates are skipped unless the
    /// caller explicitly asks otherwise.
    pub async fn confirm_import(
        &self,
        import_id: &str,
        ignore_duplicates: Option<bool>,
    ) -> Result<ImportConfirmResponse> {
        let body = serde_json::json!({
            "ignore_duplicates": ignore_duplicates.unwrap_or(true)
        });
        let request = ApiRequest::post(format!("/imports/{}/confirm", import_id)).json(&body)?;
        self.execute_json(request).await
    }
}

fn export_request(path: &str, filters: &ExportFilters) -> ApiRequest {
    ApiRequest::get(path)
        .query("partner_id", filters.partner_id.clone())
        .query("status", filters.status.map(|s| s.to_string()))
        .query("school", filters.school.clone())
        .query("city", filters.city.clone())
        .query("search", filters.search.clone())
}

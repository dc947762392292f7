// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session-aware request pipeline.
//!
//! Every API call goes through the same path: build the request from a
//! descriptor, attach the bearer token, send, and translate the
//! response. A 401 on an authenticated call triggers one transparent
//! refresh followed by one reissue of the original request; the reissue
//! is never refreshed again, so a backend that keeps rejecting tokens
//! produces exactly one refresh attempt per call.
//!
//! Requests are kept as descriptors rather than built `reqwest`
//! requests so the reissue can rebuild the body, multipart forms
//! included.

use crate::config::Config;
use crate::error::{ApiError, ApiErrorBody, Result};
use crate::models::Session;
use crate::session::SessionStore;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Client for the leads API.
///
/// Holds the shared session store; login, logout, and token refresh
/// update it as side effects of the calls that cause them.
#[derive(Clone)]
pub struct LeadsClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl LeadsClient {
    /// Create a client against the configured base URL.
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Session store this client reads tokens from and writes refreshed
    /// sessions into.
    pub fn session_store(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub(crate) async fn execute_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.dispatch(&request).await?;
        finish_json(response).await
    }

    pub(crate) async fn execute_empty(&self, request: ApiRequest) -> Result<()> {
        let response = self.dispatch(&request).await?;
        finish_empty(response).await
    }

    pub(crate) async fn execute_bytes(&self, request: ApiRequest) -> Result<Vec<u8>> {
        let response = self.dispatch(&request).await?;
        finish_bytes(response).await
    }

    /// Send a request, refreshing the session and reissuing once if the
    /// first attempt comes back 401.
    async fn dispatch(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        let response = self.send_once(request).await?;

        if response.status() == StatusCode::UNAUTHORIZED && request.requires_auth {
            if self.refresh_session().await? {
                tracing::debug!(path = %request.path, "Reissuing request with refreshed session");
                return self.send_once(request).await;
            }
        }

        Ok(response)
    }

    /// One attempt: build the request from its descriptor and send it.
    /// The bearer token is read at send time, so a reissue picks up the
    /// refreshed session.
    async fn send_once(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.clone(), &url);

        // Unset and empty-string entries never reach the wire
        let query: Vec<(&str, &str)> = request
            .query
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| (*key, v))
            })
            .collect();
        if !query.is_empty() {
            builder = builder.query(&query);
        }

        match &request.body {
            RequestBody::Empty => {}
            RequestBody::Json(body) => builder = builder.json(body),
            RequestBody::Multipart(fields) => builder = builder.multipart(build_form(fields)),
        }

        if request.requires_auth {
            if let Some(session) = self.session.current() {
                if session.is_authenticated() {
                    builder = builder.bearer_auth(&session.access_token);
                }
            }
        }

        builder.send().await.map_err(ApiError::from)
    }

    /// Exchange the refresh token for a new session.
    ///
    /// Returns `Ok(true)` when a new session is in place and the caller
    /// should reissue. Any rejection clears the session and returns
    /// `Ok(false)`, letting the original 401 surface; only transport
    /// failures propagate as errors.
    async fn refresh_session(&self) -> Result<bool> {
        let Some(session) = self.session.current() else {
            return Ok(false);
        };
        if session.refresh_token.is_empty() {
            return Ok(false);
        }

        tracing::info!("Access token rejected, attempting session refresh");
        let url = format!("{}/auth/refresh", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "refreshToken": session.refresh_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(
                status = %response.status(),
                "Session refresh rejected, clearing session"
            );
            self.session.clear();
            return Ok(false);
        }

        let refreshed: Session = serde_json::from_slice(&response.bytes().await?)?;
        self.session.set(refreshed);
        tracing::info!("Session refreshed");
        Ok(true)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request descriptors
// ─────────────────────────────────────────────────────────────────────────────

/// Declarative description of one API call.
///
/// Descriptors stay buildable into a fresh `reqwest` request as many
/// times as the pipeline needs, which is what makes the post-refresh
/// reissue safe for every body type.
pub(crate) struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(&'static str, Option<String>)>,
    body: RequestBody,
    requires_auth: bool,
}

pub(crate) enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormField>),
}

/// One field of a multipart form.
pub(crate) struct FormField {
    name: &'static str,
    value: FormValue,
}

enum FormValue {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

impl FormField {
    pub(crate) fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: FormValue::Text(value.into()),
        }
    }

    pub(crate) fn file(name: &'static str, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name,
            value: FormValue::File {
                file_name: file_name.into(),
                bytes,
            },
        }
    }
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            requires_auth: true,
        }
    }

    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub(crate) fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a query entry. `None` and empty values are dropped by the
    /// pipeline, so callers can pass filters through unconditionally.
    pub(crate) fn query(mut self, key: &'static str, value: Option<String>) -> Self {
        self.query.push((key, value));
        self
    }

    /// Attach a JSON body.
    pub(crate) fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach a multipart form body.
    pub(crate) fn multipart(mut self, fields: Vec<FormField>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    /// Send without a bearer token and without refresh-on-401.
    pub(crate) fn no_auth(mut self) -> Self {
        self.requires_auth = false;
        self
    }
}

fn build_form(fields: &[FormField]) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new();
    for field in fields {
        form = match &field.value {
            FormValue::Text(value) => form.text(field.name, value.clone()),
            FormValue::File { file_name, bytes } => form.part(
                field.name,
                reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.clone()),
            ),
        };
    }
    form
}

// ─────────────────────────────────────────────────────────────────────────────
// Response handling
// ─────────────────────────────────────────────────────────────────────────────

/// What the response body turned out to be, decided once per response
/// and consumed by both the success and the error path.
enum ResponseBody {
    /// Declared JSON and parsed.
    Parsed(serde_json::Value),
    /// Did not declare JSON; the payload is not structured data.
    NotStructured,
    /// Declared JSON but would not parse.
    Malformed(serde_json::Error),
}

fn declares_json(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

fn classify_body(declared_json: bool, bytes: &[u8]) -> ResponseBody {
    if !declared_json {
        return ResponseBody::NotStructured;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => ResponseBody::Parsed(value),
        Err(e) => ResponseBody::Malformed(e),
    }
}

/// Translate a non-success response into the error callers see: the
/// backend's own code and message when the body carries them, a bare
/// status otherwise.
fn error_from_response(status: StatusCode, body: ResponseBody) -> ApiError {
    if let ResponseBody::Parsed(value) = body {
        if let Ok(parsed) = serde_json::from_value::<ApiErrorBody>(value) {
            return ApiError::Api {
                status: status.as_u16(),
                code: parsed.error.code,
                message: parsed.error.message,
                details: parsed.error.details,
            };
        }
    }
    ApiError::Http(status.as_u16())
}

async fn finish_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let declared_json = declares_json(&response);
    let bytes = response.bytes().await?;
    let body = classify_body(declared_json, &bytes);

    if !status.is_success() {
        return Err(error_from_response(status, body));
    }

    // 204 carries no payload; decode the null result without touching
    // the body
    if status == StatusCode::NO_CONTENT {
        return Ok(serde_json::from_value(serde_json::Value::Null)?);
    }

    match body {
        ResponseBody::Parsed(value) => Ok(serde_json::from_value(value)?),
        ResponseBody::NotStructured => Ok(serde_json::from_value(serde_json::Value::Null)?),
        ResponseBody::Malformed(e) => Err(ApiError::Json(e)),
    }
}

async fn finish_empty(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    let declared_json = declares_json(&response);
    let bytes = response.bytes().await?;

    if !status.is_success() {
        return Err(error_from_response(status, classify_body(declared_json, &bytes)));
    }

    Ok(())
}

/// Success payload as raw bytes, unparsed and unmodified. Errors still
/// get the structured-body treatment.
async fn finish_bytes(response: reqwest::Response) -> Result<Vec<u8>> {
    let status = response.status();
    let declared_json = declares_json(&response);
    let bytes = response.bytes().await?;

    if !status.is_success() {
        return Err(error_from_response(status, classify_body(declared_json, &bytes)));
    }

    Ok(bytes.to_vec())
}

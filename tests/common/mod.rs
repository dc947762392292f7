// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mock leads backend for exercising the client over real HTTP.
//!
//! The backend is a small axum app bound to an ephemeral loopback port.
//! It records what it sees (bearer tokens, query strings, uploads) and
//! can be told to reject calls with 401 so tests can drive the refresh
//! path end to end.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use leads_client::models::{AuthUser, Session, UserRole};
use leads_client::{Config, LeadsClient, SessionStore};
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Spreadsheet bytes served by the export endpoints.
pub const EXPORT_BYTES: &[u8] = b"PK\x03\x04fake-spreadsheet-payload";

/// One request as seen by the mock `/leads` endpoint.
pub struct RecordedRequest {
    pub bearer: Option<String>,
    pub query: Vec<(String, String)>,
}

/// One upload as seen by the mock import preview endpoint.
pub struct ImportUpload {
    pub bearer: Option<String>,
    pub file_name: String,
    pub byte_len: usize,
    pub partner_id: Option<String>,
}

/// Shared state of the mock backend. Counters configure behavior,
/// the vectors record what arrived.
pub struct BackendState {
    /// How many `/leads` requests should still be rejected with 401.
    pub leads_401_remaining: AtomicU32,
    /// How many import preview uploads should still be rejected with 401.
    pub imports_401_remaining: AtomicU32,
    /// Whether `/auth/refresh` hands out a new session or rejects.
    pub refresh_succeeds: AtomicBool,
    /// Status returned by `/auth/logout`.
    pub logout_status: AtomicU16,

    pub refresh_calls: AtomicU32,
    pub lead_requests: Mutex<Vec<RecordedRequest>>,
    pub logout_bearers: Mutex<Vec<Option<String>>>,
    pub refresh_bodies: Mutex<Vec<serde_json::Value>>,
    pub confirm_bodies: Mutex<Vec<serde_json::Value>>,
    pub import_uploads: Mutex<Vec<ImportUpload>>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            leads_401_remaining: AtomicU32::new(0),
            imports_401_remaining: AtomicU32::new(0),
            refresh_succeeds: AtomicBool::new(true),
            logout_status: AtomicU16::new(204),
            refresh_calls: AtomicU32::new(0),
            lead_requests: Mutex::new(Vec::new()),
            logout_bearers: Mutex::new(Vec::new()),
            refresh_bodies: Mutex::new(Vec::new()),
            confirm_bodies: Mutex::new(Vec::new()),
            import_uploads: Mutex::new(Vec::new()),
        }
    }
}

/// A client wired to a freshly spawned mock backend.
pub struct TestHarness {
    pub client: LeadsClient,
    pub store: Arc<SessionStore>,
    pub backend: Arc<BackendState>,
    _tmp: TempDir,
}

/// Spawn the mock backend and build a client against it. The session
/// file lives in a per-test temp dir.
pub async fn spawn_harness() -> TestHarness {
    let backend = Arc::new(BackendState::default());
    let router = mock_router(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Mock backend exited");
    });

    let tmp = TempDir::new().expect("Failed to create temp dir");
    let config = Config {
        api_base_url: format!("http://{}", addr),
        session_file: tmp.path().join("session.json"),
        ..Config::default()
    };
    let store = Arc::new(SessionStore::open(config.session_file.clone()));
    let client = LeadsClient::new(&config, store.clone());

    TestHarness {
        client,
        store,
        backend,
        _tmp: tmp,
    }
}

/// A session whose refresh token the mock backend accepts.
pub fn seeded_session(access: &str, refresh: &str) -> Session {
    Session {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        user: AuthUser {
            id: "user-1".to_string(),
            role: UserRole::Master,
            partner_id: None,
        },
    }
}

/// Lead entity as the backend serializes it.
pub fn lead_json(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "partnerId": "partner-1",
        "createdByUserId": "user-1",
        "studentName": "Maria Silva",
        "email": "maria@example.com",
        "phoneRaw": "(11) 98888-7777",
        "phoneE164": "+5511988887777",
        "phoneCountry": "BR",
        "phoneValid": true,
        "school": "Escola Alfa",
        "city": "Sao Paulo",
        "status": "NEW",
        "firstContactedAt": null,
        "lastContactedAt": null,
        "createdAt": "2026-01-10T12:00:00.000Z",
        "updatedAt": "2026-01-10T12:00:00.000Z"
    })
}

fn session_json(access: &str, refresh: &str) -> serde_json::Value {
    serde_json::json!({
        "accessToken": access,
        "refreshToken": refresh,
        "user": {"id": "user-1", "role": "MASTER", "partnerId": null}
    })
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "success": false,
            "error": {"code": code, "message": message}
        })),
    )
        .into_response()
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Decrement a takedown counter, returning true while it was nonzero.
fn take_401(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn mock_router(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
        .route("/leads", get(list_leads))
        .route("/leads/export/xlsx", get(export_spreadsheet))
        .route("/leads/export/csv", get(export_spreadsheet))
        .route("/leads/{id}", get(get_lead).delete(delete_lead))
        .route("/imports/xls/preview", post(preview_import))
        .route("/imports/{id}/confirm", post(confirm_import))
        .with_state(state)
}

async fn login(Json(body): Json<serde_json::Value>) -> Response {
    if body["email"] == "maria@example.com" && body["password"] == "secret" {
        Json(session_json("access-1", "refresh-1")).into_response()
    } else {
        error_response(
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "Credenciais invalidas",
        )
    }
}

async fn logout(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    state.logout_bearers.lock().unwrap().push(bearer(&headers));
    let status = StatusCode::from_u16(state.logout_status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::NO_CONTENT);
    if status.is_success() {
        status.into_response()
    } else {
        error_response(status, "LOGOUT_FAILED", "Nao foi possivel encerrar a sessao")
    }
}

async fn refresh(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    state.refresh_bodies.lock().unwrap().push(body);
    if state.refresh_succeeds.load(Ordering::SeqCst) {
        Json(session_json("access-2", "refresh-2")).into_response()
    } else {
        error_response(
            StatusCode::UNAUTHORIZED,
            "INVALID_REFRESH",
            "Refresh token invalido",
        )
    }
}

async fn list_leads(
    State(state): State<Arc<BackendState>>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    state.lead_requests.lock().unwrap().push(RecordedRequest {
        bearer: bearer(&headers),
        query,
    });
    if take_401(&state.leads_401_remaining) {
        return error_response(StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED", "Token expirado");
    }
    Json(serde_json::json!({
        "items": [lead_json("lead-1")],
        "pagination": {"page": 1, "page_size": 30, "total": 1}
    }))
    .into_response()
}

async fn get_lead(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "missing" => error_response(
            StatusCode::NOT_FOUND,
            "LEAD_NOT_FOUND",
            "Lead nao encontrado",
        ),
        // An intermediary answering instead of the API
        "proxy-error" => (
            StatusCode::BAD_GATEWAY,
            [(header::CONTENT_TYPE, "text/html")],
            "<html>bad gateway</html>",
        )
            .into_response(),
        _ => Json(lead_json(&id)).into_response(),
    }
}

async fn delete_lead(Path(_id): Path<String>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn export_spreadsheet() -> Response {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        EXPORT_BYTES.to_vec(),
    )
        .into_response()
}

async fn preview_import(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut upload = ImportUpload {
        bearer: bearer(&headers),
        file_name: String::new(),
        byte_len: 0,
        partner_id: None,
    };
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                upload.file_name = field.file_name().unwrap_or_default().to_string();
                upload.byte_len = field.bytes().await.unwrap().len();
            }
            "partner_id" => upload.partner_id = Some(field.text().await.unwrap()),
            _ => {}
        }
    }
    state.import_uploads.lock().unwrap().push(upload);

    if take_401(&state.imports_401_remaining) {
        return error_response(StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED", "Token expirado");
    }
    Json(serde_json::json!({
        "import_id": "import-1",
        "total_rows": 3,
        "valid_rows": 2,
        "invalid_rows": 1,
        "duplicate_rows": 1,
        "preview_sample": [
            {"student_name": "Ana Souza", "email": "ana@example.com", "phone": "11988887777", "school": "Alfa", "city": "Sao Paulo"},
            {"student_name": "Bruno Lima", "email": "bruno@example.com", "phone": "21977776666", "school": "Beta", "city": "Rio"}
        ],
        "errors_sample": [
            {"row_number": 4, "error": "Email invalido"},
            {"row_number": 5, "error": "DUPLICATE_LEAD: telefone ja cadastrado"}
        ]
    }))
    .into_response()
}

async fn confirm_import(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.confirm_bodies.lock().unwrap().push(body);
    Json(serde_json::json!({
        "import_id": id,
        "status": "DONE",
        "total_rows": 3,
        "success_rows": 2,
        "error_rows": 1
    }))
    .into_response()
}

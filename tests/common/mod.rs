#![allow(dead_code)]

//! In-process mock of the administration backend.
//!
//! Binds an axum router to an ephemeral port and records every request it
//! receives so tests can assert on what actually went over the wire.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use admin_console::application::{GatewayConfig, Notifier, RequestGateway};
use admin_console::domain::SessionEvent;
use admin_console::domain::entities::hash_password;
use admin_console::error::ApiError;
use admin_console::infrastructure::store::{CredentialStore, MemoryStore};
use admin_console::infrastructure::transport::ReqwestTransport;
use axum::{
    Json, Router,
    body::to_bytes,
    extract::{Request, State},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tokio::sync::mpsc;

pub const PASSWORD: &str = "secret";
pub const FAR_FUTURE: i64 = 4_102_444_800; // 2100-01-01

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Clone, Default)]
pub struct BackendState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    refresh_calls: Arc<AtomicUsize>,
}

pub struct MockBackend {
    pub base_url: String,
    state: BackendState,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = BackendState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests to `path` (without the API prefix).
    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        let full = format!("/api/v1{}", path);
        self.requests()
            .into_iter()
            .filter(|r| r.path == full)
            .collect()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.base_url.clone(),
            ..GatewayConfig::default()
        }
    }
}

/// Collects notifications instead of printing them.
#[derive(Default)]
pub struct RecordingNotifier {
    errors: Mutex<Vec<ApiError>>,
}

impl RecordingNotifier {
    pub fn errors(&self) -> Vec<ApiError> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, error: &ApiError) {
        self.errors.lock().unwrap().push(error.clone());
    }
}

/// A gateway wired to real reqwest, an in-memory store, a session channel
/// and a recording notifier.
pub struct Harness {
    pub gateway: Arc<RequestGateway>,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub events: mpsc::Receiver<SessionEvent>,
}

pub fn harness(config: GatewayConfig) -> Harness {
    harness_with_store(config, Arc::new(MemoryStore::new()))
}

pub fn harness_with_store(config: GatewayConfig, store: Arc<MemoryStore>) -> Harness {
    let (tx, rx) = mpsc::channel(16);
    let notifier = Arc::new(RecordingNotifier::default());
    let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(5)).unwrap());

    let gateway = Arc::new(RequestGateway::new(
        config,
        transport,
        store.clone() as Arc<dyn CredentialStore>,
        Arc::new(tx),
        notifier.clone(),
    ));

    Harness {
        gateway,
        store,
        notifier,
        events: rx,
    }
}

fn token(access_token: &str, expires_at: i64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_at": expires_at,
    })
}

fn ok() -> Response {
    Json(json!({"status": "OK"})).into_response()
}

fn error(status: StatusCode, code: i64, message: &str) -> Response {
    (status, Json(json!({"error": {"code": code, "message": message}}))).into_response()
}

fn menu_tree() -> Value {
    json!({
        "list": [{
            "record_id": "sys",
            "name": "System",
            "level_code": "01",
            "type": 10,
            "children": [{
                "record_id": "mod",
                "name": "Settings",
                "router": "/system",
                "level_code": "0101",
                "parent_path": "sys",
                "type": 20,
                "children": [
                    {"record_id": "menu", "name": "Menus", "router": "/system/menu", "level_code": "010101", "parent_path": "sys/mod", "type": 30},
                    {"record_id": "role", "name": "Roles", "router": "/system/role", "level_code": "010102", "parent_path": "sys/mod", "type": 30}
                ]
            }]
        }]
    })
}

fn menu_kind_for(id: &str) -> i64 {
    match id {
        "sys" => 10,
        "mod" => 20,
        "menu" | "role" => 30,
        _ => 40,
    }
}

async fn handle(State(state): State<BackendState>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let body = to_bytes(body, 1024 * 1024).await.unwrap_or_default();
    let get_header = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let recorded = Recorded {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: get_header(header::AUTHORIZATION),
        content_type: get_header(header::CONTENT_TYPE),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    state.requests.lock().unwrap().push(recorded.clone());

    let authorized = recorded
        .authorization
        .as_deref()
        .is_some_and(|a| a.starts_with("Bearer ") && a != "Bearer revoked");

    let path = recorded
        .path
        .strip_prefix("/api/v1")
        .unwrap_or(&recorded.path)
        .to_string();
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    match (&parts.method, segments.as_slice()) {
        (&Method::GET, ["login", "captchaid"]) => Json(json!({"captcha_id": "cap-1"})).into_response(),
        (&Method::POST, ["login"]) => {
            let body = recorded.json();
            if body["password"] == hash_password(PASSWORD) && body["captcha_code"] == "1234" {
                Json(token("tok-login", FAR_FUTURE)).into_response()
            } else {
                error(StatusCode::BAD_REQUEST, 1001, "invalid user name or password")
            }
        }
        (&Method::POST, ["login", "exit"]) => ok(),
        (&Method::POST, ["refresh_token"]) => {
            let n = state.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
            // Let concurrent callers pile up behind the refresh.
            tokio::time::sleep(Duration::from_millis(50)).await;
            Json(token(&format!("tok-refreshed-{}", n), FAR_FUTURE)).into_response()
        }
        (_, ["current", ..]) | (_, ["menus", ..]) | (_, ["roles", ..]) | (_, ["roles.select"])
        | (_, ["users", ..]) | (_, ["resources", ..])
            if !authorized =>
        {
            error(StatusCode::UNAUTHORIZED, 9999, "invalid token")
        }
        (&Method::GET, ["current", "user"]) => Json(json!({
            "user_name": "root",
            "real_name": "Administrator",
            "role_names": ["admin"]
        }))
        .into_response(),
        (&Method::GET, ["current", "menutree"]) => Json(menu_tree()).into_response(),
        (&Method::PUT, ["current", "password"]) => {
            if recorded.json()["old_password"] == hash_password(PASSWORD) {
                ok()
            } else {
                error(StatusCode::BAD_REQUEST, 1002, "old password is wrong")
            }
        }
        (&Method::GET, ["menus"]) => {
            if recorded.query.as_deref().is_some_and(|q| q.contains("type=tree")) {
                Json(menu_tree()).into_response()
            } else {
                Json(json!({
                    "list": [{"record_id": "sys", "code": "sys", "name": "System", "type": 10, "status": 1}],
                    "pagination": {"total": 1, "current": 1, "pageSize": 20}
                }))
                .into_response()
            }
        }
        (&Method::GET, ["menus", id]) => Json(json!({
            "record_id": id,
            "code": id,
            "name": id,
            "type": menu_kind_for(id),
            "status": 1
        }))
        .into_response(),
        (&Method::GET, ["roles.select"]) => Json(json!({
            "list": [{"record_id": "r1", "name": "Admin"}, {"record_id": "r2", "name": "Auditor"}]
        }))
        .into_response(),
        (&Method::GET, ["users"]) => Json(json!({
            "list": [{
                "record_id": "u1",
                "user_name": "root",
                "real_name": "Administrator",
                "status": 1,
                "roles": [{"record_id": "r1", "name": "Admin"}]
            }],
            "pagination": {"total": 1, "current": 1, "pageSize": 20}
        }))
        .into_response(),
        (&Method::POST, [_]) => Json(json!({"record_id": "new-1"})).into_response(),
        (&Method::PUT, [_, _]) | (&Method::DELETE, _) | (&Method::PATCH, [_, _, _]) => ok(),
        (&Method::GET, ["rotate"]) => (
            [
                ("X-Refresh-Token", "Bearer tok-rotated".to_string()),
                ("X-Refresh-Token-Expires-At", FAR_FUTURE.to_string()),
            ],
            Json(json!({"rotated": true})),
        )
            .into_response(),
        (&Method::GET, ["expired"]) => error(StatusCode::UNAUTHORIZED, 9999, "invalid token"),
        (&Method::GET, ["gateway-timeout"]) => (StatusCode::GATEWAY_TIMEOUT, "upstream timed out").into_response(),
        (&Method::GET, ["invalid"]) => error(StatusCode::UNPROCESSABLE_ENTITY, 7, "bad field"),
        (&Method::GET, ["broken"]) => (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").into_response(),
        (&Method::GET, ["empty"]) => StatusCode::NO_CONTENT.into_response(),
        (&Method::GET, ["text"]) => "pong".into_response(),
        _ => error(StatusCode::NOT_FOUND, 404, "not found"),
    }
}

//! Scripted in-memory transport for tests.
//!
//! Behaves like a tiny cookie-session server: `/auth/login/*` opens the
//! session, `/auth/logout` closes it, the refresh path reopens it (or fails,
//! as configured), and every other path answers `401` while the session is
//! closed. Per-request replies can be queued to override all of that.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::error::Failure;

use super::request::{ApiRequest, RawResponse};
use super::transport::Transport;

/// Upper bound on cooperative yields while a held refresh waits.
const MAX_HOLD_YIELDS: usize = 10_000;

#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, String),
    NetworkDown,
}

impl Reply {
    pub fn json(status: u16, body: &Value) -> Self {
        Self::Status(status, body.to_string())
    }

    fn into_result(self) -> Result<RawResponse, Failure> {
        match self {
            Self::Status(status, body) => Ok(RawResponse::new(status, body)),
            Self::NetworkDown => Err(Failure::Network { reason: "connection refused".into() }),
        }
    }
}

#[derive(Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

struct MockState {
    log: Vec<ApiRequest>,
    session_open: bool,
    refresh_path: String,
    refresh_reply: Reply,
    hold_refresh_until_unauthorized: usize,
    unauthorized_served: usize,
    routes: HashMap<String, String>,
    scripted: HashMap<String, VecDeque<Reply>>,
}

impl MockTransport {
    /// A server whose session cookie has expired and whose refresh succeeds.
    pub fn expired_session() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                log: Vec::new(),
                session_open: false,
                refresh_path: "/auth/refresh".into(),
                refresh_reply: Reply::Status(200, r#"{"ok":true}"#.into()),
                hold_refresh_until_unauthorized: 0,
                unauthorized_served: 0,
                routes: HashMap::new(),
                scripted: HashMap::new(),
            })),
        }
    }

    pub fn open_session() -> Self {
        let mock = Self::expired_session();
        mock.lock().session_open = true;
        mock
    }

    /// Serve the refresh endpoint at `path` instead of `/auth/refresh`.
    pub fn refresh_at(&self, path: &str) -> &Self {
        self.lock().refresh_path = path.to_owned();
        self
    }

    /// Make the refresh endpoint answer with `reply`.
    pub fn refresh_replies(&self, reply: Reply) -> &Self {
        self.lock().refresh_reply = reply;
        self
    }

    /// Hold the refresh call open until `count` requests have been answered `401`.
    pub fn hold_refresh_until_unauthorized(&self, count: usize) -> &Self {
        self.lock().hold_refresh_until_unauthorized = count;
        self
    }

    /// Body served for `path` (query string ignored) while the session is open.
    pub fn route(&self, path: &str, body: &Value) -> &Self {
        self.lock().routes.insert(path.to_owned(), body.to_string());
        self
    }

    /// Queue a one-off reply for the next `"METHOD /path?query"` request.
    pub fn script(&self, key: &str, reply: Reply) -> &Self {
        self.lock()
            .scripted
            .entry(key.to_owned())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn session_open(&self) -> bool {
        self.lock().session_open
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().log.clone()
    }

    /// How many requests matched `"METHOD /path?query"` exactly.
    pub fn count(&self, key: &str) -> usize {
        self.lock().log.iter().filter(|r| request_key(r) == key).count()
    }

    pub fn refresh_calls(&self) -> usize {
        let state = self.lock();
        let key = format!("POST {}", state.refresh_path);
        state.log.iter().filter(|r| request_key(r) == key).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn hold_refresh(&self) {
        for _ in 0..MAX_HOLD_YIELDS {
            {
                let state = self.lock();
                if state.unauthorized_served >= state.hold_refresh_until_unauthorized {
                    return;
                }
            }
            tokio::task::yield_now().await;
        }
    }

    fn answer(&self, request: &ApiRequest) -> Result<RawResponse, Failure> {
        let mut state = self.lock();
        let path = request.route().to_owned();

        if path == state.refresh_path {
            let reply = state.refresh_reply.clone();
            if matches!(reply, Reply::Status(200..=299, _)) {
                state.session_open = true;
            }
            return reply.into_result();
        }
        if path.starts_with("/auth/login/") {
            state.session_open = true;
            return Ok(RawResponse::new(200, r#"{"ok":true}"#));
        }
        if path == "/auth/logout" {
            state.session_open = false;
            return Ok(RawResponse::new(204, ""));
        }
        if !state.session_open {
            state.unauthorized_served += 1;
            return Ok(RawResponse::new(401, r#"{"message":"Unauthorized","code":"UNAUTHORIZED"}"#));
        }
        let body = state
            .routes
            .get(&path)
            .cloned()
            .unwrap_or_else(|| r#"{"ok":true}"#.to_owned());
        Ok(RawResponse::new(200, body))
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, Failure> {
        let key = request_key(request);
        let (scripted, is_refresh) = {
            let mut state = self.lock();
            state.log.push(request.clone());
            let scripted = state.scripted.get_mut(&key).and_then(VecDeque::pop_front);
            let is_refresh = key == format!("POST {}", state.refresh_path);
            (scripted, is_refresh)
        };

        if let Some(reply) = scripted {
            if matches!(reply, Reply::Status(401, _)) {
                self.lock().unauthorized_served += 1;
            }
            return reply.into_result();
        }
        if is_refresh {
            self.hold_refresh().await;
        }
        self.answer(request)
    }
}

fn request_key(request: &ApiRequest) -> String {
    format!("{} {}", request.method, request.path)
}

//! Browser session cookie

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use moodlog_core::{SessionStore, Uuid};

pub const SESSION_COOKIE: &str = "moodlog_session";

/// Session id carried by the request's cookies, if any parses
pub fn cookie_session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// Session resolved for one request
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSession {
    pub id: Uuid,
    pub created: bool,
}

impl ResolvedSession {
    pub fn resolve(headers: &HeaderMap, store: &SessionStore) -> Self {
        let (id, created) = store.resolve(cookie_session_id(headers));
        Self { id, created }
    }

    /// Attach `Set-Cookie` when the session is new
    pub fn apply(&self, mut response: Response) -> Response {
        if self.created {
            let cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                SESSION_COOKIE, self.id
            );
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

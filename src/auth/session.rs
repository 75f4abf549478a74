use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use cookie::{Cookie, SameSite};
use moka::sync::Cache;
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "fd_session";

const SESSION_TTL_HOURS: i64 = 24;
const REMEMBER_ME_TTL_DAYS: i64 = 30;
const MAX_SESSIONS: u64 = 10_000;

#[derive(Clone, Debug)]
pub struct Session {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// In-memory session store with per-session expiry.
///
/// The cache-level TTL is the longest any session can live; the precise
/// expiry is tracked on the entry and checked on every lookup.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_live(std::time::Duration::from_secs(
                REMEMBER_ME_TTL_DAYS as u64 * 24 * 60 * 60,
            ))
            .build();
        Self { sessions }
    }

    /// Create a session and return its opaque token.
    pub fn create(&self, username: &str, remember_me: bool) -> String {
        let token = Uuid::new_v4().to_string();
        let ttl = if remember_me {
            Duration::days(REMEMBER_ME_TTL_DAYS)
        } else {
            Duration::hours(SESSION_TTL_HOURS)
        };
        let session = Session {
            username: username.to_string(),
            expires_at: Utc::now() + ttl,
        };
        self.sessions.insert(token.clone(), session);
        token
    }

    /// Look up a session, invalidating it if expired.
    pub fn validate(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token)?;
        if session.expires_at < Utc::now() {
            self.sessions.invalidate(token);
            return None;
        }
        Some(session)
    }

    pub fn revoke(&self, token: &str) {
        self.sessions.invalidate(token);
    }

    #[cfg(test)]
    fn insert_raw(&self, token: &str, session: Session) {
        self.sessions.insert(token.to_string(), session);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the Set-Cookie value for a newly created session.
///
/// Without remember-me the cookie carries no max-age, so it lives only
/// until the browser closes.
pub fn session_cookie(token: &str, remember_me: bool) -> String {
    let mut builder = Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    if remember_me {
        builder = builder.max_age(cookie::time::Duration::days(REMEMBER_ME_TTL_DAYS));
    }
    builder.build().to_string()
}

/// Build the Set-Cookie value that clears the session cookie.
pub fn clear_session_cookie() -> String {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(cookie::time::Duration::ZERO)
        .build()
        .to_string()
}

/// Extract the session token from a request's Cookie header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for cookie in Cookie::split_parse(cookie_header).flatten() {
        if cookie.name() == SESSION_COOKIE {
            return Some(cookie.value().to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_validate_roundtrip() {
        let store = SessionStore::new();
        let token = store.create("admin", false);
        let session = store.validate(&token).expect("session should be valid");
        assert_eq!(session.username, "admin");
        assert!(session.expires_at > Utc::now());
    }

    #[test]
    fn unknown_token_is_rejected() {
        let store = SessionStore::new();
        assert!(store.validate("no-such-token").is_none());
    }

    #[test]
    fn expired_session_is_invalidated_on_lookup() {
        let store = SessionStore::new();
        store.insert_raw(
            "stale",
            Session {
                username: "admin".to_string(),
                expires_at: Utc::now() - Duration::minutes(1),
            },
        );
        assert!(store.validate("stale").is_none());
        // Gone for good, not just hidden.
        assert!(store.validate("stale").is_none());
    }

    #[test]
    fn revoked_session_no_longer_validates() {
        let store = SessionStore::new();
        let token = store.create("admin", true);
        store.revoke(&token);
        assert!(store.validate(&token).is_none());
    }

    #[test]
    fn remember_me_extends_expiry() {
        let store = SessionStore::new();
        let short = store.create("admin", false);
        let long = store.create("admin", true);
        let short_exp = store.validate(&short).unwrap().expires_at;
        let long_exp = store.validate(&long).unwrap().expires_at;
        assert!(long_exp > short_exp + Duration::days(1));
    }

    #[test]
    fn token_is_parsed_out_of_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            format!("other=1; {}=abc123; x=y", SESSION_COOKIE)
                .parse()
                .unwrap(),
        );
        assert_eq!(token_from_headers(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn remember_me_cookie_carries_max_age() {
        let value = session_cookie("tok", true);
        assert!(value.contains("Max-Age"));
        let value = session_cookie("tok", false);
        assert!(!value.contains("Max-Age"));
    }
}

//! Cookie-keyed in-memory session store
//!
//! Each visitor gets a random session id in an `HttpOnly` cookie with no
//! `Max-Age`, so it ends with the browser session. The `ReadingSession`
//! itself stays server-side.
//!
//! Locking: the id → session map sits behind a `tokio` `RwLock` that is only
//! write-locked to create or drop sessions. Each session has its own
//! `Mutex`, so one visitor's requests are serialized without blocking
//! anyone else's.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use bkm_common::config::SessionConfig;
use bkm_common::ReadingSession;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::AppState;

struct SessionEntry {
    session: ReadingSession,
    last_seen: Instant,
}

type SharedEntry = Arc<Mutex<SessionEntry>>;

fn new_entry() -> SharedEntry {
    Arc::new(Mutex::new(SessionEntry {
        session: ReadingSession::new(),
        last_seen: Instant::now(),
    }))
}

/// A panic while holding a session leaves plain data behind; keep using it
fn lock(entry: &SharedEntry) -> MutexGuard<'_, SessionEntry> {
    entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shared handle to all live sessions
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SharedEntry>>>,
    cookie_name: Arc<str>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            cookie_name: Arc::from(config.cookie_name.as_str()),
            idle_timeout: config.idle_timeout(),
            max_sessions: config.max_sessions.max(1),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Number of sessions held (expired ones linger until the next prune)
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn is_live(&self, entry: &SharedEntry) -> bool {
        lock(entry).last_seen.elapsed() < self.idle_timeout
    }

    /// Session for this cookie jar, creating one when the cookie is missing,
    /// unparsable, unknown or idle past the timeout
    pub async fn resolve(&self, jar: &CookieJar) -> Session {
        let presented = jar
            .get(&self.cookie_name)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

        if let Some(id) = presented {
            let sessions = self.inner.read().await;
            if let Some(entry) = sessions.get(&id) {
                if self.is_live(entry) {
                    return Session {
                        id,
                        entry: Arc::clone(entry),
                        cookie: None,
                    };
                }
            }
        }

        let mut sessions = self.inner.write().await;

        let timeout = self.idle_timeout;
        let before = sessions.len();
        sessions.retain(|_, entry| lock(entry).last_seen.elapsed() < timeout);
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!(pruned, "Pruned idle sessions");
        }

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| lock(entry).last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    debug!(session_id = %id, "Evicted least recently used session");
                    sessions.remove(&id);
                }
                None => break,
            }
        }

        let id = Uuid::new_v4();
        let entry = new_entry();
        sessions.insert(id, Arc::clone(&entry));
        debug!(session_id = %id, "Created session");

        Session {
            id,
            entry,
            cookie: Some(self.cookie(id)),
        }
    }

    fn cookie(&self, id: Uuid) -> Cookie<'static> {
        Cookie::build((self.cookie_name.to_string(), id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }
}

/// Request-scoped access to the caller's `ReadingSession`
///
/// Extracting this resolves (or creates) the session; handlers return
/// [`Session::jar`] alongside their response so a new cookie reaches the
/// client.
pub struct Session {
    id: Uuid,
    entry: SharedEntry,
    cookie: Option<Cookie<'static>>,
}

impl Session {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// True when this request created the session
    pub fn is_new(&self) -> bool {
        self.cookie.is_some()
    }

    /// Run `f` with exclusive access to this session's state
    pub fn with<R>(&self, f: impl FnOnce(&mut ReadingSession) -> R) -> R {
        let mut entry = lock(&self.entry);
        entry.last_seen = Instant::now();
        f(&mut entry.session)
    }

    /// Cookies to send back: the session cookie only when freshly created
    pub fn jar(&self) -> CookieJar {
        let jar = CookieJar::new();
        match &self.cookie {
            Some(cookie) => jar.add(cookie.clone()),
            None => jar,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(state.sessions.resolve(&jar).await)
    }
}

//! The session store: the single source of truth for login state.
//!
//! # Sharing
//!
//! `SessionStore` is a cheap-to-clone handle (`Arc` inside). The gateway,
//! the client facade, and whatever renders pages each hold a clone, passed
//! in explicitly. There is no global. Every clone sees every mutation on
//! its next read.
//!
//! # Persistence
//!
//! Each mutation rewrites the stored record while still holding the lock,
//! so storage always reflects the last mutation and two mutations never
//! interleave. Storage failures are logged and otherwise ignored: the
//! in-memory session stays authoritative for the running process.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{Identity, MemoryStorage, Session, SessionStorage, decode_token};

/// Storage key the session record lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "auth-storage";

/// Shared, persisted authentication state.
///
/// ## Lifecycle
///
/// ```text
///  open() ──→ [rehydrated or empty]
///                  │
///        login() / set_tokens()
///                  ▼
///           [authenticated] ──set_tokens()──→ [authenticated]
///                  │
///              logout()
///                  ▼
///               [empty]
/// ```
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<Session>,
    storage: Box<dyn SessionStorage>,
    key: String,
}

impl SessionStore {
    /// Opens a store over `storage`, rehydrating the record under `key`.
    ///
    /// A missing record starts an empty session. So does a record that
    /// cannot be read, cannot be parsed, or is not a valid session shape;
    /// those cases are logged at `warn`.
    pub fn open(storage: impl SessionStorage, key: impl Into<String>) -> Self {
        let key = key.into();
        let session = rehydrate(&storage, &key);
        tracing::debug!(
            key = %key,
            authenticated = session.is_authenticated,
            "session store opened"
        );
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(session),
                storage: Box::new(storage),
                key,
            }),
        }
    }

    /// A store over fresh in-memory storage. Nothing survives the process.
    pub fn in_memory() -> Self {
        Self::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY)
    }

    /// The storage key this store writes to.
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// A copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated
    }

    pub fn user(&self) -> Option<Identity> {
        self.lock().user.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.lock().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    /// Starts a session, replacing any previous one unconditionally.
    ///
    /// Both tokens must be non-empty. If either is `""` the store ends up
    /// empty: a session that cannot be refreshed is not a session.
    pub fn login(
        &self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        identity: Identity,
    ) {
        let session = Session::authenticated(
            access_token.into(),
            refresh_token.into(),
            Some(identity),
        );
        match &session.user {
            Some(user) => tracing::info!(username = %user.username, "session started"),
            None => tracing::warn!("login with an empty token, session cleared"),
        }
        self.mutate(|s| *s = session);
    }

    /// Clears every field.
    pub fn logout(&self) {
        tracing::info!("session cleared");
        self.mutate(|s| *s = Session::empty());
    }

    /// Replaces both tokens after a refresh.
    ///
    /// The identity is re-derived from the new access token. If that token
    /// cannot be decoded the identity becomes `None`, but the tokens are
    /// still stored and the session stays authenticated. An empty token
    /// clears the session, as in [`login`](Self::login).
    pub fn set_tokens(
        &self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) {
        let access_token = access_token.into();
        let user = if access_token.is_empty() {
            None
        } else {
            decode_token(&access_token)
        };
        let session = Session::authenticated(access_token, refresh_token.into(), user);
        if session.is_authenticated {
            tracing::debug!(identity = session.user.is_some(), "session tokens replaced");
        } else {
            tracing::warn!("empty token in refresh, session cleared");
        }
        self.mutate(|s| *s = session);
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate(&self, f: impl FnOnce(&mut Session)) {
        let mut session = self.lock();
        f(&mut session);
        self.persist(&session);
    }

    fn persist(&self, session: &Session) {
        let result = serde_json::to_vec(session)
            .map_err(crate::SessionError::Corrupt)
            .and_then(|bytes| self.inner.storage.save(&self.inner.key, &bytes));
        if let Err(e) = result {
            tracing::warn!(
                key = %self.inner.key,
                error = %e,
                "failed to persist session"
            );
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("key", &self.inner.key)
            .field("session", &*self.lock())
            .finish()
    }
}

fn rehydrate(storage: &dyn SessionStorage, key: &str) -> Session {
    let bytes = match storage.load(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Session::empty(),
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read stored session");
            return Session::empty();
        }
    };

    match serde_json::from_slice::<Session>(&bytes) {
        Ok(session) if session.is_consistent() => session,
        Ok(_) => {
            tracing::warn!(key, "stored session is inconsistent, starting empty");
            Session::empty()
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "stored session is corrupt, starting empty");
            Session::empty()
        }
    }
}

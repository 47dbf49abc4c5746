//! Route guards for the rendering layer.
//!
//! Pages that need a login are `Private`; the login and sign-up pages are
//! `Public` and bounce users who are already logged in.

use bulletin_session::{Session, SessionStore};

/// Where unauthenticated users are sent.
pub const LOGIN_ROUTE: &str = "/login";
/// Where authenticated users land.
pub const HOME_ROUTE: &str = "/";

/// Access rule for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGuard {
    /// Requires an authenticated session.
    Private,
    /// Only for anonymous users (login, sign-up).
    Public,
}

/// What the rendering layer should do with a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Render the page.
    Allow,
    /// Replace the current route with this one.
    Redirect(&'static str),
}

impl RouteGuard {
    /// Decides against the store's current state.
    pub fn check(self, store: &SessionStore) -> GuardOutcome {
        self.check_authenticated(store.is_authenticated())
    }

    /// Decides against a session snapshot.
    pub fn check_session(self, session: &Session) -> GuardOutcome {
        self.check_authenticated(session.is_authenticated)
    }

    fn check_authenticated(self, authenticated: bool) -> GuardOutcome {
        match (self, authenticated) {
            (Self::Private, true) | (Self::Public, false) => GuardOutcome::Allow,
            (Self::Private, false) => GuardOutcome::Redirect(LOGIN_ROUTE),
            (Self::Public, true) => GuardOutcome::Redirect(HOME_ROUTE),
        }
    }
}

//! The hook through which the client sends the user back to the login page.
//!
//! The client does no routing itself. When a session is lost for good
//! (refresh failed, or the retried request was rejected again) the gateway
//! calls [`Navigator::redirect_to_login`] and lets the rendering layer
//! decide what that means: a browser redirect, a CLI prompt, a test flag.

/// Receives the "go to the login surface" signal.
pub trait Navigator: Send + Sync + 'static {
    /// Called once per lost session, after the store has been cleared.
    fn redirect_to_login(&self);
}

/// Any `Fn()` closure is a navigator.
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use bulletin::Navigator;
///
/// let redirected = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&redirected);
/// let nav = move || flag.store(true, Ordering::SeqCst);
///
/// nav.redirect_to_login();
/// assert!(redirected.load(Ordering::SeqCst));
/// ```
impl<F> Navigator for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn redirect_to_login(&self) {
        self()
    }
}

/// Ignores redirects. The cleared session is the only signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect_to_login(&self) {
        tracing::debug!("login redirect requested, no navigator installed");
    }
}

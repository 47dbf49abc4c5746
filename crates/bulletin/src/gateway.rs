//! The authenticated request gateway: bearer attachment plus a single,
//! bounded token refresh.
//!
//! Every board call goes through [`Gateway::execute`]. The flow for one
//! logical request is a small state machine:
//!
//! ```text
//!            ┌──────────┐  authz failure,   ┌────────────┐
//!  start ──→ │ Initial  │ ─not yet retried→ │ Refreshing │
//!            └──────────┘                   └────────────┘
//!              │      │                      │         │
//!        success│      │other failure   ok   │         │ no token / rejected /
//!              ▼      ▼                      ▼         ▼ transport / decode
//!           [return] [return]          ┌──────────┐  ┌────────┐
//!                                      │ Retrying │  │ Failed │ → logout,
//!                                      └──────────┘  └────────┘   redirect,
//!                                        │      │                 Err(Refresh)
//!                                 success│      │authz failure again
//!                                        ▼      ▼
//!                                   [return]  logout, redirect, Err(second failure)
//! ```
//!
//! A second failure without a response comes back as
//! [`ClientError::SessionEnded`] so callers can tell it apart from a plain
//! network error that left the session alone.
//!
//! An **authorization failure** is a 401 response, or a network-class
//! transport error with no response at all (a cross-origin or proxy
//! failure can hide the real 401).
//!
//! # Concurrent refreshes
//!
//! Refreshes are not de-duplicated. If two requests hit a 401 at the same
//! time, each runs its own refresh. Both read the refresh token before
//! either answer arrives. Without rotation both succeed and the later
//! access token wins. With server-side rotation the second refresh presents
//! a token the server has already replaced, gets rejected, and logs the
//! user out even though the first call succeeded.

use bulletin_protocol::{
    AuthResponse, Codec, JsonCodec, ProtocolError, RefreshRequest, json_body,
    paths,
};
use bulletin_session::SessionStore;
use bulletin_transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

use crate::{ClientError, Navigator, RefreshError};

/// An outbound request plus its single-use retry guard.
///
/// `retried` flips from `false` to `true` at most once. A request that is
/// already retried never starts another refresh, which is what keeps an
/// expired refresh token from looping forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    request: HttpRequest,
    retried: bool,
}

impl PendingRequest {
    pub fn new(request: HttpRequest) -> Self {
        Self {
            request,
            retried: false,
        }
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Sets the retry flag. Returns `false` if it was already set.
    pub fn mark_retried(&mut self) -> bool {
        !std::mem::replace(&mut self.retried, true)
    }
}

/// Returns `true` if the outcome should trigger the refresh protocol.
pub fn is_authorization_failure(
    outcome: &Result<HttpResponse, TransportError>,
) -> bool {
    match outcome {
        Ok(response) => response.status == 401,
        Err(e) => e.is_network(),
    }
}

/// Wraps a transport with bearer attachment and one refresh-and-retry.
///
/// The gateway holds a [`SessionStore`] handle, not a copy of the tokens:
/// every dispatch reads whatever the store holds at that moment.
pub struct Gateway<T: HttpTransport, N: Navigator> {
    transport: T,
    session: SessionStore,
    navigator: N,
    codec: JsonCodec,
}

impl<T: HttpTransport, N: Navigator> Gateway<T, N> {
    pub fn new(transport: T, session: SessionStore, navigator: N) -> Self {
        Self {
            transport,
            session,
            navigator,
            codec: JsonCodec,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The underlying transport, without bearer attachment or refresh.
    ///
    /// Auth endpoints use this so a failed sign-in never triggers a refresh.
    pub fn plain(&self) -> &T {
        &self.transport
    }

    /// Sends a request with the current bearer token and recovers from one
    /// authorization failure by refreshing the token.
    ///
    /// Returns the response on any 2xx. Otherwise:
    /// - non-authorization failure → `Status` / `Transport`, untouched
    /// - refresh could not run or failed → `Refresh`, session cleared
    /// - retried request got a 401 again → that `Status`, session cleared
    /// - retried request got no response → `SessionEnded`, session cleared
    pub async fn execute(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, ClientError> {
        let mut pending = PendingRequest::new(request);

        loop {
            let outcome = self.dispatch(&pending).await;

            if !is_authorization_failure(&outcome) {
                return into_result(outcome);
            }

            if pending.is_retried() {
                tracing::info!(
                    path = %pending.request.path,
                    "request rejected again after refresh, ending session"
                );
                self.end_session();
                return match outcome {
                    Err(e) => Err(ClientError::SessionEnded(e)),
                    ok => into_result(ok),
                };
            }

            tracing::debug!(
                path = %pending.request.path,
                "authorization failure, refreshing access token"
            );
            pending.mark_retried();

            if let Err(e) = self.refresh().await {
                tracing::warn!(error = %e, "token refresh failed");
                self.end_session();
                return Err(ClientError::Refresh(e));
            }
        }
    }

    /// Attaches the current access token (if any) and sends.
    async fn dispatch(
        &self,
        pending: &PendingRequest,
    ) -> Result<HttpResponse, TransportError> {
        let mut outgoing = pending.request.clone();
        let token = self.session.access_token().filter(|t| !t.is_empty());
        if let Some(token) = &token {
            outgoing.set_bearer(token);
        }

        tracing::debug!(
            method = %outgoing.method,
            path = %outgoing.path,
            authenticated = token.is_some(),
            retried = pending.retried,
            "dispatching request"
        );
        self.transport.send(&outgoing).await
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// Goes straight to the transport so the refresh call itself is never
    /// intercepted. A rotated refresh token replaces the stored one; if the
    /// server does not rotate, the existing one is kept.
    async fn refresh(&self) -> Result<(), RefreshError> {
        let refresh_token = self
            .session
            .refresh_token()
            .filter(|t| !t.is_empty())
            .ok_or(RefreshError::MissingRefreshToken)?;

        let body = json_body(&RefreshRequest {
            refresh_token: refresh_token.clone(),
        })
        .map_err(RefreshError::Protocol)?;
        let request = HttpRequest::post(paths::REFRESH).with_body(body);

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(RefreshError::Transport)?;
        if !response.is_success() {
            return Err(RefreshError::Rejected {
                status: response.status,
            });
        }

        let tokens: AuthResponse = self
            .codec
            .decode(&response.body)
            .map_err(RefreshError::Protocol)?;
        if tokens.access_token.is_empty() {
            return Err(RefreshError::Protocol(ProtocolError::InvalidMessage(
                "refresh response has an empty access token".into(),
            )));
        }

        let rotated = tokens.refresh_token.filter(|t| !t.is_empty());
        tracing::info!(rotated = rotated.is_some(), "access token refreshed");
        self.session.set_tokens(
            tokens.access_token,
            rotated.unwrap_or(refresh_token),
        );
        Ok(())
    }

    fn end_session(&self) {
        self.session.logout();
        self.navigator.redirect_to_login();
    }
}

/// Converts a final outcome into the caller-facing result.
fn into_result(
    outcome: Result<HttpResponse, TransportError>,
) -> Result<HttpResponse, ClientError> {
    let response = outcome?;
    if response.is_success() {
        Ok(response)
    } else {
        Err(status_error(&response))
    }
}

pub(crate) fn status_error(response: &HttpResponse) -> ClientError {
    ClientError::Status {
        status: response.status,
        body: response.text(),
    }
}

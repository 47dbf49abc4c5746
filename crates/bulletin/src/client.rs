//! `BulletinClient` builder and the auth and board APIs.
//!
//! This is the entry point for talking to a board server. It ties the
//! layers together: transport → protocol → session → gateway.
//!
//! Reads (post lists, single posts, categories) are kept in a short-lived
//! cache governed by [`CachePolicy`]. Writes evict the reads they make
//! stale, and any change of user clears the cache.

use bulletin_protocol::{
    AuthResponse, Board, BoardDraft, BoardId, BoardPage, Categories, Codec,
    JsonCodec, LoginRequest, ProtocolError, SignupRequest, json_body, paths,
};
use bulletin_session::{FileStorage, Identity, SessionError, SessionStore, decode_token};
use bulletin_transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use serde::de::DeserializeOwned;

use crate::cache::{QueryCache, QueryKey};
use crate::gateway::{Gateway, status_error};
use crate::validation::{validate_board_draft, validate_login, validate_signup};
use crate::{CachePolicy, ClientConfig, ClientError, FailureKind, Navigator, NoopNavigator};

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Builder for a [`BulletinClient`] over the real HTTP transport and a
/// file-backed session.
///
/// # Example
///
/// ```rust,no_run
/// use bulletin::prelude::*;
///
/// # fn main() -> Result<(), ClientError> {
/// let client = BulletinClient::builder()
///     .config(ClientConfig::from_env()?)
///     .navigator(|| eprintln!("please log in again"))
///     .build()?;
/// # let _ = client;
/// # Ok(())
/// # }
/// ```
pub struct BulletinClientBuilder<N: Navigator = NoopNavigator> {
    config: ClientConfig,
    navigator: N,
    in_memory_session: bool,
}

impl BulletinClientBuilder {
    /// Creates a builder with default settings and no navigator.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            navigator: NoopNavigator,
            in_memory_session: false,
        }
    }
}

impl Default for BulletinClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Navigator> BulletinClientBuilder<N> {
    /// Sets the configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets who is told when the session is lost.
    pub fn navigator<M: Navigator>(self, navigator: M) -> BulletinClientBuilder<M> {
        BulletinClientBuilder {
            config: self.config,
            navigator,
            in_memory_session: self.in_memory_session,
        }
    }

    /// Keeps the session in memory instead of under `storage_dir`.
    pub fn in_memory_session(mut self) -> Self {
        self.in_memory_session = true;
        self
    }

    /// Builds the client, rehydrating any persisted session.
    pub fn build(self) -> Result<BulletinClient<ReqwestTransport, N>, ClientError> {
        let transport =
            ReqwestTransport::with_timeout(&self.config.base_url, self.config.timeout)?;

        let session = if self.in_memory_session {
            SessionStore::in_memory()
        } else {
            SessionStore::open(
                FileStorage::new(self.config.storage_dir.clone()),
                self.config.storage_key.as_str(),
            )
        };

        tracing::debug!(
            base_url = %self.config.base_url,
            authenticated = session.is_authenticated(),
            "bulletin client ready"
        );
        Ok(BulletinClient::new(transport, session, self.navigator)
            .with_cache_policy(self.config.cache))
    }
}

/// Typed access to the board API.
///
/// Auth calls go straight to the transport. Board calls go through the
/// [`Gateway`], which attaches the bearer token and refreshes it once on
/// an authorization failure.
pub struct BulletinClient<T: HttpTransport = ReqwestTransport, N: Navigator = NoopNavigator> {
    gateway: Gateway<T, N>,
    codec: JsonCodec,
    cache: QueryCache,
}

impl BulletinClient {
    /// Creates a new builder.
    pub fn builder() -> BulletinClientBuilder {
        BulletinClientBuilder::new()
    }
}

impl<T: HttpTransport, N: Navigator> BulletinClient<T, N> {
    /// Wires a client from its parts, with the default cache policy.
    ///
    /// Use this to run over another transport or a session store you
    /// opened yourself. [`BulletinClient::builder`] covers the usual case.
    pub fn new(transport: T, session: SessionStore, navigator: N) -> Self {
        Self {
            gateway: Gateway::new(transport, session, navigator),
            codec: JsonCodec,
            cache: QueryCache::new(CachePolicy::default()),
        }
    }

    /// Replaces the cache policy. Anything already cached is dropped.
    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache = QueryCache::new(policy);
        self
    }

    pub fn cache_policy(&self) -> CachePolicy {
        self.cache.policy()
    }

    /// The session this client reads tokens from.
    pub fn session(&self) -> &SessionStore {
        self.gateway.session()
    }

    pub fn gateway(&self) -> &Gateway<T, N> {
        &self.gateway
    }

    // -- auth -------------------------------------------------------------

    /// Registers an account. Does not log in.
    ///
    /// # Errors
    /// [`ClientError::Validation`] before anything is sent, or
    /// [`ClientError::Status`] if the server refuses the account.
    pub async fn signup(&self, form: &SignupRequest) -> Result<(), ClientError> {
        validate_signup(form)?;

        let request = HttpRequest::post(paths::SIGNUP).with_body(json_body(form)?);
        let response = self.gateway.plain().send(&request).await?;
        if !response.is_success() {
            tracing::info!(status = response.status, "signup rejected");
            return Err(status_error(&response));
        }

        tracing::info!(username = %form.username, "account created");
        Ok(())
    }

    /// Signs in and starts a session.
    ///
    /// The store is only touched once the server has answered with a token
    /// pair whose access token carries an identity. Cached reads from any
    /// earlier session are dropped.
    ///
    /// # Errors
    /// [`ClientError::InvalidCredentials`] when the server turns the
    /// username or password down.
    pub async fn login(&self, form: &LoginRequest) -> Result<Identity, ClientError> {
        validate_login(form)?;

        let request = HttpRequest::post(paths::SIGNIN).with_body(json_body(form)?);
        let response = self.gateway.plain().send(&request).await?;
        match response.status {
            status if (200..300).contains(&status) => {}
            400 | 401 | 403 | 404 => {
                tracing::info!(status = response.status, "sign-in rejected");
                return Err(ClientError::InvalidCredentials);
            }
            _ => return Err(status_error(&response)),
        }

        let tokens: AuthResponse = self.codec.decode(&response.body)?;
        let refresh_token = tokens
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ProtocolError::InvalidMessage(
                    "sign-in response has no refresh token".into(),
                )
            })?;
        let identity = decode_token(&tokens.access_token).ok_or_else(|| {
            SessionError::MalformedToken("access token carries no identity".into())
        })?;

        self.cache.clear();
        self.session()
            .login(tokens.access_token, refresh_token, identity.clone());
        Ok(identity)
    }

    /// Ends the session locally and drops cached reads. The server is not
    /// told.
    pub fn logout(&self) {
        self.cache.clear();
        self.session().logout();
    }

    // -- boards -----------------------------------------------------------

    /// One page of posts. Pages are zero-based.
    pub async fn list_boards(&self, page: u32, size: u32) -> Result<BoardPage, ClientError> {
        let request = HttpRequest::get(paths::BOARDS)
            .with_query("page", page)
            .with_query("size", size);
        self.fetch_cached(QueryKey::Boards { page, size }, request).await
    }

    /// Category key → display label.
    pub async fn categories(&self) -> Result<Categories, ClientError> {
        self.fetch_cached(QueryKey::Categories, HttpRequest::get(paths::CATEGORIES))
            .await
    }

    /// A single post with its attachments.
    pub async fn board(&self, id: BoardId) -> Result<Board, ClientError> {
        self.fetch_cached(QueryKey::Board(id), HttpRequest::get(paths::board(id)))
            .await
    }

    /// Publishes a new post. Every cached page of the list goes stale.
    pub async fn create_board(&self, draft: &BoardDraft) -> Result<Board, ClientError> {
        validate_board_draft(draft)?;
        let request = HttpRequest::post(paths::BOARDS).with_body(draft.to_form(&self.codec)?);
        let created: Board = self.fetch(request).await?;
        self.cache.invalidate_boards();
        Ok(created)
    }

    /// Replaces a post's title, content, category and optional file.
    pub async fn update_board(
        &self,
        id: BoardId,
        draft: &BoardDraft,
    ) -> Result<Board, ClientError> {
        validate_board_draft(draft)?;
        let request =
            HttpRequest::patch(paths::board(id)).with_body(draft.to_form(&self.codec)?);
        let updated: Board = self.fetch(request).await?;
        self.cache.invalidate_boards();
        self.cache.invalidate_board(id);
        Ok(updated)
    }

    pub async fn delete_board(&self, id: BoardId) -> Result<(), ClientError> {
        self.execute(HttpRequest::delete(paths::board(id))).await?;
        self.cache.invalidate_boards();
        self.cache.invalidate_board(id);
        tracing::info!(%id, "board deleted");
        Ok(())
    }

    async fn fetch_cached<R: DeserializeOwned>(
        &self,
        key: QueryKey,
        request: HttpRequest,
    ) -> Result<R, ClientError> {
        if let Some(body) = self.cache.get(&key) {
            tracing::debug!(?key, "served from cache");
            return Ok(self.codec.decode(&body)?);
        }

        let response = self.execute(request).await?;
        let value = self.codec.decode(&response.body)?;
        self.cache.put(key, response.body);
        Ok(value)
    }

    async fn fetch<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ClientError> {
        let response = self.execute(request).await?;
        Ok(self.codec.decode(&response.body)?)
    }

    // A failure that ended the session must not leave the old user's reads
    // behind.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let result = self.gateway.execute(request).await;
        if matches!(&result, Err(err) if err.kind() == FailureKind::Authorization) {
            self.cache.clear();
        }
        result
    }
}

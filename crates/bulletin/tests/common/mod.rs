//! Shared fixtures: a scripted transport, a counting navigator, and JWT
//! construction.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use base64ct::{Base64UrlUnpadded, Encoding};
use bulletin::protocol::paths;
use bulletin::session::{Identity, SessionStore};
use bulletin::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use bulletin::{BulletinClient, CachePolicy, Navigator};

/// Answers requests from a fixed script and records what was sent.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<Script>>,
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<HttpResponse, TransportError>>,
    sent: Vec<HttpRequest>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response with a JSON (or any text) body.
    pub fn reply(&self, status: u16, body: &str) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .replies
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queues a failure with no response.
    pub fn fail(&self, error: TransportError) -> &Self {
        self.inner.lock().unwrap().replies.push_back(Err(error));
        self
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.inner.lock().unwrap().sent.clone()
    }

    pub fn sent_to(&self, path: &str) -> Vec<HttpRequest> {
        self.sent().into_iter().filter(|r| r.path == path).collect()
    }

    pub fn refresh_calls(&self) -> usize {
        self.sent_to(paths::REFRESH).len()
    }

    pub fn remaining(&self) -> usize {
        self.inner.lock().unwrap().replies.len()
    }
}

impl HttpTransport for ScriptedTransport {
    async fn send(
        &self,
        request: &HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        let mut script = self.inner.lock().unwrap();
        script.sent.push(request.clone());
        script.replies.pop_front().unwrap_or_else(|| {
            Err(TransportError::Request(format!(
                "no scripted reply for {} {}",
                request.method, request.path
            )))
        })
    }
}

/// Counts login redirects.
#[derive(Clone, Default)]
pub struct CountingNavigator {
    redirects: Arc<AtomicUsize>,
}

impl CountingNavigator {
    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for CountingNavigator {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

/// An unsigned token whose payload is `claims`.
pub fn jwt(claims: &str) -> String {
    format!(
        "{}.{}.sig",
        Base64UrlUnpadded::encode_string(br#"{"alg":"HS256","typ":"JWT"}"#),
        Base64UrlUnpadded::encode_string(claims.as_bytes())
    )
}

/// An access token for `sub`, distinguishable by `tag`.
pub fn access_token(sub: &str, tag: &str) -> String {
    jwt(&format!(r#"{{"sub":"{sub}","name":"Tester","jti":"{tag}"}}"#))
}

pub fn identity(username: &str) -> Identity {
    Identity {
        username: username.into(),
        name: "Tester".into(),
    }
}

pub struct Harness {
    pub client: BulletinClient<ScriptedTransport, CountingNavigator>,
    pub transport: ScriptedTransport,
    pub navigator: CountingNavigator,
    pub store: SessionStore,
}

/// A client over a scripted transport and an in-memory session. Every read
/// reaches the transport.
pub fn harness() -> Harness {
    harness_with_cache(CachePolicy::disabled())
}

/// Like [`harness`], caching reads under `policy`.
pub fn harness_with_cache(policy: CachePolicy) -> Harness {
    let transport = ScriptedTransport::new();
    let navigator = CountingNavigator::default();
    let store = SessionStore::in_memory();
    let client =
        BulletinClient::new(transport.clone(), store.clone(), navigator.clone())
            .with_cache_policy(policy);
    Harness {
        client,
        transport,
        navigator,
        store,
    }
}

/// A harness whose session is already logged in with `access`/`refresh`.
pub fn logged_in(access: &str, refresh: &str) -> Harness {
    let h = harness();
    h.store.login(access, refresh, identity("u@x.com"));
    h
}

pub const PAGE_JSON: &str = r#"{
    "content": [
        {"id": 1, "title": "Hello", "category": "FREE", "createdAt": "2025-01-02T03:04:05"}
    ],
    "pageable": {"pageNumber": 0, "pageSize": 10, "offset": 0, "unpaged": false, "paged": true,
                 "sort": {"unsorted": true, "sorted": false, "empty": true}},
    "totalPages": 1,
    "totalElements": 1,
    "last": true,
    "first": true,
    "numberOfElements": 1,
    "size": 10,
    "number": 0,
    "empty": false,
    "sort": {"unsorted": true, "sorted": false, "empty": true}
}"#;

pub const BOARD_JSON: &str = r#"{
    "id": 7,
    "title": "Hello",
    "content": "World",
    "boardCategory": "NOTICE",
    "imageUrl": null,
    "createdAt": "2025-01-02T03:04:05"
}"#;

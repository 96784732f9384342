//! Shared test fixtures: a scripted stub transport and JSON builders.
//! Compiled into the library so integration tests under `tests/` can use
//! them too. Not part of the public API surface proper.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use url::Url;

use crate::api::authorize::AuthConfiguration;
use crate::api::error::ApiError;
use crate::api::request::ApiRequest;
use crate::api::transport::{HttpTransport, RawResponse};
use crate::services::{AvatarService, FeedService, OAuth2Service, ProfileService};
use crate::token::{InMemoryTokenStore, TokenStore};

const TEST_API_BASE: &str = "https://api.example.com";
const TEST_PAGE_SIZE: u32 = 10;

/// Opens a gated stub reply, letting a test hold a request in flight for as
/// long as it needs.
pub struct Gate {
    notify: Arc<Notify>,
}

impl Gate {
    pub fn open(&self) {
        self.notify.notify_one();
    }
}

struct StubReply {
    response: Result<RawResponse, ApiError>,
    gate: Option<Arc<Notify>>,
}

/// Scripted [`HttpTransport`]: replies are queued up front and consumed in
/// order, every request is recorded for assertions, and a reply can be
/// gated so it does not resolve until the test says so.
#[derive(Default)]
pub struct StubTransport {
    replies: Mutex<VecDeque<StubReply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a response with the given status and body.
    pub fn push_json(&self, status: u16, body: &str) {
        self.push_reply(StubReply {
            response: Ok(RawResponse {
                status,
                body: body.to_string(),
            }),
            gate: None,
        });
    }

    /// Queues a transport-level failure.
    pub fn push_error(&self, error: ApiError) {
        self.push_reply(StubReply {
            response: Err(error),
            gate: None,
        });
    }

    /// Queues a response that stays in flight until the returned [`Gate`]
    /// is opened.
    pub fn push_gated_json(&self, status: u16, body: &str) -> Gate {
        let notify = Arc::new(Notify::new());
        self.push_reply(StubReply {
            response: Ok(RawResponse {
                status,
                body: body.to_string(),
            }),
            gate: Some(Arc::clone(&notify)),
        });
        Gate { notify }
    }

    /// Queues a successful like/unlike response confirming `liked`.
    pub fn push_like_response(&self, photo_id: &str, liked: bool) {
        self.push_json(200, &like_response_json(photo_id, liked));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    fn push_reply(&self, reply: StubReply) {
        self.replies.lock().expect("replies lock").push_back(reply);
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        let reply = self
            .replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| panic!("no stubbed reply for {} {}", request.method, request.url));
        if let Some(gate) = reply.gate {
            gate.notified().await;
        }
        reply.response
    }
}

/// A single photo record with `liked_by_user` set as given.
pub fn photo_json(id: &str, liked: bool) -> String {
    format!(
        r#"{{
            "id": "{id}",
            "width": 1024,
            "height": 768,
            "created_at": "2024-07-01T12:00:00Z",
            "description": "photo {id}",
            "urls": {{
                "thumb": "https://images.example.com/{id}/thumb",
                "full": "https://images.example.com/{id}/full"
            }},
            "liked_by_user": {liked}
        }}"#
    )
}

/// A feed page of unliked photos with the given ids.
pub fn photos_page_json(ids: &[&str]) -> String {
    let photos: Vec<String> = ids.iter().map(|id| photo_json(id, false)).collect();
    format!("[{}]", photos.join(","))
}

pub fn like_response_json(photo_id: &str, liked: bool) -> String {
    format!(r#"{{"photo": {}}}"#, photo_json(photo_id, liked))
}

pub fn token_response_json(token: &str) -> String {
    format!(r#"{{"access_token": "{token}"}}"#)
}

pub fn profile_json(username: &str, first_name: &str, last_name: &str, bio: &str) -> String {
    format!(
        r#"{{"username": "{username}", "first_name": "{first_name}", "last_name": "{last_name}", "bio": "{bio}"}}"#
    )
}

pub fn user_json(avatar_url: &str) -> String {
    format!(r#"{{"profile_image": {{"large": "{avatar_url}"}}}}"#)
}

pub fn test_api_base() -> Url {
    Url::parse(TEST_API_BASE).expect("valid test base url")
}

pub fn create_test_auth_configuration() -> AuthConfiguration {
    AuthConfiguration {
        access_key: String::from("test-access-key"),
        secret_key: secrecy::SecretString::from(String::from("test-secret-key")),
        redirect_uri: String::from("urn:ietf:wg:oauth:2.0:oob"),
        scopes: String::from("public+read_user+write_likes"),
        oauth_base: Url::parse("https://unsplash.example.com").expect("valid oauth base url"),
    }
}

/// A feed service wired to a fresh stub transport and an in-memory token
/// store already holding `test-token`.
pub fn create_test_feed() -> (FeedService, Arc<StubTransport>) {
    let transport = StubTransport::new();
    let token_store = Arc::new(InMemoryTokenStore::with_token("test-token"));
    let feed = FeedService::new(
        Arc::clone(&transport) as Arc<dyn HttpTransport>,
        token_store,
        test_api_base(),
        TEST_PAGE_SIZE,
    );
    (feed, transport)
}

/// An OAuth service wired to a fresh stub transport and an empty in-memory
/// token store.
pub fn create_test_oauth() -> (OAuth2Service, Arc<StubTransport>, Arc<InMemoryTokenStore>) {
    let transport = StubTransport::new();
    let token_store = Arc::new(InMemoryTokenStore::new());
    let oauth = OAuth2Service::new(
        Arc::clone(&transport) as Arc<dyn HttpTransport>,
        Arc::clone(&token_store) as Arc<dyn TokenStore>,
        create_test_auth_configuration(),
    );
    (oauth, transport, token_store)
}

/// A profile service with a stub transport and a token already present.
pub fn create_test_profile() -> (ProfileService, Arc<StubTransport>) {
    let transport = StubTransport::new();
    let token_store = Arc::new(InMemoryTokenStore::with_token("test-token"));
    let profile = ProfileService::new(
        Arc::clone(&transport) as Arc<dyn HttpTransport>,
        token_store,
        test_api_base(),
    );
    (profile, transport)
}

/// An avatar service with a stub transport and a token already present.
pub fn create_test_avatar() -> (AvatarService, Arc<StubTransport>) {
    let transport = StubTransport::new();
    let token_store = Arc::new(InMemoryTokenStore::with_token("test-token"));
    let avatar = AvatarService::new(
        Arc::clone(&transport) as Arc<dyn HttpTransport>,
        token_store,
        test_api_base(),
    );
    (avatar, transport)
}

//! Integration tests for profile/avatar lookup and session teardown.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use splashfeed::api::error::ApiError;
use splashfeed::api::transport::HttpTransport;
use splashfeed::services::{AvatarService, FeedService, LogoutService, ProfileService};
use splashfeed::test_helpers::{
    create_test_avatar, create_test_profile, photos_page_json, profile_json, test_api_base,
    user_json, StubTransport,
};
use splashfeed::token::{InMemoryTokenStore, TokenStore};

#[tokio::test]
async fn profile_fetch_caches_the_result() {
    let (profile, transport) = create_test_profile();
    transport.push_json(200, &profile_json("ekaterina_nov", "Ekaterina", "Novikova", "Hi!"));

    assert_eq!(profile.profile().await, None);
    let fetched = profile.fetch_profile().await.expect("fetch succeeds");

    assert_eq!(fetched.name, "Ekaterina Novikova");
    assert_eq!(profile.profile().await, Some(fetched));
    assert_eq!(transport.requests()[0].url.path(), "/me");
}

#[tokio::test]
async fn profile_refetch_cancels_the_previous_request() {
    let (profile, transport) = create_test_profile();
    let profile = Arc::new(profile);
    let _gate =
        transport.push_gated_json(200, &profile_json("stale", "Stale", "Answer", ""));
    transport.push_json(200, &profile_json("fresh", "Fresh", "Answer", ""));

    let first = {
        let profile = Arc::clone(&profile);
        tokio::spawn(async move { profile.fetch_profile().await })
    };
    while transport.request_count() == 0 {
        tokio::task::yield_now().await;
    }

    let fetched = profile.fetch_profile().await.expect("refetch succeeds");
    assert_eq!(fetched.username, "fresh");

    let first = first.await.expect("task joined");
    assert!(matches!(first, Err(ApiError::Cancelled)));
    // The cache holds the winning fetch
    assert_eq!(profile.profile().await.map(|p| p.username), Some(String::from("fresh")));
}

#[tokio::test]
async fn avatar_fetch_broadcasts_the_url() {
    let (avatar, transport) = create_test_avatar();
    let mut events = avatar.subscribe();
    transport.push_json(200, &user_json("https://images.example.com/face-l.jpg"));

    let url = avatar
        .fetch_avatar_url("ekaterina_nov")
        .await
        .expect("fetch succeeds");

    assert_eq!(url, "https://images.example.com/face-l.jpg");
    assert_eq!(events.recv().await.expect("event"), url);
    assert_eq!(avatar.avatar_url().await, Some(url));
    assert_eq!(transport.requests()[0].url.path(), "/users/ekaterina_nov");
}

#[tokio::test]
async fn avatar_fetch_without_token_is_invalid() {
    let transport = StubTransport::new();
    let token_store = Arc::new(InMemoryTokenStore::new());
    let avatar = AvatarService::new(
        Arc::clone(&transport) as Arc<dyn HttpTransport>,
        token_store,
        test_api_base(),
    );

    let result = avatar.fetch_avatar_url("someone").await;

    assert!(matches!(result, Err(ApiError::InvalidRequest)));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn logout_clears_every_session_store() {
    let transport = StubTransport::new();
    let token_store = Arc::new(InMemoryTokenStore::with_token("test-token"));
    let feed = Arc::new(FeedService::new(
        Arc::clone(&transport) as Arc<dyn HttpTransport>,
        Arc::clone(&token_store) as Arc<dyn TokenStore>,
        test_api_base(),
        10,
    ));
    let profile = Arc::new(ProfileService::new(
        Arc::clone(&transport) as Arc<dyn HttpTransport>,
        Arc::clone(&token_store) as Arc<dyn TokenStore>,
        test_api_base(),
    ));
    let avatar = Arc::new(AvatarService::new(
        Arc::clone(&transport) as Arc<dyn HttpTransport>,
        Arc::clone(&token_store) as Arc<dyn TokenStore>,
        test_api_base(),
    ));

    // Populate every store
    transport.push_json(200, &photos_page_json(&["a", "b"]));
    feed.fetch_next_page().await.expect("fetch succeeds");
    transport.push_json(200, &profile_json("user", "Some", "User", ""));
    profile.fetch_profile().await.expect("profile succeeds");
    transport.push_json(200, &user_json("https://images.example.com/a.jpg"));
    avatar.fetch_avatar_url("user").await.expect("avatar succeeds");

    let logout = LogoutService::new(
        Arc::clone(&token_store) as Arc<dyn TokenStore>,
        Arc::clone(&feed),
        Arc::clone(&profile),
        Arc::clone(&avatar),
    );
    logout.logout().await;

    assert_eq!(token_store.token(), None);
    assert_eq!(feed.photo_count().await, 0);
    assert_eq!(profile.profile().await, None);
    assert_eq!(avatar.avatar_url().await, None);

    // Services stay usable for a fresh login
    token_store.set_token(Some(String::from("fresh-token")));
    transport.push_json(200, &photos_page_json(&["c"]));
    feed.fetch_next_page().await.expect("fetch after logout succeeds");
    assert_eq!(feed.photo_count().await, 1);
    let last_request = transport.requests().pop().expect("request recorded");
    assert!(last_request.url.as_str().contains("page=1"));
    assert_eq!(last_request.bearer_token.as_deref(), Some("fresh-token"));
}

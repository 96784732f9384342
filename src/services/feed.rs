use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use url::Url;

use crate::api::error::ApiError;
use crate::api::records::{LikeResponse, PhotoRecord};
use crate::api::request::{ApiRequest, HttpMethod};
use crate::api::transport::{fetch_json, HttpTransport};
use crate::domain::{Photo, PhotoSet};
use crate::token::TokenStore;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Change events broadcast by [`FeedService`].
///
/// Events are sent strictly after the corresponding mutation is applied, so
/// a subscriber reading the feed from its handler always sees post-mutation
/// state. The feed never removes or reorders delivered photos, which keeps
/// a subscriber's own `[old_count, new_count)` index math valid between
/// events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// At least one new photo was appended to the tail of the feed.
    /// Subscribers re-read the count themselves to compute the range.
    PhotosAppended,
    /// A single photo's like state was confirmed by the server.
    LikeChanged { photo_id: String },
}

/// Result of a [`FeedService::fetch_next_page`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page fetch was already in flight; the call was a no-op.
    AlreadyInFlight,
    /// The page was fetched and merged; `appended` photos were new.
    Fetched { appended: usize },
}

struct FeedState {
    photos: PhotoSet,
    last_loaded_page: Option<u32>,
    fetch_in_flight: bool,
    like_in_flight: bool,
}

/// The pagination and like-synchronization engine.
///
/// Owns the ordered, id-deduplicated photo list. At most one page fetch and
/// at most one like request are in flight at a time; both guards are
/// rejection-based. All mutations happen under one mutex, and network
/// awaits never hold it.
pub struct FeedService {
    transport: Arc<dyn HttpTransport>,
    token_store: Arc<dyn TokenStore>,
    api_base: Url,
    page_size: u32,
    state: Mutex<FeedState>,
    events: broadcast::Sender<FeedEvent>,
}

impl FeedService {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        token_store: Arc<dyn TokenStore>,
        api_base: Url,
        page_size: u32,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            transport,
            token_store,
            api_base,
            page_size,
            state: Mutex::new(FeedState {
                photos: PhotoSet::new(),
                last_loaded_page: None,
                fetch_in_flight: false,
                like_in_flight: false,
            }),
            events,
        }
    }

    /// Subscribes to feed change events.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the current photo list.
    pub async fn photos(&self) -> Vec<Photo> {
        self.state.lock().await.photos.to_vec()
    }

    pub async fn photo_count(&self) -> usize {
        self.state.lock().await.photos.len()
    }

    pub async fn photo_at(&self, index: usize) -> Option<Photo> {
        self.state.lock().await.photos.get(index).cloned()
    }

    pub async fn last_loaded_page(&self) -> Option<u32> {
        self.state.lock().await.last_loaded_page
    }

    /// Fetches and merges the next feed page.
    ///
    /// A call while a fetch is already in flight is a no-op and reports
    /// [`FetchOutcome::AlreadyInFlight`]. A missing bearer token fails with
    /// [`ApiError::InvalidRequest`] without mutating anything. New photos
    /// are appended in received order, already-present ids are dropped, and
    /// `last_loaded_page` advances even when the whole page was filtered
    /// out, so the same page is not refetched forever.
    pub async fn fetch_next_page(&self) -> Result<FetchOutcome, ApiError> {
        let page = {
            let mut state = self.state.lock().await;
            if state.fetch_in_flight {
                log::debug!("Page fetch already in flight, ignoring");
                return Ok(FetchOutcome::AlreadyInFlight);
            }
            state.fetch_in_flight = true;
            state.last_loaded_page.unwrap_or(0) + 1
        };

        let Some(token) = self.token_store.token() else {
            log::warn!("Cannot fetch page {page}: no bearer token");
            self.state.lock().await.fetch_in_flight = false;
            return Err(ApiError::InvalidRequest);
        };

        let request = self.page_request(page, &token);
        let result = fetch_json::<Vec<PhotoRecord>>(&*self.transport, &request).await;

        let mut state = self.state.lock().await;
        state.fetch_in_flight = false;
        match result {
            Ok(records) => {
                let appended = state
                    .photos
                    .extend_unique(records.into_iter().map(Photo::from));
                state.last_loaded_page = Some(page);
                drop(state);

                log::info!("Fetched page {page}, {appended} new photos");
                if appended > 0 {
                    let _ = self.events.send(FeedEvent::PhotosAppended);
                }
                Ok(FetchOutcome::Fetched { appended })
            }
            Err(e) => {
                log::error!("Failed to fetch page {page}: {e}");
                Err(e)
            }
        }
    }

    /// Synchronizes a like toggle with the server.
    ///
    /// `currently_liked` is the caller's view of the photo's state; the
    /// request toggles away from it (POST to like, DELETE to unlike). On
    /// success the photo's flag is overwritten with the server-confirmed
    /// value, never blindly flipped. A second call while one is in flight
    /// fails with [`ApiError::InvalidRequest`]; it is not queued.
    pub async fn set_liked(&self, photo_id: &str, currently_liked: bool) -> Result<(), ApiError> {
        {
            let mut state = self.state.lock().await;
            if state.like_in_flight {
                log::warn!("Like request already in flight, rejecting");
                return Err(ApiError::InvalidRequest);
            }
            state.like_in_flight = true;
        }

        let Some(token) = self.token_store.token() else {
            log::warn!("Cannot change like for {photo_id}: no bearer token");
            self.state.lock().await.like_in_flight = false;
            return Err(ApiError::InvalidRequest);
        };

        let request = self.like_request(photo_id, currently_liked, &token);
        let result = fetch_json::<LikeResponse>(&*self.transport, &request).await;

        let mut state = self.state.lock().await;
        state.like_in_flight = false;
        match result {
            Ok(response) => {
                let confirmed = response.photo.liked_by_user;
                let updated = state.photos.set_liked(photo_id, confirmed);
                drop(state);

                if updated {
                    let _ = self.events.send(FeedEvent::LikeChanged {
                        photo_id: photo_id.to_string(),
                    });
                } else {
                    log::warn!("Like confirmed for {photo_id}, but it is not in the feed");
                }
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to change like for {photo_id}: {e}");
                Err(e)
            }
        }
    }

    /// Resets the feed to its initial state. Used at logout; emits nothing.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.photos.clear();
        state.last_loaded_page = None;
    }

    fn page_request(&self, page: u32, token: &str) -> ApiRequest {
        let mut url = self.api_base.clone();
        url.set_path("/photos");
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &self.page_size.to_string());
        ApiRequest::get(url).with_bearer(token)
    }

    fn like_request(&self, photo_id: &str, currently_liked: bool, token: &str) -> ApiRequest {
        let mut url = self.api_base.clone();
        url.set_path(&format!("/photos/{photo_id}/like"));
        let method = if currently_liked {
            HttpMethod::Delete
        } else {
            HttpMethod::Post
        };
        ApiRequest::new(method, url).with_bearer(token)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_helpers::{create_test_feed, photos_page_json};

    #[tokio::test]
    async fn fetch_requests_page_one_first() {
        let (feed, transport) = create_test_feed();
        transport.push_json(200, &photos_page_json(&["a", "b"]));

        let outcome = feed.fetch_next_page().await.expect("fetch succeeds");

        assert_eq!(outcome, FetchOutcome::Fetched { appended: 2 });
        assert_eq!(feed.last_loaded_page().await, Some(1));
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.as_str().contains("page=1"));
        assert!(requests[0].url.as_str().contains("per_page=10"));
        assert_eq!(requests[0].bearer_token.as_deref(), Some("test-token"));
    }

    #[tokio::test]
    async fn fetch_without_token_fails_and_clears_the_guard() {
        let (feed, transport) = create_test_feed();
        feed.token_store.clear();

        let result = feed.fetch_next_page().await;
        assert!(matches!(result, Err(ApiError::InvalidRequest)));
        assert_eq!(transport.request_count(), 0);
        assert_eq!(feed.photo_count().await, 0);

        // The guard is not left set
        feed.token_store.set_token(Some(String::from("test-token")));
        transport.push_json(200, &photos_page_json(&["a"]));
        let outcome = feed.fetch_next_page().await.expect("fetch succeeds");
        assert_eq!(outcome, FetchOutcome::Fetched { appended: 1 });
    }

    #[tokio::test]
    async fn failed_fetch_leaves_state_unchanged() {
        let (feed, transport) = create_test_feed();
        transport.push_json(200, &photos_page_json(&["a"]));
        feed.fetch_next_page().await.expect("first fetch succeeds");

        transport.push_json(500, "oops");
        let result = feed.fetch_next_page().await;

        assert!(matches!(result, Err(ApiError::HttpStatus(500))));
        assert_eq!(feed.photo_count().await, 1);
        assert_eq!(feed.last_loaded_page().await, Some(1));
    }

    #[tokio::test]
    async fn fully_duplicate_page_advances_without_an_event() {
        let (feed, transport) = create_test_feed();
        let mut events = feed.subscribe();
        transport.push_json(200, &photos_page_json(&["a", "b"]));
        transport.push_json(200, &photos_page_json(&["a", "b"]));

        feed.fetch_next_page().await.expect("first fetch succeeds");
        assert_eq!(events.recv().await.expect("event"), FeedEvent::PhotosAppended);

        let outcome = feed.fetch_next_page().await.expect("second fetch succeeds");
        assert_eq!(outcome, FetchOutcome::Fetched { appended: 0 });
        // Page advanced, so the next fetch asks for page 3
        assert_eq!(feed.last_loaded_page().await, Some(2));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn like_toggles_away_from_the_current_state() {
        let (feed, transport) = create_test_feed();
        transport.push_json(200, &photos_page_json(&["a"]));
        feed.fetch_next_page().await.expect("fetch succeeds");

        transport.push_like_response("a", true);
        feed.set_liked("a", false).await.expect("like succeeds");

        let requests = transport.requests();
        assert_eq!(requests[1].method, HttpMethod::Post);
        assert_eq!(requests[1].url.path(), "/photos/a/like");

        transport.push_like_response("a", false);
        feed.set_liked("a", true).await.expect("unlike succeeds");
        assert_eq!(transport.requests()[2].method, HttpMethod::Delete);
    }
}

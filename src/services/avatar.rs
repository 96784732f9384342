use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::api::error::ApiError;
use crate::api::records::UserRecord;
use crate::api::request::ApiRequest;
use crate::api::transport::{fetch_json, HttpTransport};
use crate::token::TokenStore;

const EVENT_CHANNEL_CAPACITY: usize = 16;

struct AvatarState {
    avatar_url: Option<String>,
    cancel: Option<CancellationToken>,
    generation: u64,
}

/// Fetches and caches the avatar URL of a user, broadcasting the URL to
/// subscribers whenever it changes. A refetch cancels the previous
/// outstanding request, same as [`ProfileService`](super::ProfileService).
pub struct AvatarService {
    transport: Arc<dyn HttpTransport>,
    token_store: Arc<dyn TokenStore>,
    api_base: Url,
    state: Mutex<AvatarState>,
    events: broadcast::Sender<String>,
}

impl AvatarService {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        token_store: Arc<dyn TokenStore>,
        api_base: Url,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            transport,
            token_store,
            api_base,
            state: Mutex::new(AvatarState {
                avatar_url: None,
                cancel: None,
                generation: 0,
            }),
            events,
        }
    }

    /// Subscribes to avatar-changed events; each event carries the new URL.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.events.subscribe()
    }

    /// The cached avatar URL from the last successful fetch, if any.
    pub async fn avatar_url(&self) -> Option<String> {
        self.state.lock().await.avatar_url.clone()
    }

    /// Fetches the avatar URL for `username`, caches it and broadcasts it.
    pub async fn fetch_avatar_url(&self, username: &str) -> Result<String, ApiError> {
        let Some(token) = self.token_store.token() else {
            log::warn!("Cannot fetch avatar for {username}: no bearer token");
            return Err(ApiError::InvalidRequest);
        };

        let (cancel, generation) = {
            let mut state = self.state.lock().await;
            if let Some(previous) = state.cancel.take() {
                previous.cancel();
            }
            let cancel = CancellationToken::new();
            state.cancel = Some(cancel.clone());
            state.generation += 1;
            (cancel, state.generation)
        };

        let mut url = self.api_base.clone();
        url.set_path(&format!("/users/{username}"));
        let request = ApiRequest::get(url).with_bearer(token);

        let result = tokio::select! {
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            result = fetch_json::<UserRecord>(&*self.transport, &request) => result,
        };

        let mut state = self.state.lock().await;
        if state.generation != generation {
            return Err(ApiError::Cancelled);
        }
        state.cancel = None;
        match result {
            Ok(record) => {
                let avatar_url = record.profile_image.large;
                state.avatar_url = Some(avatar_url.clone());
                drop(state);

                let _ = self.events.send(avatar_url.clone());
                Ok(avatar_url)
            }
            Err(e) => {
                log::error!("Failed to fetch avatar for {username}: {e}");
                Err(e)
            }
        }
    }

    /// Drops the cached avatar URL. Used at logout; emits nothing.
    pub async fn clear(&self) {
        self.state.lock().await.avatar_url = None;
    }
}

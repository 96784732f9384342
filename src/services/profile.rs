use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::api::error::ApiError;
use crate::api::records::ProfileRecord;
use crate::api::request::ApiRequest;
use crate::api::transport::{fetch_json, HttpTransport};
use crate::domain::Profile;
use crate::token::TokenStore;

struct ProfileState {
    profile: Option<Profile>,
    cancel: Option<CancellationToken>,
    generation: u64,
}

/// Fetches and caches the authenticated user's profile.
///
/// Unlike the feed's rejection guard, a refetch cancels any outstanding
/// previous request and proceeds in its place.
pub struct ProfileService {
    transport: Arc<dyn HttpTransport>,
    token_store: Arc<dyn TokenStore>,
    api_base: Url,
    state: Mutex<ProfileState>,
}

impl ProfileService {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        token_store: Arc<dyn TokenStore>,
        api_base: Url,
    ) -> Self {
        Self {
            transport,
            token_store,
            api_base,
            state: Mutex::new(ProfileState {
                profile: None,
                cancel: None,
                generation: 0,
            }),
        }
    }

    /// The cached profile from the last successful fetch, if any.
    pub async fn profile(&self) -> Option<Profile> {
        self.state.lock().await.profile.clone()
    }

    /// Fetches the authenticated user's profile and caches it.
    pub async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        let Some(token) = self.token_store.token() else {
            log::warn!("Cannot fetch profile: no bearer token");
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
        url.set_path("/me");
        let request = ApiRequest::get(url).with_bearer(token);

        let result = tokio::select! {
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            result = fetch_json::<ProfileRecord>(&*self.transport, &request) => result,
        };

        let mut state = self.state.lock().await;
        if state.generation != generation {
            return Err(ApiError::Cancelled);
        }
        state.cancel = None;
        match result {
            Ok(record) => {
                let profile = Profile::from(record);
                state.profile = Some(profile.clone());
                Ok(profile)
            }
            Err(e) => {
                log::error!("Failed to fetch profile: {e}");
                Err(e)
            }
        }
    }

    /// Drops the cached profile. Used at logout.
    pub async fn clear(&self) {
        self.state.lock().await.profile = None;
    }
}

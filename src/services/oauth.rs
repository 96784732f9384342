use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::api::authorize::AuthConfiguration;
use crate::api::error::ApiError;
use crate::api::records::TokenResponse;
use crate::api::transport::{fetch_json, HttpTransport};
use crate::token::TokenStore;

struct ExchangeState {
    last_code: Option<String>,
    cancel: Option<CancellationToken>,
    generation: u64,
}

/// OAuth2 authorization-code exchange with single-flight de-duplication.
///
/// Re-submitting the code of the exchange currently in flight fails
/// immediately without a network call. A *distinct* new code cancels the
/// in-flight exchange and proceeds. Each exchange owns a generation number;
/// only the exchange holding the current generation may clear the markers
/// or persist a token, so a superseded exchange cannot clobber the state of
/// the one that replaced it.
pub struct OAuth2Service {
    transport: Arc<dyn HttpTransport>,
    token_store: Arc<dyn TokenStore>,
    auth: AuthConfiguration,
    state: Mutex<ExchangeState>,
}

impl OAuth2Service {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        token_store: Arc<dyn TokenStore>,
        auth: AuthConfiguration,
    ) -> Self {
        Self {
            transport,
            token_store,
            auth,
            state: Mutex::new(ExchangeState {
                last_code: None,
                cancel: None,
                generation: 0,
            }),
        }
    }

    /// Exchanges an authorization code for a bearer token and persists it.
    pub async fn exchange_code(&self, code: &str) -> Result<String, ApiError> {
        let (cancel, generation) = {
            let mut state = self.state.lock().await;
            if state.last_code.as_deref() == Some(code) {
                log::warn!("Duplicate authorization code submitted, rejecting");
                return Err(ApiError::InvalidRequest);
            }
            if let Some(previous) = state.cancel.take() {
                log::info!("New authorization code supersedes in-flight exchange");
                previous.cancel();
            }
            let cancel = CancellationToken::new();
            state.cancel = Some(cancel.clone());
            state.last_code = Some(code.to_string());
            state.generation += 1;
            (cancel, state.generation)
        };

        let request = self.auth.token_request(code);
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            result = fetch_json::<TokenResponse>(&*self.transport, &request) => result,
        };

        let mut state = self.state.lock().await;
        if state.generation != generation {
            // A newer exchange owns the markers now
            return Err(ApiError::Cancelled);
        }
        state.last_code = None;
        state.cancel = None;
        drop(state);

        match result {
            Ok(response) => {
                self.token_store
                    .set_token(Some(response.access_token.clone()));
                log::info!("Bearer token persisted");
                Ok(response.access_token)
            }
            Err(e) => {
                log::error!("Token exchange failed: {e}");
                Err(e)
            }
        }
    }

    /// The user-facing authorize URL to open in a browser or web view.
    pub fn authorize_url(&self) -> url::Url {
        self.auth.authorize_url()
    }
}

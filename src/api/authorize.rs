use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::api::request::ApiRequest;

/// The path the OAuth provider redirects native clients to, carrying the
/// authorization code as a query item.
const NATIVE_REDIRECT_PATH: &str = "/oauth/authorize/native";

/// OAuth2 application credentials and endpoints.
#[derive(Debug)]
pub struct AuthConfiguration {
    pub access_key: String,
    pub secret_key: SecretString,
    pub redirect_uri: String,
    pub scopes: String,
    pub oauth_base: Url,
}

impl AuthConfiguration {
    /// The user-facing authorize URL the login web view should load.
    pub fn authorize_url(&self) -> Url {
        let mut url = self.oauth_base.clone();
        url.set_path("/oauth/authorize");
        url.query_pairs_mut()
            .append_pair("client_id", &self.access_key)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scopes);
        url
    }

    /// The POST request that exchanges an authorization code for a bearer
    /// token. Pre-auth, so no bearer header is attached.
    pub fn token_request(&self, code: &str) -> ApiRequest {
        let mut url = self.oauth_base.clone();
        url.set_path("/oauth/token");
        url.query_pairs_mut()
            .append_pair("client_id", &self.access_key)
            .append_pair("client_secret", self.secret_key.expose_secret())
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("code", code)
            .append_pair("grant_type", "authorization_code");
        ApiRequest::post(url)
    }
}

/// Extracts the authorization code from a navigation/redirect URL, if the
/// URL is the provider's native redirect.
pub fn extract_authorization_code(url: &Url) -> Option<String> {
    if url.path() != NATIVE_REDIRECT_PATH {
        return None;
    }
    url.query_pairs()
        .find(|(name, _)| name == "code")
        .map(|(_, value)| value.into_owned())
}

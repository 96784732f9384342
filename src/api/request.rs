use strum::Display;
use url::Url;

/// HTTP methods the API is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// A ready-to-send request: method, absolute URL and an optional bearer
/// token. Services build these and hand them to an
/// [`HttpTransport`](crate::api::transport::HttpTransport).
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub bearer_token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            bearer_token: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn delete(url: Url) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Attaches a bearer token, turning this into an authenticated request.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn example_url() -> Url {
        Url::parse("https://api.example.com/photos").expect("valid test url")
    }

    #[test]
    fn method_displays_in_wire_casing() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn constructors_pick_the_method() {
        assert_eq!(ApiRequest::get(example_url()).method, HttpMethod::Get);
        assert_eq!(ApiRequest::post(example_url()).method, HttpMethod::Post);
        assert_eq!(ApiRequest::delete(example_url()).method, HttpMethod::Delete);
    }

    #[test]
    fn with_bearer_attaches_the_token() {
        let request = ApiRequest::get(example_url());
        assert_eq!(request.bearer_token, None);

        let request = request.with_bearer("token-123");
        assert_eq!(request.bearer_token.as_deref(), Some("token-123"));
    }
}

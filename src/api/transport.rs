use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;
use crate::api::request::{ApiRequest, HttpMethod};

/// A raw HTTP exchange result: status code plus body text. Decoding happens
/// separately so the rate-limit heuristic can inspect the body first.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// The transport seam the services talk through. Production uses
/// [`ReqwestTransport`]; tests inject scripted stubs.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, ApiError>;
}

/// The API returns this as a plain-text body, on otherwise varying status
/// codes, so it has to be sniffed before any JSON decoding.
fn is_rate_limited(body: &str) -> bool {
    body.trim().to_lowercase().contains("rate limit exceeded")
}

/// Decodes a response body into `T`, mapping the failure modes onto the
/// [`ApiError`] taxonomy: rate limit first, then HTTP status, then shape.
pub fn decode_response<T: DeserializeOwned>(response: &RawResponse) -> Result<T, ApiError> {
    if is_rate_limited(&response.body) {
        log::warn!("rate limit detected (plain text body)");
        return Err(ApiError::RateLimited);
    }
    if !(200..300).contains(&response.status) {
        return Err(ApiError::HttpStatus(response.status));
    }
    serde_json::from_str(&response.body).map_err(ApiError::Decoding)
}

/// Sends a request and decodes the JSON response in one step.
pub async fn fetch_json<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    request: &ApiRequest,
) -> Result<T, ApiError> {
    log::debug!("{} {}", request.method, request.url);
    let response = transport.send(request).await?;
    decode_response(&response)
}

/// [`HttpTransport`] backed by a shared reqwest client.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Network)?;
        Ok(Self { client })
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.clone());
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(ApiError::Network)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(ApiError::Network)?;
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decode_successful_json() {
        let response = RawResponse::ok(r#"{"access_token": "abc"}"#);
        let decoded: crate::api::records::TokenResponse =
            decode_response(&response).expect("decodes");
        assert_eq!(decoded.access_token, "abc");
    }

    #[test]
    fn decode_rejects_non_success_status() {
        let response = RawResponse {
            status: 404,
            body: String::from(r#"{"errors": ["not found"]}"#),
        };
        let result = decode_response::<serde_json::Value>(&response);
        assert!(matches!(result, Err(ApiError::HttpStatus(404))));
    }

    #[test]
    fn decode_surfaces_shape_mismatch_distinctly() {
        let response = RawResponse::ok("<html>definitely not json</html>");
        let result = decode_response::<serde_json::Value>(&response);
        assert!(matches!(result, Err(ApiError::Decoding(_))));
    }

    #[test]
    fn rate_limit_body_detected_before_decoding() {
        let response = RawResponse::ok("Rate Limit Exceeded");
        let result = decode_response::<serde_json::Value>(&response);
        assert!(matches!(result, Err(ApiError::RateLimited)));
    }

    #[test]
    fn rate_limit_detection_ignores_case_whitespace_and_status() {
        let response = RawResponse {
            status: 403,
            body: String::from("  rate LIMIT exceeded\n"),
        };
        let result = decode_response::<serde_json::Value>(&response);
        assert!(matches!(result, Err(ApiError::RateLimited)));
    }
}

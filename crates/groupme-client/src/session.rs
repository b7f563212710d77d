//! HTTP session against the GroupMe API
//!
//! Thin wrapper around `reqwest::Client` that attaches the access token,
//! joins paths onto the API root, and hands back the decoded JSON body
//! together with the HTTP status code. Managers interpret the status; the
//! session only distinguishes success, no-new-content, and failure.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{Error, Result};

/// Production API root.
pub const DEFAULT_API_URL: &str = "https://api.groupme.com/v3";

/// HTTP session shared by every manager.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    access_token: String,
    base_url: String,
}

/// Outcome of a single API round trip.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code of the response.
    pub status: StatusCode,
    /// Decoded JSON body, absent on no-content responses.
    pub data: Option<Value>,
}

impl Session {
    /// Create a session against the production API.
    pub fn new(access_token: &str) -> Result<Self> {
        Self::with_base_url(access_token, DEFAULT_API_URL)
    }

    /// Create a session against a custom endpoint (for testing or proxies).
    pub fn with_base_url(access_token: &str, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            access_token: access_token.to_string(),
            base_url: base_url.into(),
        })
    }

    /// Add the access token header
    fn add_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("X-Access-Token", &self.access_token)
    }

    /// Issue a GET against an API path with query parameters.
    pub async fn get<P: Serialize + ?Sized>(&self, path: &str, params: &P) -> Result<ApiResponse> {
        let url = format!("{}/{}", self.base_url, path);

        debug!("GET {}", url);

        let response = self
            .add_auth(self.client.get(&url).query(params))
            .send()
            .await
            .map_err(Error::Http)?;

        self.read_response(response).await
    }

    /// Issue a POST with a JSON body against an API path.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, json: &B) -> Result<ApiResponse> {
        let url = format!("{}/{}", self.base_url, path);

        debug!("POST {}", url);

        let response = self
            .add_auth(self.client.post(&url).json(json))
            .send()
            .await
            .map_err(Error::Http)?;

        self.read_response(response).await
    }

    /// Turn a raw response into status plus decoded body.
    async fn read_response(&self, response: reqwest::Response) -> Result<ApiResponse> {
        let status = response.status();

        // 304 carries nothing new; the body is not decoded.
        if status == StatusCode::NOT_MODIFIED {
            return Ok(ApiResponse { status, data: None });
        }

        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            error!("API request failed: {} - {}", status, body);
            return Err(Error::Api(format!("{}: {}", status, body)));
        }

        let data = if body.is_empty() {
            None
        } else {
            Some(serde_json::from_str(&body)?)
        };

        Ok(ApiResponse { status, data })
    }
}

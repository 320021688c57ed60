/*
[INPUT]:  HTTP configuration (base URLs, timeouts) and the shared session
[OUTPUT]: Configured reqwest client ready for backend calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::auth::SessionManager;
use crate::http::{BackendError, Result};
use crate::types::ApiErrorBody;

/// Default base URL for a locally hosted backend
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:4000";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Base URLs of the three hosted services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub auth: Url,
    pub storage: Url,
    pub data: Url,
}

impl Endpoints {
    pub fn new(auth: &str, storage: &str, data: &str) -> Result<Self> {
        Ok(Self {
            auth: Url::parse(auth)?,
            storage: Url::parse(storage)?,
            data: Url::parse(data)?,
        })
    }

    /// All three services behind one host
    pub fn single(base: &str) -> Result<Self> {
        Self::new(base, base, base)
    }
}

/// Main HTTP client for the hosted backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    http_client: Client,
    endpoints: Endpoints,
    session: SessionManager,
}

impl BackendClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_endpoints(config, Endpoints::single(DEFAULT_BASE_URL)?)
    }

    /// Create a new client against explicit service endpoints
    pub fn with_config_and_endpoints(config: ClientConfig, endpoints: Endpoints) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            endpoints,
            session: SessionManager::new(),
        })
    }

    /// Create a new client from base URL strings
    pub fn with_config_and_base_urls(
        config: ClientConfig,
        auth_base_url: &str,
        storage_base_url: &str,
        data_base_url: &str,
    ) -> Result<Self> {
        let endpoints = Endpoints::new(auth_base_url, storage_base_url, data_base_url)?;
        Self::with_config_and_endpoints(config, endpoints)
    }

    /// Share an existing session manager with this client
    pub fn with_session(mut self, session: SessionManager) -> Self {
        self.session = session;
        self
    }

    /// Session held by this client
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Build request builder for identity endpoints (no bearer token)
    pub(crate) fn auth_request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.endpoints.auth.join(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Build request builder for identity endpoints that need the session
    pub(crate) fn auth_request_with_token(
        &self,
        method: Method,
        endpoint: &str,
    ) -> Result<RequestBuilder> {
        let builder = self.auth_request(method, endpoint)?;
        self.bearer(builder)
    }

    /// Build request builder for object store endpoints
    pub(crate) fn storage_request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.endpoints.storage.join(endpoint)?;
        self.bearer(self.http_client.request(method, url))
    }

    /// Build request builder addressing a single object by key
    pub(crate) fn object_request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let mut url = self.endpoints.storage.join("/v1/objects/")?;
        url.path_segments_mut()
            .map_err(|_| BackendError::Config("storage base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(path.split('/'));
        self.bearer(self.http_client.request(method, url))
    }

    /// Build request builder for structured-data endpoints
    pub(crate) fn data_request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.endpoints.data.join(endpoint)?;
        self.bearer(self.http_client.request(method, url))
    }

    fn bearer(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.session.valid_token()?;
        Ok(builder.bearer_auth(token))
    }

    /// Send a request and decode a JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = Self::check_status(builder.send().await?).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(BackendError::from)
    }

    /// Send a request whose response body is ignored
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        Self::check_status(builder.send().await?).await?;
        Ok(())
    }

    /// Send a request and return the raw body plus its content type
    pub(crate) async fn send_bytes(
        &self,
        builder: RequestBuilder,
    ) -> Result<(Vec<u8>, Option<String>)> {
        let response = Self::check_status(builder.send().await?).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;
        Ok((body.to_vec(), content_type))
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                if text.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    text
                }
            });
        Err(BackendError::api_error(status, message))
    }
}

//! The platform REST API.

use std::time::Duration;

use async_trait::async_trait;
use mkt_model::Record;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{PlatformError, parse_error_detail};

/// User agent sent with every request.
pub(crate) const USER_AGENT_VALUE: &str = concat!("mkt-seed/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Path of the OpenAPI description, relative to the API base URL.
pub const API_DESCRIPTION_PATH: &str = "/openapi/v3";

/// Paging metadata of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListMeta {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub total_pages: u32,
}

/// One page of a list operation: `{ Items, Meta }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListPage {
    #[serde(default)]
    pub items: Vec<Record>,
    #[serde(default)]
    pub meta: ListMeta,
}

/// Operations the seeder and downloader need from the platform.
///
/// Paths are relative to the API base URL and already have their route
/// parameters filled in.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    async fn list_page(
        &self,
        path: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ListPage, PlatformError>;

    async fn create(&self, path: &str, body: &Value) -> Result<Value, PlatformError>;

    async fn put(&self, path: &str, body: &Value) -> Result<Value, PlatformError>;

    async fn patch(&self, path: &str, body: &Value) -> Result<Value, PlatformError>;

    /// POST without a body, for operations such as variant generation.
    async fn post_empty(&self, path: &str) -> Result<Value, PlatformError>;

    /// The machine-readable API description.
    async fn api_description(&self) -> Result<Value, PlatformError>;
}

/// [`PlatformApi`] over HTTPS with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpPlatform {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpPlatform {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, PlatformError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PlatformError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, u32)],
        body: Option<&Value>,
    ) -> Result<Value, PlatformError> {
        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "platform request");
        if let Some(body) = body {
            tracing::trace!(body = %body, "request body");
        }

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PlatformError::network(method.as_str(), &url, e.to_string()))?;
        handle_response(&method, &url, body, response).await
    }
}

/// Maps a response to its JSON body, `Null` for 204, or a [`PlatformError`].
pub(crate) async fn handle_response(
    method: &Method,
    url: &str,
    request_body: Option<&Value>,
    response: reqwest::Response,
) -> Result<Value, PlatformError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| PlatformError::network(method.as_str(), url, e.to_string()))?;

    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), url = %url, "platform error response");
        return Err(PlatformError::status(
            method.as_str(),
            url,
            status.as_u16(),
            request_body.map(Value::to_string),
            parse_error_detail(&text),
        ));
    }
    if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| PlatformError::Decode {
        method: method.to_string(),
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl PlatformApi for HttpPlatform {
    async fn list_page(
        &self,
        path: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ListPage, PlatformError> {
        let value = self
            .send(
                Method::GET,
                path,
                &[("page", page), ("pageSize", page_size)],
                None,
            )
            .await?;
        serde_json::from_value(value).map_err(|e| PlatformError::Decode {
            method: Method::GET.to_string(),
            url: self.url(path),
            message: e.to_string(),
        })
    }

    async fn create(&self, path: &str, body: &Value) -> Result<Value, PlatformError> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, PlatformError> {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    async fn patch(&self, path: &str, body: &Value) -> Result<Value, PlatformError> {
        self.send(Method::PATCH, path, &[], Some(body)).await
    }

    async fn post_empty(&self, path: &str) -> Result<Value, PlatformError> {
        self.send(Method::POST, path, &[], None).await
    }

    async fn api_description(&self) -> Result<Value, PlatformError> {
        self.send(Method::GET, API_DESCRIPTION_PATH, &[], None).await
    }
}

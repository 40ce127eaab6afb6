//! The portal: login and marketplace (organization) management.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PlatformError;
use crate::platform::{USER_AGENT_VALUE, handle_response};

/// Default portal API base URL.
pub const DEFAULT_PORTAL_URL: &str = "https://portal.ordercloud.io/api/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A marketplace as the portal describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[async_trait]
pub trait PortalApi: Send + Sync {
    /// Exchanges portal credentials for a portal token.
    async fn login(&self, username: &str, password: &str) -> Result<String, PlatformError>;

    /// A platform token with full access to one marketplace.
    async fn organization_token(
        &self,
        token: &str,
        org_id: &str,
    ) -> Result<String, PlatformError>;

    /// `Ok(None)` when no marketplace has this ID.
    async fn get_organization(
        &self,
        token: &str,
        org_id: &str,
    ) -> Result<Option<Organization>, PlatformError>;

    async fn create_organization(
        &self,
        token: &str,
        organization: &Organization,
    ) -> Result<Organization, PlatformError>;
}

#[derive(Debug, Clone)]
pub struct HttpPortal {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPortal {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PlatformError> {
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
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: Option<&Value>,
    ) -> Result<Value, PlatformError> {
        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "portal request");
        let mut request = self.client.request(method.clone(), &url).bearer_auth(token);
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

fn decode<T: DeserializeOwned>(
    method: &Method,
    url: String,
    value: Value,
) -> Result<T, PlatformError> {
    serde_json::from_value(value).map_err(|e| PlatformError::Decode {
        method: method.to_string(),
        url,
        message: e.to_string(),
    })
}

#[async_trait]
impl PortalApi for HttpPortal {
    async fn login(&self, username: &str, password: &str) -> Result<String, PlatformError> {
        let url = self.url("/oauth/token");
        tracing::debug!(url = %url, "portal login");
        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
            ])
            .send()
            .await
            .map_err(|e| PlatformError::network("POST", &url, e.to_string()))?;
        // The request body holds the password and stays out of errors.
        let value = handle_response(&Method::POST, &url, None, response).await?;
        let token: TokenResponse = decode(&Method::POST, url, value)?;
        Ok(token.access_token)
    }

    async fn organization_token(
        &self,
        token: &str,
        org_id: &str,
    ) -> Result<String, PlatformError> {
        let path = format!("/organizations/{org_id}/token");
        let value = self.send(Method::GET, &path, token, None).await?;
        let token: TokenResponse = decode(&Method::GET, self.url(&path), value)?;
        Ok(token.access_token)
    }

    async fn get_organization(
        &self,
        token: &str,
        org_id: &str,
    ) -> Result<Option<Organization>, PlatformError> {
        let path = format!("/organizations/{org_id}");
        match self.send(Method::GET, &path, token, None).await {
            Ok(value) => decode(&Method::GET, self.url(&path), value).map(Some),
            Err(error) if error.status_code() == Some(404) => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn create_organization(
        &self,
        token: &str,
        organization: &Organization,
    ) -> Result<Organization, PlatformError> {
        let path = format!("/organizations/{}", organization.id);
        let body = serde_json::to_value(organization).map_err(|e| PlatformError::Decode {
            method: Method::PUT.to_string(),
            url: self.url(&path),
            message: e.to_string(),
        })?;
        let value = self.send(Method::PUT, &path, token, Some(&body)).await?;
        decode(&Method::PUT, self.url(&path), value)
    }
}

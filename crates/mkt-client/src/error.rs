//! Errors returned by the platform and portal clients.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// First entry of the platform's `Errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub error_code: String,
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_code, self.message)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorPayload {
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

/// A failed request to the platform or the portal.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlatformError {
    /// The request never produced a response.
    #[error("{method} {url} failed: {message}")]
    Network {
        method: String,
        url: String,
        message: String,
    },

    /// The platform answered with a non-success status.
    #[error(
        "{method} {url} returned {status}{}. The platform rejected a request the tool built; this may be a defect in the seeding tool.{}",
        detail_suffix(.detail),
        body_suffix(.request_body)
    )]
    Status {
        method: String,
        url: String,
        status: u16,
        request_body: Option<String>,
        detail: Option<ApiErrorDetail>,
    },

    /// The response body was not the JSON the client expected.
    #[error("{method} {url} returned an unreadable body: {message}")]
    Decode {
        method: String,
        url: String,
        message: String,
    },

    #[error("could not build the HTTP client: {0}")]
    Client(String),
}

impl PlatformError {
    pub fn status(
        method: impl Into<String>,
        url: impl Into<String>,
        status: u16,
        request_body: Option<String>,
        detail: Option<ApiErrorDetail>,
    ) -> Self {
        Self::Status {
            method: method.into(),
            url: url.into(),
            status,
            request_body,
            detail,
        }
    }

    pub fn network(
        method: impl Into<String>,
        url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Network {
            method: method.into(),
            url: url.into(),
            message: message.into(),
        }
    }

    /// Transport failures, throttling, and server errors are retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Decode { .. } | Self::Client(_) => false,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&ApiErrorDetail> {
        match self {
            Self::Status { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }
}

fn detail_suffix(detail: &Option<ApiErrorDetail>) -> String {
    detail
        .as_ref()
        .map(|detail| format!(": {}", detail.to_string().trim_end_matches('.')))
        .unwrap_or_default()
}

fn body_suffix(request_body: &Option<String>) -> String {
    request_body
        .as_ref()
        .map(|body| format!("\nrequest body: {body}"))
        .unwrap_or_default()
}

/// Extracts the first structured error from a response body, if any.
pub(crate) fn parse_error_detail(body: &str) -> Option<ApiErrorDetail> {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()?
        .errors
        .into_iter()
        .next()
}

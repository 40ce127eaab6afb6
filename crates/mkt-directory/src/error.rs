use std::path::PathBuf;

use mkt_model::ResourceName;

/// Tool-configuration problems: the static directory and the platform's API
/// description disagree, or a fixture could not be read.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse API description {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API description: {message}")]
    InvalidDescription { message: String },

    #[error("operation {operation_id} for {resource} not found in API description")]
    MissingOperation {
        resource: ResourceName,
        operation_id: &'static str,
    },

    #[error("operation {operation_id} for {resource} has no JSON request body")]
    MissingRequestBody {
        resource: ResourceName,
        operation_id: &'static str,
    },

    #[error("unresolved schema reference {reference}")]
    DanglingReference { reference: String },

    #[error("route {route} for {resource} expects {expected} parameters, got {actual}")]
    RouteParams {
        resource: ResourceName,
        route: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl DirectoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

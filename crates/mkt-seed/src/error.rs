use std::path::PathBuf;

use mkt_client::PlatformError;
use mkt_directory::DirectoryError;
use mkt_model::{InputError, ResourceName};
use thiserror::Error;

/// Everything that can stop a download or a seeding run.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("document has {issue_count} validation issue(s); nothing was written")]
    ValidationFailed { issue_count: usize },

    #[error("{resource} record {index} has no value for route field {field}")]
    MissingRouteField {
        resource: ResourceName,
        index: usize,
        field: &'static str,
    },

    #[error("categories {ids:?} in catalog {catalog_id} never reach a top-level category")]
    UnreachableCategories {
        catalog_id: String,
        ids: Vec<String>,
    },

    #[error("invalid configuration {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize document: {message}")]
    Serialize { message: String },
}

impl SeedError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SeedError>;

use std::path::PathBuf;

use thiserror::Error;

use crate::resource::UnknownResource;

/// User-correctable problems detected before any write to the platform.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("missing required argument: {name}")]
    MissingArgument { name: String },

    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("could not parse {source_name}: {message}")]
    MalformedDocument {
        source_name: String,
        message: String,
    },

    #[error(transparent)]
    UnknownResource(#[from] UnknownResource),

    #[error("invalid environment \"{name}\": expected one of sandbox, staging, production")]
    InvalidEnvironment { name: String },

    #[error("organization \"{id}\" not found")]
    OrganizationNotFound { id: String },

    #[error("organization \"{id}\" already exists")]
    OrganizationExists { id: String },

    #[error("invalid credentials for user \"{username}\"")]
    InvalidCredentials { username: String },
}

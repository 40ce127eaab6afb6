//! Portal sign-in, marketplace lookup, and directory set-up.

use mkt_client::{Environment, Organization, PlatformApi, PlatformError, PortalApi};
use mkt_directory::{ApiDescription, Directory};
use mkt_model::InputError;
use tracing::info;

use crate::error::Result;

/// Portal credentials. `Debug` leaves the password out.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Signs in to the portal. Rejected credentials are an input error.
pub async fn login(portal: &dyn PortalApi, credentials: &Credentials) -> Result<String> {
    match portal
        .login(&credentials.username, &credentials.password)
        .await
    {
        Ok(token) => Ok(token),
        Err(error) if is_auth_failure(&error) => {
            Err(InputError::InvalidCredentials {
                username: credentials.username.clone(),
            }
            .into())
        }
        Err(error) => Err(error.into()),
    }
}

/// The marketplace a command works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketplaceTarget {
    /// Must already exist.
    Existing { id: String },
    /// Must not exist yet; created in the environment.
    New {
        id: String,
        name: String,
        environment: Environment,
    },
}

impl MarketplaceTarget {
    pub fn id(&self) -> &str {
        match self {
            Self::Existing { id } | Self::New { id, .. } => id,
        }
    }
}

/// Finds or creates the target marketplace.
pub async fn open_marketplace(
    portal: &dyn PortalApi,
    portal_token: &str,
    target: &MarketplaceTarget,
) -> Result<Organization> {
    let existing = portal.get_organization(portal_token, target.id()).await?;
    match (target, existing) {
        (MarketplaceTarget::Existing { .. }, Some(organization)) => {
            info!(marketplace = %organization.id, "using existing marketplace");
            Ok(organization)
        }
        (MarketplaceTarget::Existing { id }, None) => {
            Err(InputError::OrganizationNotFound { id: id.clone() }.into())
        }
        (MarketplaceTarget::New { id, .. }, Some(_)) => {
            Err(InputError::OrganizationExists { id: id.clone() }.into())
        }
        (
            MarketplaceTarget::New {
                id,
                name,
                environment,
            },
            None,
        ) => {
            let organization = Organization {
                id: id.clone(),
                name: name.clone(),
                environment: environment.portal_name().to_string(),
                region: Some(environment.region().to_string()),
            };
            let created = portal
                .create_organization(portal_token, &organization)
                .await?;
            info!(marketplace = %created.id, environment = %environment, "created marketplace");
            Ok(created)
        }
    }
}

/// Builds the resource directory, optionally resolving field schemas from
/// the platform's API description.
pub async fn build_directory(platform: &dyn PlatformApi, include_schema: bool) -> Result<Directory> {
    let directory = Directory::builtin();
    if !include_schema {
        return Ok(directory);
    }
    let description = platform.api_description().await?;
    let description = ApiDescription::from_value(description)?;
    Ok(directory.with_schema(&description)?)
}

fn is_auth_failure(error: &PlatformError) -> bool {
    matches!(error.status_code(), Some(400 | 401))
}

//! Clients for the marketplace platform API and the portal.
//!
//! The seeder depends only on the [`PlatformApi`] and [`PortalApi`] traits;
//! [`HttpPlatform`] and [`HttpPortal`] are the `reqwest` implementations.

pub mod environment;
pub mod error;
pub mod platform;
pub mod portal;

pub use environment::Environment;
pub use error::{ApiErrorDetail, PlatformError};
pub use platform::{API_DESCRIPTION_PATH, HttpPlatform, ListMeta, ListPage, PlatformApi};
pub use portal::{DEFAULT_PORTAL_URL, HttpPortal, Organization, PortalApi};

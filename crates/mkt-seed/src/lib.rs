//! Seeding and download engine.
//!
//! - [`bulk`]: rate-limited, retrying request fan-out shared by a whole run
//! - [`seeder`]: validated, priority-ordered upload with per-type strategies
//! - [`downloader`]: marketplace export with per-type transforms
//! - [`loader`]: document files and URLs
//! - [`session`]: portal sign-in and marketplace lookup

pub mod bulk;
pub mod config;
pub mod context;
pub mod downloader;
pub mod error;
pub mod loader;
pub mod secrets;
pub mod seeder;
pub mod session;
pub mod strategies;
pub mod transforms;

pub use bulk::{BulkExecutor, LogProgress, ProgressReporter, RetryPolicy};
pub use config::{CONFIG_ENV_VAR, EnvironmentOverride, ExecutorSettings, SeedConfig};
pub use context::{RunContext, SeedContext, SeedSummary};
pub use downloader::Downloader;
pub use error::SeedError;
pub use loader::{DocumentSource, load_document, parse_document, write_document};
pub use seeder::Seeder;
pub use session::{Credentials, MarketplaceTarget, build_directory, login, open_marketplace};
pub use strategies::{StrategyRegistry, UploadStrategy, default_strategies};
pub use transforms::{DownloadTransform, TransformRegistry, default_transforms};

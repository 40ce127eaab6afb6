//! Upload strategies for resource types that cannot be bulk-created as is.
//!
//! The seeder looks each resource type up in a [`StrategyRegistry`]; types
//! without a registered strategy go through [`generic_create`].
//!
//! | Resource | Strategy |
//! |----------|----------|
//! | `ApiClients` | create, then remember the minted IDs |
//! | `Categories` | create in parent-before-child cohorts per catalog |
//! | `Specs` | create without `DefaultOptionID` |
//! | `SpecOptions` | create, then patch the deferred spec defaults |
//! | `Variants` | generate per product, then save each record |

use std::collections::HashMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use mkt_directory::{Directory, ResourceMetadata};
use mkt_model::{Record, RecordExt, ResourceName};

use crate::context::{RunContext, SeedContext};
use crate::error::{Result, SeedError};

mod api_clients;
mod categories;
mod specs;
mod variants;

pub use categories::category_cohorts;
pub use specs::apply_spec_defaults;
pub use variants::{generated_variant_id, variant_defining_specs};

/// Creates the records of one resource type.
#[async_trait]
pub trait UploadStrategy: Send + Sync {
    fn resource(&self) -> ResourceName;

    fn description(&self) -> &'static str {
        "Upload strategy"
    }

    /// Uploads prepared records and returns what the platform created.
    async fn upload(
        &self,
        ctx: &SeedContext<'_>,
        run: &mut RunContext,
        records: Vec<Record>,
    ) -> Result<Vec<Record>>;
}

/// Upload strategies keyed by resource type.
pub struct StrategyRegistry {
    strategies: HashMap<ResourceName, Box<dyn UploadStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Registers a strategy, replacing any previous one for its resource.
    pub fn register(&mut self, strategy: Box<dyn UploadStrategy>) {
        self.strategies.insert(strategy.resource(), strategy);
    }

    pub fn get(&self, resource: ResourceName) -> Option<&dyn UploadStrategy> {
        self.strategies.get(&resource).map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn resources(&self) -> impl Iterator<Item = ResourceName> + '_ {
        self.strategies.keys().copied()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(api_clients::ApiClientStrategy));
        registry.register(Box::new(categories::CategoryStrategy));
        registry.register(Box::new(specs::SpecStrategy));
        registry.register(Box::new(specs::SpecOptionStrategy));
        registry.register(Box::new(variants::VariantStrategy));
        registry
    }
}

static DEFAULT_STRATEGIES: OnceLock<StrategyRegistry> = OnceLock::new();

/// The built-in strategies, built on first use.
pub fn default_strategies() -> &'static StrategyRegistry {
    DEFAULT_STRATEGIES.get_or_init(StrategyRegistry::default)
}

/// Values of the record's route fields, outermost first.
pub fn route_values(
    directory: &Directory,
    resource: &ResourceMetadata,
    index: usize,
    record: &Record,
) -> Result<Vec<String>> {
    directory
        .route_params(resource.name)
        .into_iter()
        .map(|field| {
            record
                .scalar_field(field)
                .ok_or(SeedError::MissingRouteField {
                    resource: resource.name,
                    index,
                    field,
                })
        })
        .collect()
}

/// Bulk-creates records under their own route parameters.
pub async fn generic_create(
    ctx: &SeedContext<'_>,
    resource: &ResourceMetadata,
    records: Vec<Record>,
) -> Result<Vec<Record>> {
    let items = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let params = route_values(ctx.directory, resource, index, &record)?;
            Ok((params, record))
        })
        .collect::<Result<Vec<_>>>()?;
    ctx.executor.create_all(resource, items).await
}

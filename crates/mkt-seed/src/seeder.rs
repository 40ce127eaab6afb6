//! Uploads a validated document into a marketplace.
//!
//! Resource types are created strictly in ascending creation priority; a
//! type starts only after every record of the previous one was created.
//! A failure aborts the run and nothing already created is rolled back.

use mkt_directory::{Cardinality, Directory, ResourceMetadata};
use mkt_model::{
    MARKETPLACE_ID_PLACEHOLDER, REDACTED_MESSAGE, Record, ResourceName, SerializedMarketplace,
};
use mkt_validate::Validator;
use serde_json::Value;
use tracing::{Instrument, debug, info, info_span};

use crate::bulk::BulkExecutor;
use crate::context::{RunContext, SeedContext, SeedSummary};
use crate::error::{Result, SeedError};
use crate::secrets::generate_secret;
use crate::strategies::{StrategyRegistry, apply_spec_defaults, default_strategies, generic_create};

pub struct Seeder<'a> {
    directory: &'a Directory,
    executor: &'a BulkExecutor,
    strategies: &'a StrategyRegistry,
}

impl<'a> Seeder<'a> {
    pub fn new(directory: &'a Directory, executor: &'a BulkExecutor) -> Self {
        Self {
            directory,
            executor,
            strategies: default_strategies(),
        }
    }

    #[must_use]
    pub fn with_strategies(mut self, strategies: &'a StrategyRegistry) -> Self {
        self.strategies = strategies;
        self
    }

    /// Validates `document`, then creates every record in `marketplace_id`.
    ///
    /// # Errors
    ///
    /// [`SeedError::ValidationFailed`] before any request when the document
    /// has issues; otherwise the first platform error that survives retries.
    pub async fn seed(
        &self,
        document: &SerializedMarketplace,
        marketplace_id: &str,
    ) -> Result<SeedSummary> {
        let outcome = Validator::new(self.directory).validate(document);
        if !outcome.is_valid() {
            return Err(SeedError::ValidationFailed {
                issue_count: outcome.report.error_count(),
            });
        }

        let ctx = SeedContext {
            directory: self.directory,
            document,
            executor: self.executor,
        };
        let mut run = RunContext::new(marketplace_id);
        info!(
            marketplace = marketplace_id,
            records = document.record_count(),
            "seeding marketplace"
        );

        for resource in self.directory.creation_order() {
            let records = document.records(resource.name);
            if records.is_empty() {
                continue;
            }
            let span = info_span!(
                "resource",
                resource = %resource.name,
                priority = resource.create_priority
            );
            self.upload_resource(&ctx, &mut run, resource, records)
                .instrument(span)
                .await?;
        }
        apply_spec_defaults(&ctx, &mut run).await?;

        let summary = run.into_summary();
        info!(
            marketplace = marketplace_id,
            created = summary.total_created(),
            "seeding finished"
        );
        Ok(summary)
    }

    async fn upload_resource(
        &self,
        ctx: &SeedContext<'_>,
        run: &mut RunContext,
        resource: &ResourceMetadata,
        records: &[Record],
    ) -> Result<()> {
        let prepared: Vec<Record> = records
            .iter()
            .map(|record| prepare_record(resource, record.clone(), run))
            .collect();

        self.executor.begin(resource.name.as_str(), prepared.len());
        let created = match self.strategies.get(resource.name) {
            Some(strategy) => {
                debug!(strategy = strategy.description(), "using upload strategy");
                strategy.upload(ctx, run, prepared).await?
            }
            None => generic_create(ctx, resource, prepared).await?,
        };
        self.executor.finish(resource.name.as_str());

        run.count_created(resource.name, created.len());
        info!(created = created.len(), "created records");
        Ok(())
    }
}

/// Readies a document record for upload: fresh secrets for redacted fields,
/// the real marketplace ID for the owner placeholder, and minted IDs for
/// API client references.
pub fn prepare_record(resource: &ResourceMetadata, mut record: Record, run: &mut RunContext) -> Record {
    for field in resource.redact_fields {
        if record.get(*field).and_then(Value::as_str) == Some(REDACTED_MESSAGE) {
            record.insert((*field).to_string(), Value::String(generate_secret()));
            run.count_secret();
        }
    }

    if let Some(owner_field) = resource.owner_field
        && record.get(owner_field).and_then(Value::as_str) == Some(MARKETPLACE_ID_PLACEHOLDER)
    {
        record.insert(
            owner_field.to_string(),
            Value::String(run.marketplace_id.clone()),
        );
    }

    for key in resource
        .foreign_keys
        .iter()
        .filter(|key| key.target == ResourceName::ApiClients)
    {
        let Some(value) = record.get_mut(key.field) else {
            continue;
        };
        match (key.cardinality, value) {
            (Cardinality::Scalar, Value::String(id)) => remap_api_client(id, run),
            (Cardinality::Array, Value::Array(ids)) => {
                for id in ids.iter_mut() {
                    if let Value::String(id) = id {
                        remap_api_client(id, run);
                    }
                }
            }
            _ => {}
        }
    }
    record
}

fn remap_api_client(id: &mut String, run: &RunContext) {
    if let Some(minted) = run.api_client_id(id) {
        *id = minted.to_string();
    }
}

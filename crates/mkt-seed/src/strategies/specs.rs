use async_trait::async_trait;
use mkt_model::{Record, RecordExt, ResourceName};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::context::{RunContext, SeedContext};
use crate::error::Result;

/// A spec's default option cannot be set before the option exists, so
/// specs are created without one and patched after their options.
pub(super) struct SpecStrategy;

#[async_trait]
impl super::UploadStrategy for SpecStrategy {
    fn resource(&self) -> ResourceName {
        ResourceName::Specs
    }

    fn description(&self) -> &'static str {
        "Create specs and defer their default options"
    }

    async fn upload(
        &self,
        ctx: &SeedContext<'_>,
        run: &mut RunContext,
        records: Vec<Record>,
    ) -> Result<Vec<Record>> {
        let resource = ctx.directory.get(ResourceName::Specs);
        let items = records
            .into_iter()
            .map(|mut record| {
                if let (Some(spec_id), Some(option_id)) =
                    (record.id(), record.str_field("DefaultOptionID"))
                {
                    run.defer_spec_default(spec_id, option_id);
                }
                if record.contains_key("DefaultOptionID") {
                    record.insert("DefaultOptionID".to_string(), Value::Null);
                }
                (Vec::new(), record)
            })
            .collect();
        ctx.executor.create_all(resource, items).await
    }
}

pub(super) struct SpecOptionStrategy;

#[async_trait]
impl super::UploadStrategy for SpecOptionStrategy {
    fn resource(&self) -> ResourceName {
        ResourceName::SpecOptions
    }

    fn description(&self) -> &'static str {
        "Create spec options, then restore spec defaults"
    }

    async fn upload(
        &self,
        ctx: &SeedContext<'_>,
        run: &mut RunContext,
        records: Vec<Record>,
    ) -> Result<Vec<Record>> {
        let resource = ctx.directory.get(ResourceName::SpecOptions);
        let created = super::generic_create(ctx, resource, records).await?;
        apply_spec_defaults(ctx, run).await?;
        Ok(created)
    }
}

/// Patches every deferred `DefaultOptionID` back onto its spec.
///
/// A no-op once the deferred pairs have been applied.
pub async fn apply_spec_defaults(ctx: &SeedContext<'_>, run: &mut RunContext) -> Result<()> {
    let pending = run.take_spec_defaults();
    if pending.is_empty() {
        return Ok(());
    }
    let specs = ctx.directory.get(ResourceName::Specs);
    let patches = pending
        .into_iter()
        .map(|(spec_id, option_id)| Ok((specs.item_path(&[], &spec_id)?, option_id)))
        .collect::<Result<Vec<(String, String)>>>()?;
    let count = patches.len();
    let platform = ctx.executor.platform();

    ctx.executor
        .run_many("Specs", patches, move |(path, option_id)| async move {
            debug!(path = %path, option_id = %option_id, "restoring spec default option");
            platform
                .patch(&path, &json!({ "DefaultOptionID": option_id }))
                .await
        })
        .await?;
    info!(count, "restored spec default options");
    Ok(())
}

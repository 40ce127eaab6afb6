use async_trait::async_trait;
use mkt_model::{Record, RecordExt, ResourceName};
use tracing::debug;

use crate::context::{RunContext, SeedContext};
use crate::error::Result;

/// API client IDs are minted by the platform, so the document's IDs are
/// dropped on create and mapped to the new ones for later resource types.
pub(super) struct ApiClientStrategy;

#[async_trait]
impl super::UploadStrategy for ApiClientStrategy {
    fn resource(&self) -> ResourceName {
        ResourceName::ApiClients
    }

    fn description(&self) -> &'static str {
        "Create API clients and remap their IDs"
    }

    async fn upload(
        &self,
        ctx: &SeedContext<'_>,
        run: &mut RunContext,
        records: Vec<Record>,
    ) -> Result<Vec<Record>> {
        let resource = ctx.directory.get(ResourceName::ApiClients);
        let document_ids: Vec<Option<String>> = records
            .iter()
            .map(|record| record.id().map(str::to_string))
            .collect();
        let items = records
            .into_iter()
            .map(|mut record| {
                record.remove("ID");
                (Vec::new(), record)
            })
            .collect();

        let created = ctx.executor.create_all(resource, items).await?;
        for (document_id, record) in document_ids.into_iter().zip(&created) {
            if let (Some(document_id), Some(minted)) = (document_id, record.id()) {
                debug!(document_id = %document_id, minted_id = minted, "remapped API client");
                run.remember_api_client(document_id, minted);
            }
        }
        Ok(created)
    }
}

//! Exports a marketplace into a portable document.

use futures::future::try_join_all;
use mkt_directory::{Directory, ResourceMetadata};
use mkt_model::{
    MARKETPLACE_ID_PLACEHOLDER, REDACTED_MESSAGE, Record, RecordExt, SerializedMarketplace,
    TOOL_VERSION,
};
use serde_json::Value;
use tracing::{Instrument, debug, info, info_span};

use crate::bulk::BulkExecutor;
use crate::error::Result;
use crate::transforms::{TransformRegistry, default_transforms};

pub struct Downloader<'a> {
    directory: &'a Directory,
    executor: &'a BulkExecutor,
    transforms: &'a TransformRegistry,
}

impl<'a> Downloader<'a> {
    pub fn new(directory: &'a Directory, executor: &'a BulkExecutor) -> Self {
        Self {
            directory,
            executor,
            transforms: default_transforms(),
        }
    }

    #[must_use]
    pub fn with_transforms(mut self, transforms: &'a TransformRegistry) -> Self {
        self.transforms = transforms;
        self
    }

    /// Lists every resource of the marketplace, children under each parent
    /// record, and returns them as a document.
    pub async fn download(&self, marketplace_id: &str) -> Result<SerializedMarketplace> {
        let mut document = SerializedMarketplace::new(TOOL_VERSION);
        info!(marketplace = marketplace_id, "downloading marketplace");

        for resource in self.directory.top_level() {
            let mut pending = vec![(resource.name, vec![Vec::new()])];
            while let Some((name, parents)) = pending.pop() {
                let resource = self.directory.get(name);
                let span = info_span!("resource", resource = %name);
                let listed = self
                    .list_resource(resource, &parents)
                    .instrument(span)
                    .await?;

                for child in self.directory.children_of(name) {
                    let child_params: Vec<Vec<String>> = listed
                        .iter()
                        .filter_map(|(params, record)| {
                            let id = record.id()?;
                            let mut child_params = params.clone();
                            child_params.push(id.to_string());
                            Some(child_params)
                        })
                        .collect();
                    if !child_params.is_empty() {
                        pending.push((*child, child_params));
                    }
                }

                let mut records: Vec<Record> = listed.into_iter().map(|(_, record)| record).collect();
                for record in &mut records {
                    self.clean_record(resource, record, marketplace_id);
                }
                if let Some(existing) = document.records_mut(name) {
                    existing.append(&mut records);
                } else {
                    document.set_records(name, resource.is_assignment, records);
                }
            }
        }

        info!(
            marketplace = marketplace_id,
            records = document.record_count(),
            "download finished"
        );
        Ok(document)
    }

    /// Lists a resource under every parent parameter set, injecting the
    /// route fields into each record.
    async fn list_resource(
        &self,
        resource: &ResourceMetadata,
        parents: &[Vec<String>],
    ) -> Result<Vec<(Vec<String>, Record)>> {
        let route_fields = self.directory.route_params(resource.name);
        self.executor.begin(resource.name.as_str(), parents.len());
        let pages = try_join_all(parents.iter().map(|params| async move {
            let records = self.executor.list_all(resource, params).await?;
            self.executor.advance();
            Ok::<_, crate::error::SeedError>((params, records))
        }))
        .await?;
        self.executor.finish(resource.name.as_str());

        let mut listed = Vec::new();
        for (params, records) in pages {
            for mut record in records {
                for (field, value) in route_fields.iter().zip(params) {
                    record.insert((*field).to_string(), Value::String(value.clone()));
                }
                listed.push((params.clone(), record));
            }
        }
        debug!(count = listed.len(), "listed records");
        Ok(listed)
    }

    fn clean_record(&self, resource: &ResourceMetadata, record: &mut Record, marketplace_id: &str) {
        if let Some(owner_field) = resource.owner_field
            && record.str_field(owner_field) == Some(marketplace_id)
        {
            record.insert(
                owner_field.to_string(),
                Value::String(MARKETPLACE_ID_PLACEHOLDER.to_string()),
            );
        }
        for field in resource.redact_fields {
            if !record.is_null_or_absent(field) {
                record.insert(
                    (*field).to_string(),
                    Value::String(REDACTED_MESSAGE.to_string()),
                );
            }
        }
        self.transforms.apply(resource.name, record);
    }
}

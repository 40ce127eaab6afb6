use std::collections::BTreeSet;

use async_trait::async_trait;
use mkt_model::{Record, RecordExt, ResourceName};
use tracing::debug;

use crate::context::{RunContext, SeedContext};
use crate::error::{Result, SeedError};

/// Categories are created breadth-first per catalog: top-level categories,
/// then the children of the previous cohort, until none remain.
pub(super) struct CategoryStrategy;

#[async_trait]
impl super::UploadStrategy for CategoryStrategy {
    fn resource(&self) -> ResourceName {
        ResourceName::Categories
    }

    fn description(&self) -> &'static str {
        "Create categories parent-first in cohorts"
    }

    async fn upload(
        &self,
        ctx: &SeedContext<'_>,
        _run: &mut RunContext,
        records: Vec<Record>,
    ) -> Result<Vec<Record>> {
        let resource = ctx.directory.get(ResourceName::Categories);
        let mut created = Vec::with_capacity(records.len());

        for (catalog_id, records) in by_catalog(records) {
            let mut remaining = records;
            let mut parents: Option<BTreeSet<String>> = None;
            let mut depth = 0usize;
            loop {
                let (cohort, rest): (Vec<Record>, Vec<Record>) =
                    remaining.into_iter().partition(|record| {
                        belongs_to_cohort(record, parents.as_ref())
                    });
                remaining = rest;
                if cohort.is_empty() {
                    break;
                }
                debug!(catalog = %catalog_id, depth, count = cohort.len(), "creating category cohort");
                let items = cohort
                    .into_iter()
                    .map(|record| (vec![catalog_id.clone()], record))
                    .collect();
                let cohort_created = ctx.executor.create_all(resource, items).await?;
                parents = Some(
                    cohort_created
                        .iter()
                        .filter_map(|record| record.id().map(str::to_string))
                        .collect(),
                );
                created.extend(cohort_created);
                depth += 1;
            }
            if !remaining.is_empty() {
                return Err(SeedError::UnreachableCategories {
                    catalog_id,
                    ids: remaining
                        .iter()
                        .map(|record| record.id().unwrap_or_default().to_string())
                        .collect(),
                });
            }
        }
        Ok(created)
    }
}

fn belongs_to_cohort(record: &Record, parents: Option<&BTreeSet<String>>) -> bool {
    match parents {
        None => record.is_null_or_absent("ParentID"),
        Some(parents) => record
            .str_field("ParentID")
            .is_some_and(|parent| parents.contains(parent)),
    }
}

/// Records grouped by `CatalogID`, catalogs in first-seen order.
fn by_catalog(records: Vec<Record>) -> Vec<(String, Vec<Record>)> {
    let mut groups: Vec<(String, Vec<Record>)> = Vec::new();
    for record in records {
        let catalog_id = record.scalar_field("CatalogID").unwrap_or_default();
        match groups.iter_mut().find(|(id, _)| *id == catalog_id) {
            Some((_, group)) => group.push(record),
            None => groups.push((catalog_id, vec![record])),
        }
    }
    groups
}

/// Category IDs per creation cohort for one catalog's records.
///
/// Mirrors the upload order without touching the platform.
pub fn category_cohorts(records: &[Record]) -> Vec<Vec<String>> {
    let mut cohorts = Vec::new();
    let mut remaining: Vec<&Record> = records.iter().collect();
    let mut parents: Option<BTreeSet<String>> = None;
    loop {
        let (cohort, rest): (Vec<&Record>, Vec<&Record>) = remaining
            .into_iter()
            .partition(|record| belongs_to_cohort(record, parents.as_ref()));
        remaining = rest;
        if cohort.is_empty() {
            return cohorts;
        }
        let ids: Vec<String> = cohort
            .iter()
            .filter_map(|record| record.id().map(str::to_string))
            .collect();
        parents = Some(ids.iter().cloned().collect());
        cohorts.push(ids);
    }
}

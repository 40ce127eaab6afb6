//! State shared by the steps of one seeding run.
//!
//! [`SeedContext`] bundles the read-only inputs; [`RunContext`] owns what the
//! run learns as it goes (minted API client IDs, deferred spec defaults,
//! counts). Both live for exactly one run.

use std::collections::BTreeMap;

use mkt_directory::Directory;
use mkt_model::{ResourceName, SerializedMarketplace};
use serde::Serialize;

use crate::bulk::BulkExecutor;

/// Read-only inputs of a seeding run.
#[derive(Debug, Clone, Copy)]
pub struct SeedContext<'a> {
    pub directory: &'a Directory,
    pub document: &'a SerializedMarketplace,
    pub executor: &'a BulkExecutor,
}

/// Mutable state of a seeding run.
#[derive(Debug, Default)]
pub struct RunContext {
    pub marketplace_id: String,
    /// Document API client ID to the ID the platform minted.
    api_client_ids: BTreeMap<String, String>,
    /// (spec ID, default option ID) pairs to patch once options exist.
    pending_spec_defaults: Vec<(String, String)>,
    created: BTreeMap<ResourceName, usize>,
    secrets_generated: usize,
}

impl RunContext {
    pub fn new(marketplace_id: impl Into<String>) -> Self {
        Self {
            marketplace_id: marketplace_id.into(),
            ..Self::default()
        }
    }

    pub fn remember_api_client(&mut self, document_id: impl Into<String>, minted_id: impl Into<String>) {
        self.api_client_ids
            .insert(document_id.into(), minted_id.into());
    }

    /// The minted ID for a document API client ID, if it was created.
    pub fn api_client_id(&self, document_id: &str) -> Option<&str> {
        self.api_client_ids.get(document_id).map(String::as_str)
    }

    pub fn api_client_ids(&self) -> &BTreeMap<String, String> {
        &self.api_client_ids
    }

    pub fn defer_spec_default(&mut self, spec_id: impl Into<String>, option_id: impl Into<String>) {
        self.pending_spec_defaults
            .push((spec_id.into(), option_id.into()));
    }

    pub fn take_spec_defaults(&mut self) -> Vec<(String, String)> {
        std::mem::take(&mut self.pending_spec_defaults)
    }

    pub fn count_created(&mut self, resource: ResourceName, count: usize) {
        *self.created.entry(resource).or_default() += count;
    }

    pub fn count_secret(&mut self) {
        self.secrets_generated += 1;
    }

    pub fn into_summary(self) -> SeedSummary {
        SeedSummary {
            marketplace_id: self.marketplace_id,
            created: self.created,
            secrets_generated: self.secrets_generated,
            api_clients_remapped: self.api_client_ids.len(),
        }
    }
}

/// What a finished seeding run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub marketplace_id: String,
    /// Records created per resource type, in resource order.
    pub created: BTreeMap<ResourceName, usize>,
    pub secrets_generated: usize,
    pub api_clients_remapped: usize,
}

impl SeedSummary {
    pub fn total_created(&self) -> usize {
        self.created.values().sum()
    }
}

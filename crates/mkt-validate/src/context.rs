//! Read-only state shared by the reference checks and resource rules.

use std::collections::HashMap;

use mkt_directory::Directory;
use mkt_model::{
    IssueKind, MARKETPLACE_ID_PLACEHOLDER, Record, RecordExt, ResourceName, SerializedMarketplace,
    ValidationIssue,
};

use crate::cache::{IdCache, UsernameCache};

/// Everything pass two can see. Built only from a completed pass one.
pub struct ValidationContext<'a> {
    pub directory: &'a Directory,
    pub document: &'a SerializedMarketplace,
    pub ids: &'a IdCache,
    pub usernames: &'a UsernameCache,
    by_id: HashMap<(ResourceName, &'a str), &'a Record>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        directory: &'a Directory,
        document: &'a SerializedMarketplace,
        ids: &'a IdCache,
        usernames: &'a UsernameCache,
    ) -> Self {
        let mut by_id = HashMap::new();
        for entry in directory.top_level().filter(|entry| entry.has_id_field) {
            for record in document.records(entry.name) {
                if let Some(id) = record.id() {
                    by_id.entry((entry.name, id)).or_insert(record);
                }
            }
        }
        Self {
            directory,
            document,
            ids,
            usernames,
            by_id,
        }
    }

    /// First top-level record of `resource` with this ID.
    pub fn find(&self, resource: ResourceName, id: &str) -> Option<&'a Record> {
        self.by_id.get(&(resource, id)).copied()
    }

    pub fn exists(&self, resource: ResourceName, scope: &[&str], id: &str) -> bool {
        self.ids.has(resource, scope, id)
    }

    pub fn model(&self, resource: ResourceName) -> &'static str {
        self.directory.get(resource).model_name
    }

    /// Checks `record[field]` against `target` under the given scope and
    /// returns the reference issue when it does not resolve.
    pub fn check_reference(
        &self,
        resource: ResourceName,
        index: usize,
        record: &Record,
        field: &str,
        target: ResourceName,
        scope: &[(&str, &str)],
    ) -> Option<ValidationIssue> {
        let value = record.scalar_field(field)?;
        let scope_values: Vec<&str> = scope.iter().map(|(_, value)| *value).collect();
        if self.exists(target, &scope_values, &value) {
            return None;
        }
        Some(self.reference_issue(resource, index, field, target, &[value], scope))
    }

    pub fn reference_issue(
        &self,
        resource: ResourceName,
        index: usize,
        field: &str,
        target: ResourceName,
        missing: &[String],
        scope: &[(&str, &str)],
    ) -> ValidationIssue {
        let message = format!(
            "Invalid reference {resource}.{field}: no {} found with {}{}.",
            self.model(target),
            quote_ids(missing),
            under(scope)
        );
        ValidationIssue::new(IssueKind::InvalidReference, resource, message)
            .at_record(index)
            .on_field(field)
    }
}

/// `ID "a"` or `IDs "a", "b"`.
pub fn quote_ids(ids: &[String]) -> String {
    let quoted = ids
        .iter()
        .map(|id| format!("\"{id}\""))
        .collect::<Vec<_>>()
        .join(", ");
    if ids.len() == 1 {
        format!("ID {quoted}")
    } else {
        format!("IDs {quoted}")
    }
}

/// ` under BuyerID "b1"` for each scoping value.
pub fn under(scope: &[(&str, &str)]) -> String {
    scope
        .iter()
        .map(|(field, value)| format!(" under {field} \"{value}\""))
        .collect()
}

/// Owner is the marketplace itself when absent or the placeholder.
pub fn supplier_owner(record: &Record, owner_field: &str) -> Option<String> {
    record
        .scalar_field(owner_field)
        .filter(|owner| owner != MARKETPLACE_ID_PLACEHOLDER)
}

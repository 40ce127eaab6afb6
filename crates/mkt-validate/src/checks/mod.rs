//! Generic per-record checks.
//!
//! Schema fields are checked in description order. Foreign keys, the owner
//! field, and route fields that the schema does not declare are checked
//! afterwards so they are never skipped.

pub mod types;

use std::collections::BTreeSet;

use mkt_directory::{Cardinality, Check, ResourceMetadata};
use mkt_model::{
    IssueKind, MARKETPLACE_ID_PLACEHOLDER, Record, RecordExt, ResourceName, ValidationIssue,
    scalar_text,
};
use serde_json::Value;

use crate::context::ValidationContext;
use types::{TypeCheck, check_value, is_valid_id};

/// Runs the generic checks and returns the fields whose JSON type is wrong.
pub(crate) fn check_record<'e>(
    ctx: &ValidationContext<'_>,
    entry: &'e ResourceMetadata,
    index: usize,
    record: &Record,
    issues: &mut Vec<ValidationIssue>,
) -> BTreeSet<&'e str> {
    let route_fields = ctx.directory.route_params(entry.name);
    let mut handled: BTreeSet<&str> = BTreeSet::new();
    let mut mismatched: BTreeSet<&'e str> = BTreeSet::new();

    if let Some(schema) = entry.schema() {
        for field in schema.fields.iter().filter(|field| !field.read_only) {
            let name = field.name.as_str();
            handled.insert(name);
            let value = record.get(name).unwrap_or(&Value::Null);
            if value.is_null() {
                if schema.is_required(name) {
                    issues.push(required_issue(entry.name, index, name));
                }
                continue;
            }
            let outcome = check_value(value, field);
            if let Some(message) = outcome.message(entry.name.as_str(), name, value) {
                let kind = match outcome {
                    TypeCheck::Mismatch { .. } => IssueKind::IncorrectType,
                    _ => IssueKind::InvalidValue,
                };
                issues.push(
                    ValidationIssue::new(kind, entry.name, message)
                        .at_record(index)
                        .on_field(name),
                );
                if matches!(outcome, TypeCheck::Mismatch { .. }) {
                    mismatched.insert(name);
                    continue;
                }
            }
            check_field_references(ctx, entry, &route_fields, index, record, name, issues);
        }
    }

    // Fields the schema does not declare, or everything when no schema is loaded.
    let mut extra: Vec<&str> = Vec::new();
    if entry.has_id_field {
        extra.push("ID");
    }
    extra.extend(entry.foreign_keys.iter().map(|key| key.field));
    extra.extend(entry.owner_field);
    for field in extra {
        if handled.insert(field) && !record.is_null_or_absent(field) {
            check_field_references(ctx, entry, &route_fields, index, record, field, issues);
        }
    }
    for field in &route_fields {
        if !handled.insert(*field) {
            continue;
        }
        if record.is_null_or_absent(field) {
            issues.push(required_issue(entry.name, index, field));
        } else {
            check_field_references(ctx, entry, &route_fields, index, record, field, issues);
        }
    }
    mismatched
}

/// Charset, foreign-key, owner, and ancestor checks for one present field.
fn check_field_references(
    ctx: &ValidationContext<'_>,
    entry: &ResourceMetadata,
    route_fields: &[&'static str],
    index: usize,
    record: &Record,
    field: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if field == "ID"
        && entry.has_id_field
        && let Some(id) = record.str_field("ID")
        && !is_valid_id(id)
    {
        issues.push(
            ValidationIssue::new(
                IssueKind::InvalidId,
                entry.name,
                format!(
                    "Invalid ID {}.ID: \"{id}\" may only contain letters, numbers, \"_\" and \"-\".",
                    entry.name
                ),
            )
            .at_record(index)
            .on_field("ID"),
        );
    }

    if let Some(key) = entry.foreign_key(field)
        && key.check == Check::Generic
    {
        let scope: Vec<(&str, String)> = key
            .scope_field
            .and_then(|scope_field| {
                record
                    .scalar_field(scope_field)
                    .map(|value| (scope_field, value))
            })
            .into_iter()
            .collect();
        let scope_refs: Vec<(&str, &str)> = scope
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect();
        let scope_values: Vec<&str> = scope_refs.iter().map(|(_, value)| *value).collect();

        let values: Vec<String> = match (key.cardinality, record.get(field)) {
            (Cardinality::Array, Some(Value::Array(items))) => {
                items.iter().filter_map(scalar_text).collect()
            }
            (_, Some(value)) => scalar_text(value).into_iter().collect(),
            (_, None) => Vec::new(),
        };
        let missing: Vec<String> = values
            .into_iter()
            .filter(|value| !ctx.exists(key.target, &scope_values, value))
            .collect();
        if !missing.is_empty() {
            issues.push(ctx.reference_issue(
                entry.name,
                index,
                field,
                key.target,
                &missing,
                &scope_refs,
            ));
        }
    }

    if entry.owner_field == Some(field)
        && let Some(owner) = record.scalar_field(field)
        && owner != MARKETPLACE_ID_PLACEHOLDER
        && !ctx.exists(ResourceName::Suppliers, &[], &owner)
    {
        issues.push(ctx.reference_issue(
            entry.name,
            index,
            field,
            ResourceName::Suppliers,
            &[owner],
            &[],
        ));
    }

    if let Some(level) = route_fields.iter().position(|route| *route == field) {
        check_ancestor(ctx, entry.name, route_fields, level, index, record, issues);
    }
}

/// `route_fields[level]` must name an existing ancestor under the outer
/// ancestors' IDs.
fn check_ancestor(
    ctx: &ValidationContext<'_>,
    resource: ResourceName,
    route_fields: &[&'static str],
    level: usize,
    index: usize,
    record: &Record,
    issues: &mut Vec<ValidationIssue>,
) {
    let ancestors = ctx.directory.ancestors_of(resource);
    let Some(ancestor) = ancestors.get(level).copied() else {
        return;
    };
    let outer: Vec<(&str, String)> = route_fields[..level]
        .iter()
        .map(|field| (*field, record.scalar_field(field).unwrap_or_default()))
        .collect();
    let scope: Vec<(&str, &str)> = outer
        .iter()
        .map(|(field, value)| (*field, value.as_str()))
        .collect();
    if let Some(issue) =
        ctx.check_reference(resource, index, record, route_fields[level], ancestor, &scope)
    {
        issues.push(issue);
    }
}

pub(crate) fn required_issue(resource: ResourceName, index: usize, field: &str) -> ValidationIssue {
    ValidationIssue::new(
        IssueKind::RequiredField,
        resource,
        format!("Required field {resource}.{field}: cannot have value null."),
    )
    .at_record(index)
    .on_field(field)
}

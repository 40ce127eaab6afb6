//! The two-pass document validator.
//!
//! Pass one indexes every identity in the document and reports duplicates.
//! Pass two checks each record's fields, references, and resource rule
//! against the completed indexes. Validation never stops early.

use mkt_directory::{Directory, ResourceMetadata};
use mkt_model::{
    IdentityKey, IdentityValue, IssueKind, SerializedMarketplace, ValidationIssue,
    ValidationReport,
};
use tracing::{debug, info, info_span};

use crate::cache::{IdCache, Insert, UsernameCache};
use crate::checks::check_record;
use crate::context::ValidationContext;
use crate::rules::{RuleRegistry, default_rules};

/// Report plus the identity indexes built while validating.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub report: ValidationReport,
    pub ids: IdCache,
    pub usernames: UsernameCache,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }
}

pub struct Validator<'a> {
    directory: &'a Directory,
    rules: &'a RuleRegistry,
}

impl<'a> Validator<'a> {
    pub fn new(directory: &'a Directory) -> Self {
        Self {
            directory,
            rules: default_rules(),
        }
    }

    pub fn with_rules(mut self, rules: &'a RuleRegistry) -> Self {
        self.rules = rules;
        self
    }

    pub fn validate(&self, document: &SerializedMarketplace) -> ValidationOutcome {
        let span = info_span!("validate", records = document.record_count());
        let _guard = span.enter();

        let mut report = ValidationReport::default();
        report.extend(misplaced_sections(self.directory, document));

        let (ids, usernames) = self.index(document, &mut report);
        debug!(ids = ids.len(), usernames = usernames.len(), "identity index built");

        let ctx = ValidationContext::new(self.directory, document, &ids, &usernames);
        for entry in self.directory.iter() {
            let records = document.records(entry.name);
            if records.is_empty() {
                continue;
            }
            let before = report.issues.len();
            let mut issues = Vec::new();
            for (index, record) in records.iter().enumerate() {
                let mismatched = check_record(&ctx, entry, index, record, &mut issues);
                if let Some(rule) = self.rules.get(entry.name) {
                    let mut rule_issues = Vec::new();
                    rule.check(&ctx, index, record, &mut rule_issues);
                    // A field with the wrong type gets no further checks.
                    rule_issues.retain(|issue| {
                        issue
                            .field
                            .as_deref()
                            .is_none_or(|field| !mismatched.contains(field))
                    });
                    issues.extend(rule_issues);
                }
            }
            report.extend(issues);
            debug!(
                resource = %entry.name,
                records = records.len(),
                issues = report.issues.len() - before,
                "checked"
            );
        }

        info!(
            issues = report.error_count(),
            valid = report.is_valid(),
            "validation finished"
        );
        ValidationOutcome {
            report,
            ids,
            usernames,
        }
    }

    /// Pass one. The first record with a given identity wins.
    fn index(
        &self,
        document: &SerializedMarketplace,
        report: &mut ValidationReport,
    ) -> (IdCache, UsernameCache) {
        let mut ids = IdCache::new(self.directory);
        let mut usernames = UsernameCache::default();
        for entry in self.directory.iter() {
            if !entry.is_indexed() {
                continue;
            }
            let route_fields = self.directory.route_params(entry.name);
            for (index, record) in document.records(entry.name).iter().enumerate() {
                if entry.has_id_field
                    && let Insert::Duplicate(key) = ids.add(entry.name, record)
                {
                    report.push(duplicate_issue(entry, &route_fields, &key).at_record(index));
                }
                if entry.has_username_field
                    && let Insert::Duplicate(key) = usernames.add(entry.name, record)
                {
                    report.push(duplicate_issue(entry, &route_fields, &key).at_record(index));
                }
            }
        }
        (ids, usernames)
    }
}

/// Validates a document with the default rules.
pub fn validate(directory: &Directory, document: &SerializedMarketplace) -> ValidationOutcome {
    Validator::new(directory).validate(document)
}

fn duplicate_issue(
    entry: &ResourceMetadata,
    route_fields: &[&'static str],
    key: &IdentityKey,
) -> ValidationIssue {
    match &key.value {
        IdentityValue::Id(id) => {
            let under: String = route_fields
                .iter()
                .zip(&key.scope)
                .map(|(field, value)| format!(" under {field} \"{value}\""))
                .collect();
            ValidationIssue::new(
                IssueKind::DuplicateId,
                entry.name,
                format!(
                    "Duplicate ID: multiple {} with ID \"{id}\"{under}",
                    entry.name
                ),
            )
            .on_field("ID")
        }
        IdentityValue::Username(username) => ValidationIssue::new(
            IssueKind::DuplicateUsername,
            entry.name,
            format!(
                "Duplicate Username: multiple {} with Username \"{username}\"",
                entry.name
            ),
        )
        .on_field("Username"),
    }
}

/// Resource lists stored under the wrong top-level section.
fn misplaced_sections(
    directory: &Directory,
    document: &SerializedMarketplace,
) -> Vec<ValidationIssue> {
    let objects = document.objects.keys().map(|name| (*name, "Objects"));
    let assignments = document.assignments.keys().map(|name| (*name, "Assignments"));
    objects
        .chain(assignments)
        .filter_map(|(name, found)| {
            let expected = if directory.get(name).is_assignment {
                "Assignments"
            } else {
                "Objects"
            };
            (expected != found).then(|| {
                ValidationIssue::new(
                    IssueKind::MisplacedResource,
                    name,
                    format!("Misplaced resource {name}: expected under {expected} but found under {found}."),
                )
            })
        })
        .collect()
}

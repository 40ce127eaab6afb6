//! Resource-specific validation rules.
//!
//! The generic checks cover schema types and declared foreign keys. Rules in
//! this module cover relationships whose target depends on other fields of
//! the record, or on records of other types.
//!
//! Rules are registered in a [`RuleRegistry`] keyed by [`ResourceName`].
//! [`default_rules()`] returns the registry used by the validator.

mod access;
mod catalog;

use std::collections::HashMap;
use std::sync::OnceLock;

use mkt_model::{Record, ResourceName, ValidationIssue};

use crate::context::ValidationContext;

/// A check that runs after the generic checks for one resource type.
pub trait ValidationRule: Send + Sync {
    fn resource(&self) -> ResourceName;

    fn description(&self) -> &'static str {
        "Resource rule"
    }

    fn check(
        &self,
        ctx: &ValidationContext<'_>,
        index: usize,
        record: &Record,
        issues: &mut Vec<ValidationIssue>,
    );
}

/// Rules indexed by resource type. Types without a rule are skipped.
#[derive(Default)]
pub struct RuleRegistry {
    rules: HashMap<ResourceName, Box<dyn ValidationRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule, replacing any rule for the same resource.
    pub fn register(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.insert(rule.resource(), rule);
    }

    pub fn get(&self, resource: ResourceName) -> Option<&dyn ValidationRule> {
        self.rules.get(&resource).map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn resources(&self) -> impl Iterator<Item = ResourceName> + '_ {
        self.rules.keys().copied()
    }
}

static DEFAULT_RULES: OnceLock<RuleRegistry> = OnceLock::new();

pub fn default_rules() -> &'static RuleRegistry {
    DEFAULT_RULES.get_or_init(build_default_rules)
}

fn build_default_rules() -> RuleRegistry {
    let rules: [(ResourceName, &'static str, RuleFn); 10] = [
        (
            ResourceName::ImpersonationConfigs,
            "impersonation targets resolve in buyer or admin scope",
            access::impersonation_config,
        ),
        (
            ResourceName::ApiClients,
            "default context user and integration events",
            access::api_client,
        ),
        (ResourceName::Webhooks, "webhook API clients exist", access::webhook),
        (
            ResourceName::SecurityProfileAssignments,
            "security profile assignment scope",
            access::security_profile_assignment,
        ),
        (
            ResourceName::Products,
            "ship-from address resolves for the supplier",
            catalog::product,
        ),
        (
            ResourceName::ProductAssignments,
            "priced schedule and matching currency",
            catalog::product_assignment,
        ),
        (
            ResourceName::Variants,
            "one option per variant-defining spec",
            catalog::variant,
        ),
        (
            ResourceName::InventoryRecords,
            "product-level inventory",
            catalog::inventory_record,
        ),
        (
            ResourceName::VariantInventoryRecords,
            "variant-level inventory",
            catalog::variant_inventory_record,
        ),
        (
            ResourceName::SellerApprovalRules,
            "approving group resolves for the owner",
            catalog::seller_approval_rule,
        ),
    ];
    let mut registry = RuleRegistry::new();
    for (resource, description, check) in rules {
        registry.register(Box::new(FunctionRule {
            resource,
            description,
            check,
        }));
    }
    registry
}

type RuleFn = fn(&ValidationContext<'_>, usize, &Record, &mut Vec<ValidationIssue>);

struct FunctionRule {
    resource: ResourceName,
    description: &'static str,
    check: RuleFn,
}

impl ValidationRule for FunctionRule {
    fn resource(&self) -> ResourceName {
        self.resource
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn check(
        &self,
        ctx: &ValidationContext<'_>,
        index: usize,
        record: &Record,
        issues: &mut Vec<ValidationIssue>,
    ) {
        (self.check)(ctx, index, record, issues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_cover_custom_keys() {
        let registry = default_rules();
        let directory = mkt_directory::Directory::builtin();
        for entry in directory.iter() {
            let has_custom = entry
                .foreign_keys
                .iter()
                .any(|key| key.check == mkt_directory::Check::Custom);
            if has_custom {
                assert!(
                    registry.get(entry.name).is_some(),
                    "{} declares custom keys but has no rule",
                    entry.name
                );
            }
        }
    }

    #[test]
    fn rules_report_their_resource() {
        let registry = default_rules();
        assert_eq!(registry.len(), 10);
        for resource in registry.resources() {
            let rule = registry.get(resource).expect("registered rule");
            assert_eq!(rule.resource(), resource);
            assert!(!rule.description().is_empty());
        }
        assert!(registry.get(ResourceName::Buyers).is_none());
    }
}

//! Rules for products, pricing, variants, inventory, and seller approvals.

use std::collections::HashSet;

use mkt_model::{IssueKind, Record, RecordExt, ResourceName, ValidationIssue};
use serde_json::Value;

use crate::context::{ValidationContext, supplier_owner};

pub(super) fn product(
    ctx: &ValidationContext<'_>,
    index: usize,
    record: &Record,
    issues: &mut Vec<ValidationIssue>,
) {
    let issue = match record.scalar_field("DefaultSupplierID") {
        Some(supplier) => ctx.check_reference(
            ResourceName::Products,
            index,
            record,
            "ShipFromAddressID",
            ResourceName::SupplierAddresses,
            &[("DefaultSupplierID", supplier.as_str())],
        ),
        None => ctx.check_reference(
            ResourceName::Products,
            index,
            record,
            "ShipFromAddressID",
            ResourceName::AdminAddresses,
            &[],
        ),
    };
    issues.extend(issue);
}

pub(super) fn product_assignment(
    ctx: &ValidationContext<'_>,
    index: usize,
    record: &Record,
    issues: &mut Vec<ValidationIssue>,
) {
    let resource = ResourceName::ProductAssignments;
    let Some(schedule_id) = record.scalar_field("PriceScheduleID") else {
        return;
    };
    // A missing schedule is reported by the reference check.
    let Some(schedule) = ctx.find(ResourceName::PriceSchedules, &schedule_id) else {
        return;
    };

    let priced = schedule
        .get("PriceBreaks")
        .and_then(Value::as_array)
        .is_some_and(|breaks| {
            breaks
                .iter()
                .any(|price_break| price_break.get("Price").is_some_and(Value::is_number))
        });
    if !priced {
        issues.push(
            ValidationIssue::new(
                IssueKind::Rule,
                resource,
                format!(
                    "Invalid price schedule {resource}.PriceScheduleID: PriceSchedule \"{schedule_id}\" must have at least one PriceBreak with a Price."
                ),
            )
            .at_record(index)
            .on_field("PriceScheduleID"),
        );
    }

    let Some(schedule_currency) = schedule.str_field("Currency") else {
        return;
    };
    let Some(buyer) = record.scalar_field("BuyerID") else {
        return;
    };
    let group = record.scalar_field("UserGroupID");
    let Some(locale_id) = assigned_locale(ctx, &buyer, group.as_deref()) else {
        return;
    };
    let Some(locale_currency) = ctx
        .find(ResourceName::Locales, &locale_id)
        .and_then(|locale| locale.str_field("Currency"))
    else {
        return;
    };
    if locale_currency != schedule_currency {
        issues.push(
            ValidationIssue::new(
                IssueKind::Rule,
                resource,
                format!(
                    "Invalid currency {resource}.PriceScheduleID: PriceSchedule \"{schedule_id}\" has Currency \"{schedule_currency}\" but Locale \"{locale_id}\" has Currency \"{locale_currency}\"."
                ),
            )
            .at_record(index)
            .on_field("PriceScheduleID"),
        );
    }
}

/// Locale assigned to a buyer's user group, falling back to the buyer-wide
/// assignment.
fn assigned_locale(ctx: &ValidationContext<'_>, buyer: &str, group: Option<&str>) -> Option<String> {
    let assignments = ctx.document.records(ResourceName::LocaleAssignments);
    let matches = |wanted_group: Option<&str>| {
        assignments.iter().find_map(|assignment| {
            let same_buyer = assignment.scalar_field("BuyerID").as_deref() == Some(buyer);
            let same_group = assignment.scalar_field("UserGroupID").as_deref() == wanted_group;
            (same_buyer && same_group)
                .then(|| assignment.scalar_field("LocaleID"))
                .flatten()
        })
    };
    group.and_then(|group| matches(Some(group))).or_else(|| matches(None))
}

pub(super) fn variant(
    ctx: &ValidationContext<'_>,
    index: usize,
    record: &Record,
    issues: &mut Vec<ValidationIssue>,
) {
    let resource = ResourceName::Variants;
    let variant_id = record.scalar_field("ID").unwrap_or_default();
    let rule_issue = |message: String| {
        ValidationIssue::new(IssueKind::Rule, resource, message)
            .at_record(index)
            .on_field("Specs")
    };

    let entries = record
        .get("Specs")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if entries.is_empty() {
        issues.push(rule_issue(format!(
            "Invalid empty array Variant.Specs on Variant with ID \"{variant_id}\": a variant must include at least one Spec."
        )));
        return;
    }

    // Product existence is reported by the parent check.
    let Some(product_id) = record.scalar_field("ProductID") else {
        return;
    };
    if ctx.find(ResourceName::Products, &product_id).is_none() {
        return;
    }
    let expected = variant_specs(ctx, &product_id);

    let mut seen: HashSet<String> = HashSet::new();
    for entry in entries {
        let Some(spec_id) = entry.get("SpecID").and_then(mkt_model::scalar_text) else {
            continue;
        };
        if !seen.insert(spec_id.clone()) {
            issues.push(rule_issue(format!(
                "Invalid Variant.Specs on Variant with ID \"{variant_id}\": duplicate entry for Spec \"{spec_id}\"."
            )));
            continue;
        }
        if !expected.contains(&spec_id) {
            issues.push(rule_issue(format!(
                "Invalid Variant.Specs on Variant with ID \"{variant_id}\": Spec \"{spec_id}\" is not a variant-defining Spec assigned to Product \"{product_id}\"."
            )));
            continue;
        }
        let Some(option_id) = entry.get("OptionID").and_then(mkt_model::scalar_text) else {
            issues.push(rule_issue(format!(
                "Invalid Variant.Specs on Variant with ID \"{variant_id}\": entry for Spec \"{spec_id}\" has no OptionID."
            )));
            continue;
        };
        if !ctx.exists(ResourceName::SpecOptions, &[&spec_id], &option_id) {
            issues.push(
                ctx.reference_issue(
                    resource,
                    index,
                    "Specs",
                    ResourceName::SpecOptions,
                    &[option_id],
                    &[("SpecID", spec_id.as_str())],
                ),
            );
        }
    }
    for spec_id in expected.iter().filter(|spec_id| !seen.contains(*spec_id)) {
        issues.push(rule_issue(format!(
            "Invalid Variant.Specs on Variant with ID \"{variant_id}\": missing an entry for Spec \"{spec_id}\"."
        )));
    }
}

/// Specs assigned to a product with `DefinesVariant`, in assignment order.
pub(crate) fn variant_specs(ctx: &ValidationContext<'_>, product_id: &str) -> Vec<String> {
    ctx.document
        .records(ResourceName::SpecProductAssignments)
        .iter()
        .filter(|assignment| assignment.scalar_field("ProductID").as_deref() == Some(product_id))
        .filter_map(|assignment| assignment.scalar_field("SpecID"))
        .filter(|spec_id| {
            ctx.find(ResourceName::Specs, spec_id)
                .and_then(|spec| spec.get("DefinesVariant"))
                .and_then(Value::as_bool)
                .unwrap_or(false)
        })
        .collect()
}

pub(super) fn inventory_record(
    ctx: &ValidationContext<'_>,
    index: usize,
    record: &Record,
    issues: &mut Vec<ValidationIssue>,
) {
    let resource = ResourceName::InventoryRecords;
    check_inventory_address(ctx, resource, index, record, issues);
    let Some(product_id) = record.scalar_field("ProductID") else {
        return;
    };
    let has_variant_records = ctx
        .document
        .records(ResourceName::VariantInventoryRecords)
        .iter()
        .any(|other| other.scalar_field("ProductID").as_deref() == Some(product_id.as_str()));
    if has_variant_records {
        issues.push(
            ValidationIssue::new(
                IssueKind::Rule,
                resource,
                format!(
                    "Invalid InventoryRecord on Product \"{product_id}\": a product cannot have both product-level and variant-level inventory records."
                ),
            )
            .at_record(index),
        );
    }
    if variant_level_tracking(ctx, &product_id) == Some(true) {
        issues.push(
            ValidationIssue::new(
                IssueKind::Rule,
                resource,
                format!(
                    "Invalid InventoryRecord on Product \"{product_id}\": product-level records require Inventory.VariantLevelTracking to be false."
                ),
            )
            .at_record(index),
        );
    }
}

pub(super) fn variant_inventory_record(
    ctx: &ValidationContext<'_>,
    index: usize,
    record: &Record,
    issues: &mut Vec<ValidationIssue>,
) {
    let resource = ResourceName::VariantInventoryRecords;
    check_inventory_address(ctx, resource, index, record, issues);
    let Some(product_id) = record.scalar_field("ProductID") else {
        return;
    };
    // Unknown products are reported by the parent check.
    if ctx.find(ResourceName::Products, &product_id).is_none() {
        return;
    }
    if variant_level_tracking(ctx, &product_id) != Some(true) {
        issues.push(
            ValidationIssue::new(
                IssueKind::Rule,
                resource,
                format!(
                    "Invalid VariantInventoryRecord on Product \"{product_id}\": variant-level records require Inventory.VariantLevelTracking to be true."
                ),
            )
            .at_record(index),
        );
    }
}

fn variant_level_tracking(ctx: &ValidationContext<'_>, product_id: &str) -> Option<bool> {
    ctx.find(ResourceName::Products, product_id)?
        .get("Inventory")?
        .get("VariantLevelTracking")?
        .as_bool()
}

/// Supplier-owned records use the supplier's addresses, the rest admin
/// addresses.
fn check_inventory_address(
    ctx: &ValidationContext<'_>,
    resource: ResourceName,
    index: usize,
    record: &Record,
    issues: &mut Vec<ValidationIssue>,
) {
    let issue = match supplier_owner(record, "OwnerID") {
        Some(owner) => ctx.check_reference(
            resource,
            index,
            record,
            "AddressID",
            ResourceName::SupplierAddresses,
            &[("OwnerID", owner.as_str())],
        ),
        None => ctx.check_reference(
            resource,
            index,
            record,
            "AddressID",
            ResourceName::AdminAddresses,
            &[],
        ),
    };
    issues.extend(issue);
}

pub(super) fn seller_approval_rule(
    ctx: &ValidationContext<'_>,
    index: usize,
    record: &Record,
    issues: &mut Vec<ValidationIssue>,
) {
    let resource = ResourceName::SellerApprovalRules;
    let issue = match supplier_owner(record, "OwnerID") {
        Some(owner) => ctx.check_reference(
            resource,
            index,
            record,
            "ApprovingGroupID",
            ResourceName::SupplierUserGroups,
            &[("OwnerID", owner.as_str())],
        ),
        None => ctx.check_reference(
            resource,
            index,
            record,
            "ApprovingGroupID",
            ResourceName::AdminUserGroups,
            &[],
        ),
    };
    issues.extend(issue);
}

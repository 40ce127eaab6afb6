//! Rules for API access: impersonation, API clients, webhooks, and security
//! profile assignments.

use mkt_model::{IssueKind, Record, RecordExt, ResourceName, ValidationIssue, scalar_text};
use serde_json::Value;

use crate::context::ValidationContext;

const RESOURCE_CONFIGS: ResourceName = ResourceName::ImpersonationConfigs;

pub(super) fn impersonation_config(
    ctx: &ValidationContext<'_>,
    index: usize,
    record: &Record,
    issues: &mut Vec<ValidationIssue>,
) {
    // Who is impersonated.
    let impersonated_buyer = record.scalar_field("ImpersonationBuyerID");
    check_user_or_group(
        ctx,
        RESOURCE_CONFIGS,
        index,
        record,
        ("ImpersonationGroupID", "ImpersonationUserID"),
        impersonated_buyer.as_deref().map(|buyer| ("ImpersonationBuyerID", buyer)),
        issues,
    );

    // Who may impersonate.
    let buyer = record.scalar_field("BuyerID");
    check_user_or_group(
        ctx,
        RESOURCE_CONFIGS,
        index,
        record,
        ("GroupID", "UserID"),
        buyer.as_deref().map(|buyer| ("BuyerID", buyer)),
        issues,
    );
}

/// Resolves a group and user field pair in buyer scope when a buyer is
/// given, otherwise in admin scope.
fn check_user_or_group(
    ctx: &ValidationContext<'_>,
    resource: ResourceName,
    index: usize,
    record: &Record,
    (group_field, user_field): (&str, &str),
    buyer: Option<(&str, &str)>,
    issues: &mut Vec<ValidationIssue>,
) {
    let (groups, users, scope) = match buyer {
        Some(buyer) => (ResourceName::UserGroups, ResourceName::Users, vec![buyer]),
        None => (ResourceName::AdminUserGroups, ResourceName::AdminUsers, Vec::new()),
    };
    issues.extend(ctx.check_reference(resource, index, record, group_field, groups, &scope));
    issues.extend(ctx.check_reference(resource, index, record, user_field, users, &scope));
}

pub(super) fn api_client(
    ctx: &ValidationContext<'_>,
    index: usize,
    record: &Record,
    issues: &mut Vec<ValidationIssue>,
) {
    let resource = ResourceName::ApiClients;
    if let Some(username) = record.scalar_field("DefaultContextUserName")
        && !ctx.usernames.contains(&username)
    {
        issues.push(
            ValidationIssue::new(
                IssueKind::InvalidReference,
                resource,
                format!(
                    "Invalid reference {resource}.DefaultContextUserName: no User, AdminUser, or SupplierUser found with Username \"{username}\"."
                ),
            )
            .at_record(index)
            .on_field("DefaultContextUserName"),
        );
    }

    for (field, event_type) in [
        ("OrderCheckoutIntegrationEventID", "OrderCheckout"),
        ("OrderReturnIntegrationEventID", "OrderReturn"),
    ] {
        let Some(event_id) = record.scalar_field(field) else {
            continue;
        };
        let Some(event) = ctx.find(ResourceName::IntegrationEvents, &event_id) else {
            issues.push(ctx.reference_issue(
                resource,
                index,
                field,
                ResourceName::IntegrationEvents,
                &[event_id],
                &[],
            ));
            continue;
        };
        let actual = event.str_field("EventType").unwrap_or("null");
        if actual != event_type {
            issues.push(
                ValidationIssue::new(
                    IssueKind::InvalidReference,
                    resource,
                    format!(
                        "Invalid reference {resource}.{field}: IntegrationEvent \"{event_id}\" has EventType \"{actual}\". Should be \"{event_type}\"."
                    ),
                )
                .at_record(index)
                .on_field(field),
            );
        }
    }
}

pub(super) fn webhook(
    ctx: &ValidationContext<'_>,
    index: usize,
    record: &Record,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(Value::Array(client_ids)) = record.get("ApiClientIDs") else {
        return;
    };
    let missing: Vec<String> = client_ids
        .iter()
        .filter_map(scalar_text)
        .filter(|id| !ctx.exists(ResourceName::ApiClients, &[], id))
        .collect();
    if !missing.is_empty() {
        issues.push(ctx.reference_issue(
            ResourceName::Webhooks,
            index,
            "ApiClientIDs",
            ResourceName::ApiClients,
            &missing,
            &[],
        ));
    }
}

pub(super) fn security_profile_assignment(
    ctx: &ValidationContext<'_>,
    index: usize,
    record: &Record,
    issues: &mut Vec<ValidationIssue>,
) {
    let resource = ResourceName::SecurityProfileAssignments;
    let buyer = record.scalar_field("BuyerID");
    let supplier = record.scalar_field("SupplierID");

    let (groups, users, scope) = match (&buyer, &supplier) {
        (Some(buyer), Some(supplier)) => {
            issues.push(
                ValidationIssue::new(
                    IssueKind::Rule,
                    resource,
                    format!(
                        "Invalid {resource}: BuyerID \"{buyer}\" and SupplierID \"{supplier}\" cannot both be set."
                    ),
                )
                .at_record(index),
            );
            return;
        }
        (Some(buyer), None) => (
            ResourceName::UserGroups,
            ResourceName::Users,
            vec![("BuyerID", buyer.as_str())],
        ),
        (None, Some(supplier)) => (
            ResourceName::SupplierUserGroups,
            ResourceName::SupplierUsers,
            vec![("SupplierID", supplier.as_str())],
        ),
        (None, None) => (
            ResourceName::AdminUserGroups,
            ResourceName::AdminUsers,
            Vec::new(),
        ),
    };
    issues.extend(ctx.check_reference(resource, index, record, "UserGroupID", groups, &scope));
    issues.extend(ctx.check_reference(resource, index, record, "UserID", users, &scope));
}

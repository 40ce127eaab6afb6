use mkt_directory::{Directory, load_fixture_directory, paths};
use mkt_model::{IssueKind, Record, ResourceName, SerializedMarketplace};
use mkt_validate::{ValidationReportPayload, validate, write_validation_report_json};
use serde_json::{Value, json};

fn directory() -> Directory {
    load_fixture_directory().expect("fixture directory")
}

fn sample() -> SerializedMarketplace {
    let text = std::fs::read_to_string(paths::sample_document_path()).expect("sample document");
    serde_yaml::from_str(&text).expect("parse sample")
}

fn document(yaml: &str) -> SerializedMarketplace {
    serde_yaml::from_str(yaml).expect("parse document")
}

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

/// Mutable access to one record of the sample document by ID.
fn sample_record<'a>(
    doc: &'a mut SerializedMarketplace,
    resource: ResourceName,
    id: &str,
) -> &'a mut Record {
    doc.records_mut(resource)
        .expect("resource present")
        .iter_mut()
        .find(|record| record.get("ID").and_then(Value::as_str) == Some(id))
        .expect("record present")
}

fn messages(directory: &Directory, doc: &SerializedMarketplace) -> Vec<String> {
    validate(directory, doc)
        .report
        .issues
        .into_iter()
        .map(|issue| issue.message)
        .collect()
}

#[test]
fn sample_document_is_valid() {
    let directory = directory();
    let outcome = validate(&directory, &sample());
    assert!(
        outcome.is_valid(),
        "unexpected issues: {:#?}",
        outcome.report.messages()
    );
    assert!(outcome.ids.len() > 30);
    assert_eq!(outcome.usernames.len(), 3);
    assert!(outcome.usernames.contains("anon-shopper"));
}

#[test]
fn validating_twice_gives_identical_reports() {
    let directory = directory();
    let mut doc = sample();
    sample_record(&mut doc, ResourceName::Buyers, "coffee-buyer")
        .insert("DefaultCatalogID".to_string(), json!("missing-catalog"));
    let first = validate(&directory, &doc).report;
    let second = validate(&directory, &doc).report;
    assert_eq!(first.error_count(), 1);
    assert_eq!(first, second);
}

#[test]
fn duplicate_top_level_ids_report_once() {
    let doc = document(
        r"
Objects:
  Buyers:
    - ID: cloud_coffee
      Name: Cloud Coffee
    - ID: cloud_coffee
      Name: Cloud Coffee Again
",
    );
    let outcome = validate(&directory(), &doc);
    assert_eq!(
        outcome.report.messages(),
        vec![r#"Duplicate ID: multiple Buyers with ID "cloud_coffee""#]
    );
    let issue = &outcome.report.issues[0];
    assert_eq!(issue.kind, IssueKind::DuplicateId);
    assert_eq!(issue.record_index, Some(1));
}

#[test]
fn duplicate_detection_is_scope_aware() {
    let directory = directory();
    let different_buyers = document(
        r"
Objects:
  Buyers:
    - { ID: b1, Name: One }
    - { ID: b2, Name: Two }
  UserGroups:
    - { ID: managers, BuyerID: b1, Name: Managers }
    - { ID: managers, BuyerID: b2, Name: Managers }
",
    );
    assert!(validate(&directory, &different_buyers).is_valid());

    let same_buyer = document(
        r"
Objects:
  Buyers:
    - { ID: b1, Name: One }
  UserGroups:
    - { ID: managers, BuyerID: b1, Name: Managers }
    - { ID: managers, BuyerID: b1, Name: Managers Again }
",
    );
    assert_eq!(
        messages(&directory, &same_buyer),
        vec![r#"Duplicate ID: multiple UserGroups with ID "managers" under BuyerID "b1""#]
    );
}

#[test]
fn duplicate_usernames_are_reported() {
    let doc = document(
        r"
Objects:
  Buyers:
    - { ID: b1, Name: One }
    - { ID: b2, Name: Two }
  Users:
    - { ID: u1, BuyerID: b1, Username: jo, FirstName: Jo, LastName: A, Email: a@example.com, Active: true }
    - { ID: u2, BuyerID: b2, Username: jo, FirstName: Jo, LastName: B, Email: b@example.com, Active: true }
",
    );
    let outcome = validate(&directory(), &doc);
    assert_eq!(
        outcome.report.messages(),
        vec![r#"Duplicate Username: multiple Users with Username "jo""#]
    );
    assert_eq!(outcome.report.issues[0].kind, IssueKind::DuplicateUsername);
}

#[test]
fn references_to_later_records_resolve() {
    let doc = document(
        r"
Objects:
  Catalogs:
    - { ID: c1, Name: Catalog }
  Categories:
    - { ID: leaf, CatalogID: c1, Name: Leaf, ParentID: middle }
    - { ID: middle, CatalogID: c1, Name: Middle, ParentID: root }
    - { ID: root, CatalogID: c1, Name: Root }
",
    );
    assert!(validate(&directory(), &doc).is_valid());
}

#[test]
fn type_mismatch_skips_reference_check() {
    let doc = document(
        r"
Objects:
  CostCenters:
    - { ID: cc1, BuyerID: 123, Name: Marketing }
",
    );
    let outcome = validate(&directory(), &doc);
    assert_eq!(
        outcome.report.messages(),
        vec!["Incorrect type CostCenters.BuyerID: 123 is integer. Should be string."]
    );
    assert_eq!(outcome.report.issues[0].kind, IssueKind::IncorrectType);
}

#[test]
fn mistyped_rule_field_reports_only_the_type() {
    let mut doc = sample();
    sample_record(
        &mut doc,
        ResourceName::ImpersonationConfigs,
        "support-impersonation",
    )
    .insert("ImpersonationGroupID".to_string(), json!(123));
    assert_eq!(
        messages(&directory(), &doc),
        vec!["Incorrect type ImpersonationConfigs.ImpersonationGroupID: 123 is integer. Should be string."]
    );
}

#[test]
fn impersonated_group_and_user_resolve_under_the_buyer() {
    let mut doc = sample();
    let config = sample_record(
        &mut doc,
        ResourceName::ImpersonationConfigs,
        "support-impersonation",
    );
    config.insert("ImpersonationGroupID".to_string(), json!("ghost"));
    config.insert("ImpersonationUserID".to_string(), json!("nobody"));
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid reference ImpersonationConfigs.ImpersonationGroupID: no UserGroup found with ID "ghost" under ImpersonationBuyerID "coffee-buyer"."#,
            r#"Invalid reference ImpersonationConfigs.ImpersonationUserID: no User found with ID "nobody" under ImpersonationBuyerID "coffee-buyer"."#,
        ]
    );
}

#[test]
fn impersonating_group_is_scoped_by_buyer() {
    let mut doc = sample();
    let config = sample_record(
        &mut doc,
        ResourceName::ImpersonationConfigs,
        "support-impersonation",
    );
    config.insert("BuyerID".to_string(), json!("coffee-buyer"));
    config.insert("UserID".to_string(), json!("shopper-1"));
    // An admin group of the same name does not satisfy a buyer scope.
    config.insert("GroupID".to_string(), json!("approvers"));
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid reference ImpersonationConfigs.GroupID: no UserGroup found with ID "approvers" under BuyerID "coffee-buyer"."#
        ]
    );

    sample_record(
        &mut doc,
        ResourceName::ImpersonationConfigs,
        "support-impersonation",
    )
    .insert("GroupID".to_string(), json!("shoppers"));
    assert!(validate(&directory(), &doc).is_valid());
}

#[test]
fn admin_approval_rule_needs_an_admin_group() {
    let mut doc = sample();
    sample_record(&mut doc, ResourceName::SellerApprovalRules, "large-orders")
        .insert("ApprovingGroupID".to_string(), json!("ghost"));
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid reference SellerApprovalRules.ApprovingGroupID: no AdminUserGroup found with ID "ghost"."#
        ]
    );
}

#[test]
fn supplier_approval_rule_uses_its_own_groups() {
    let mut doc = sample();
    doc.records_mut(ResourceName::Suppliers)
        .expect("suppliers")
        .push(record(json!({ "ID": "importer", "Name": "Bean Importer", "Active": true })));
    doc.records_mut(ResourceName::SupplierUserGroups)
        .expect("supplier groups")
        .push(record(json!({
            "ID": "importer-approvers",
            "SupplierID": "importer",
            "Name": "Importer Approvers"
        })));
    doc.records_mut(ResourceName::SellerApprovalRules)
        .expect("approval rules")
        .extend([
            record(json!({
                "ID": "roaster-orders",
                "OwnerID": "roaster",
                "Name": "Roaster Orders",
                "ApprovalType": "Order",
                "ApprovingGroupID": "roaster-approvers",
                "RuleExpression": "order.Total > 100"
            })),
            record(json!({
                "ID": "roaster-borrowed",
                "OwnerID": "roaster",
                "Name": "Borrowed Group",
                "ApprovalType": "Order",
                "ApprovingGroupID": "importer-approvers",
                "RuleExpression": "order.Total > 100"
            })),
        ]);
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid reference SellerApprovalRules.ApprovingGroupID: no SupplierUserGroup found with ID "importer-approvers" under OwnerID "roaster"."#
        ]
    );
}

#[test]
fn missing_admin_impersonation_group_names_the_model() {
    let mut doc = sample();
    let config = sample_record(
        &mut doc,
        ResourceName::ImpersonationConfigs,
        "support-impersonation",
    );
    config.remove("ImpersonationBuyerID");
    config.insert("ImpersonationGroupID".to_string(), json!("ghost"));
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid reference ImpersonationConfigs.ImpersonationGroupID: no AdminUserGroup found with ID "ghost"."#
        ]
    );
}

#[test]
fn webhook_lists_only_invalid_clients() {
    let mut doc = sample();
    sample_record(&mut doc, ResourceName::Webhooks, "order-submitted").insert(
        "ApiClientIDs".to_string(),
        json!(["storefront-client", "retired-client", "other-client"]),
    );
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid reference Webhooks.ApiClientIDs: no ApiClient found with IDs "retired-client", "other-client"."#
        ]
    );
}

#[test]
fn variant_without_specs_is_rejected() {
    let mut doc = sample();
    sample_record(&mut doc, ResourceName::Variants, "house-blend-small")
        .insert("Specs".to_string(), json!([]));
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid empty array Variant.Specs on Variant with ID "house-blend-small": a variant must include at least one Spec."#
        ]
    );
}

#[test]
fn variant_spec_entry_needs_an_option() {
    let mut doc = sample();
    sample_record(&mut doc, ResourceName::Variants, "house-blend-small")
        .insert("Specs".to_string(), json!([{ "SpecID": "size" }]));
    sample_record(&mut doc, ResourceName::Variants, "house-blend-large").insert(
        "Specs".to_string(),
        json!([{ "SpecID": "size", "OptionID": ["large"] }]),
    );
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid Variant.Specs on Variant with ID "house-blend-small": entry for Spec "size" has no OptionID."#,
            r#"Invalid Variant.Specs on Variant with ID "house-blend-large": entry for Spec "size" has no OptionID."#,
        ]
    );
}

#[test]
fn variant_specs_must_match_assigned_specs() {
    let mut doc = sample();
    sample_record(&mut doc, ResourceName::Variants, "house-blend-large").insert(
        "Specs".to_string(),
        json!([
            { "SpecID": "size", "OptionID": "huge" },
            { "SpecID": "size", "OptionID": "large" },
            { "SpecID": "roast", "OptionID": "dark" }
        ]),
    );
    let found = messages(&directory(), &doc);
    assert_eq!(
        found,
        vec![
            r#"Invalid reference Variants.Specs: no SpecOption found with ID "huge" under SpecID "size"."#,
            r#"Invalid Variant.Specs on Variant with ID "house-blend-large": duplicate entry for Spec "size"."#,
            r#"Invalid Variant.Specs on Variant with ID "house-blend-large": Spec "roast" is not a variant-defining Spec assigned to Product "house-blend"."#,
        ]
    );
}

#[test]
fn required_and_charset_checks() {
    let doc = document(
        r#"
Objects:
  Buyers:
    - { ID: "bad id!", Active: true }
"#,
    );
    let found = messages(&directory(), &doc);
    assert_eq!(
        found,
        vec![
            r#"Invalid ID Buyers.ID: "bad id!" may only contain letters, numbers, "_" and "-"."#,
            "Required field Buyers.Name: cannot have value null.",
        ]
    );
}

#[test]
fn range_and_length_checks_do_not_block_references() {
    let mut doc = sample();
    let client = sample_record(&mut doc, ResourceName::ApiClients, "storefront-client");
    client.insert("AccessTokenDuration".to_string(), json!(5));
    let address = sample_record(&mut doc, ResourceName::AdminAddresses, "warehouse");
    address.insert("Country".to_string(), json!("USA"));
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid value AdminAddresses.Country: "USA" exceeds max length 2."#,
            "Invalid value ApiClients.AccessTokenDuration: 5 is less than minimum 10.",
        ]
    );
}

#[test]
fn owner_must_be_placeholder_or_supplier() {
    let mut doc = sample();
    sample_record(&mut doc, ResourceName::Catalogs, "main-catalog")
        .insert("OwnerID".to_string(), json!("nobody"));
    assert_eq!(
        messages(&directory(), &doc),
        vec![r#"Invalid reference Catalogs.OwnerID: no Supplier found with ID "nobody"."#]
    );
}

#[test]
fn child_records_need_their_parent() {
    let doc = document(
        r"
Objects:
  UserGroups:
    - { ID: g1, BuyerID: missing-buyer, Name: Group }
    - { ID: g2, Name: Orphan }
",
    );
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid reference UserGroups.BuyerID: no Buyer found with ID "missing-buyer"."#,
            "Required field UserGroups.BuyerID: cannot have value null.",
        ]
    );
}

#[test]
fn grandchild_resolves_under_grandparent() {
    let mut doc = sample();
    sample_record(&mut doc, ResourceName::VariantInventoryRecords, "small-warehouse")
        .insert("VariantID".to_string(), json!("house-blend-medium"));
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid reference VariantInventoryRecords.VariantID: no Variant found with ID "house-blend-medium" under ProductID "house-blend"."#
        ]
    );
}

#[test]
fn security_profile_assignment_scope_is_exclusive() {
    let mut doc = sample();
    let assignments = doc
        .records_mut(ResourceName::SecurityProfileAssignments)
        .expect("assignments");
    assignments.push(record(json!({
        "SecurityProfileID": "shopper",
        "BuyerID": "coffee-buyer",
        "SupplierID": "roaster"
    })));
    assignments.push(record(json!({
        "SecurityProfileID": "shopper",
        "SupplierID": "roaster",
        "UserGroupID": "shoppers"
    })));
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid SecurityProfileAssignments: BuyerID "coffee-buyer" and SupplierID "roaster" cannot both be set."#,
            r#"Invalid reference SecurityProfileAssignments.UserGroupID: no SupplierUserGroup found with ID "shoppers" under SupplierID "roaster"."#,
        ]
    );
}

#[test]
fn api_client_checks_usernames_and_event_types() {
    let mut doc = sample();
    let client = sample_record(&mut doc, ResourceName::ApiClients, "storefront-client");
    client.insert("DefaultContextUserName".to_string(), json!("nobody"));
    client.insert("OrderReturnIntegrationEventID".to_string(), json!("checkout"));
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid reference ApiClients.DefaultContextUserName: no User, AdminUser, or SupplierUser found with Username "nobody"."#,
            r#"Invalid reference ApiClients.OrderReturnIntegrationEventID: IntegrationEvent "checkout" has EventType "OrderCheckout". Should be "OrderReturn"."#,
        ]
    );
}

#[test]
fn product_assignment_currency_must_match_locale() {
    let mut doc = sample();
    sample_record(&mut doc, ResourceName::PriceSchedules, "standard-price")
        .insert("Currency".to_string(), json!("EUR"));
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid currency ProductAssignments.PriceScheduleID: PriceSchedule "standard-price" has Currency "EUR" but Locale "usd-en" has Currency "USD"."#
        ]
    );
}

#[test]
fn product_assignment_needs_a_priced_break() {
    let mut doc = sample();
    sample_record(&mut doc, ResourceName::PriceSchedules, "standard-price")
        .insert("PriceBreaks".to_string(), json!([{ "Quantity": 1 }]));
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid price schedule ProductAssignments.PriceScheduleID: PriceSchedule "standard-price" must have at least one PriceBreak with a Price."#
        ]
    );
}

#[test]
fn inventory_tracking_modes_are_exclusive() {
    let mut doc = sample();
    doc.records_mut(ResourceName::InventoryRecords)
        .expect("inventory records")
        .push(record(json!({
            "ID": "house-blend-bulk",
            "ProductID": "house-blend",
            "OwnerID": "{{MARKETPLACE_ID}}",
            "AddressID": "warehouse"
        })));
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid InventoryRecord on Product "house-blend": a product cannot have both product-level and variant-level inventory records."#,
            r#"Invalid InventoryRecord on Product "house-blend": product-level records require Inventory.VariantLevelTracking to be false."#,
        ]
    );
}

#[test]
fn supplier_owned_records_use_supplier_addresses() {
    let mut doc = sample();
    sample_record(&mut doc, ResourceName::InventoryRecords, "decaf-roastery")
        .insert("AddressID".to_string(), json!("warehouse"));
    sample_record(&mut doc, ResourceName::Products, "decaf").remove("DefaultSupplierID");
    assert_eq!(
        messages(&directory(), &doc),
        vec![
            r#"Invalid reference Products.ShipFromAddressID: no AdminAddress found with ID "roastery"."#,
            r#"Invalid reference InventoryRecords.AddressID: no SupplierAddress found with ID "warehouse" under OwnerID "roaster"."#,
        ]
    );
}

#[test]
fn assignments_under_objects_are_misplaced() {
    let doc = document(
        r"
Objects:
  Buyers:
    - { ID: b1, Name: One }
  Catalogs:
    - { ID: c1, Name: Catalog }
  CatalogAssignments:
    - { CatalogID: c1, BuyerID: b1 }
",
    );
    let outcome = validate(&directory(), &doc);
    assert_eq!(
        outcome.report.messages(),
        vec![
            "Misplaced resource CatalogAssignments: expected under Assignments but found under Objects."
        ]
    );
    assert_eq!(outcome.report.issues[0].kind, IssueKind::MisplacedResource);
}

#[test]
fn builtin_directory_validates_references_without_schema() {
    let directory = Directory::builtin();
    let doc = document(
        r"
Objects:
  UserGroups:
    - { ID: g1, BuyerID: nowhere }
",
    );
    assert_eq!(
        messages(&directory, &doc),
        vec![r#"Invalid reference UserGroups.BuyerID: no Buyer found with ID "nowhere"."#]
    );
}

#[test]
fn report_payload_snapshot() {
    let doc = document(
        r"
Objects:
  Buyers:
    - { ID: cloud_coffee, Name: Cloud Coffee }
    - { ID: cloud_coffee, Name: Cloud Coffee Again }
",
    );
    let report = validate(&directory(), &doc).report;
    let mut payload = ValidationReportPayload::new("marketplace.yaml", &report);
    payload.generated_at = "2026-01-01T00:00:00+00:00".to_string();
    let rendered = serde_json::to_string_pretty(&payload).expect("serialize payload");
    insta::assert_snapshot!("report_payload", rendered);
}

#[test]
fn report_is_written_as_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("reports").join("validation.json");
    let report = validate(&directory(), &sample()).report;
    write_validation_report_json(&path, "sample-marketplace.yaml", &report).expect("write");

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
    assert_eq!(written["schema"], "mkt-seed.validation-report");
    assert_eq!(written["schema_version"], 1);
    assert_eq!(written["valid"], true);
    assert_eq!(written["issue_count"], 0);
    assert!(written["generated_at"].as_str().is_some());
}

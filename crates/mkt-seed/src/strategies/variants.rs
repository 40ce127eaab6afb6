use async_trait::async_trait;
use futures::future::try_join_all;
use mkt_client::PlatformError;
use mkt_model::{Record, RecordExt, ResourceName, SerializedMarketplace};
use serde_json::Value;
use tracing::{debug, warn};

use crate::context::{RunContext, SeedContext};
use crate::error::Result;

/// Variants cannot be created directly. The platform generates them from
/// the product's variant-defining specs; each document record is then saved
/// over the generated variant it corresponds to.
pub(super) struct VariantStrategy;

#[async_trait]
impl super::UploadStrategy for VariantStrategy {
    fn resource(&self) -> ResourceName {
        ResourceName::Variants
    }

    fn description(&self) -> &'static str {
        "Generate variants per product, then save each record"
    }

    async fn upload(
        &self,
        ctx: &SeedContext<'_>,
        _run: &mut RunContext,
        records: Vec<Record>,
    ) -> Result<Vec<Record>> {
        let resource = ctx.directory.get(ResourceName::Variants);
        let platform = ctx.executor.platform();

        let mut products: Vec<String> = Vec::new();
        for record in &records {
            if let Some(product_id) = record.scalar_field("ProductID")
                && !products.contains(&product_id)
            {
                products.push(product_id);
            }
        }
        let generate_paths = products
            .iter()
            .map(|product_id| Ok(format!("{}/generate", resource.path(&[product_id.clone()])?)))
            .collect::<Result<Vec<String>>>()?;
        try_join_all(generate_paths.iter().map(|path| {
            debug!(path = %path, "generating variants");
            ctx.executor
                .call("Variants", move || platform.post_empty(path))
        }))
        .await?;

        let mut saves = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let params = super::route_values(ctx.directory, resource, index, &record)?;
            let product_id = params.first().cloned().unwrap_or_default();
            let generated_id = match record_variant_id(ctx.document, &product_id, &record) {
                Some(id) => id,
                None => {
                    warn!(
                        product = %product_id,
                        variant = record.id().unwrap_or_default(),
                        "variant specs do not cover the product's variant specs; saving by its own ID"
                    );
                    record.id().unwrap_or_default().to_string()
                }
            };
            saves.push((resource.item_path(&params, &generated_id)?, record));
        }

        ctx.executor
            .run_many("Variants", saves, move |(path, record)| async move {
                let saved = platform.put(&path, &Value::Object(record.clone())).await?;
                Ok::<Record, PlatformError>(match saved {
                    Value::Object(saved) => saved,
                    _ => record,
                })
            })
            .await
    }
}

/// Specs assigned to the product that define variants, in assignment order.
pub fn variant_defining_specs(document: &SerializedMarketplace, product_id: &str) -> Vec<String> {
    let specs = document.records(ResourceName::Specs);
    let mut defining: Vec<String> = Vec::new();
    for assignment in document.records(ResourceName::SpecProductAssignments) {
        if assignment.str_field("ProductID") != Some(product_id) {
            continue;
        }
        let Some(spec_id) = assignment.str_field("SpecID") else {
            continue;
        };
        let defines_variant = specs
            .iter()
            .find(|spec| spec.id() == Some(spec_id))
            .and_then(|spec| spec.get("DefinesVariant"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if defines_variant && !defining.iter().any(|id| id == spec_id) {
            defining.push(spec_id.to_string());
        }
    }
    defining
}

/// The ID the platform gives a generated variant: the product ID followed
/// by each option ID, joined with `-`.
pub fn generated_variant_id<S: AsRef<str>>(product_id: &str, option_ids: &[S]) -> String {
    let mut id = product_id.to_string();
    for option_id in option_ids {
        id.push('-');
        id.push_str(option_id.as_ref());
    }
    id
}

/// `None` when the record lacks an option for one of the defining specs.
fn record_variant_id(
    document: &SerializedMarketplace,
    product_id: &str,
    record: &Record,
) -> Option<String> {
    let entries = record.get("Specs").and_then(Value::as_array)?;
    let specs = variant_defining_specs(document, product_id);
    if specs.is_empty() {
        return None;
    }
    let options = specs
        .iter()
        .map(|spec_id| {
            entries
                .iter()
                .find(|entry| entry.get("SpecID").and_then(Value::as_str) == Some(spec_id.as_str()))
                .and_then(|entry| entry.get("OptionID"))
                .and_then(Value::as_str)
        })
        .collect::<Option<Vec<&str>>>()?;
    Some(generated_variant_id(product_id, &options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> SerializedMarketplace {
        serde_json::from_value(json!({
            "Objects": {
                "Specs": [
                    { "ID": "size", "DefinesVariant": true },
                    { "ID": "gift-note", "DefinesVariant": false },
                    { "ID": "color", "DefinesVariant": true }
                ]
            },
            "Assignments": {
                "SpecProductAssignments": [
                    { "SpecID": "color", "ProductID": "shirt" },
                    { "SpecID": "gift-note", "ProductID": "shirt" },
                    { "SpecID": "size", "ProductID": "shirt" },
                    { "SpecID": "size", "ProductID": "mug" }
                ]
            }
        }))
        .expect("document")
    }

    #[test]
    fn defining_specs_follow_assignment_order() {
        let document = document();
        assert_eq!(
            variant_defining_specs(&document, "shirt"),
            vec!["color".to_string(), "size".to_string()]
        );
        assert_eq!(variant_defining_specs(&document, "mug"), vec!["size".to_string()]);
        assert!(variant_defining_specs(&document, "unknown").is_empty());
    }

    #[test]
    fn variant_id_uses_spec_order_not_entry_order() {
        let document = document();
        let record: Record = serde_json::from_value(json!({
            "ID": "shirt-large-blue",
            "ProductID": "shirt",
            "Specs": [
                { "SpecID": "size", "OptionID": "large" },
                { "SpecID": "color", "OptionID": "blue" }
            ]
        }))
        .expect("record");
        assert_eq!(
            record_variant_id(&document, "shirt", &record).as_deref(),
            Some("shirt-blue-large")
        );
    }

    #[test]
    fn missing_option_has_no_generated_id() {
        let document = document();
        let record: Record = serde_json::from_value(json!({
            "ID": "shirt-blue",
            "Specs": [{ "SpecID": "color", "OptionID": "blue" }]
        }))
        .expect("record");
        assert_eq!(record_variant_id(&document, "shirt", &record), None);
        assert_eq!(generated_variant_id::<&str>("mug", &[]), "mug");
    }
}

//! Per-resource clean-up of downloaded records.
//!
//! Listing returns some read-only data that would not validate or upload
//! cleanly. A [`DownloadTransform`] rewrites a record in place before it is
//! written to the document.

use std::collections::HashMap;
use std::sync::OnceLock;

use mkt_model::{Record, ResourceName};
use serde_json::Value;

pub trait DownloadTransform: Send + Sync {
    fn resource(&self) -> ResourceName;

    fn description(&self) -> &'static str {
        "Download transform"
    }

    fn apply(&self, record: &mut Record);
}

#[derive(Default)]
pub struct TransformRegistry {
    transforms: HashMap<ResourceName, Box<dyn DownloadTransform>>,
}

impl TransformRegistry {
    pub fn register(&mut self, transform: Box<dyn DownloadTransform>) {
        self.transforms.insert(transform.resource(), transform);
    }

    pub fn get(&self, resource: ResourceName) -> Option<&dyn DownloadTransform> {
        self.transforms.get(&resource).map(|t| t.as_ref())
    }

    /// Applies the resource's transform, if it has one.
    pub fn apply(&self, resource: ResourceName, record: &mut Record) {
        if let Some(transform) = self.get(resource) {
            transform.apply(record);
        }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

static DEFAULT_TRANSFORMS: OnceLock<TransformRegistry> = OnceLock::new();

pub fn default_transforms() -> &'static TransformRegistry {
    DEFAULT_TRANSFORMS.get_or_init(|| {
        let mut registry = TransformRegistry::default();
        registry.register(Box::new(FunctionTransform::new(
            ResourceName::Specs,
            "Drop inline spec options",
            drop_spec_options,
        )));
        registry.register(Box::new(FunctionTransform::new(
            ResourceName::Variants,
            "Reduce variant specs to their identifying fields",
            reduce_variant_specs,
        )));
        registry
    })
}

struct FunctionTransform {
    resource: ResourceName,
    description: &'static str,
    apply_fn: fn(&mut Record),
}

impl FunctionTransform {
    fn new(resource: ResourceName, description: &'static str, apply_fn: fn(&mut Record)) -> Self {
        Self {
            resource,
            description,
            apply_fn,
        }
    }
}

impl DownloadTransform for FunctionTransform {
    fn resource(&self) -> ResourceName {
        self.resource
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn apply(&self, record: &mut Record) {
        (self.apply_fn)(record);
    }
}

/// Options are downloaded as `SpecOptions` records of their own.
fn drop_spec_options(record: &mut Record) {
    record.remove("Options");
}

const VARIANT_SPEC_FIELDS: [&str; 4] = ["SpecID", "OptionID", "Name", "Value"];

fn reduce_variant_specs(record: &mut Record) {
    let Some(Value::Array(entries)) = record.get_mut("Specs") else {
        return;
    };
    for entry in entries.iter_mut() {
        if let Value::Object(fields) = entry {
            fields.retain(|key, _| VARIANT_SPEC_FIELDS.contains(&key.as_str()));
        }
    }
}

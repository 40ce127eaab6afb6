//! The portable marketplace document.
//!
//! A document has three top-level sections: `Meta`, `Objects`, and
//! `Assignments`. Records are kept as raw JSON maps so fields round-trip
//! verbatim between the platform and the file on disk.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::resource::ResourceName;

/// A single record as the platform represents it.
pub type Record = serde_json::Map<String, Value>;

/// Owner-field value meaning "the marketplace being seeded".
pub const MARKETPLACE_ID_PLACEHOLDER: &str = "{{MARKETPLACE_ID}}";

/// Value written in place of secrets on download.
pub const REDACTED_MESSAGE: &str = "REDACTED_BY_SEEDING_TOOL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    #[serde(
        rename = "ToolVersion",
        alias = "toolVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tool_version: Option<String>,
}

/// `{ Meta, Objects, Assignments }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerializedMarketplace {
    #[serde(rename = "Meta", default)]
    pub meta: DocumentMeta,
    #[serde(rename = "Objects", default, deserialize_with = "deserialize_section")]
    pub objects: BTreeMap<ResourceName, Vec<Record>>,
    #[serde(
        rename = "Assignments",
        default,
        deserialize_with = "deserialize_section"
    )]
    pub assignments: BTreeMap<ResourceName, Vec<Record>>,
}

/// Accepts `null` for a whole section or for a single resource list, which is
/// what a YAML file with an empty key produces.
fn deserialize_section<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<ResourceName, Vec<Record>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<ResourceName, Option<Vec<Record>>>> =
        Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, records)| (name, records.unwrap_or_default()))
        .collect())
}

impl SerializedMarketplace {
    pub fn new(tool_version: impl Into<String>) -> Self {
        Self {
            meta: DocumentMeta {
                tool_version: Some(tool_version.into()),
            },
            ..Self::default()
        }
    }

    /// Records of a resource type, looked up in either section.
    pub fn records(&self, name: ResourceName) -> &[Record] {
        self.objects
            .get(&name)
            .or_else(|| self.assignments.get(&name))
            .map_or(&[], Vec::as_slice)
    }

    pub fn records_mut(&mut self, name: ResourceName) -> Option<&mut Vec<Record>> {
        if self.objects.contains_key(&name) {
            return self.objects.get_mut(&name);
        }
        self.assignments.get_mut(&name)
    }

    /// Replaces the records of a resource type, placing them in the section
    /// that matches `is_assignment`. Empty lists are not stored.
    pub fn set_records(&mut self, name: ResourceName, is_assignment: bool, records: Vec<Record>) {
        self.objects.remove(&name);
        self.assignments.remove(&name);
        if records.is_empty() {
            return;
        }
        if is_assignment {
            self.assignments.insert(name, records);
        } else {
            self.objects.insert(name, records);
        }
    }

    /// Resource types present in the document, objects first.
    pub fn resource_names(&self) -> impl Iterator<Item = ResourceName> + '_ {
        self.objects.keys().chain(self.assignments.keys()).copied()
    }

    pub fn record_count(&self) -> usize {
        self.objects
            .values()
            .chain(self.assignments.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

/// Field accessors shared by the validator, seeder, and downloader.
pub trait RecordExt {
    fn str_field(&self, field: &str) -> Option<&str>;

    /// The field as text if it is a string, number, or boolean.
    fn scalar_field(&self, field: &str) -> Option<String>;

    fn is_null_or_absent(&self, field: &str) -> bool;

    fn id(&self) -> Option<&str> {
        self.str_field("ID")
    }
}

impl RecordExt for Record {
    fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    fn scalar_field(&self, field: &str) -> Option<String> {
        self.get(field).and_then(scalar_text)
    }

    fn is_null_or_absent(&self, field: &str) -> bool {
        self.get(field).is_none_or(Value::is_null)
    }
}

/// Text form of a scalar JSON value; `None` for null, arrays, and objects.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

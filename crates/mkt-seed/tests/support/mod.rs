//! An in-memory platform for seeder, downloader, and executor tests.
//!
//! Records live in collections keyed by list path. The fake mirrors the
//! platform behaviour the tool relies on: minted API client IDs, variant
//! generation from variant-defining specs, read-only variant specs, and
//! inline options on listed specs.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use mkt_client::{ListMeta, ListPage, PlatformApi, PlatformError};
use mkt_directory::{Directory, load_fixture_directory, paths};
use mkt_model::{Record, SerializedMarketplace};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct State {
    collections: BTreeMap<String, Vec<Record>>,
    calls: Vec<Call>,
    minted: usize,
    /// Errors returned, in order, before requests are served again.
    failures: VecDeque<PlatformError>,
}

#[derive(Default)]
pub struct InMemoryPlatform {
    state: Mutex<State>,
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(self, path: &str, records: Vec<Value>) -> Self {
        self.lock().collections.insert(
            path.to_string(),
            records.into_iter().map(into_record).collect(),
        );
        self
    }

    /// Makes the next `count` requests fail with `status`.
    pub fn fail_next(&self, count: usize, status: u16) {
        let mut state = self.lock();
        for _ in 0..count {
            state
                .failures
                .push_back(PlatformError::status("GET", "fake", status, None, None));
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// `(method, path)` of every write, in the order they were served.
    pub fn writes(&self) -> Vec<(&'static str, String)> {
        self.calls()
            .into_iter()
            .filter(|call| call.method != "GET")
            .map(|call| (call.method, call.path))
            .collect()
    }

    pub fn collection(&self, path: &str) -> Vec<Record> {
        self.lock()
            .collections
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("fake platform lock")
    }

    fn begin(&self, method: &'static str, path: &str, body: Option<&Value>) -> Result<(), PlatformError> {
        let mut state = self.lock();
        state.calls.push(Call {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        match state.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn into_record(value: Value) -> Record {
    match value {
        Value::Object(record) => record,
        other => panic!("not an object: {other}"),
    }
}

fn split_item(path: &str) -> (&str, &str) {
    path.rsplit_once('/').unwrap_or(("", path))
}

fn id_of(record: &Record) -> Option<&str> {
    record.get("ID").and_then(Value::as_str)
}

fn not_found(method: &str, path: &str) -> PlatformError {
    PlatformError::status(method, path, 404, None, None)
}

impl State {
    fn options_of(&self, spec_id: &str) -> Vec<Record> {
        self.collections
            .get(&format!("/specs/{spec_id}/options"))
            .cloned()
            .unwrap_or_default()
    }

    fn generate_variants(&mut self, product_id: &str) {
        let specs = self.collections.get("/specs").cloned().unwrap_or_default();
        let assigned: Vec<String> = self
            .collections
            .get("/specs/productassignments")
            .into_iter()
            .flatten()
            .filter(|assignment| assignment.get("ProductID").and_then(Value::as_str) == Some(product_id))
            .filter_map(|assignment| assignment.get("SpecID").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        let mut combinations: Vec<(String, Vec<Value>)> = vec![(product_id.to_string(), Vec::new())];
        for spec_id in assigned {
            let Some(spec) = specs.iter().find(|spec| id_of(spec) == Some(spec_id.as_str())) else {
                continue;
            };
            if spec.get("DefinesVariant").and_then(Value::as_bool) != Some(true) {
                continue;
            }
            let options = self.options_of(&spec_id);
            let mut next = Vec::new();
            for (id, entries) in &combinations {
                for option in &options {
                    let option_id = id_of(option).unwrap_or_default();
                    let mut entries = entries.clone();
                    entries.push(json!({
                        "SpecID": spec_id,
                        "Name": spec.get("Name").cloned().unwrap_or(Value::Null),
                        "OptionID": option_id,
                        "Value": option.get("Value").cloned().unwrap_or(Value::Null),
                        "PriceMarkupType": option.get("PriceMarkupType").cloned().unwrap_or(json!("NoMarkup")),
                        "PriceMarkup": option.get("PriceMarkup").cloned().unwrap_or(Value::Null),
                    }));
                    next.push((format!("{id}-{option_id}"), entries));
                }
            }
            combinations = next;
        }

        let variants = combinations
            .into_iter()
            .map(|(id, specs)| into_record(json!({ "ID": id, "Name": id, "Active": false, "Specs": specs })))
            .collect();
        self.collections
            .insert(format!("/products/{product_id}/variants"), variants);
    }
}

#[async_trait]
impl PlatformApi for InMemoryPlatform {
    async fn list_page(&self, path: &str, page: u32, page_size: u32) -> Result<ListPage, PlatformError> {
        self.begin("GET", path, None)?;
        let state = self.lock();
        let mut items = state.collections.get(path).cloned().unwrap_or_default();
        if path == "/specs" {
            for spec in &mut items {
                let options = state.options_of(id_of(spec).unwrap_or_default());
                spec.insert(
                    "Options".to_string(),
                    Value::Array(options.into_iter().map(Value::Object).collect()),
                );
            }
        }
        let total_count = items.len() as u32;
        let total_pages = total_count.div_ceil(page_size);
        let start = ((page.max(1) - 1) * page_size) as usize;
        let items = items
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();
        Ok(ListPage {
            items,
            meta: ListMeta {
                page,
                page_size,
                total_count,
                total_pages,
            },
        })
    }

    async fn create(&self, path: &str, body: &Value) -> Result<Value, PlatformError> {
        self.begin("POST", path, Some(body))?;
        let mut state = self.lock();
        let mut record = into_record(body.clone());
        if path == "/apiclients" {
            state.minted += 1;
            let minted = format!("minted-{}", state.minted);
            record.insert("ID".to_string(), Value::String(minted));
        }
        let collection = state.collections.entry(path.to_string()).or_default();
        if let Some(id) = id_of(&record)
            && collection.iter().any(|existing| id_of(existing) == Some(id))
        {
            return Err(PlatformError::status("POST", path, 409, Some(body.to_string()), None));
        }
        collection.push(record.clone());
        Ok(Value::Object(record))
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, PlatformError> {
        self.begin("PUT", path, Some(body))?;
        let mut state = self.lock();
        let record = into_record(body.clone());
        if id_of(&record).is_none() {
            state
                .collections
                .entry(path.to_string())
                .or_default()
                .push(record.clone());
            return Ok(Value::Object(record));
        }

        let (collection_path, id) = split_item(path);
        let collection = state
            .collections
            .entry(collection_path.to_string())
            .or_default();
        let saved = match collection.iter_mut().find(|existing| id_of(existing) == Some(id)) {
            Some(existing) => {
                let keep_specs = collection_path.ends_with("/variants");
                let specs = existing.get("Specs").cloned();
                let mut saved = record;
                if keep_specs && let Some(specs) = specs {
                    saved.insert("Specs".to_string(), specs);
                }
                *existing = saved.clone();
                saved
            }
            None => {
                collection.push(record.clone());
                record
            }
        };
        Ok(Value::Object(saved))
    }

    async fn patch(&self, path: &str, body: &Value) -> Result<Value, PlatformError> {
        self.begin("PATCH", path, Some(body))?;
        let mut state = self.lock();
        let (collection_path, id) = split_item(path);
        let existing = state
            .collections
            .get_mut(collection_path)
            .and_then(|records| records.iter_mut().find(|record| id_of(record) == Some(id)))
            .ok_or_else(|| not_found("PATCH", path))?;
        if let Value::Object(fields) = body {
            for (key, value) in fields {
                existing.insert(key.clone(), value.clone());
            }
        }
        Ok(Value::Object(existing.clone()))
    }

    async fn post_empty(&self, path: &str) -> Result<Value, PlatformError> {
        self.begin("POST", path, None)?;
        let product_id = path
            .strip_prefix("/products/")
            .and_then(|rest| rest.strip_suffix("/variants/generate"))
            .ok_or_else(|| not_found("POST", path))?;
        self.lock().generate_variants(product_id);
        Ok(Value::Null)
    }

    async fn api_description(&self) -> Result<Value, PlatformError> {
        self.begin("GET", "/openapi/v3", None)?;
        let text = std::fs::read_to_string(paths::api_description_path()).expect("API description fixture");
        Ok(serde_json::from_str(&text).expect("API description JSON"))
    }
}

pub fn directory() -> Directory {
    load_fixture_directory().expect("fixture directory")
}

pub fn sample() -> SerializedMarketplace {
    let text = std::fs::read_to_string(paths::sample_document_path()).expect("sample document");
    serde_yaml::from_str(&text).expect("parse sample")
}

pub fn document(yaml: &str) -> SerializedMarketplace {
    serde_yaml::from_str(yaml).expect("parse document")
}

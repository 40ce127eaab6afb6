//! Field schemas resolved from the platform's OpenAPI description.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde_json::Value;

use crate::error::DirectoryError;
use crate::metadata::{FieldSchema, FieldType, ResourceMetadata, ResourceSchema};

const REF_PREFIX: &str = "#/components/schemas/";
const MAX_REF_DEPTH: usize = 16;
const HTTP_METHODS: &[&str] = &["get", "post", "put", "patch", "delete"];

/// An OpenAPI 3 document indexed by `operationId`.
#[derive(Debug, Clone)]
pub struct ApiDescription {
    operations: HashMap<String, Value>,
    schemas: serde_json::Map<String, Value>,
}

impl ApiDescription {
    pub fn from_value(document: Value) -> Result<Self, DirectoryError> {
        let Value::Object(mut root) = document else {
            return Err(DirectoryError::InvalidDescription {
                message: "document is not a JSON object".to_string(),
            });
        };
        let Some(Value::Object(paths)) = root.remove("paths") else {
            return Err(DirectoryError::InvalidDescription {
                message: "missing paths".to_string(),
            });
        };

        let mut operations = HashMap::new();
        for (_, item) in paths {
            let Value::Object(mut item) = item else {
                continue;
            };
            for method in HTTP_METHODS {
                let Some(operation) = item.remove(*method) else {
                    continue;
                };
                if let Some(id) = operation.get("operationId").and_then(Value::as_str) {
                    operations.insert(id.to_string(), operation);
                }
            }
        }

        let schemas = match root.remove("components") {
            Some(Value::Object(mut components)) => match components.remove("schemas") {
                Some(Value::Object(schemas)) => schemas,
                _ => serde_json::Map::new(),
            },
            _ => serde_json::Map::new(),
        };

        Ok(Self {
            operations,
            schemas,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, DirectoryError> {
        let contents = std::fs::read_to_string(path).map_err(|e| DirectoryError::io(path, e))?;
        let document = serde_json::from_str(&contents).map_err(|e| DirectoryError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_value(document)
    }

    pub fn has_operation(&self, operation_id: &str) -> bool {
        self.operations.contains_key(operation_id)
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Resolves the create model of a resource.
    pub fn resource_schema(
        &self,
        resource: &ResourceMetadata,
    ) -> Result<ResourceSchema, DirectoryError> {
        if !self.has_operation(resource.list_operation) {
            return Err(DirectoryError::MissingOperation {
                resource: resource.name,
                operation_id: resource.list_operation,
            });
        }
        let operation = self.operations.get(resource.create_operation).ok_or(
            DirectoryError::MissingOperation {
                resource: resource.name,
                operation_id: resource.create_operation,
            },
        )?;
        let body = operation
            .pointer("/requestBody/content/application~1json/schema")
            .ok_or(DirectoryError::MissingRequestBody {
                resource: resource.name,
                operation_id: resource.create_operation,
            })?;
        let model = self.resolve(body, 0)?;

        let mut schema = ResourceSchema::default();
        if let Some(Value::Object(properties)) = model.get("properties") {
            for (name, property) in properties {
                schema.fields.push(self.field_schema(name, property)?);
            }
        }
        if let Some(Value::Array(required)) = model.get("required") {
            for name in required.iter().filter_map(Value::as_str) {
                let read_only = schema.field(name).is_some_and(|field| field.read_only);
                if !read_only {
                    schema.required.insert(name.to_string());
                }
            }
        }
        Ok(schema)
    }

    fn field_schema(&self, name: &str, property: &Value) -> Result<FieldSchema, DirectoryError> {
        if is_reference(property) {
            // Nested models are objects, but the reference must still resolve.
            self.resolve(property, 0)?;
            let mut field = FieldSchema::new(name, Some(FieldType::Object));
            field.read_only = flag(property, "readOnly");
            return Ok(field);
        }

        let field_type = property
            .get("type")
            .and_then(Value::as_str)
            .and_then(FieldType::parse);
        let mut field = FieldSchema::new(name, field_type);
        field.format = property
            .get("format")
            .and_then(Value::as_str)
            .map(str::to_string);
        field.minimum = property.get("minimum").and_then(Value::as_f64);
        field.maximum = property.get("maximum").and_then(Value::as_f64);
        field.max_length = property
            .get("maxLength")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok());
        field.read_only = flag(property, "readOnly");
        Ok(field)
    }

    /// Follows `$ref` (and single-element `allOf`) into `components.schemas`.
    fn resolve<'a>(&'a self, schema: &'a Value, depth: usize) -> Result<&'a Value, DirectoryError> {
        if depth > MAX_REF_DEPTH {
            return Err(DirectoryError::InvalidDescription {
                message: "schema references nest too deeply".to_string(),
            });
        }
        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            let target = reference
                .strip_prefix(REF_PREFIX)
                .and_then(|name| self.schemas.get(name))
                .ok_or_else(|| DirectoryError::DanglingReference {
                    reference: reference.to_string(),
                })?;
            return self.resolve(target, depth + 1);
        }
        if let Some(Value::Array(all_of)) = schema.get("allOf")
            && let [single] = all_of.as_slice()
        {
            return self.resolve(single, depth + 1);
        }
        Ok(schema)
    }
}

fn is_reference(property: &Value) -> bool {
    property.get("$ref").is_some() || property.get("allOf").is_some()
}

fn flag(property: &Value, name: &str) -> bool {
    property.get(name).and_then(Value::as_bool).unwrap_or(false)
}

/// Adds the parent-reference fields the platform's models do not carry.
pub(crate) fn inject_route_fields(schema: &mut ResourceSchema, fields: &[&'static str]) {
    let declared: BTreeSet<String> = schema.fields.iter().map(|f| f.name.clone()).collect();
    for (position, field) in fields.iter().enumerate() {
        if !declared.contains(*field) {
            schema
                .fields
                .insert(position, FieldSchema::new(*field, Some(FieldType::String)));
        }
        schema.required.insert((*field).to_string());
    }
}

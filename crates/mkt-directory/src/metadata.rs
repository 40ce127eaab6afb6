//! Per-resource metadata.

use std::collections::BTreeSet;

use mkt_model::ResourceName;
use serde::Serialize;

use crate::error::DirectoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Scalar,
    Array,
}

/// Who checks that a foreign key resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Check {
    /// The generic reference pass.
    Generic,
    /// The resource's own rule, because the target depends on other fields.
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CreateMethod {
    Post,
    Put,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    pub field: &'static str,
    pub target: ResourceName,
    /// Field on the same record holding the target's parent ID.
    pub scope_field: Option<&'static str>,
    pub cardinality: Cardinality,
    pub check: Check,
}

impl ForeignKey {
    pub const fn to(field: &'static str, target: ResourceName) -> Self {
        Self {
            field,
            target,
            scope_field: None,
            cardinality: Cardinality::Scalar,
            check: Check::Generic,
        }
    }

    #[must_use]
    pub const fn scoped_by(mut self, scope_field: &'static str) -> Self {
        self.scope_field = Some(scope_field);
        self
    }

    #[must_use]
    pub const fn many(mut self) -> Self {
        self.cardinality = Cardinality::Array;
        self
    }

    #[must_use]
    pub const fn custom(mut self) -> Self {
        self.check = Check::Custom;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Object,
    Array,
    Integer,
    Number,
    Boolean,
    String,
}

impl FieldType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::String => "string",
        }
    }
}

/// One property of a resource's create model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    pub name: String,
    /// `None` when the description leaves the type open.
    pub field_type: Option<FieldType>,
    pub format: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub max_length: Option<usize>,
    pub read_only: bool,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, field_type: Option<FieldType>) -> Self {
        Self {
            name: name.into(),
            field_type,
            format: None,
            minimum: None,
            maximum: None,
            max_length: None,
            read_only: false,
        }
    }
}

/// Fields and required set resolved from the API description.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceSchema {
    /// Properties in description order.
    pub fields: Vec<FieldSchema>,
    pub required: BTreeSet<String>,
}

impl ResourceSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }
}

/// Everything the validator, seeder, and downloader need to know about one
/// resource type.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceMetadata {
    pub name: ResourceName,
    /// Singular platform model name, used in messages.
    pub model_name: &'static str,
    pub route: &'static str,
    pub list_operation: &'static str,
    pub create_operation: &'static str,
    pub create_method: CreateMethod,
    pub is_assignment: bool,
    pub parent: Option<ResourceName>,
    pub parent_ref_field: Option<&'static str>,
    /// Derived from `parent` when the directory is built.
    pub children: Vec<ResourceName>,
    pub create_priority: u8,
    pub foreign_keys: Vec<ForeignKey>,
    pub owner_field: Option<&'static str>,
    pub redact_fields: &'static [&'static str],
    pub has_id_field: bool,
    pub has_username_field: bool,
    pub schema: Option<ResourceSchema>,
}

impl ResourceMetadata {
    pub(crate) fn object(
        name: ResourceName,
        model_name: &'static str,
        route: &'static str,
        operations: (&'static str, &'static str),
        create_priority: u8,
    ) -> Self {
        Self {
            name,
            model_name,
            route,
            list_operation: operations.0,
            create_operation: operations.1,
            create_method: CreateMethod::Post,
            is_assignment: false,
            parent: None,
            parent_ref_field: None,
            children: Vec::new(),
            create_priority,
            foreign_keys: Vec::new(),
            owner_field: None,
            redact_fields: &[],
            has_id_field: true,
            has_username_field: false,
            schema: None,
        }
    }

    /// Assignments have no ID and are all created after every object.
    pub(crate) fn assignment(
        name: ResourceName,
        model_name: &'static str,
        route: &'static str,
        operations: (&'static str, &'static str),
    ) -> Self {
        Self {
            is_assignment: true,
            has_id_field: false,
            ..Self::object(name, model_name, route, operations, 7)
        }
    }

    #[must_use]
    pub(crate) fn child_of(mut self, parent: ResourceName, field: &'static str) -> Self {
        self.parent = Some(parent);
        self.parent_ref_field = Some(field);
        self
    }

    #[must_use]
    pub(crate) fn with_keys(mut self, keys: &[ForeignKey]) -> Self {
        self.foreign_keys.extend_from_slice(keys);
        self
    }

    #[must_use]
    pub(crate) fn owned(mut self) -> Self {
        self.owner_field = Some("OwnerID");
        self
    }

    #[must_use]
    pub(crate) fn redacting(mut self, fields: &'static [&'static str]) -> Self {
        self.redact_fields = fields;
        self
    }

    #[must_use]
    pub(crate) fn with_username(mut self) -> Self {
        self.has_username_field = true;
        self
    }

    #[must_use]
    pub(crate) fn without_id(mut self) -> Self {
        self.has_id_field = false;
        self
    }

    #[must_use]
    pub(crate) fn created_by_put(mut self) -> Self {
        self.create_method = CreateMethod::Put;
        self
    }

    pub fn is_child(&self) -> bool {
        self.parent.is_some()
    }

    /// Whether records get an identity key in the ID cache.
    pub fn is_indexed(&self) -> bool {
        self.has_id_field || self.has_username_field
    }

    pub fn foreign_key(&self, field: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|key| key.field == field)
    }

    pub fn schema(&self) -> Option<&ResourceSchema> {
        self.schema.as_ref()
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.schema
            .as_ref()
            .is_some_and(|schema| schema.is_required(field))
    }

    /// Number of `{param}` placeholders in the route.
    pub fn route_param_count(&self) -> usize {
        self.route.matches('{').count()
    }

    /// Fills the route's placeholders in order.
    pub fn path(&self, params: &[String]) -> Result<String, DirectoryError> {
        let expected = self.route_param_count();
        if params.len() != expected {
            return Err(DirectoryError::RouteParams {
                resource: self.name,
                route: self.route,
                expected,
                actual: params.len(),
            });
        }
        let mut rendered = String::with_capacity(self.route.len());
        let mut rest = self.route;
        for param in params {
            let (Some(open), Some(close)) = (rest.find('{'), rest.find('}')) else {
                break;
            };
            rendered.push_str(&rest[..open]);
            rendered.push_str(param);
            rest = &rest[close + 1..];
        }
        rendered.push_str(rest);
        Ok(rendered)
    }

    /// Path of a single record under this resource's route.
    pub fn item_path(&self, params: &[String], id: &str) -> Result<String, DirectoryError> {
        Ok(format!("{}/{id}", self.path(params)?))
    }
}

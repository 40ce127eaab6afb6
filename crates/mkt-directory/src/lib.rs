#![deny(unsafe_code)]

pub mod error;
pub mod metadata;
pub mod paths;
pub mod registry;
pub mod schema;
mod table;

pub use crate::error::DirectoryError;
pub use crate::metadata::{
    Cardinality, Check, CreateMethod, FieldSchema, FieldType, ForeignKey, ResourceMetadata,
    ResourceSchema,
};
pub use crate::registry::Directory;
pub use crate::schema::ApiDescription;

/// Loads the API description fixture and builds a schema-augmented directory.
pub fn load_fixture_directory() -> Result<Directory, DirectoryError> {
    let description = ApiDescription::from_path(&paths::api_description_path())?;
    Directory::builtin().with_schema(&description)
}

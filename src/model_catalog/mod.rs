pub mod config;
pub mod errors;
pub mod metadata;
pub mod model_schema;

pub use config::CatalogDefinition;
pub use errors::CatalogError;
pub use metadata::{FieldMetadata, ModelMetadata};
pub use model_schema::{
    AssociationKind, AssociationSchema, DataType, FieldSchema, ModelCatalog, ModelSchema,
};

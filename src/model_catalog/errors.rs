//! # Model Catalog Error Types
//!
//! Errors raised while loading a catalog definition and validating it into an
//! immutable [`ModelCatalog`](super::ModelCatalog).
//!
//! ## Error Categories
//!
//! - **Lookup Errors**: a model or association name that is not declared
//! - **Validation Errors**: duplicate names, dangling association targets,
//!   join keys that name no declared field, reserved pseudo-field names used
//!   as real fields
//! - **Configuration Errors**: file I/O and YAML parsing issues

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("No model schema found for `{model}`")]
    Model { model: String },
    #[error("Model `{model}` declares no association named `{association}`")]
    Association { model: String, association: String },
    #[error("Duplicate model `{model}` in catalog")]
    DuplicateModel { model: String },
    #[error("Model `{model}` declares `{name}` more than once (fields and associations share one namespace)")]
    DuplicateMember { model: String, name: String },
    #[error("Association `{model}.{association}` targets unknown model `{target}`")]
    UnknownTarget {
        model: String,
        association: String,
        target: String,
    },
    #[error("Association `{model}.{association}` joins on `{owner}.{key}`, which is not a declared field")]
    UnknownJoinKey {
        model: String,
        association: String,
        owner: String,
        key: String,
    },
    #[error("Field `{model}.{field}` uses the reserved pseudo-field name `{field}`")]
    ReservedFieldName { model: String, field: String },
    #[error("Failed to read catalog file: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse catalog definition: {error}")]
    ConfigParseError { error: String },
}

impl CatalogError {
    /// Create a Model error with context information
    ///
    /// # Example
    /// ```ignore
    /// CatalogError::model_error_with_context(
    ///     "Project",
    ///     "While resolving association `User.projects`"
    /// )
    /// ```
    pub fn model_error_with_context(model: impl Into<String>, context: impl Into<String>) -> Self {
        CatalogError::Model {
            model: format!("{}\n  Context: {}", model.into(), context.into()),
        }
    }
}

use thiserror::Error;

use crate::model_catalog::CatalogError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompileError {
    #[error("Unknown field `{field}` on model `{model}`")]
    UnknownField { model: String, field: String },

    #[error("Catalog lookup failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Malformed argument `{argument}`: {reason}")]
    MalformedArgument { argument: String, reason: String },

    #[error("Query nesting exceeds the configured depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("Association `{alias}` is selected more than once with different arguments")]
    ConflictingJoin { alias: String },
}

impl CompileError {
    pub fn malformed(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        CompileError::MalformedArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_field(model: impl Into<String>, field: impl Into<String>) -> Self {
        CompileError::UnknownField {
            model: model.into(),
            field: field.into(),
        }
    }
}

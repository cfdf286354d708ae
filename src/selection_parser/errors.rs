use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SelectionError {
    #[error("Invalid GraphQL query document: {0}")]
    QuerySyntax(String),

    #[error("Invalid GraphQL schema document: {0}")]
    SchemaSyntax(String),
}

//! gqlplan - GraphQL selections to relational query plans
//!
//! This crate turns a GraphQL field selection plus its argument bag into the
//! nested find-options descriptor a relational executor runs:
//! - Model catalog loaded from YAML and validated up front
//! - Selection parsing with fragments, variables and argument defaults
//! - Operator translation, projections, computed columns and join planning

pub mod config;
pub mod model_catalog;
pub mod query_compiler;
pub mod selection_parser;

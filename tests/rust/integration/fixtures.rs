//! Shared catalog, schema and request helpers for integration tests

use gqlplan::config::CompilerConfig;
use gqlplan::model_catalog::{CatalogDefinition, ModelCatalog};
use gqlplan::query_compiler::{compile, CompileError, CompiledQuery, FieldSource, ModelAdapter};
use gqlplan::selection_parser::{
    parse_info, parse_query_document, parse_schema_document, Arguments, ResolveInfo,
};
use serde_json::Value;

pub const CATALOG_YAML: &str = r#"
name: workspace
models:
  - name: User
    table_name: users
    fields:
      - { name: id, type: INTEGER, primary_key: true }
      - { name: name, type: STRING, field: user_name }
      - { name: age, type: INTEGER }
      - { name: createdAt, type: TIMESTAMP, field: created_at }
    associations:
      - { as: projects, kind: HasMany, target: Project, foreign_key: userId }
  - name: Project
    fields:
      - { name: id, type: INTEGER, primary_key: true }
      - { name: title, type: STRING }
      - { name: userId, type: INTEGER, field: user_id }
      - { name: ownerId, type: INTEGER, field: owner_id }
    associations:
      - { as: owner, kind: BelongsTo, target: Account, foreign_key: ownerId }
      - { as: user, kind: BelongsTo, target: User, foreign_key: userId }
  - name: Account
    fields:
      - { name: id, type: INTEGER, primary_key: true }
      - { name: name, type: STRING, field: account_name }
      - { name: email, type: STRING }
"#;

pub const SCHEMA_SDL: &str = r#"
scalar JSON

type Query {
    user(id: ID, where: JSON): User
    users(
        limit: Int
        offset: Int
        where: JSON
        having: JSON
        order: JSON
        groupBy: String
        attributes: JSON
        age: Int
        name: String
    ): [User!]!
    projects(limit: Int = 50, where: JSON, order: JSON): [Project]
}

type User {
    id: ID
    name: String
    age: Int
    createdAt: String
    projects(limit: Int, where: JSON, order: JSON, required: Boolean): [Project]
    _aggregation(fn: String!, as: String, args: JSON): Float
    _col(name: String!, as: String): String
}

type Project {
    id: ID
    title: String
    owner(where: JSON, required: Boolean): Account
    user: User
    _aggregation(fn: String!, as: String, args: JSON): Float
    _col(name: String!, as: String): String
}

type Account {
    id: ID
    name: String
    email: String
}
"#;

pub fn catalog() -> ModelCatalog {
    CatalogDefinition::from_yaml_str(CATALOG_YAML)
        .and_then(CatalogDefinition::into_catalog)
        .expect("fixture catalog is valid")
}

/// Compile the root field `field` of `query` the way a resolver would
pub fn compile_request(
    query: &str,
    field: &str,
    variables: Value,
) -> Result<CompiledQuery, CompileError> {
    compile_request_with(query, field, variables, &CompilerConfig::default())
}

pub fn compile_request_with(
    query: &str,
    field: &str,
    variables: Value,
    config: &CompilerConfig,
) -> Result<CompiledQuery, CompileError> {
    let catalog = catalog();
    let schema = parse_schema_document(SCHEMA_SDL).expect("fixture schema parses");
    let document = parse_query_document(query).expect("request parses");
    let variables: Arguments = variables.as_object().cloned().unwrap_or_default();

    let info = ResolveInfo::for_root_field(&document, &schema, &variables, None, field);
    let root = parse_info(&info).expect("root field is selected");
    let adapter = ModelAdapter::new(&catalog, &root.type_name, config)?;
    compile(&adapter, &root.args, FieldSource::Info(&info))
}

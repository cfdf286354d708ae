use gqlplan::query_compiler::{compile_aggregate, AggregateFunction, CompileError};
use serde_json::json;

use super::fixtures::catalog;

fn args(value: serde_json::Value) -> gqlplan::selection_parser::Arguments {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn test_aggregate_over_storage_column() {
    let catalog = catalog();
    let user = catalog.get_model("User").unwrap();
    let descriptor = compile_aggregate(
        user,
        &args(json!({"fn": "avg", "field": "name", "where": {"age": {"_between": [18, 30]}}})),
    )
    .unwrap();
    assert_eq!(descriptor.function, AggregateFunction::Avg);
    assert_eq!(descriptor.column, "user_name");
    assert_eq!(
        serde_json::Value::Object(descriptor.where_),
        json!({"age": {"$between": [18, 30]}})
    );
    assert_eq!(descriptor.data_type, "float");
}

#[test]
fn test_aggregate_unknown_field() {
    let catalog = catalog();
    let project = catalog.get_model("Project").unwrap();
    assert_eq!(
        compile_aggregate(project, &args(json!({"fn": "SUM", "field": "budget"}))).unwrap_err(),
        CompileError::UnknownField {
            model: "Project".to_string(),
            field: "budget".to_string()
        }
    );
}

#[test]
fn test_metadata_for_every_model() {
    let catalog = catalog();
    let all = catalog.metadata_list();
    let names: Vec<&str> = all.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Account", "Project", "User"]);

    let user = catalog.metadata("User").unwrap();
    assert_eq!(user.pk_name.as_deref(), Some("id"));
    let created = user.fields.iter().find(|f| f.name == "createdAt").unwrap();
    assert!(created.sortable);
    let projects = user.fields.iter().find(|f| f.name == "projects").unwrap();
    assert!(projects.is_list);
    assert_eq!(projects.graphql_type, "Project");

    assert!(catalog.metadata("Nobody").is_err());
}

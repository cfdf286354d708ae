use gqlplan::config::CompilerConfig;
use gqlplan::query_compiler::{
    ColumnRef, CompileError, Expr, JoinEntry, OrderItem, Projection, ProjectionItem,
};
use serde_json::{json, Value};

use super::fixtures::{compile_request, compile_request_with};

fn touched(compiled: &gqlplan::query_compiler::CompiledQuery) -> Vec<&str> {
    compiled.touched_fields.iter().map(String::as_str).collect()
}

#[test]
fn test_user_with_projects() {
    let compiled = compile_request(
        "{ user(id: 1) { name projects { title } } }",
        "user",
        json!({}),
    )
    .unwrap();
    let descriptor = &compiled.descriptor;

    assert_eq!(descriptor.attributes, Some(Projection::columns(["name", "id"])));
    assert_eq!(Value::Object(descriptor.where_.clone().unwrap()), json!({"id": 1}));
    // single-object root: no implicit page size
    assert_eq!(descriptor.limit, None);

    assert_eq!(descriptor.include.len(), 1);
    let projects = descriptor.join("projects").unwrap();
    assert_eq!(projects.model, "Project");
    assert_eq!(projects.descriptor.attributes, Some(Projection::columns(["title"])));
    assert_eq!(projects.descriptor.limit, None);

    assert_eq!(touched(&compiled), vec!["Project.title", "User.name"]);
}

#[test]
fn test_list_root_gets_default_limit() {
    let compiled = compile_request("{ users { id } }", "users", json!({})).unwrap();
    assert_eq!(compiled.descriptor.limit, Some(20));
    assert_eq!(compiled.descriptor.offset, None);

    let config = CompilerConfig {
        default_limit: None,
        ..Default::default()
    };
    let compiled = compile_request_with("{ users { id } }", "users", json!({}), &config).unwrap();
    assert_eq!(compiled.descriptor.limit, None);
}

#[test]
fn test_string_limit_from_variables() {
    let compiled = compile_request(
        "query Page($limit: Int, $offset: Int) { users(limit: $limit, offset: $offset) { id } }",
        "users",
        json!({"limit": "10"}),
    )
    .unwrap();
    assert_eq!(compiled.descriptor.limit, Some(10));
    assert_eq!(compiled.descriptor.offset, None);

    let serialized = serde_json::to_value(&compiled.descriptor).unwrap();
    assert!(serialized.get("offset").is_none());
}

#[test]
fn test_field_argument_and_explicit_where() {
    let compiled = compile_request("{ users(age: 18) { id } }", "users", json!({})).unwrap();
    assert_eq!(
        Value::Object(compiled.descriptor.where_.unwrap()),
        json!({"age": 18})
    );

    let compiled = compile_request(
        r#"{ users(age: 18, name: "ann", where: {age: {_gt: 6}}) { id } }"#,
        "users",
        json!({}),
    )
    .unwrap();
    assert_eq!(
        Value::Object(compiled.descriptor.where_.unwrap()),
        json!({"age": {"$gt": 6}, "name": "ann"})
    );
}

#[test]
fn test_expansion_and_computed_column_share_one_join() {
    let compiled = compile_request(
        r#"{
            projects {
                title
                owner { name }
                _aggregation(fn: "MID", args: ["owner.email", 2, 1], as: "mid")
            }
        }"#,
        "projects",
        json!({}),
    )
    .unwrap();

    assert_eq!(
        serde_json::to_value(&compiled.descriptor).unwrap(),
        json!({
            "attributes": [
                "title",
                "ownerId",
                [
                    {"fn": {"name": "MID", "args": [
                        {"col": {"association": "owner", "column": "email"}},
                        {"literal": 2},
                        {"literal": 1}
                    ]}},
                    "mid"
                ]
            ],
            "limit": 50,
            "include": [
                {"model": "Account", "as": "owner", "attributes": ["name"]}
            ]
        })
    );
    assert_eq!(
        touched(&compiled),
        vec!["Account.email", "Account.name", "Project.title"]
    );
}

#[test]
fn test_computed_column_without_expansion_gets_support_join() {
    let compiled = compile_request(
        r#"{ projects(limit: 5) { id _aggregation(fn: "MID", args: ["owner.name", 2, 1]) } }"#,
        "projects",
        json!({}),
    )
    .unwrap();
    let descriptor = compiled.descriptor;
    assert_eq!(descriptor.limit, Some(5));
    assert_eq!(descriptor.include, vec![JoinEntry::column_support("Account", "owner")]);
    assert_eq!(
        descriptor.attributes,
        Some(Projection::Columns(vec![
            ProjectionItem::Column("id".to_string()),
            ProjectionItem::Aliased(
                Expr::call(
                    "MID",
                    vec![
                        Expr::Column(ColumnRef::qualified("owner", "account_name")),
                        Expr::literal(2),
                        Expr::literal(1),
                    ]
                ),
                "_MID".to_string()
            ),
        ]))
    );
}

#[test]
fn test_related_column_with_unknown_name_aborts() {
    let result = compile_request(
        r#"{ projects { id owner { name } _col(name: "owner.nope", as: "x") } }"#,
        "projects",
        json!({}),
    );
    assert_eq!(
        result.unwrap_err(),
        CompileError::UnknownField {
            model: "Project".to_string(),
            field: "owner.nope".to_string(),
        }
    );
}

#[test]
fn test_related_column_error_in_nested_join_propagates() {
    let result = compile_request(
        r#"{ users { projects { _col(name: "missing") } } }"#,
        "users",
        json!({}),
    );
    assert!(matches!(result, Err(CompileError::UnknownField { ref model, .. }) if model == "Project"));
}

#[test]
fn test_fragments_variables_and_nested_arguments() {
    let compiled = compile_request(
        r#"
        query Dashboard($minAge: Int, $withOwner: Boolean!) {
            users(where: {age: {_gte: $minAge}}, order: [{name: "age", sort: "desc"}]) {
                ...UserBits
                projects(where: {title: {_like: "Boat%"}}, required: true) {
                    title
                    owner @include(if: $withOwner) { email }
                }
            }
        }
        fragment UserBits on User { id name }
        "#,
        "users",
        json!({"minAge": 21, "withOwner": false}),
    )
    .unwrap();
    let descriptor = compiled.descriptor;

    assert_eq!(
        Value::Object(descriptor.where_.clone().unwrap()),
        json!({"age": {"$gte": 21}})
    );
    assert_eq!(descriptor.order, Some(vec![OrderItem::desc("age")]));
    assert_eq!(descriptor.attributes, Some(Projection::columns(["id", "name"])));

    let projects = descriptor.join("projects").unwrap();
    assert_eq!(projects.descriptor.required, Some(true));
    assert_eq!(
        Value::Object(projects.descriptor.where_.clone().unwrap()),
        json!({"title": {"$like": "Boat%"}})
    );
    assert!(projects.descriptor.include.is_empty());
    assert_eq!(projects.descriptor.attributes, Some(Projection::columns(["title"])));
}

#[test]
fn test_group_by_with_count() {
    let compiled = compile_request(
        r#"{ users(groupBy: "age", having: {_count: {_gt: 1}}) { age _aggregation(fn: "COUNT", args: "id", as: "total") } }"#,
        "users",
        json!({}),
    )
    .unwrap();
    let descriptor = compiled.descriptor;
    assert_eq!(descriptor.group, Some(vec![Expr::column("age")]));
    assert_eq!(
        Value::Object(descriptor.having.unwrap()),
        json!({"_count": {"$gt": 1}})
    );
    assert_eq!(
        descriptor.attributes.unwrap().column_names(),
        vec!["age", "total"]
    );
}

#[test]
fn test_attributes_argument_overrides_selection() {
    let compiled = compile_request(
        r#"{ users(attributes: {include: [["COUNT"]]}) { name } }"#,
        "users",
        json!({}),
    )
    .unwrap();
    assert_eq!(
        compiled.descriptor.attributes,
        Some(Projection::Filtered {
            include: vec![ProjectionItem::Aliased(
                Expr::call("COUNT", vec![Expr::literal("*")]),
                "_count".to_string()
            )],
            exclude: vec![],
        })
    );
}

#[test]
fn test_empty_attributes_argument_keeps_selected_columns() {
    let compiled = compile_request(
        r#"{ users(attributes: [], age: 30) { name age } }"#,
        "users",
        json!({}),
    )
    .unwrap();
    assert_eq!(
        compiled.descriptor.attributes,
        Some(Projection::columns(["name", "age"]))
    );
    assert_eq!(touched(&compiled), vec!["User.age", "User.name"]);
}

#[test]
fn test_malformed_limit_is_rejected() {
    let result = compile_request(
        "query Q($n: Int) { users(limit: $n) { id } }",
        "users",
        json!({"n": "lots"}),
    );
    assert!(matches!(
        result,
        Err(CompileError::MalformedArgument { ref argument, .. }) if argument == "limit"
    ));
}

#[test]
fn test_conflicting_aliased_association_selections() {
    let result = compile_request(
        r#"{ users { a: projects(limit: 1) { id } b: projects(limit: 2) { id } } }"#,
        "users",
        json!({}),
    );
    assert_eq!(
        result.unwrap_err(),
        CompileError::ConflictingJoin {
            alias: "projects".to_string()
        }
    );
}

#[test]
fn test_deep_selection_hits_depth_limit() {
    let config = CompilerConfig {
        max_depth: 3,
        ..Default::default()
    };
    let result = compile_request_with(
        "{ users { projects { user { projects { id } } } } }",
        "users",
        json!({}),
        &config,
    );
    assert_eq!(result.unwrap_err(), CompileError::DepthLimitExceeded { limit: 3 });
}

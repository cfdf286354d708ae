//! Unit tests for selection parsing edge cases and error handling
//!
//! Malformed requests must surface as errors, and odd-but-valid requests must
//! parse without panics.

#[cfg(test)]
mod selection_robustness_tests {
    use gqlplan::selection_parser::{
        parse_info, parse_query_document, parse_schema_document, Arguments, ResolveInfo,
        SelectionError,
    };
    use serde_json::json;

    const SCHEMA: &str = "type Query { items(first: Int = 5): [Item] } type Item { id: ID children: [Item] }";

    /// Test that malformed requests are reported, never panic
    #[test]
    fn test_malformed_queries_are_errors() {
        let malformed_queries = vec![
            "{",
            "{ items { id }",
            "query Q($a: ) { items }",
            "{ items(first: ) { id } }",
            "fragment F on { id }",
        ];

        for query in malformed_queries {
            assert!(
                matches!(parse_query_document(query), Err(SelectionError::QuerySyntax(_))),
                "expected a syntax error for {:?}",
                query
            );
        }
    }

    #[test]
    fn test_schema_without_root_type() {
        let schema = parse_schema_document("type Item { id: ID }").unwrap();
        let document = parse_query_document("{ items { id } }").unwrap();
        let variables = Arguments::new();
        let info = ResolveInfo::for_root_field(&document, &schema, &variables, None, "items");
        let root = parse_info(&info).unwrap();
        // no type information: treated as a single object of unknown type
        assert_eq!(root.type_name, "");
        assert!(!root.is_list);
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].type_name, "");
    }

    #[test]
    fn test_unknown_fragment_is_skipped() {
        let schema = parse_schema_document(SCHEMA).unwrap();
        let document = parse_query_document("{ items { id ...Missing } }").unwrap();
        let variables = Arguments::new();
        let info = ResolveInfo::for_root_field(&document, &schema, &variables, None, "items");
        let root = parse_info(&info).unwrap();
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.args.get("first"), Some(&json!(5)));
    }

    #[test]
    fn test_deeply_nested_selection() {
        let depth = 20;
        let query = format!(
            "{{ items {}{{ id }}{} }}",
            "{ children ".repeat(depth),
            " }".repeat(depth)
        );
        let schema = parse_schema_document(SCHEMA).unwrap();
        let document = parse_query_document(&query).unwrap();
        let variables = Arguments::new();
        let info = ResolveInfo::for_root_field(&document, &schema, &variables, None, "items");
        let mut node = parse_info(&info).unwrap();
        let mut levels = 0;
        while let Some(mut children) = node.fields.take() {
            if children.is_empty() {
                break;
            }
            node = children.remove(0);
            levels += 1;
        }
        assert_eq!(levels, depth + 1);
        assert_eq!(node.name, "id");
    }

    #[test]
    fn test_named_operation_selection() {
        let schema = parse_schema_document(SCHEMA).unwrap();
        let document =
            parse_query_document("query A { items(first: 1) { id } } query B { items(first: 2) { id } }")
                .unwrap();
        let variables = Arguments::new();
        let info = ResolveInfo::for_root_field(&document, &schema, &variables, Some("B"), "items");
        assert_eq!(parse_info(&info).unwrap().args.get("first"), Some(&json!(2)));
        let info = ResolveInfo::for_root_field(&document, &schema, &variables, Some("C"), "items");
        assert!(parse_info(&info).is_none());
    }
}

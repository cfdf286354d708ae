//! Unit tests for catalog definitions that must be rejected at load time

#[cfg(test)]
mod catalog_validation_tests {
    use gqlplan::model_catalog::{CatalogDefinition, CatalogError};

    fn load(yaml: &str) -> Result<gqlplan::model_catalog::ModelCatalog, CatalogError> {
        CatalogDefinition::from_yaml_str(yaml)?.into_catalog()
    }

    #[test]
    fn test_pseudo_field_names_are_reserved() {
        let err = load(
            r#"
models:
  - name: User
    fields:
      - { name: _col, type: STRING }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::ReservedFieldName { ref field, .. } if field == "_col"));
    }

    #[test]
    fn test_field_and_association_share_a_namespace() {
        let err = load(
            r#"
models:
  - name: User
    fields:
      - { name: projects, type: STRING }
    associations:
      - { as: projects, kind: HasMany, target: User, foreign_key: userId }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateMember { .. }));
    }

    #[test]
    fn test_dangling_association_target() {
        let err = load(
            r#"
models:
  - name: Project
    fields:
      - { name: id, type: INTEGER }
    associations:
      - { as: owner, kind: BelongsTo, target: Ghost, foreign_key: ownerId }
"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownTarget {
                model: "Project".to_string(),
                association: "owner".to_string(),
                target: "Ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_join_keys_must_be_declared_fields() {
        let err = load(
            r#"
models:
  - name: User
    fields:
      - { name: id, type: INTEGER, primary_key: true }
    associations:
      - { as: projects, kind: HasMany, target: Project, foreign_key: userId }
  - name: Project
    fields:
      - { name: id, type: INTEGER, primary_key: true }
      - { name: ownerId, type: INTEGER }
"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownJoinKey {
                model: "User".to_string(),
                association: "projects".to_string(),
                owner: "Project".to_string(),
                key: "userId".to_string(),
            }
        );

        let err = load(
            r#"
models:
  - name: User
    fields:
      - { name: id, type: INTEGER, primary_key: true }
  - name: Project
    fields:
      - { name: id, type: INTEGER, primary_key: true }
    associations:
      - { as: owner, kind: BelongsTo, target: User, foreign_key: ownerId }
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::UnknownJoinKey { ref owner, ref key, .. } if owner == "Project" && key == "ownerId"
        ));
    }

    #[test]
    fn test_unknown_data_type_is_a_parse_error() {
        let err = load(
            r#"
models:
  - name: User
    fields:
      - { name: id, type: COMPLEX }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::ConfigParseError { .. }));
    }

    #[test]
    fn test_duplicate_models() {
        let err = load(
            r#"
models:
  - { name: User, fields: [] }
  - { name: User, fields: [] }
"#,
        )
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateModel { model: "User".to_string() });
    }
}

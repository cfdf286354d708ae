use super::errors::CatalogError;
use super::model_schema::{ModelCatalog, ModelSchema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Catalog definitions are written in YAML:
///
/// ```yaml
/// name: shop
/// models:
///   - name: User
///     table_name: user
///     fields:
///       - { name: id, type: INTEGER, primary_key: true }
///       - { name: name, type: STRING, allow_null: false }
///       - { name: createdAt, type: TIMESTAMP, field: created_at }
///     associations:
///       - { as: projects, kind: HasMany, target: Project, foreign_key: ownerId }
///   - name: Project
///     fields:
///       - { name: id, type: INTEGER, primary_key: true }
///       - { name: title, type: STRING }
///       - { name: ownerId, type: INTEGER }
///     associations:
///       - { as: owner, kind: BelongsTo, target: User, foreign_key: ownerId }
/// ```
///
/// `field` names the storage column when it differs from the field name;
/// `source_key` and `target_key` default to `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default)]
    pub name: Option<String>,
    pub models: Vec<ModelSchema>,
}

impl CatalogDefinition {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|e| CatalogError::ConfigReadError {
            error: e.to_string(),
        })?;

        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        serde_yaml::from_str(yaml).map_err(|e| CatalogError::ConfigParseError {
            error: e.to_string(),
        })
    }

    /// Validate cross-model references and freeze the definition
    pub fn into_catalog(self) -> Result<ModelCatalog, CatalogError> {
        if let Some(name) = &self.name {
            log::info!("loading model catalog `{}`", name);
        }
        ModelCatalog::build(self.models)
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::errors::CatalogError;
use crate::query_compiler::pseudo_fields;

/// Declared value type of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    String,
    Text,
    Uuid,
    Boolean,
    Integer,
    Bigint,
    Float,
    Double,
    Decimal,
    Date,
    Time,
    #[serde(alias = "DATETIME")]
    Timestamp,
    Json,
    Enum,
}

impl DataType {
    /// Whether values of this type have a meaningful ordering for sort UIs
    pub fn is_sortable(&self) -> bool {
        matches!(
            self,
            DataType::Integer
                | DataType::Bigint
                | DataType::Float
                | DataType::Double
                | DataType::Decimal
                | DataType::Date
                | DataType::Time
                | DataType::Timestamp
        )
    }

    /// Name of the GraphQL scalar the type layer exposes for this column
    pub fn graphql_type_name(&self) -> &'static str {
        match self {
            DataType::Boolean => "Boolean",
            DataType::Integer => "Int",
            DataType::Float | DataType::Double => "Float",
            DataType::Date | DataType::Timestamp => "Date",
            DataType::Json => "JSON",
            DataType::String
            | DataType::Text
            | DataType::Uuid
            | DataType::Time
            | DataType::Bigint
            | DataType::Decimal
            | DataType::Enum => "String",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::String => "STRING",
            DataType::Text => "TEXT",
            DataType::Uuid => "UUID",
            DataType::Boolean => "BOOLEAN",
            DataType::Integer => "INTEGER",
            DataType::Bigint => "BIGINT",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Decimal => "DECIMAL",
            DataType::Date => "DATE",
            DataType::Time => "TIME",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Json => "JSON",
            DataType::Enum => "ENUM",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    /// Storage column, when it differs from the field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(default = "default_allow_null")]
    pub allow_null: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn default_allow_null() -> bool {
    true
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        FieldSchema {
            name: name.into(),
            field: None,
            data_type,
            allow_null: true,
            primary_key: false,
            comment: None,
        }
    }

    pub fn primary(mut self) -> Self {
        self.primary_key = true;
        self.allow_null = false;
        self
    }

    pub fn stored_as(mut self, column: impl Into<String>) -> Self {
        self.field = Some(column.into());
        self
    }

    /// Underlying storage column, falling back to the field name
    pub fn storage_name(&self) -> &str {
        self.field.as_deref().unwrap_or(&self.name)
    }
}

/// Association cardinality, fixed when the catalog is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssociationKind {
    BelongsTo,
    HasOne,
    HasMany,
    BelongsToMany,
}

impl AssociationKind {
    pub fn is_to_many(&self) -> bool {
        matches!(self, AssociationKind::HasMany | AssociationKind::BelongsToMany)
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssociationKind::BelongsTo => f.write_str("BelongsTo"),
            AssociationKind::HasOne => f.write_str("HasOne"),
            AssociationKind::HasMany => f.write_str("HasMany"),
            AssociationKind::BelongsToMany => f.write_str("BelongsToMany"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationSchema {
    /// GraphQL-facing alias (`as`)
    #[serde(rename = "as")]
    pub name: String,
    pub kind: AssociationKind,
    pub target: String,
    pub foreign_key: String,
    #[serde(default = "default_key")]
    pub source_key: String,
    #[serde(default = "default_key")]
    pub target_key: String,
}

fn default_key() -> String {
    "id".to_string()
}

impl AssociationSchema {
    pub fn new(
        name: impl Into<String>,
        kind: AssociationKind,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        AssociationSchema {
            name: name.into(),
            kind,
            target: target.into(),
            foreign_key: foreign_key.into(),
            source_key: default_key(),
            target_key: default_key(),
        }
    }

    /// Column on the source model that the join condition reads
    pub fn source_join_column(&self) -> &str {
        match self.kind {
            AssociationKind::BelongsTo => &self.foreign_key,
            _ => &self.source_key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub fields: Vec<FieldSchema>,
    #[serde(default)]
    pub associations: Vec<AssociationSchema>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>) -> Self {
        ModelSchema {
            name: name.into(),
            table_name: None,
            comment: None,
            fields: Vec::new(),
            associations: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_association(mut self, association: AssociationSchema) -> Self {
        self.associations.push(association);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn association(&self, name: &str) -> Option<&AssociationSchema> {
        self.associations.iter().find(|a| a.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn primary_key(&self) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.primary_key)
    }
}

/// Read-only catalog of every model known to the compiler.
///
/// Built once through [`ModelCatalog::build`], which validates cross-model
/// references; lookups never mutate it, so one catalog can be shared behind an
/// `Arc` by any number of concurrent requests.
#[derive(Debug, Clone, Serialize)]
pub struct ModelCatalog {
    models: HashMap<String, ModelSchema>,
}

impl ModelCatalog {
    pub fn build(models: Vec<ModelSchema>) -> Result<ModelCatalog, CatalogError> {
        let mut by_name = HashMap::with_capacity(models.len());
        for model in models {
            if by_name.contains_key(&model.name) {
                return Err(CatalogError::DuplicateModel { model: model.name });
            }
            by_name.insert(model.name.clone(), model);
        }

        for model in by_name.values() {
            Self::validate_model(model, &by_name)?;
        }

        log::debug!("model catalog built with {} models", by_name.len());
        Ok(ModelCatalog { models: by_name })
    }

    fn validate_model(
        model: &ModelSchema,
        models: &HashMap<String, ModelSchema>,
    ) -> Result<(), CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for field in &model.fields {
            if pseudo_fields::is_reserved(&field.name) {
                return Err(CatalogError::ReservedFieldName {
                    model: model.name.clone(),
                    field: field.name.clone(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(CatalogError::DuplicateMember {
                    model: model.name.clone(),
                    name: field.name.clone(),
                });
            }
        }
        for association in &model.associations {
            if pseudo_fields::is_reserved(&association.name) {
                return Err(CatalogError::ReservedFieldName {
                    model: model.name.clone(),
                    field: association.name.clone(),
                });
            }
            if !seen.insert(association.name.as_str()) {
                return Err(CatalogError::DuplicateMember {
                    model: model.name.clone(),
                    name: association.name.clone(),
                });
            }
            let Some(target) = models.get(&association.target) else {
                return Err(CatalogError::UnknownTarget {
                    model: model.name.clone(),
                    association: association.name.clone(),
                    target: association.target.clone(),
                });
            };
            Self::validate_join_keys(model, association, target)?;
        }
        Ok(())
    }

    /// The source join column must be a field of `model`; for `HasOne`/`HasMany`
    /// the foreign key must also be a field of the target.
    fn validate_join_keys(
        model: &ModelSchema,
        association: &AssociationSchema,
        target: &ModelSchema,
    ) -> Result<(), CatalogError> {
        let unknown = |owner: &ModelSchema, key: &str| CatalogError::UnknownJoinKey {
            model: model.name.clone(),
            association: association.name.clone(),
            owner: owner.name.clone(),
            key: key.to_string(),
        };

        let source_column = association.source_join_column();
        if model.field(source_column).is_none() {
            return Err(unknown(model, source_column));
        }
        match association.kind {
            AssociationKind::HasOne | AssociationKind::HasMany
                if target.field(&association.foreign_key).is_none() =>
            {
                Err(unknown(target, &association.foreign_key))
            }
            _ => Ok(()),
        }
    }

    pub fn get_model(&self, name: &str) -> Result<&ModelSchema, CatalogError> {
        self.models.get(name).ok_or(CatalogError::Model {
            model: name.to_string(),
        })
    }

    pub fn get_model_opt(&self, name: &str) -> Option<&ModelSchema> {
        self.models.get(name)
    }

    /// Target schema of `model.association`
    pub fn association_target<'m>(
        &'m self,
        model: &'m ModelSchema,
        association: &str,
    ) -> Result<(&'m AssociationSchema, &'m ModelSchema), CatalogError> {
        let assoc = model
            .association(association)
            .ok_or_else(|| CatalogError::Association {
                model: model.name.clone(),
                association: association.to_string(),
            })?;
        let target = self.models.get(&assoc.target).ok_or_else(|| {
            CatalogError::model_error_with_context(
                &assoc.target,
                format!("While resolving association `{}.{}`", model.name, assoc.name),
            )
        })?;
        Ok((assoc, target))
    }

    /// Model names in lexical order
    pub fn model_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

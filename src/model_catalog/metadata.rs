//! Serializable per-model metadata, served to admin UIs that build forms and
//! tables generically from the catalog.

use serde::{Deserialize, Serialize};

use super::errors::CatalogError;
use super::model_schema::{ModelCatalog, ModelSchema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    pub name: String,
    /// GraphQL type name (`Int`, `String`, or the target model for associations)
    #[serde(rename = "type")]
    pub graphql_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    pub allow_null: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pk: Option<bool>,
    pub is_list: bool,
    pub sortable: bool,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pk_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldMetadata>,
}

impl ModelMetadata {
    pub fn from_model(model: &ModelSchema) -> Self {
        let mut fields: Vec<FieldMetadata> = model
            .fields
            .iter()
            .map(|field| FieldMetadata {
                name: field.name.clone(),
                graphql_type: field.data_type.graphql_type_name().to_string(),
                data_type: Some(field.data_type.to_string()),
                allow_null: field.allow_null,
                is_pk: Some(field.primary_key),
                is_list: false,
                sortable: field.data_type.is_sortable(),
                title: field.comment.clone().unwrap_or_else(|| field.name.clone()),
                description: field.comment.clone(),
            })
            .collect();

        fields.extend(model.associations.iter().map(|assoc| FieldMetadata {
            name: assoc.name.clone(),
            graphql_type: assoc.target.clone(),
            data_type: None,
            allow_null: true,
            is_pk: None,
            is_list: assoc.kind.is_to_many(),
            sortable: false,
            title: assoc.name.clone(),
            description: None,
        }));

        ModelMetadata {
            name: model.name.clone(),
            title: model.comment.clone().unwrap_or_else(|| model.name.clone()),
            pk_name: model.primary_key().map(|f| f.name.clone()),
            description: model.comment.clone(),
            fields,
        }
    }
}

impl ModelCatalog {
    pub fn metadata(&self, model: &str) -> Result<ModelMetadata, CatalogError> {
        self.get_model(model).map(ModelMetadata::from_model)
    }

    /// Metadata for every model, in lexical model order
    pub fn metadata_list(&self) -> Vec<ModelMetadata> {
        self.model_names()
            .into_iter()
            .filter_map(|name| self.get_model_opt(name))
            .map(ModelMetadata::from_model)
            .collect()
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field arguments, already decoded and variable-substituted
pub type Arguments = serde_json::Map<String, Value>;

/// Directive name → its decoded arguments object
pub type Directives = serde_json::Map<String, Value>;

/// One node of the normalized selection tree.
///
/// `fields` is `None` for leaves; a node with a sub-selection always carries
/// `Some`, even when every child was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Named type with list and non-null wrappers stripped
    #[serde(rename = "type")]
    pub type_name: String,
    pub is_list: bool,
    #[serde(default)]
    pub args: Arguments,
    /// Directives declared on the field's object type
    #[serde(default)]
    pub directives_object: Directives,
    /// Directives declared on the field definition
    #[serde(default)]
    pub directives_field: Directives,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldNode>>,
}

impl FieldNode {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        FieldNode {
            name: name.into(),
            alias: None,
            type_name: type_name.into(),
            is_list: false,
            args: Arguments::new(),
            directives_object: Directives::new(),
            directives_field: Directives::new(),
            fields: None,
        }
    }

    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_args(mut self, args: Value) -> Self {
        if let Value::Object(map) = args {
            self.args = map;
        }
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldNode>) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Key the field appears under in the response
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn children(&self) -> &[FieldNode] {
        self.fields.as_deref().unwrap_or(&[])
    }
}

//! Query descriptor: the compiler's output, handed to a persistence executor.
//!
//! Serialized field names follow the executor's find-options wire format
//! (`where`, `subQuery`, `include` entries carrying `model` and `as`), and
//! absent options are omitted rather than written as `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Filter predicate tree in native operator form
pub type Predicate = serde_json::Map<String, Value>;

/// Column reference, optionally qualified by the association alias it is read through
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association: Option<String>,
    pub column: String,
}

impl ColumnRef {
    pub fn bare(column: impl Into<String>) -> Self {
        ColumnRef {
            association: None,
            column: column.into(),
        }
    }

    pub fn qualified(association: impl Into<String>, column: impl Into<String>) -> Self {
        ColumnRef {
            association: Some(association.into()),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.association {
            Some(association) => write!(f, "{}.{}", association, self.column),
            None => f.write_str(&self.column),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnCall {
    pub name: String,
    pub args: Vec<Expr>,
}

/// Native computed expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    #[serde(rename = "literal")]
    Literal(Value),
    #[serde(rename = "col")]
    Column(ColumnRef),
    #[serde(rename = "fn")]
    Call(FnCall),
}

impl Expr {
    pub fn column(column: impl Into<String>) -> Self {
        Expr::Column(ColumnRef::bare(column))
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call(FnCall {
            name: name.into(),
            args,
        })
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(Value::String(s)) if s == "*" => f.write_str("*"),
            Expr::Literal(Value::String(s)) => write!(f, "'{}'", s.replace('\'', "''")),
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Column(col) => write!(f, "{}", col),
            Expr::Call(call) => {
                write!(f, "{}(", call.name)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// One projected entry: a plain attribute, or `[expression, alias]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectionItem {
    Column(String),
    Aliased(Expr, String),
}

impl ProjectionItem {
    /// Name under which the item appears in result rows
    pub fn output_name(&self) -> &str {
        match self {
            ProjectionItem::Column(name) => name,
            ProjectionItem::Aliased(_, alias) => alias,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Projection {
    /// Exactly these columns; an empty list projects nothing
    Columns(Vec<ProjectionItem>),
    /// All columns, minus `exclude`, plus `include`
    Filtered {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        include: Vec<ProjectionItem>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude: Vec<String>,
    },
}

impl Projection {
    pub fn columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Columns(
            names
                .into_iter()
                .map(|n| ProjectionItem::Column(n.into()))
                .collect(),
        )
    }

    pub fn none() -> Self {
        Projection::Columns(Vec::new())
    }

    /// Projects nothing explicit: an empty column list, or neither include nor exclude
    pub fn is_empty(&self) -> bool {
        match self {
            Projection::Columns(items) => items.is_empty(),
            Projection::Filtered { include, exclude } => include.is_empty() && exclude.is_empty(),
        }
    }

    /// Append computed columns without dropping what is already projected
    pub fn extend_computed(&mut self, items: Vec<ProjectionItem>) {
        match self {
            Projection::Columns(columns) => columns.extend(items),
            Projection::Filtered { include, .. } => include.extend(items),
        }
    }

    pub fn column_names(&self) -> Vec<&str> {
        match self {
            Projection::Columns(items) | Projection::Filtered { include: items, .. } => {
                items.iter().map(|i| i.output_name()).collect()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(direction: &str) -> Option<Self> {
        match direction.to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// `[field, direction]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem(pub String, pub SortDirection);

impl OrderItem {
    pub fn asc(name: impl Into<String>) -> Self {
        OrderItem(name.into(), SortDirection::Asc)
    }

    pub fn desc(name: impl Into<String>) -> Self {
        OrderItem(name.into(), SortDirection::Desc)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Projection>,
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_: Option<Predicate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub having: Option<Predicate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Vec<Expr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<OrderItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_query: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<JoinEntry>,
}

impl QueryDescriptor {
    pub fn join(&self, alias: &str) -> Option<&JoinEntry> {
        self.include.iter().find(|j| j.alias == alias)
    }
}

/// Association join: target model, alias, and the nested plan for that join
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinEntry {
    pub model: String,
    #[serde(rename = "as")]
    pub alias: String,
    #[serde(flatten)]
    pub descriptor: QueryDescriptor,
}

impl JoinEntry {
    /// Join that exists only so a computed column can read through it
    pub fn column_support(model: impl Into<String>, alias: impl Into<String>) -> Self {
        JoinEntry {
            model: model.into(),
            alias: alias.into(),
            descriptor: QueryDescriptor {
                attributes: Some(Projection::none()),
                ..Default::default()
            },
        }
    }
}

//! Standalone aggregate queries (`userAggregate(fn: SUM, field: "age", where: ...)`)
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::descriptor::Predicate;
use super::errors::CompileError;
use super::operators::translate_operators;
use crate::model_catalog::ModelSchema;
use crate::selection_parser::Arguments;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunction {
    Sum,
    Max,
    Min,
    Count,
    Avg,
}

impl AggregateFunction {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sum" => Some(AggregateFunction::Sum),
            "max" => Some(AggregateFunction::Max),
            "min" => Some(AggregateFunction::Min),
            "count" => Some(AggregateFunction::Count),
            "avg" => Some(AggregateFunction::Avg),
            _ => None,
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregateFunction::Sum => "sum",
            AggregateFunction::Max => "max",
            AggregateFunction::Min => "min",
            AggregateFunction::Count => "count",
            AggregateFunction::Avg => "avg",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateDescriptor {
    pub function: AggregateFunction,
    /// Storage column, `*` for a row count
    pub column: String,
    #[serde(rename = "where")]
    pub where_: Predicate,
    /// Result type the executor casts to
    pub data_type: String,
}

/// Compile `{fn, field, where}` into a single-value aggregate over `model`.
///
/// `field` may be omitted only for `count`, which then counts rows.
pub fn compile_aggregate(
    model: &ModelSchema,
    args: &Arguments,
) -> Result<AggregateDescriptor, CompileError> {
    let function = match args.get("fn") {
        Some(Value::String(name)) => AggregateFunction::parse(name).ok_or_else(|| {
            CompileError::malformed("fn", format!("unknown aggregate function `{}`", name))
        })?,
        _ => return Err(CompileError::malformed("fn", "aggregate function is required")),
    };

    let column = match (args.get("field"), function) {
        (Some(Value::String(name)), _) => model
            .field(name)
            .map(|f| f.storage_name().to_string())
            .ok_or_else(|| CompileError::unknown_field(&model.name, name))?,
        (None | Some(Value::Null), AggregateFunction::Count) => "*".to_string(),
        (None | Some(Value::Null), _) => {
            return Err(CompileError::malformed(
                "field",
                format!("`{}` needs a field to aggregate", function),
            ))
        }
        (Some(other), _) => {
            return Err(CompileError::malformed(
                "field",
                format!("expected a field name, got {}", other),
            ))
        }
    };

    Ok(AggregateDescriptor {
        function,
        column,
        where_: translate_operators(args.get("where")),
        data_type: "float".to_string(),
    })
}

//! Computed-expression compiler
//!
//! Client-supplied expression trees look like
//! `{"fn": "MID", "args": ["owner.name", 2, 3]}`. Only the first argument of
//! each call is considered as a column reference; later strings are always
//! literals. A reference resolves against the model's own fields, or through
//! one association hop (`owner.name`), and records what it touched so the
//! assembler can add the joins the expression reads through.
use std::collections::BTreeSet;

use serde_json::Value;

use super::descriptor::{ColumnRef, Expr};
use super::errors::CompileError;
use crate::config::CompilerConfig;
use crate::model_catalog::{ModelCatalog, ModelSchema};

/// What happens to a first-position string that names no known column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Keep it as a string literal
    Lenient,
    /// Fail with [`CompileError::UnknownField`]
    Strict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    pub expr: Expr,
    /// Association aliases the expression reads through
    pub touched_associations: BTreeSet<String>,
    /// `Model.field` for every resolved column
    pub touched_fields: BTreeSet<String>,
}

pub struct ExpressionCompiler<'a> {
    catalog: &'a ModelCatalog,
    model: &'a ModelSchema,
    max_depth: usize,
}

#[derive(Default)]
struct Touched {
    associations: BTreeSet<String>,
    fields: BTreeSet<String>,
}

impl<'a> ExpressionCompiler<'a> {
    pub fn new(catalog: &'a ModelCatalog, model: &'a ModelSchema, config: &CompilerConfig) -> Self {
        ExpressionCompiler {
            catalog,
            model,
            max_depth: config.max_depth,
        }
    }

    /// Compile a single expression node: a call object, or a column name.
    pub fn compile(
        &self,
        node: &Value,
        strictness: Strictness,
    ) -> Result<CompiledExpression, CompileError> {
        let mut touched = Touched::default();
        let expr = match node {
            Value::Object(call) => self.compile_call(call, 1, strictness, &mut touched)?,
            Value::String(name) => self.resolve_column(name, strictness, &mut touched)?,
            Value::Array(_) => {
                return Err(CompileError::malformed(
                    "expression",
                    "expected a single expression, found a list",
                ))
            }
            literal => Expr::Literal(literal.clone()),
        };
        Ok(CompiledExpression {
            expr,
            touched_associations: touched.associations,
            touched_fields: touched.fields,
        })
    }

    /// Absent → empty, scalar or object → one element
    fn compile_arg_list(
        &self,
        args: Option<&Value>,
        depth: usize,
        strictness: Strictness,
        touched: &mut Touched,
    ) -> Result<Vec<Expr>, CompileError> {
        let args: &[Value] = match args {
            None | Some(Value::Null) => &[],
            Some(Value::Array(items)) => items,
            Some(single) => std::slice::from_ref(single),
        };

        args.iter()
            .enumerate()
            .map(|(i, arg)| match arg {
                Value::String(name) if i == 0 => self.resolve_column(name, strictness, touched),
                Value::Object(call) => self.compile_call(call, depth + 1, strictness, touched),
                literal => Ok(Expr::Literal(literal.clone())),
            })
            .collect()
    }

    fn compile_call(
        &self,
        call: &serde_json::Map<String, Value>,
        depth: usize,
        strictness: Strictness,
        touched: &mut Touched,
    ) -> Result<Expr, CompileError> {
        if depth > self.max_depth {
            return Err(CompileError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        let name = match call.get("fn") {
            Some(Value::String(name)) if is_function_name(name) => name,
            Some(Value::String(name)) => {
                return Err(CompileError::malformed(
                    "fn",
                    format!("`{}` is not a valid function name", name),
                ))
            }
            _ => return Err(CompileError::malformed("fn", "function call needs a string `fn`")),
        };
        let args = self.compile_arg_list(call.get("args"), depth, strictness, touched)?;
        Ok(Expr::call(name.as_str(), args))
    }

    fn resolve_column(
        &self,
        name: &str,
        strictness: Strictness,
        touched: &mut Touched,
    ) -> Result<Expr, CompileError> {
        match name.split_once('.') {
            None => {
                if let Some(field) = self.model.field(name) {
                    touched.fields.insert(format!("{}.{}", self.model.name, field.name));
                    return Ok(Expr::Column(ColumnRef::bare(field.storage_name())));
                }
            }
            Some((association, sub_field)) => {
                if self.model.association(association).is_some() {
                    let (assoc, target) = self.catalog.association_target(self.model, association)?;
                    if let Some(field) = target.field(sub_field) {
                        touched.associations.insert(assoc.name.clone());
                        touched.fields.insert(format!("{}.{}", target.name, field.name));
                        return Ok(Expr::Column(ColumnRef::qualified(
                            assoc.name.as_str(),
                            field.storage_name(),
                        )));
                    }
                }
            }
        }

        match strictness {
            Strictness::Strict => Err(CompileError::unknown_field(&self.model.name, name)),
            Strictness::Lenient => Ok(Expr::literal(name)),
        }
    }
}

/// Lenient compilation with the default depth limit
pub fn compile_expression(
    node: &Value,
    catalog: &ModelCatalog,
    model: &ModelSchema,
) -> Result<CompiledExpression, CompileError> {
    ExpressionCompiler::new(catalog, model, &CompilerConfig::default()).compile(node, Strictness::Lenient)
}

// Function names are spliced into SQL unquoted
fn is_function_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

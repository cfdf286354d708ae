//! Query-plan assembler
//!
//! Walks a normalized selection tree level by level and produces the nested
//! query descriptor for one model:
//!
//! 1. identical sibling selections collapse into one
//! 2. the remaining fields split into association expansions, own attributes,
//!    `_aggregation` requests and `_col` requests
//! 3. arguments become the base descriptor; when no `attributes` argument set a
//!    projection, the selected own attributes plus each expanded association's
//!    join key become the projection
//! 4. expansions recurse into the target model and attach as joins
//! 5. associations read by computed columns or `groupBy` get a column-support
//!    join unless they are already joined
//! 6. computed columns are appended to the projection
//!
//! Every resolved `Model.field` is reported back so callers can check field
//! access or warm caches.
use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use super::descriptor::{ColumnRef, Expr, JoinEntry, Projection, ProjectionItem, QueryDescriptor};
use super::errors::CompileError;
use super::expression::{CompiledExpression, ExpressionCompiler, Strictness};
use super::filter_args::compile_filter;
use super::join_registry::JoinRegistry;
use super::pseudo_fields::{self, AGGREGATION_FIELD, RELATED_COLUMN_FIELD};
use crate::config::CompilerConfig;
use crate::model_catalog::{ModelCatalog, ModelSchema};
use crate::selection_parser::{parse_info, Arguments, FieldNode, ResolveInfo};

/// A model bound to the catalog and compiler settings it is compiled with
#[derive(Debug, Clone, Copy)]
pub struct ModelAdapter<'a> {
    catalog: &'a ModelCatalog,
    model: &'a ModelSchema,
    config: &'a CompilerConfig,
}

impl<'a> ModelAdapter<'a> {
    pub fn new(
        catalog: &'a ModelCatalog,
        model: &str,
        config: &'a CompilerConfig,
    ) -> Result<Self, CompileError> {
        let model = catalog.get_model(model)?;
        Ok(ModelAdapter {
            catalog,
            model,
            config,
        })
    }

    pub fn model(&self) -> &'a ModelSchema {
        self.model
    }

    pub fn catalog(&self) -> &'a ModelCatalog {
        self.catalog
    }

    pub fn config(&self) -> &'a CompilerConfig {
        self.config
    }

    fn for_target(&self, target: &'a ModelSchema) -> Self {
        ModelAdapter {
            model: target,
            ..*self
        }
    }

    fn expressions(&self) -> ExpressionCompiler<'a> {
        ExpressionCompiler::new(self.catalog, self.model, self.config)
    }

    pub fn compile(
        &self,
        args: &Arguments,
        source: FieldSource<'_, '_, '_>,
    ) -> Result<CompiledQuery, CompileError> {
        compile(self, args, source)
    }
}

/// Where the selection for a compilation comes from
#[derive(Debug, Clone, Copy)]
pub enum FieldSource<'s, 'q, 'a> {
    /// A root field being resolved; parsed with [`parse_info`]
    Info(&'s ResolveInfo<'q, 'a>),
    /// An already-normalized field list, e.g. the children of a node
    Fields(&'s [FieldNode]),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledQuery {
    pub descriptor: QueryDescriptor,
    /// Every `Model.field` the plan reads, across all join levels
    pub touched_fields: BTreeSet<String>,
}

pub fn compile(
    adapter: &ModelAdapter<'_>,
    args: &Arguments,
    source: FieldSource<'_, '_, '_>,
) -> Result<CompiledQuery, CompileError> {
    let (fields, list_root): (Cow<'_, [FieldNode]>, bool) = match source {
        FieldSource::Info(info) => {
            let fields = parse_info(info)
                .and_then(|root| root.fields)
                .unwrap_or_default();
            (Cow::Owned(fields), info.return_type.starts_with('['))
        }
        FieldSource::Fields(fields) => (Cow::Borrowed(fields), false),
    };
    let fields: Vec<&FieldNode> = fields.iter().collect();

    let mut touched_fields = BTreeSet::new();
    let mut descriptor = compile_level(adapter, args, &fields, 1, &mut touched_fields)?;

    if list_root && descriptor.limit.is_none() {
        descriptor.limit = adapter.config.default_limit;
    }

    log::debug!(
        "compiled {} with {} joins, {} touched fields",
        adapter.model.name,
        descriptor.include.len(),
        touched_fields.len()
    );
    Ok(CompiledQuery {
        descriptor,
        touched_fields,
    })
}

/// Selected fields of one level, split by what they compile into
#[derive(Default)]
struct LevelFields<'f> {
    /// Association name → every selection of it, in first-seen order
    expansions: Vec<(&'f str, Vec<&'f FieldNode>)>,
    attributes: Vec<&'f str>,
    aggregates: Vec<&'f FieldNode>,
    related_columns: Vec<&'f FieldNode>,
}

fn partition<'f>(model: &ModelSchema, fields: &[&'f FieldNode]) -> LevelFields<'f> {
    let mut level = LevelFields::default();
    let mut seen: Vec<&FieldNode> = Vec::with_capacity(fields.len());

    for &field in fields {
        if seen.contains(&field) {
            continue;
        }
        seen.push(field);

        let name = field.name.as_str();
        if model.association(name).is_some() && !field.children().is_empty() {
            match level.expansions.iter_mut().find(|(n, _)| *n == name) {
                Some((_, selections)) => selections.push(field),
                None => level.expansions.push((name, vec![field])),
            }
        } else if model.field(name).is_some() {
            if !level.attributes.contains(&name) {
                level.attributes.push(name);
            }
        } else if name == AGGREGATION_FIELD {
            level.aggregates.push(field);
        } else if name == RELATED_COLUMN_FIELD {
            level.related_columns.push(field);
        } else {
            log::trace!("field `{}` has no column on {}", name, model.name);
        }
    }
    level
}

fn compile_level(
    adapter: &ModelAdapter<'_>,
    args: &Arguments,
    fields: &[&FieldNode],
    depth: usize,
    touched: &mut BTreeSet<String>,
) -> Result<QueryDescriptor, CompileError> {
    let model = adapter.model;
    if depth > adapter.config.max_depth {
        return Err(CompileError::DepthLimitExceeded {
            limit: adapter.config.max_depth,
        });
    }

    let level = partition(model, fields);
    let expressions = adapter.expressions();
    let mut registry = JoinRegistry::new();
    let mut support_aliases = BTreeSet::new();

    let mut descriptor = compile_filter(args, &model.field_names())?;
    if let Some(group) = descriptor.group.take() {
        let mut resolved = Vec::with_capacity(group.len());
        for expr in group {
            resolved.push(resolve_group_expr(
                expr,
                &expressions,
                &mut support_aliases,
                touched,
            )?);
        }
        descriptor.group = Some(resolved);
    }

    if descriptor.attributes.is_none() {
        let mut own: Vec<&str> = level.attributes.clone();
        for (name, _) in &level.expansions {
            if let Some(association) = model.association(name) {
                let key = association.source_join_column();
                if !own.contains(&key) {
                    own.push(key);
                }
            }
        }
        if !own.is_empty() {
            descriptor.attributes = Some(Projection::columns(own));
        }
    }
    touched.extend(
        level
            .attributes
            .iter()
            .map(|name| format!("{}.{}", model.name, name)),
    );

    for (name, selections) in &level.expansions {
        let first = selections[0];
        if selections.iter().any(|s| s.args != first.args) {
            return Err(CompileError::ConflictingJoin {
                alias: name.to_string(),
            });
        }
        let children: Vec<&FieldNode> = selections.iter().flat_map(|s| s.children()).collect();
        let (_, target) = adapter.catalog.association_target(model, name)?;
        let nested = compile_level(
            &adapter.for_target(target),
            &first.args,
            &children,
            depth + 1,
            touched,
        )?;
        registry.attach(JoinEntry {
            model: target.name.clone(),
            alias: name.to_string(),
            descriptor: nested,
        })?;
    }

    let mut computed = Vec::with_capacity(level.aggregates.len() + level.related_columns.len());
    for field in &level.aggregates {
        let function = string_arg(field, "fn")?;
        let alias = optional_string_arg(field, "as")?
            .unwrap_or_else(|| pseudo_fields::aggregation_alias(function));
        let mut call = serde_json::Map::new();
        call.insert("fn".to_string(), Value::String(function.to_string()));
        if let Some(args) = field.args.get("args") {
            call.insert("args".to_string(), args.clone());
        }
        let compiled = expressions.compile(&Value::Object(call), Strictness::Lenient)?;
        computed.push(absorb(compiled, alias, &mut support_aliases, touched));
    }
    for field in &level.related_columns {
        let name = string_arg(field, "name")?;
        let alias = optional_string_arg(field, "as")?
            .unwrap_or_else(|| pseudo_fields::related_column_alias(name));
        let compiled = expressions.compile(&Value::String(name.to_string()), Strictness::Strict)?;
        computed.push(absorb(compiled, alias, &mut support_aliases, touched));
    }

    for alias in &support_aliases {
        let (association, target) = adapter.catalog.association_target(model, alias)?;
        registry.ensure_column_support(&target.name, &association.name);
    }

    if !computed.is_empty() {
        match descriptor.attributes.as_mut() {
            Some(projection) => projection.extend_computed(computed),
            None => descriptor.attributes = Some(Projection::Columns(computed)),
        }
    }

    descriptor.include = registry.into_entries();
    Ok(descriptor)
}

fn absorb(
    compiled: CompiledExpression,
    alias: String,
    support_aliases: &mut BTreeSet<String>,
    touched: &mut BTreeSet<String>,
) -> ProjectionItem {
    support_aliases.extend(compiled.touched_associations);
    touched.extend(compiled.touched_fields);
    ProjectionItem::Aliased(compiled.expr, alias)
}

/// Map grouping column names to storage names, reading through associations
/// where the name is dotted. Unresolvable names are kept as written.
fn resolve_group_expr(
    expr: Expr,
    expressions: &ExpressionCompiler<'_>,
    support_aliases: &mut BTreeSet<String>,
    touched: &mut BTreeSet<String>,
) -> Result<Expr, CompileError> {
    match expr {
        Expr::Column(ColumnRef {
            association: None,
            column,
        }) => {
            let compiled = expressions.compile(&Value::String(column.clone()), Strictness::Lenient)?;
            match compiled.expr {
                Expr::Column(_) => {
                    support_aliases.extend(compiled.touched_associations);
                    touched.extend(compiled.touched_fields);
                    Ok(compiled.expr)
                }
                _ => Ok(Expr::column(column)),
            }
        }
        Expr::Call(mut call) => {
            call.args = call
                .args
                .into_iter()
                .map(|arg| resolve_group_expr(arg, expressions, support_aliases, touched))
                .collect::<Result<_, _>>()?;
            Ok(Expr::Call(call))
        }
        other => Ok(other),
    }
}

fn string_arg<'f>(field: &'f FieldNode, key: &str) -> Result<&'f str, CompileError> {
    field.args.get(key).and_then(Value::as_str).ok_or_else(|| {
        CompileError::malformed(
            format!("{}.{}", field.name, key),
            "expected a string",
        )
    })
}

fn optional_string_arg(field: &FieldNode, key: &str) -> Result<Option<String>, CompileError> {
    match field.args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(CompileError::malformed(
            format!("{}.{}", field.name, key),
            format!("expected a string, got {}", other),
        )),
    }
}

//! Raw GraphQL arguments → base query descriptor
//!
//! Recognized keys: `limit`, `offset`, `where`, `having`, `order`,
//! `group`/`groupBy`, `attributes`, `required`, `right`, `separate`,
//! `subQuery`, `scope`. Any other key naming a model field becomes an equality
//! filter whose value is taken as is; explicit `where` entries are
//! operator-translated and win over those for the same field. An empty
//! `attributes` projection counts as absent.
use serde_json::Value;

use super::descriptor::{OrderItem, Predicate, QueryDescriptor, SortDirection};
use super::errors::CompileError;
use super::operators::translate_operators;
use super::projection::{normalize_group, normalize_projection};
use crate::selection_parser::Arguments;

pub fn compile_filter(
    args: &Arguments,
    known_fields: &[&str],
) -> Result<QueryDescriptor, CompileError> {
    compile_filter_with(QueryDescriptor::default(), args, known_fields)
}

/// Compile `args` on top of an existing descriptor.
///
/// `where` and `having` are merged key by key with existing base keys
/// winning; every other recognized option replaces the base value.
pub fn compile_filter_with(
    mut base: QueryDescriptor,
    args: &Arguments,
    known_fields: &[&str],
) -> Result<QueryDescriptor, CompileError> {
    let mut filter = serde_json::Map::new();
    let mut explicit_where: Option<&Value> = None;

    for (key, value) in args {
        // null on a structural key means "not given"
        if value.is_null() && !known_fields.contains(&key.as_str()) {
            continue;
        }
        match key.as_str() {
            "limit" => base.limit = Some(parse_page(key, value)?),
            "offset" => base.offset = Some(parse_page(key, value)?),
            "where" => match value {
                Value::Object(_) => explicit_where = Some(value),
                other => return Err(CompileError::malformed(key, format!("expected an object, got {}", other))),
            },
            "having" => {
                let having = translate_operators(Some(value));
                base.having = Some(merge_predicates(base.having.take(), having));
            }
            "order" => base.order = Some(parse_order(value)?),
            "group" | "groupBy" => {
                base.group = Some(normalize_group(Some(value)).ok_or_else(|| {
                    CompileError::malformed(key, "expected a column name or a list")
                })?);
            }
            "attributes" => match normalize_projection(Some(value)) {
                Some(projection) if !projection.is_empty() => base.attributes = Some(projection),
                Some(_) => log::trace!("empty attributes projection, keeping the default"),
                None => log::trace!("ignoring unrecognized attributes shape {}", value),
            },
            "required" => base.required = Some(parse_flag(key, value)?),
            "right" => base.right = Some(parse_flag(key, value)?),
            "separate" => base.separate = Some(parse_flag(key, value)?),
            "subQuery" => base.sub_query = Some(parse_flag(key, value)?),
            "scope" => base.scope = Some(parse_scope(value)?),
            field if known_fields.contains(&field) => {
                filter.insert(key.clone(), value.clone());
            }
            other => log::trace!("ignoring argument `{}`", other),
        }
    }

    if explicit_where.is_some() {
        filter.extend(translate_operators(explicit_where));
    }
    if !filter.is_empty() {
        base.where_ = Some(merge_predicates(base.where_.take(), filter));
    }

    Ok(base)
}

fn merge_predicates(existing: Option<Predicate>, incoming: Predicate) -> Predicate {
    match existing {
        None => incoming,
        Some(mut existing) => {
            for (key, value) in incoming {
                existing.entry(key).or_insert(value);
            }
            existing
        }
    }
}

/// `limit` / `offset`: a non-negative integer, as a number or a base-10 string
fn parse_page(argument: &str, value: &Value) -> Result<u64, CompileError> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Ok(u);
            }
            match n.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
                _ => Err(CompileError::malformed(
                    argument,
                    format!("expected a non-negative integer, got {}", n),
                )),
            }
        }
        Value::String(s) => s.trim().parse::<u64>().map_err(|e| {
            CompileError::malformed(argument, format!("`{}` is not a non-negative integer: {}", s, e))
        }),
        other => Err(CompileError::malformed(
            argument,
            format!("expected a non-negative integer, got {}", other),
        )),
    }
}

fn parse_flag(argument: &str, value: &Value) -> Result<bool, CompileError> {
    value
        .as_bool()
        .ok_or_else(|| CompileError::malformed(argument, format!("expected a boolean, got {}", value)))
}

fn parse_scope(value: &Value) -> Result<Vec<String>, CompileError> {
    match value {
        Value::String(scope) => Ok(vec![scope.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| CompileError::malformed("scope", "scope names must be strings"))
            })
            .collect(),
        other => Err(CompileError::malformed(
            "scope",
            format!("expected a scope name or a list, got {}", other),
        )),
    }
}

/// Order accepts native pairs `[["name", "desc"]]`, a single `{name, sort}`
/// object, a list of them, or bare field names.
fn parse_order(value: &Value) -> Result<Vec<OrderItem>, CompileError> {
    match value {
        Value::Array(items) => items.iter().map(parse_order_item).collect(),
        single => Ok(vec![parse_order_item(single)?]),
    }
}

fn parse_order_item(item: &Value) -> Result<OrderItem, CompileError> {
    let (name, direction) = match item {
        Value::String(name) => (Some(name.as_str()), None),
        Value::Array(pair) if !pair.is_empty() && pair.len() <= 2 => {
            (pair[0].as_str(), pair.get(1))
        }
        Value::Object(map) => (map.get("name").and_then(Value::as_str), map.get("sort")),
        other => {
            return Err(CompileError::malformed(
                "order",
                format!("unsupported order entry {}", other),
            ))
        }
    };
    let name = name.ok_or_else(|| CompileError::malformed("order", "order entry needs a field name"))?;
    let direction = match direction {
        None | Some(Value::Null) => SortDirection::Asc,
        Some(Value::String(dir)) => SortDirection::parse(dir).ok_or_else(|| {
            CompileError::malformed("order", format!("unknown sort direction `{}`", dir))
        })?,
        Some(other) => {
            return Err(CompileError::malformed(
                "order",
                format!("unknown sort direction {}", other),
            ))
        }
    };
    Ok(OrderItem(name.to_string(), direction))
}

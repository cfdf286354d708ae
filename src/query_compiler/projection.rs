/// Projection normalization for `attributes` and `group` arguments
///
/// Accepted shapes:
/// - `["name", ["SUM", "age"], ["AVG", "money", true]]`
/// - `{"include": [...same entries...]}`
/// - `{"exclude": ["secret"]}`
///
/// A tuple entry is `[function, column?, alias-or-flag?]`. `COUNT` always
/// counts rows and lands on the reserved `_count` alias; `AVG` lands on the
/// reserved `_avg` alias when the third element is truthy (a string included),
/// else on the column name. For every other function a string in third
/// position is a custom alias.
use serde_json::Value;

use super::descriptor::{Expr, Projection, ProjectionItem};
use super::pseudo_fields::{self, AVG_ALIAS, COUNT_ALIAS};

pub fn normalize_projection(attributes: Option<&Value>) -> Option<Projection> {
    match attributes? {
        Value::Array(entries) => Some(Projection::Columns(normalize_entries(entries))),
        Value::Object(map) => {
            if let Some(Value::Array(include)) = map.get("include") {
                Some(Projection::Filtered {
                    include: normalize_entries(include),
                    exclude: Vec::new(),
                })
            } else if let Some(Value::Array(exclude)) = map.get("exclude") {
                Some(Projection::Filtered {
                    include: Vec::new(),
                    exclude: exclude
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect(),
                })
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Grouping keys: a single name, or a list of names / function tuples
pub fn normalize_group(group: Option<&Value>) -> Option<Vec<Expr>> {
    let entries = match group? {
        Value::String(name) => return Some(vec![Expr::column(name.as_str())]),
        Value::Array(entries) => entries,
        _ => return None,
    };
    Some(
        normalize_entries(entries)
            .into_iter()
            .map(|item| match item {
                ProjectionItem::Column(name) => Expr::column(name),
                ProjectionItem::Aliased(expr, _) => expr,
            })
            .collect(),
    )
}

fn normalize_entries(entries: &[Value]) -> Vec<ProjectionItem> {
    entries.iter().filter_map(normalize_entry).collect()
}

fn normalize_entry(entry: &Value) -> Option<ProjectionItem> {
    match entry {
        Value::String(name) => Some(ProjectionItem::Column(name.clone())),
        Value::Array(tuple) => normalize_tuple(tuple),
        other => {
            log::trace!("dropping unsupported projection entry {}", other);
            None
        }
    }
}

fn normalize_tuple(tuple: &[Value]) -> Option<ProjectionItem> {
    let function = tuple.first()?.as_str()?;
    let column = tuple.get(1).and_then(Value::as_str);
    let marker = tuple.get(2);
    let custom_alias = marker.and_then(Value::as_str).map(str::to_string);

    let upper = function.to_ascii_uppercase();
    let item = match upper.as_str() {
        "COUNT" => ProjectionItem::Aliased(
            Expr::call("COUNT", vec![Expr::literal("*")]),
            custom_alias.unwrap_or_else(|| COUNT_ALIAS.to_string()),
        ),
        "AVG" => {
            let column = column?;
            let alias = if marker.is_some_and(is_truthy) {
                AVG_ALIAS.to_string()
            } else {
                column.to_string()
            };
            ProjectionItem::Aliased(Expr::call("AVG", vec![Expr::column(column)]), alias)
        }
        _ => match column {
            Some(column) => ProjectionItem::Aliased(
                Expr::call(function, vec![Expr::column(column)]),
                custom_alias.unwrap_or_else(|| column.to_string()),
            ),
            None => ProjectionItem::Aliased(
                Expr::call(function, Vec::new()),
                custom_alias.unwrap_or_else(|| pseudo_fields::aggregation_alias(function)),
            ),
        },
    };
    Some(item)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

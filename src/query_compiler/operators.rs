/// GraphQL-safe → native operator translation
///
/// GraphQL names cannot start with `$`, so clients spell operators with a
/// leading underscore (`_gt`, `_or`, `_like`). The executor expects the native
/// symbols (`$gt`, `$or`, `$like`). Translation is a 1:1 key substitution, so a
/// single pass reaches a fixed point and already-native trees come back unchanged.
use serde_json::Value;
use std::collections::HashMap;

use super::descriptor::Predicate;

/// Native operator symbol for a GraphQL-safe token
pub fn native_operator(token: &str) -> Option<&'static str> {
    OPERATORS.get(token).copied()
}

// Static operator table
lazy_static::lazy_static! {
    static ref OPERATORS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();

        // ===== COMPARISON =====
        m.insert("_eq", "$eq");
        m.insert("_ne", "$ne");
        m.insert("_gte", "$gte");
        m.insert("_gt", "$gt");
        m.insert("_lte", "$lte");
        m.insert("_lt", "$lt");
        m.insert("_not", "$not");
        m.insert("_is", "$is");
        m.insert("_in", "$in");
        m.insert("_notIn", "$notIn");
        m.insert("_between", "$between");
        m.insert("_notBetween", "$notBetween");

        // ===== STRING MATCHING =====
        m.insert("_like", "$like");
        m.insert("_notLike", "$notLike");
        m.insert("_iLike", "$iLike");
        m.insert("_notILike", "$notILike");
        m.insert("_startsWith", "$startsWith");
        m.insert("_endsWith", "$endsWith");
        m.insert("_substring", "$substring");
        m.insert("_regexp", "$regexp");
        m.insert("_notRegexp", "$notRegexp");
        m.insert("_iRegexp", "$iRegexp");
        m.insert("_notIRegexp", "$notIRegexp");
        m.insert("_match", "$match");

        // ===== RANGE / ARRAY =====
        m.insert("_overlap", "$overlap");
        m.insert("_contains", "$contains");
        m.insert("_contained", "$contained");
        m.insert("_adjacent", "$adjacent");
        m.insert("_strictLeft", "$strictLeft");
        m.insert("_strictRight", "$strictRight");
        m.insert("_noExtendRight", "$noExtendRight");
        m.insert("_noExtendLeft", "$noExtendLeft");
        m.insert("_any", "$any");
        m.insert("_all", "$all");
        m.insert("_values", "$values");

        // ===== LOGICAL =====
        m.insert("_and", "$and");
        m.insert("_or", "$or");

        // ===== REFERENCES =====
        m.insert("_col", "$col");
        m.insert("_placeholder", "$placeholder");

        m
    };
}

/// Translate every operator key in a predicate tree.
///
/// Absent, `null` and non-object roots yield an empty predicate.
pub fn translate_operators(tree: Option<&Value>) -> Predicate {
    match tree {
        Some(Value::Object(map)) => translate_object(map),
        _ => Predicate::new(),
    }
}

fn translate_object(map: &serde_json::Map<String, Value>) -> Predicate {
    map.iter()
        .map(|(key, value)| {
            let key = native_operator(key)
                .map(str::to_string)
                .unwrap_or_else(|| key.clone());
            (key, translate_value(value))
        })
        .collect()
}

fn translate_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(translate_object(map)),
        Value::Array(items) => Value::Array(items.iter().map(translate_value).collect()),
        other => other.clone(),
    }
}

//! GraphQL AST values → JSON values.
//!
//! Variables are substituted from the bound variables map at decode time, so
//! nothing downstream of the parser ever sees a variable reference.

use graphql_parser::query::{Directive, Value as GqlValue};
use serde_json::{Number, Value};

use super::field_tree::{Arguments, Directives};

pub fn decode_value(value: &GqlValue<'_, String>, variables: &Arguments) -> Value {
    match value {
        GqlValue::Variable(name) => variables.get(name).cloned().unwrap_or(Value::Null),
        GqlValue::Int(number) => match number.as_i64() {
            Some(i) => Value::Number(i.into()),
            None => Value::Null,
        },
        GqlValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        GqlValue::String(s) => Value::String(s.clone()),
        GqlValue::Boolean(b) => Value::Bool(*b),
        GqlValue::Null => Value::Null,
        GqlValue::Enum(e) => Value::String(e.clone()),
        GqlValue::List(items) => {
            Value::Array(items.iter().map(|v| decode_value(v, variables)).collect())
        }
        GqlValue::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), decode_value(v, variables)))
                .collect(),
        ),
    }
}

/// Decode a field's argument list.
///
/// An argument bound to a variable the request did not supply is left out
/// entirely, the same as an argument that was never written.
pub fn decode_arguments(arguments: &[(String, GqlValue<'_, String>)], variables: &Arguments) -> Arguments {
    arguments
        .iter()
        .filter(|(_, value)| match value {
            GqlValue::Variable(name) => variables.contains_key(name),
            _ => true,
        })
        .map(|(name, value)| (name.clone(), decode_value(value, variables)))
        .collect()
}

/// Directive arguments keyed by directive name
pub fn decode_directives(directives: &[Directive<'_, String>], variables: &Arguments) -> Directives {
    directives
        .iter()
        .map(|d| {
            (
                d.name.clone(),
                Value::Object(decode_arguments(&d.arguments, variables)),
            )
        })
        .collect()
}

/// Whether `@skip` / `@include` leave this selection in the executed tree
pub fn is_selected(directives: &[Directive<'_, String>], variables: &Arguments) -> bool {
    for directive in directives {
        let condition = directive
            .arguments
            .iter()
            .find(|(name, _)| name == "if")
            .map(|(_, value)| decode_value(value, variables));
        match (directive.name.as_str(), condition) {
            ("skip", Some(Value::Bool(true))) => return false,
            ("include", Some(Value::Bool(false))) => return false,
            _ => {}
        }
    }
    true
}

use std::collections::HashMap;

use graphql_parser::query::{
    self as q, Definition, OperationDefinition, Selection, SelectionSet, TypeCondition,
};
use graphql_parser::schema::{self as s, TypeDefinition};

use super::field_tree::Arguments;
use super::value::is_selected;

/// Resolver-side view of one root field of a GraphQL request.
///
/// Holds borrowed AST nodes only; the query and schema documents outlive it.
#[derive(Debug, Clone)]
pub struct ResolveInfo<'q, 'a> {
    /// Schema name of the field being resolved
    pub field_name: String,
    /// GraphQL type notation, e.g. `[User!]!`
    pub return_type: String,
    /// Root operation type the field is declared on
    pub parent_type: String,
    /// Every occurrence of the field under its response key
    pub field_nodes: Vec<&'q q::Field<'a, String>>,
    pub fragments: HashMap<&'q str, &'q q::FragmentDefinition<'a, String>>,
    pub variable_values: &'q Arguments,
    pub schema: &'q s::Document<'a, String>,
}

impl<'q, 'a> ResolveInfo<'q, 'a> {
    /// Locate the root field answering `response_key` in the selected operation.
    ///
    /// With no `operation_name` the first operation in the document is used.
    /// When nothing matches, `field_nodes` is empty.
    pub fn for_root_field(
        document: &'q q::Document<'a, String>,
        schema: &'q s::Document<'a, String>,
        variables: &'q Arguments,
        operation_name: Option<&str>,
        response_key: &str,
    ) -> Self {
        let fragments: HashMap<&'q str, &'q q::FragmentDefinition<'a, String>> = document
            .definitions
            .iter()
            .filter_map(|d| match d {
                Definition::Fragment(f) => Some((f.name.as_str(), f)),
                _ => None,
            })
            .collect();

        let operation = select_operation(document, operation_name);
        let (selection_set, parent_type) = match operation {
            Some(op) => {
                let (set, kind) = operation_parts(op);
                (Some(set), root_type_name(schema, kind))
            }
            None => (None, root_type_name(schema, RootKind::Query)),
        };

        let mut field_nodes = Vec::new();
        if let Some(set) = selection_set {
            let mut active = Vec::new();
            collect_root_fields(
                set,
                response_key,
                &fragments,
                variables,
                &mut active,
                &mut field_nodes,
            );
        }

        let field_name = field_nodes
            .first()
            .map(|f| f.name.clone())
            .unwrap_or_else(|| response_key.to_string());
        let return_type = object_definition(schema, &parent_type)
            .and_then(|o| o.field(&field_name))
            .map(|f| render_type(&f.field_type))
            .unwrap_or_default();

        if field_nodes.is_empty() {
            log::debug!(
                "root field `{}` not present in operation {:?}",
                response_key,
                operation_name
            );
        }

        ResolveInfo {
            field_name,
            return_type,
            parent_type,
            field_nodes,
            fragments,
            variable_values: variables,
            schema,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum RootKind {
    Query,
    Mutation,
    Subscription,
}

fn select_operation<'q, 'a>(
    document: &'q q::Document<'a, String>,
    operation_name: Option<&str>,
) -> Option<&'q OperationDefinition<'a, String>> {
    document.definitions.iter().find_map(|d| match d {
        Definition::Operation(op) => match operation_name {
            None => Some(op),
            Some(wanted) if operation_name_of(op) == Some(wanted) => Some(op),
            Some(_) => None,
        },
        Definition::Fragment(_) => None,
    })
}

fn operation_name_of<'q>(op: &'q OperationDefinition<'_, String>) -> Option<&'q str> {
    match op {
        OperationDefinition::SelectionSet(_) => None,
        OperationDefinition::Query(query) => query.name.as_deref(),
        OperationDefinition::Mutation(mutation) => mutation.name.as_deref(),
        OperationDefinition::Subscription(subscription) => subscription.name.as_deref(),
    }
}

fn operation_parts<'q, 'a>(
    op: &'q OperationDefinition<'a, String>,
) -> (&'q SelectionSet<'a, String>, RootKind) {
    match op {
        OperationDefinition::SelectionSet(set) => (set, RootKind::Query),
        OperationDefinition::Query(query) => (&query.selection_set, RootKind::Query),
        OperationDefinition::Mutation(mutation) => (&mutation.selection_set, RootKind::Mutation),
        OperationDefinition::Subscription(subscription) => {
            (&subscription.selection_set, RootKind::Subscription)
        }
    }
}

fn root_type_name(schema: &s::Document<'_, String>, kind: RootKind) -> String {
    let declared = schema.definitions.iter().find_map(|d| match d {
        s::Definition::SchemaDefinition(def) => match kind {
            RootKind::Query => def.query.clone(),
            RootKind::Mutation => def.mutation.clone(),
            RootKind::Subscription => def.subscription.clone(),
        },
        _ => None,
    });
    declared.unwrap_or_else(|| {
        match kind {
            RootKind::Query => "Query",
            RootKind::Mutation => "Mutation",
            RootKind::Subscription => "Subscription",
        }
        .to_string()
    })
}

fn collect_root_fields<'q, 'a>(
    set: &'q SelectionSet<'a, String>,
    response_key: &str,
    fragments: &HashMap<&'q str, &'q q::FragmentDefinition<'a, String>>,
    variables: &Arguments,
    active: &mut Vec<&'q str>,
    out: &mut Vec<&'q q::Field<'a, String>>,
) {
    for selection in &set.items {
        match selection {
            Selection::Field(field) => {
                let key = field.alias.as_deref().unwrap_or(&field.name);
                if key == response_key && is_selected(&field.directives, variables) {
                    out.push(field);
                }
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.fragment_name.as_str();
                if active.contains(&name) || !is_selected(&spread.directives, variables) {
                    continue;
                }
                if let Some(fragment) = fragments.get(name) {
                    active.push(name);
                    collect_root_fields(
                        &fragment.selection_set,
                        response_key,
                        fragments,
                        variables,
                        active,
                        out,
                    );
                    active.pop();
                }
            }
            Selection::InlineFragment(inline) => {
                if is_selected(&inline.directives, variables) {
                    collect_root_fields(
                        &inline.selection_set,
                        response_key,
                        fragments,
                        variables,
                        active,
                        out,
                    );
                }
            }
        }
    }
}

/// Field list and directives of an object or interface type
#[derive(Debug, Clone, Copy)]
pub(crate) struct ObjectDef<'q, 'a> {
    pub fields: &'q [s::Field<'a, String>],
    pub directives: &'q [q::Directive<'a, String>],
}

impl<'q, 'a> ObjectDef<'q, 'a> {
    pub fn field(&self, name: &str) -> Option<&'q s::Field<'a, String>> {
        self.fields.iter().find(|f| f.name == name)
    }
}

pub(crate) fn object_definition<'q, 'a>(
    schema: &'q s::Document<'a, String>,
    name: &str,
) -> Option<ObjectDef<'q, 'a>> {
    schema.definitions.iter().find_map(|d| match d {
        s::Definition::TypeDefinition(TypeDefinition::Object(object)) if object.name == name => {
            Some(ObjectDef {
                fields: &object.fields,
                directives: &object.directives,
            })
        }
        s::Definition::TypeDefinition(TypeDefinition::Interface(interface))
            if interface.name == name =>
        {
            Some(ObjectDef {
                fields: &interface.fields,
                directives: &interface.directives,
            })
        }
        _ => None,
    })
}

pub(crate) fn type_condition_name<'q>(condition: &'q TypeCondition<'_, String>) -> &'q str {
    match condition {
        TypeCondition::On(name) => name.as_str(),
    }
}

/// Render a type reference in SDL notation
pub(crate) fn render_type(ty: &q::Type<'_, String>) -> String {
    match ty {
        q::Type::NamedType(name) => name.clone(),
        q::Type::ListType(inner) => format!("[{}]", render_type(inner)),
        q::Type::NonNullType(inner) => format!("{}!", render_type(inner)),
    }
}

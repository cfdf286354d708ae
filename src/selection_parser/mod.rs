//! Selection parser: turns the resolver's view of a GraphQL request into a
//! normalized [`FieldNode`] tree.
//!
//! Fragments (named and inline) are flattened into their parent selection,
//! `@skip` / `@include` are honored, variables are substituted and schema
//! argument defaults are filled in, so the query compiler only ever sees plain
//! fields with concrete argument values.

use graphql_parser::query::{self as q, Selection, SelectionSet};
use graphql_parser::schema as s;

pub mod errors;
pub mod field_tree;
pub mod resolve_info;
pub mod value;

pub use errors::SelectionError;
pub use field_tree::{Arguments, Directives, FieldNode};
pub use resolve_info::ResolveInfo;

use resolve_info::{object_definition, render_type, type_condition_name, ObjectDef};
use value::{decode_arguments, decode_directives, decode_value, is_selected};

/// Parse a query document, mapping syntax errors to [`SelectionError`]
pub fn parse_query_document(text: &str) -> Result<q::Document<'_, String>, SelectionError> {
    graphql_parser::parse_query::<String>(text)
        .map_err(|e| SelectionError::QuerySyntax(e.to_string()))
}

/// Parse an SDL schema document, mapping syntax errors to [`SelectionError`]
pub fn parse_schema_document(text: &str) -> Result<s::Document<'_, String>, SelectionError> {
    graphql_parser::parse_schema::<String>(text)
        .map_err(|e| SelectionError::SchemaSyntax(e.to_string()))
}

/// Build the normalized tree for the field being resolved.
///
/// Returns `None` when the root field is not part of the request. Repeated
/// occurrences of the root field have their sub-selections concatenated.
pub fn parse_info(info: &ResolveInfo<'_, '_>) -> Option<FieldNode> {
    let (first, rest) = info.field_nodes.split_first()?;
    let definition = object_definition(info.schema, &info.parent_type)
        .and_then(|root| root.field(&info.field_name));

    let mut walker = SelectionWalker {
        info,
        active_fragments: Vec::new(),
    };
    let mut root = walker.field_node(*first, &info.return_type, definition);
    for other in rest {
        let extra = walker.field_node(*other, &info.return_type, definition);
        if let Some(extra_fields) = extra.fields {
            root.fields.get_or_insert_with(Vec::new).extend(extra_fields);
        }
    }
    Some(root)
}

struct SelectionWalker<'i, 'q, 'a> {
    info: &'i ResolveInfo<'q, 'a>,
    /// Fragment names on the current expansion path
    active_fragments: Vec<&'q str>,
}

impl<'q, 'a> SelectionWalker<'_, 'q, 'a> {
    fn field_node(
        &mut self,
        field: &'q q::Field<'a, String>,
        return_type: &str,
        definition: Option<&'q s::Field<'a, String>>,
    ) -> FieldNode {
        let variables = self.info.variable_values;
        let no_variables = Arguments::new();

        let is_list = return_type.starts_with('[');
        let type_name = return_type
            .trim_matches(|c| c == '[' || c == ']' || c == '!')
            .to_string();
        let object = object_definition(self.info.schema, &type_name);

        let mut args = decode_arguments(&field.arguments, variables);
        if let Some(definition) = definition {
            for input in &definition.arguments {
                if let Some(default) = &input.default_value {
                    if !args.contains_key(&input.name) {
                        args.insert(input.name.clone(), decode_value(default, &no_variables));
                    }
                }
            }
        }

        let fields = if field.selection_set.items.is_empty() {
            None
        } else {
            Some(self.selection_fields(&field.selection_set, object))
        };

        FieldNode {
            name: field.name.clone(),
            alias: field.alias.clone(),
            type_name,
            is_list,
            args,
            directives_object: object
                .map(|o| decode_directives(o.directives, &no_variables))
                .unwrap_or_default(),
            directives_field: definition
                .map(|d| decode_directives(&d.directives, &no_variables))
                .unwrap_or_default(),
            fields,
        }
    }

    fn selection_fields(
        &mut self,
        set: &'q SelectionSet<'a, String>,
        parent: Option<ObjectDef<'q, 'a>>,
    ) -> Vec<FieldNode> {
        let variables = self.info.variable_values;
        let mut nodes = Vec::new();

        for selection in &set.items {
            match selection {
                Selection::Field(field) => {
                    if !is_selected(&field.directives, variables) {
                        continue;
                    }
                    let definition = parent.and_then(|p| p.field(&field.name));
                    let return_type = match definition {
                        Some(d) => render_type(&d.field_type),
                        None if field.name == "__typename" => "String!".to_string(),
                        None => String::new(),
                    };
                    nodes.push(self.field_node(field, &return_type, definition));
                }
                Selection::FragmentSpread(spread) => {
                    if !is_selected(&spread.directives, variables) {
                        continue;
                    }
                    let name = spread.fragment_name.as_str();
                    if self.active_fragments.contains(&name) {
                        log::warn!("fragment `{}` spreads itself, ignoring the cycle", name);
                        continue;
                    }
                    let Some(fragment) = self.info.fragments.get(name).copied() else {
                        log::warn!("unknown fragment `{}` in selection", name);
                        continue;
                    };
                    let scope = object_definition(
                        self.info.schema,
                        type_condition_name(&fragment.type_condition),
                    )
                    .or(parent);
                    self.active_fragments.push(name);
                    nodes.extend(self.selection_fields(&fragment.selection_set, scope));
                    self.active_fragments.pop();
                }
                Selection::InlineFragment(inline) => {
                    if !is_selected(&inline.directives, variables) {
                        continue;
                    }
                    let scope = inline
                        .type_condition
                        .as_ref()
                        .and_then(|c| object_definition(self.info.schema, type_condition_name(c)))
                        .or(parent);
                    nodes.extend(self.selection_fields(&inline.selection_set, scope));
                }
            }
        }
        nodes
    }
}

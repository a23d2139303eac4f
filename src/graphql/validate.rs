//! Customized validation rule set
//!
//! The rule list is the standard set with `UniqueOperationNames` and
//! `KnownDirectives` absent (cross-file duplication and custom directives are
//! tolerated), `NoUnusedFragments` removable by flag, and an added rule that
//! rejects anonymous operations.
use super::document::DocumentSet;
use super::schema::Schema;
use graphql_parser::query as parsed_query;
use graphql_parser::Pos;
use std::collections::{HashMap, HashSet};

pub struct ValidationError {
    pub message: String,
    pub source_index: usize,
    pub position: Pos,
}

struct RuleContext<'a> {
    schema: &'a Schema,
    document: &'a DocumentSet,
}

type RuleFn = fn(&RuleContext<'_>) -> Vec<ValidationError>;

struct NamedRule {
    name: &'static str,
    run: RuleFn,
}

fn standard_rules() -> Vec<NamedRule> {
    vec![
        NamedRule {
            name: "UniqueDefinitionNames",
            run: unique_definition_names,
        },
        NamedRule {
            name: "KnownTypeNames",
            run: known_type_names,
        },
        NamedRule {
            name: "UniqueVariableNames",
            run: unique_variable_names,
        },
        NamedRule {
            name: "NoUnusedFragments",
            run: no_unused_fragments,
        },
    ]
}

pub fn run_rules(
    schema: &Schema,
    document: &DocumentSet,
    allow_unused_fragments: bool,
) -> Vec<ValidationError> {
    let mut rules = standard_rules();
    if allow_unused_fragments {
        rules.retain(|rule| rule.name != "NoUnusedFragments");
    }
    rules.push(NamedRule {
        name: "NoAnonymousOperations",
        run: no_anonymous_operations,
    });
    let context = RuleContext { schema, document };
    rules
        .iter()
        .flat_map(|rule| (rule.run)(&context))
        .collect()
}

fn operation_parts<'a>(
    operation: &'a parsed_query::OperationDefinition<'static, String>,
) -> (Option<&'a String>, &'a [parsed_query::VariableDefinition<'static, String>], Pos) {
    match operation {
        parsed_query::OperationDefinition::Query(query) => {
            (query.name.as_ref(), &query.variable_definitions, query.position)
        }
        parsed_query::OperationDefinition::Mutation(mutation) => (
            mutation.name.as_ref(),
            &mutation.variable_definitions,
            mutation.position,
        ),
        parsed_query::OperationDefinition::Subscription(subscription) => (
            subscription.name.as_ref(),
            &subscription.variable_definitions,
            subscription.position,
        ),
        parsed_query::OperationDefinition::SelectionSet(selection_set) => {
            (None, &[], selection_set.span.0)
        }
    }
}

fn no_anonymous_operations(context: &RuleContext<'_>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for loaded in &context.document.definitions {
        if let parsed_query::Definition::Operation(operation) = &loaded.definition {
            let (name, _, position) = operation_parts(operation);
            if name.is_none() {
                errors.push(ValidationError {
                    message: "Script does not support anonymous operations.".to_string(),
                    source_index: loaded.source_index,
                    position,
                });
            }
        }
    }
    errors
}

fn unique_definition_names(context: &RuleContext<'_>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen_fragments: HashMap<&str, usize> = HashMap::new();
    let mut seen_operations: HashMap<&str, usize> = HashMap::new();
    for loaded in &context.document.definitions {
        match &loaded.definition {
            parsed_query::Definition::Fragment(fragment) => {
                if seen_fragments.insert(&fragment.name, loaded.source_index).is_some() {
                    errors.push(ValidationError {
                        message: format!("duplicate definition of fragment `{}`", fragment.name),
                        source_index: loaded.source_index,
                        position: fragment.position,
                    });
                }
            }
            parsed_query::Definition::Operation(operation) => {
                let (name, _, position) = operation_parts(operation);
                let Some(name) = name else {
                    continue;
                };
                if seen_operations.insert(name, loaded.source_index).is_some() {
                    errors.push(ValidationError {
                        message: format!("duplicate definition of operation `{name}`"),
                        source_index: loaded.source_index,
                        position,
                    });
                }
            }
        }
    }
    errors
}

const BUILT_IN_TYPE_NAMES: [&str; 5] = ["Boolean", "Float", "ID", "Int", "String"];

fn base_named_type<'a>(
    variable_type: &'a parsed_query::Type<'static, String>,
) -> &'a str {
    match variable_type {
        parsed_query::Type::NamedType(name) => name,
        parsed_query::Type::ListType(inner) | parsed_query::Type::NonNullType(inner) => {
            base_named_type(inner)
        }
    }
}

fn known_type_names(context: &RuleContext<'_>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for loaded in &context.document.definitions {
        match &loaded.definition {
            parsed_query::Definition::Fragment(fragment) => {
                let parsed_query::TypeCondition::On(type_name) = &fragment.type_condition;
                if !context.schema.contains_type(type_name) {
                    errors.push(ValidationError {
                        message: format!("unknown type `{type_name}` in fragment condition"),
                        source_index: loaded.source_index,
                        position: fragment.position,
                    });
                }
            }
            parsed_query::Definition::Operation(operation) => {
                let (_, variable_definitions, _) = operation_parts(operation);
                for variable_definition in variable_definitions {
                    let base = base_named_type(&variable_definition.var_type);
                    if BUILT_IN_TYPE_NAMES.contains(&base) {
                        continue;
                    }
                    if !context.schema.contains_type(base) {
                        errors.push(ValidationError {
                            message: format!(
                                "unknown type `{base}` for variable `${}`",
                                variable_definition.name
                            ),
                            source_index: loaded.source_index,
                            position: variable_definition.position,
                        });
                    }
                }
            }
        }
    }
    errors
}

fn unique_variable_names(context: &RuleContext<'_>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for loaded in &context.document.definitions {
        let parsed_query::Definition::Operation(operation) = &loaded.definition else {
            continue;
        };
        let (_, variable_definitions, _) = operation_parts(operation);
        let mut seen = HashSet::new();
        for variable_definition in variable_definitions {
            if !seen.insert(variable_definition.name.as_str()) {
                errors.push(ValidationError {
                    message: format!("duplicate variable `${}`", variable_definition.name),
                    source_index: loaded.source_index,
                    position: variable_definition.position,
                });
            }
        }
    }
    errors
}

fn collect_spreads<'a>(
    selection_set: &'a parsed_query::SelectionSet<'static, String>,
    into: &mut Vec<&'a str>,
) {
    for selection in &selection_set.items {
        match selection {
            parsed_query::Selection::Field(field) => collect_spreads(&field.selection_set, into),
            parsed_query::Selection::FragmentSpread(spread) => into.push(&spread.fragment_name),
            parsed_query::Selection::InlineFragment(inline) => {
                collect_spreads(&inline.selection_set, into)
            }
        }
    }
}

/// Fragments must be reachable from at least one operation through spreads.
fn no_unused_fragments(context: &RuleContext<'_>) -> Vec<ValidationError> {
    let mut fragment_spreads: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut reachable: Vec<&str> = Vec::new();
    for loaded in &context.document.definitions {
        match &loaded.definition {
            parsed_query::Definition::Fragment(fragment) => {
                let mut spreads = Vec::new();
                collect_spreads(&fragment.selection_set, &mut spreads);
                fragment_spreads.insert(&fragment.name, spreads);
            }
            parsed_query::Definition::Operation(operation) => {
                let selection_set = match operation {
                    parsed_query::OperationDefinition::Query(query) => &query.selection_set,
                    parsed_query::OperationDefinition::Mutation(mutation) => {
                        &mutation.selection_set
                    }
                    parsed_query::OperationDefinition::Subscription(subscription) => {
                        &subscription.selection_set
                    }
                    parsed_query::OperationDefinition::SelectionSet(selection_set) => selection_set,
                };
                collect_spreads(selection_set, &mut reachable);
            }
        }
    }
    let mut used: HashSet<&str> = HashSet::new();
    while let Some(name) = reachable.pop() {
        if !used.insert(name) {
            continue;
        }
        if let Some(spreads) = fragment_spreads.get(name) {
            reachable.extend(spreads.iter().copied());
        }
    }
    let mut errors = Vec::new();
    for loaded in &context.document.definitions {
        if let parsed_query::Definition::Fragment(fragment) = &loaded.definition {
            if !used.contains(fragment.name.as_str()) {
                errors.push(ValidationError {
                    message: format!("fragment `{}` is never used", fragment.name),
                    source_index: loaded.source_index,
                    position: fragment.position,
                });
            }
        }
    }
    errors
}

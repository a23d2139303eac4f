//! Host type model and document resolution
//!
//! Definitions convert to host types in a fixpoint loop: fragments may spread
//! each other in any order, so a definition whose spreads are not resolved
//! yet is retried on the next pass. A pass that makes no progress aborts the
//! run with every error recorded during that pass.
use super::document::{AstText, DocumentSet, LoadedDefinition};
use super::package::ImportBundle;
use super::schema::{self, OperationKind, Schema};
use crate::cli::{similar_help_suggestions, Message};
use graphql_parser::query as parsed_query;
use graphql_parser::Pos;
use std::collections::{BTreeMap, BTreeSet};

pub const ARBITRARY_OBJECT_TYPE: &str = "ArbitraryObjectType";

type SelectionSetNode = parsed_query::SelectionSet<'static, AstText>;
type FieldNode = parsed_query::Field<'static, AstText>;

/// The emitted type shape. Nullability lives on every variant; intersection
/// members carry their own flags cleared, the intersection holds the real one.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Named {
        name: String,
        nullable: bool,
    },
    Object {
        fields: BTreeMap<String, Type>,
        nullable: bool,
    },
    Array {
        element: Box<Type>,
        nullable: bool,
    },
    Intersection {
        members: Vec<Type>,
        nullable: bool,
    },
}

impl Type {
    pub fn non_nullable(mut self) -> Self {
        match &mut self {
            Type::Named { nullable, .. }
            | Type::Object { nullable, .. }
            | Type::Array { nullable, .. }
            | Type::Intersection { nullable, .. } => *nullable = false,
        }
        self
    }

    fn is_object_like(&self) -> bool {
        matches!(self, Type::Object { .. } | Type::Intersection { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Fragment {
    pub type_ir: Type,
    pub node: parsed_query::FragmentDefinition<'static, AstText>,
    /// Names of fragments this one spreads directly, sorted.
    pub dependencies: Vec<String>,
    /// Enums and input objects this fragment references, pre-closure.
    pub named_types: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct Operation {
    pub result: Type,
    pub variables: Type,
    pub node: parsed_query::OperationDefinition<'static, AstText>,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ResolvedContext {
    pub used_named_types: BTreeSet<String>,
    pub fragments: BTreeMap<String, Fragment>,
    pub fragment_dependencies: BTreeMap<String, Vec<String>>,
    pub operations: BTreeMap<String, Operation>,
}

#[derive(Debug)]
pub enum Error {
    UnknownFragment {
        name: String,
        position: Pos,
        possible_names: Vec<String>,
    },
    UnknownField {
        parent_type_name: String,
        field_name: String,
        position: Pos,
        possible_field_names: Vec<String>,
    },
    MissingType(String),
    NotGlobalType(String),
    SelectionOnTerminal {
        type_name: String,
        position: Pos,
    },
    MissingSelectionSet {
        type_name: String,
        position: Pos,
    },
    SelectionOnUnion {
        type_name: String,
        position: Pos,
    },
    InlineFragmentUnsupported(Pos),
    FragmentNotObjectLike {
        name: String,
        position: Pos,
    },
    InputObjectOnSelection {
        field_name: String,
        type_name: String,
    },
    InvalidVariableType {
        type_name: String,
        position: Pos,
    },
    AnonymousOperation(Pos),
    MissingOperationRoot(&'static str),
}

#[derive(Debug)]
pub struct PositionedError {
    pub source_index: usize,
    pub error: Error,
}

impl PositionedError {
    pub fn into_message(self, document: &DocumentSet) -> Message {
        let path = &document.source(self.source_index).path;
        match self.error {
            Error::UnknownFragment {
                name,
                position,
                possible_names,
            } => {
                let extra = similar_help_suggestions(&name, possible_names.into_iter())
                    .unwrap_or_else(|| " Did you forget to import it?".to_string());
                Message::new_error_at(
                    &format!("unknown spread fragment name `{name}`.{extra}"),
                    path,
                    position.line,
                )
            }
            Error::UnknownField {
                parent_type_name,
                field_name,
                position,
                possible_field_names,
            } => {
                let extra = similar_help_suggestions(&field_name, possible_field_names.into_iter())
                    .unwrap_or_default();
                Message::new_error_at(
                    &format!("unknown field `{field_name}` on type `{parent_type_name}`.{extra}"),
                    path,
                    position.line,
                )
            }
            Error::MissingType(type_name) => {
                Message::new_program_error(&format!("failed lookup of type `{type_name}`"))
            }
            Error::NotGlobalType(type_name) => Message::new_program_error(&format!(
                "type `{type_name}` is not an enum or input object"
            )),
            Error::SelectionOnTerminal {
                type_name,
                position,
            } => Message::new_error_at(
                &format!("unexpected selection on field of type `{type_name}`"),
                path,
                position.line,
            ),
            Error::MissingSelectionSet {
                type_name,
                position,
            } => Message::new_error_at(
                &format!("expected a selection on field of complex type `{type_name}`"),
                path,
                position.line,
            ),
            Error::SelectionOnUnion {
                type_name,
                position,
            } => Message::new_error_at(
                &format!("selections on union type `{type_name}` are not supported"),
                path,
                position.line,
            ),
            Error::InlineFragmentUnsupported(position) => Message::new_error_at(
                "inline fragment spreads are not implemented yet",
                path,
                position.line,
            ),
            Error::FragmentNotObjectLike { name, position } => Message::new_error_at(
                &format!("fragment `{name}` does not resolve to an object type and cannot be spread here"),
                path,
                position.line,
            ),
            Error::InputObjectOnSelection {
                field_name,
                type_name,
            } => Message::new_program_error(&format!(
                "unexpectedly traversing field `{field_name}` with input object type `{type_name}`"
            )),
            Error::InvalidVariableType {
                type_name,
                position,
            } => Message::new_error_at(
                &format!("variables cannot use output type `{type_name}`"),
                path,
                position.line,
            ),
            Error::AnonymousOperation(position) => Message::new_error_at(
                "Script does not support anonymous operations.",
                path,
                position.line,
            ),
            Error::MissingOperationRoot(kind) => Message::new_error(&format!(
                "schema does not define a {kind} root type"
            )),
        }
    }
}

#[derive(Debug)]
pub enum Warning {
    DeprecatedFieldUse {
        position: Pos,
        field_name: String,
        parent_type_name: String,
    },
}

#[derive(Debug)]
pub struct PositionedWarning {
    pub source_index: usize,
    pub warning: Warning,
}

impl PositionedWarning {
    pub fn into_message(self, document: &DocumentSet) -> Message {
        let path = &document.source(self.source_index).path;
        match self.warning {
            Warning::DeprecatedFieldUse {
                position,
                field_name,
                parent_type_name,
            } => Message::new_warning_at(
                &format!("use of deprecated field `{field_name}` on type `{parent_type_name}`"),
                path,
                position.line,
            ),
        }
    }
}

pub fn fragment_type_name(fragment_name: &str) -> String {
    format!("{fragment_name}Fragment")
}

fn scalar_host_name(scalar: &schema::ScalarType) -> String {
    match scalar {
        schema::ScalarType::Boolean => "boolean".to_string(),
        schema::ScalarType::String | schema::ScalarType::ID => "string".to_string(),
        schema::ScalarType::Float | schema::ScalarType::Int => "number".to_string(),
        schema::ScalarType::Custom(_) => ARBITRARY_OBJECT_TYPE.to_string(),
    }
}

enum Converted {
    Fragment(String, Fragment),
    Operation(String, Operation),
}

struct SelectionWalker<'a> {
    schema: &'a Schema,
    imports: &'a ImportBundle,
    context: &'a ResolvedContext,
    named_types: BTreeSet<String>,
    dependencies: BTreeSet<String>,
    warnings: Vec<Warning>,
    errors: Vec<Error>,
}

impl<'a> SelectionWalker<'a> {
    fn new(schema: &'a Schema, imports: &'a ImportBundle, context: &'a ResolvedContext) -> Self {
        SelectionWalker {
            schema,
            imports,
            context,
            named_types: BTreeSet::new(),
            dependencies: BTreeSet::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn known_fragment_names(&self) -> Vec<String> {
        self.context
            .fragments
            .keys()
            .cloned()
            .chain(self.imports.fragment_names())
            .collect()
    }

    /// Looks up a spread target, local fragments first, then imports.
    fn resolve_spread(
        &mut self,
        spread: &parsed_query::FragmentSpread<'static, AstText>,
    ) -> Option<&'a Fragment> {
        let context = self.context;
        let imports = self.imports;
        let found = context
            .fragments
            .get(&spread.fragment_name)
            .or_else(|| imports.lookup(&spread.fragment_name).map(|(_, fragment)| fragment));
        if found.is_none() {
            self.errors.push(Error::UnknownFragment {
                name: spread.fragment_name.clone(),
                position: spread.position,
                possible_names: self.known_fragment_names(),
            });
        }
        found
    }

    fn convert_selection_set(
        &mut self,
        type_name: &str,
        selection_set: &SelectionSetNode,
        nullable: bool,
    ) -> Option<Type> {
        let Some(schema_type) = self.schema.get_type_for_name(type_name) else {
            self.errors.push(Error::MissingType(type_name.to_string()));
            return None;
        };
        let fields_lookup = match &schema_type.definition {
            schema::TypeDefinition::Object(object_type) => &object_type.fields,
            schema::TypeDefinition::Interface(interface_type) => &interface_type.fields,
            schema::TypeDefinition::Union(name) => {
                self.errors.push(Error::SelectionOnUnion {
                    type_name: name.clone(),
                    position: selection_set.span.0,
                });
                return None;
            }
            _ => {
                self.errors.push(Error::SelectionOnTerminal {
                    type_name: type_name.to_string(),
                    position: selection_set.span.0,
                });
                return None;
            }
        };

        // A lone spread collapses to a reference instead of a one-member
        // intersection.
        if let [parsed_query::Selection::FragmentSpread(spread)] = &selection_set.items[..] {
            self.resolve_spread(spread)?;
            self.dependencies.insert(spread.fragment_name.clone());
            return Some(Type::Named {
                name: fragment_type_name(&spread.fragment_name),
                nullable,
            });
        }

        let mut fields = BTreeMap::new();
        let mut members: Vec<Type> = Vec::new();
        for selection in &selection_set.items {
            match selection {
                parsed_query::Selection::Field(field_node) => {
                    if let Some((alias, field_type)) =
                        self.convert_field(type_name, fields_lookup, field_node)
                    {
                        fields.insert(alias, field_type);
                    }
                }
                parsed_query::Selection::FragmentSpread(spread) => {
                    let Some(fragment) = self.resolve_spread(spread) else {
                        continue;
                    };
                    if !fragment.type_ir.is_object_like() {
                        self.errors.push(Error::FragmentNotObjectLike {
                            name: spread.fragment_name.clone(),
                            position: spread.position,
                        });
                        continue;
                    }
                    self.dependencies.insert(spread.fragment_name.clone());
                    members.push(Type::Named {
                        name: fragment_type_name(&spread.fragment_name),
                        nullable: false,
                    });
                }
                parsed_query::Selection::InlineFragment(inline) => {
                    self.errors
                        .push(Error::InlineFragmentUnsupported(inline.position));
                }
            }
        }

        if members.is_empty() {
            return Some(Type::Object { fields, nullable });
        }
        // The local object joins the intersection last with its own flag
        // cleared; the intersection keeps the original nullability.
        if !fields.is_empty() {
            members.push(Type::Object {
                fields,
                nullable: false,
            });
        }
        Some(Type::Intersection { members, nullable })
    }

    fn convert_field(
        &mut self,
        parent_type_name: &str,
        fields_lookup: &schema::FieldsLookup,
        field_node: &FieldNode,
    ) -> Option<(String, Type)> {
        let name = &field_node.name;
        let Some(field) = fields_lookup.get(name) else {
            self.errors.push(Error::UnknownField {
                parent_type_name: parent_type_name.to_string(),
                field_name: name.clone(),
                position: field_node.position,
                possible_field_names: fields_lookup.keys().cloned().collect(),
            });
            return None;
        };
        if field.deprecated {
            self.warnings.push(Warning::DeprecatedFieldUse {
                position: field_node.position,
                field_name: field.name.clone(),
                parent_type_name: parent_type_name.to_string(),
            });
        }
        let alias = field_node.alias.clone().unwrap_or_else(|| name.clone());
        let field_type = self.convert_output_type(&field.type_description, field_node)?;
        Some((alias, field_type))
    }

    fn convert_output_type(
        &mut self,
        field_type: &schema::FieldType,
        field_node: &FieldNode,
    ) -> Option<Type> {
        let nullable = field_type.nullable;
        let has_selections = !field_node.selection_set.items.is_empty();
        match &field_type.definition {
            schema::FieldTypeDefinition::List(element) => {
                let element_type = self.convert_output_type(element, field_node)?;
                Some(Type::Array {
                    element: Box::new(element_type.non_nullable()),
                    nullable,
                })
            }
            schema::FieldTypeDefinition::Scalar(scalar) => {
                if has_selections {
                    self.errors.push(Error::SelectionOnTerminal {
                        type_name: scalar_host_name(scalar),
                        position: field_node.position,
                    });
                    return None;
                }
                Some(Type::Named {
                    name: scalar_host_name(scalar),
                    nullable,
                })
            }
            schema::FieldTypeDefinition::Enum(enum_name) => {
                if has_selections {
                    self.errors.push(Error::SelectionOnTerminal {
                        type_name: enum_name.clone(),
                        position: field_node.position,
                    });
                    return None;
                }
                self.named_types.insert(enum_name.clone());
                Some(Type::Named {
                    name: enum_name.clone(),
                    nullable,
                })
            }
            schema::FieldTypeDefinition::Object(object_name)
            | schema::FieldTypeDefinition::Interface(object_name) => {
                if !has_selections {
                    self.errors.push(Error::MissingSelectionSet {
                        type_name: object_name.clone(),
                        position: field_node.position,
                    });
                    return None;
                }
                self.convert_selection_set(object_name, &field_node.selection_set, nullable)
            }
            schema::FieldTypeDefinition::Union(union_name) => {
                self.errors.push(Error::SelectionOnUnion {
                    type_name: union_name.clone(),
                    position: field_node.position,
                });
                None
            }
            schema::FieldTypeDefinition::InputObject(input_name) => {
                self.errors.push(Error::InputObjectOnSelection {
                    field_name: field_node.name.clone(),
                    type_name: input_name.clone(),
                });
                None
            }
        }
    }

    fn convert_variables(
        &mut self,
        variable_definitions: &[parsed_query::VariableDefinition<'static, AstText>],
    ) -> Type {
        let mut fields = BTreeMap::new();
        for definition in variable_definitions {
            if let Some(variable_type) =
                self.convert_variable_type(&definition.var_type, true, definition.position)
            {
                fields.insert(definition.name.clone(), variable_type);
            }
        }
        Type::Object {
            fields,
            nullable: false,
        }
    }

    fn convert_variable_type(
        &mut self,
        variable_type: &parsed_query::Type<'static, AstText>,
        nullable: bool,
        position: Pos,
    ) -> Option<Type> {
        match variable_type {
            parsed_query::Type::NonNullType(inner) => {
                self.convert_variable_type(inner, false, position)
            }
            parsed_query::Type::ListType(inner) => {
                let element = self.convert_variable_type(inner, true, position)?;
                Some(Type::Array {
                    element: Box::new(element.non_nullable()),
                    nullable,
                })
            }
            parsed_query::Type::NamedType(name) => {
                self.convert_named_input_type(name, nullable, position)
            }
        }
    }

    fn convert_named_input_type(
        &mut self,
        name: &str,
        nullable: bool,
        position: Pos,
    ) -> Option<Type> {
        match name {
            "String" | "ID" => {
                return Some(Type::Named {
                    name: "string".to_string(),
                    nullable,
                })
            }
            "Int" | "Float" => {
                return Some(Type::Named {
                    name: "number".to_string(),
                    nullable,
                })
            }
            "Boolean" => {
                return Some(Type::Named {
                    name: "boolean".to_string(),
                    nullable,
                })
            }
            _ => {}
        }
        let Some(schema_type) = self.schema.get_type_for_name(name) else {
            self.errors.push(Error::MissingType(name.to_string()));
            return None;
        };
        match &schema_type.definition {
            schema::TypeDefinition::Enum(_) | schema::TypeDefinition::InputObject(_) => {
                self.named_types.insert(name.to_string());
                Some(Type::Named {
                    name: name.to_string(),
                    nullable,
                })
            }
            schema::TypeDefinition::Scalar(_) => Some(Type::Named {
                name: ARBITRARY_OBJECT_TYPE.to_string(),
                nullable,
            }),
            _ => {
                self.errors.push(Error::InvalidVariableType {
                    type_name: name.to_string(),
                    position,
                });
                None
            }
        }
    }

    fn finish<T>(self, value: Option<T>) -> Result<(T, WalkOutput), Vec<Error>> {
        let SelectionWalker {
            named_types,
            dependencies,
            warnings,
            mut errors,
            ..
        } = self;
        match value {
            Some(value) if errors.is_empty() => Ok((
                value,
                WalkOutput {
                    named_types,
                    dependencies: dependencies.into_iter().collect(),
                    warnings,
                },
            )),
            _ => {
                if errors.is_empty() {
                    // A dropped value with no recorded error is a bug; make
                    // it visible rather than looping forever.
                    errors.push(Error::MissingType("<unknown>".to_string()));
                }
                Err(errors)
            }
        }
    }
}

struct WalkOutput {
    named_types: BTreeSet<String>,
    dependencies: Vec<String>,
    warnings: Vec<Warning>,
}

fn convert_definition(
    schema: &Schema,
    imports: &ImportBundle,
    context: &ResolvedContext,
    loaded: &LoadedDefinition,
) -> Result<(Converted, WalkOutput), Vec<Error>> {
    match &loaded.definition {
        parsed_query::Definition::Fragment(fragment_definition) => {
            let parsed_query::TypeCondition::On(type_name) = &fragment_definition.type_condition;
            let mut walker = SelectionWalker::new(schema, imports, context);
            let type_ir = walker
                .convert_selection_set(type_name, &fragment_definition.selection_set, true)
                .map(Type::non_nullable);
            let (type_ir, output) = walker.finish(type_ir)?;
            let fragment = Fragment {
                type_ir,
                node: fragment_definition.clone(),
                dependencies: output.dependencies.clone(),
                named_types: output.named_types.clone(),
            };
            Ok((
                Converted::Fragment(fragment_definition.name.clone(), fragment),
                output,
            ))
        }
        parsed_query::Definition::Operation(operation_definition) => {
            convert_operation(schema, imports, context, operation_definition)
        }
    }
}

fn convert_operation(
    schema: &Schema,
    imports: &ImportBundle,
    context: &ResolvedContext,
    operation_definition: &parsed_query::OperationDefinition<'static, AstText>,
) -> Result<(Converted, WalkOutput), Vec<Error>> {
    let (kind, name, selection_set, variable_definitions, position) = match operation_definition {
        parsed_query::OperationDefinition::Query(query) => (
            OperationKind::Query,
            &query.name,
            &query.selection_set,
            &query.variable_definitions[..],
            query.position,
        ),
        parsed_query::OperationDefinition::Mutation(mutation) => (
            OperationKind::Mutation,
            &mutation.name,
            &mutation.selection_set,
            &mutation.variable_definitions[..],
            mutation.position,
        ),
        parsed_query::OperationDefinition::Subscription(subscription) => (
            OperationKind::Subscription,
            &subscription.name,
            &subscription.selection_set,
            &subscription.variable_definitions[..],
            subscription.position,
        ),
        parsed_query::OperationDefinition::SelectionSet(selection_set) => {
            return Err(vec![Error::AnonymousOperation(selection_set.span.0)]);
        }
    };
    let Some(name) = name else {
        return Err(vec![Error::AnonymousOperation(position)]);
    };
    let Some(root_type_name) = schema.operation_root(kind) else {
        return Err(vec![Error::MissingOperationRoot(kind.type_suffix())]);
    };
    let root_type_name = root_type_name.to_string();
    let mut walker = SelectionWalker::new(schema, imports, context);
    let result = walker
        .convert_selection_set(&root_type_name, selection_set, true)
        .map(Type::non_nullable);
    let variables = walker.convert_variables(variable_definitions);
    let (result, output) = walker.finish(result)?;
    let operation = Operation {
        result,
        variables,
        node: operation_definition.clone(),
        dependencies: output.dependencies.clone(),
    };
    Ok((
        Converted::Operation(format!("{name}{}", kind.type_suffix()), operation),
        output,
    ))
}

/// Expands a set of recorded named types with everything reachable through
/// input object fields. Enums are terminal.
pub fn close_named_types(
    schema: &Schema,
    names: &BTreeSet<String>,
) -> Result<BTreeSet<String>, Error> {
    let mut closed = BTreeSet::new();
    let mut pending: Vec<String> = names.iter().cloned().collect();
    while let Some(name) = pending.pop() {
        if closed.contains(&name) {
            continue;
        }
        let schema_type = schema
            .get_type_for_name(&name)
            .ok_or_else(|| Error::MissingType(name.clone()))?;
        match &schema_type.definition {
            schema::TypeDefinition::Enum(_) => {
                closed.insert(name);
            }
            schema::TypeDefinition::InputObject(input_object_type) => {
                for field in input_object_type.fields.values() {
                    push_named_references(&field.type_description, &mut pending);
                }
                closed.insert(name);
            }
            _ => return Err(Error::NotGlobalType(name)),
        }
    }
    Ok(closed)
}

fn push_named_references(field_type: &schema::FieldType, pending: &mut Vec<String>) {
    match &field_type.definition {
        schema::FieldTypeDefinition::List(element) => push_named_references(element, pending),
        schema::FieldTypeDefinition::Enum(name)
        | schema::FieldTypeDefinition::InputObject(name) => pending.push(name.clone()),
        _ => {}
    }
}

/// Host type for a top-level input object declaration: every field expanded,
/// nested input objects kept as references.
pub fn input_object_type(input_object: &schema::InputObjectType) -> Type {
    let mut fields = BTreeMap::new();
    for field in input_object.fields.values() {
        fields.insert(field.name.clone(), input_field_type(&field.type_description));
    }
    Type::Object {
        fields,
        nullable: false,
    }
}

fn input_field_type(field_type: &schema::FieldType) -> Type {
    let nullable = field_type.nullable;
    match &field_type.definition {
        schema::FieldTypeDefinition::List(element) => Type::Array {
            element: Box::new(input_field_type(element).non_nullable()),
            nullable,
        },
        schema::FieldTypeDefinition::Scalar(scalar) => Type::Named {
            name: scalar_host_name(scalar),
            nullable,
        },
        schema::FieldTypeDefinition::Enum(name)
        | schema::FieldTypeDefinition::InputObject(name) => Type::Named {
            name: name.clone(),
            nullable,
        },
        // Output types cannot appear in input positions in a valid schema.
        schema::FieldTypeDefinition::Object(_)
        | schema::FieldTypeDefinition::Interface(_)
        | schema::FieldTypeDefinition::Union(_) => Type::Named {
            name: ARBITRARY_OBJECT_TYPE.to_string(),
            nullable,
        },
    }
}

pub fn resolve_document(
    schema: &Schema,
    document: &DocumentSet,
    imports: &ImportBundle,
) -> Result<(ResolvedContext, Vec<PositionedWarning>), Vec<PositionedError>> {
    let mut context = ResolvedContext::default();
    let mut warnings = Vec::new();
    if imports.embed {
        for package in imports.packages.values() {
            context
                .used_named_types
                .extend(package.used_named_types.iter().cloned());
            for (name, fragment) in &package.fragments {
                context
                    .fragment_dependencies
                    .insert(name.clone(), fragment.dependencies.clone());
                context.fragments.insert(name.clone(), fragment.clone());
            }
        }
    }

    let mut pending: Vec<&LoadedDefinition> = document.definitions.iter().collect();
    loop {
        let pending_before = pending.len();
        let mut next_pending = Vec::new();
        let mut pass_errors: Vec<PositionedError> = Vec::new();
        for loaded in pending {
            match convert_definition(schema, imports, &context, loaded) {
                Ok((converted, output)) => {
                    context.used_named_types.extend(output.named_types);
                    warnings.extend(output.warnings.into_iter().map(|warning| {
                        PositionedWarning {
                            source_index: loaded.source_index,
                            warning,
                        }
                    }));
                    match converted {
                        Converted::Fragment(name, fragment) => {
                            context
                                .fragment_dependencies
                                .insert(name.clone(), fragment.dependencies.clone());
                            context.fragments.insert(name, fragment);
                        }
                        Converted::Operation(name, operation) => {
                            context.operations.insert(name, operation);
                        }
                    }
                }
                Err(errors) => {
                    pass_errors.extend(errors.into_iter().map(|error| PositionedError {
                        source_index: loaded.source_index,
                        error,
                    }));
                    next_pending.push(loaded);
                }
            }
        }
        if next_pending.is_empty() {
            break;
        }
        if next_pending.len() == pending_before {
            return Err(pass_errors);
        }
        pending = next_pending;
    }

    match close_named_types(schema, &context.used_named_types) {
        Ok(closed) => context.used_named_types = closed,
        Err(error) => {
            return Err(vec![PositionedError {
                source_index: 0,
                error,
            }])
        }
    }
    Ok((context, warnings))
}

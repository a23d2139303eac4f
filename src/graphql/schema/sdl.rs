//! Building a schema from SDL text
use super::{
    EnumType, Error, Field, FieldType, FieldTypeDefinition, FieldsLookup, InputObjectType,
    InterfaceType, ObjectType, ScalarType, Schema, Type, TypeDefinition,
};
use graphql_parser::schema as parsed_schema;
use std::collections::HashMap;

type SdlDocument = parsed_schema::Document<'static, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NamedKind {
    Object,
    Interface,
    Union,
    Enum,
    Scalar,
    InputObject,
}

const BUILT_IN_SCALARS: [&str; 5] = ["Boolean", "Float", "ID", "Int", "String"];

fn collect_kinds(document: &SdlDocument) -> HashMap<String, NamedKind> {
    let mut kinds = HashMap::new();
    for name in BUILT_IN_SCALARS {
        kinds.insert(name.to_string(), NamedKind::Scalar);
    }
    for definition in &document.definitions {
        let parsed_schema::Definition::TypeDefinition(type_definition) = definition else {
            continue;
        };
        let (name, kind) = match type_definition {
            parsed_schema::TypeDefinition::Object(object) => (&object.name, NamedKind::Object),
            parsed_schema::TypeDefinition::Interface(interface) => {
                (&interface.name, NamedKind::Interface)
            }
            parsed_schema::TypeDefinition::Union(union) => (&union.name, NamedKind::Union),
            parsed_schema::TypeDefinition::Enum(enum_type) => (&enum_type.name, NamedKind::Enum),
            parsed_schema::TypeDefinition::Scalar(scalar) => (&scalar.name, NamedKind::Scalar),
            parsed_schema::TypeDefinition::InputObject(input) => {
                (&input.name, NamedKind::InputObject)
            }
        };
        kinds.insert(name.clone(), kind);
    }
    kinds
}

fn convert_type(
    ast_type: &parsed_schema::Type<'static, String>,
    kinds: &HashMap<String, NamedKind>,
    nullable: bool,
) -> Result<FieldType, Error> {
    match ast_type {
        parsed_schema::Type::NonNullType(inner) => convert_type(inner, kinds, false),
        parsed_schema::Type::ListType(inner) => Ok(FieldType {
            nullable,
            definition: FieldTypeDefinition::List(Box::new(convert_type(inner, kinds, true)?)),
        }),
        parsed_schema::Type::NamedType(name) => {
            let kind = kinds
                .get(name)
                .ok_or_else(|| Error::UnknownNamedType(name.clone()))?;
            let definition = match kind {
                NamedKind::Object => FieldTypeDefinition::Object(name.clone()),
                NamedKind::Interface => FieldTypeDefinition::Interface(name.clone()),
                NamedKind::Union => FieldTypeDefinition::Union(name.clone()),
                NamedKind::Enum => FieldTypeDefinition::Enum(name.clone()),
                NamedKind::Scalar => FieldTypeDefinition::Scalar(ScalarType::from(name.as_ref())),
                NamedKind::InputObject => FieldTypeDefinition::InputObject(name.clone()),
            };
            Ok(FieldType {
                nullable,
                definition,
            })
        }
    }
}

fn is_deprecated(directives: &[parsed_schema::Directive<'static, String>]) -> bool {
    directives.iter().any(|directive| directive.name == "deprecated")
}

fn object_fields(
    fields: &[parsed_schema::Field<'static, String>],
    kinds: &HashMap<String, NamedKind>,
) -> Result<FieldsLookup, Error> {
    let mut lookup = HashMap::with_capacity(fields.len() + 1);
    for field in fields {
        lookup.insert(
            field.name.clone(),
            Field {
                name: field.name.clone(),
                type_description: convert_type(&field.field_type, kinds, true)?,
                deprecated: is_deprecated(&field.directives),
            },
        );
    }
    lookup.insert("__typename".to_string(), Field::new_type_name());
    Ok(lookup)
}

fn input_fields(
    fields: &[parsed_schema::InputValue<'static, String>],
    kinds: &HashMap<String, NamedKind>,
) -> Result<FieldsLookup, Error> {
    let mut lookup = HashMap::with_capacity(fields.len());
    for field in fields {
        lookup.insert(
            field.name.clone(),
            Field {
                name: field.name.clone(),
                type_description: convert_type(&field.value_type, kinds, true)?,
                deprecated: is_deprecated(&field.directives),
            },
        );
    }
    Ok(lookup)
}

pub(super) fn build(contents: &str) -> Result<Schema, Error> {
    let document = parsed_schema::parse_schema::<String>(contents)
        .map_err(Error::SdlParse)?
        .into_static();
    let kinds = collect_kinds(&document);
    let mut types = HashMap::new();
    let mut query_type = "Query".to_string();
    let mut mutation_type = None;
    let mut subscription_type = None;
    for definition in &document.definitions {
        match definition {
            parsed_schema::Definition::SchemaDefinition(schema_definition) => {
                if let Some(query) = &schema_definition.query {
                    query_type = query.clone();
                }
                mutation_type = schema_definition.mutation.clone();
                subscription_type = schema_definition.subscription.clone();
            }
            parsed_schema::Definition::TypeDefinition(type_definition) => {
                let (name, definition) = match type_definition {
                    parsed_schema::TypeDefinition::Object(object) => (
                        object.name.clone(),
                        TypeDefinition::Object(ObjectType {
                            fields: object_fields(&object.fields, &kinds)?,
                        }),
                    ),
                    parsed_schema::TypeDefinition::Interface(interface) => (
                        interface.name.clone(),
                        TypeDefinition::Interface(InterfaceType {
                            name: interface.name.clone(),
                            fields: object_fields(&interface.fields, &kinds)?,
                        }),
                    ),
                    parsed_schema::TypeDefinition::InputObject(input) => (
                        input.name.clone(),
                        TypeDefinition::InputObject(InputObjectType {
                            name: input.name.clone(),
                            fields: input_fields(&input.fields, &kinds)?,
                        }),
                    ),
                    parsed_schema::TypeDefinition::Enum(enum_type) => {
                        if enum_type.values.is_empty() {
                            return Err(Error::EnumMissingValues(enum_type.name.clone()));
                        }
                        (
                            enum_type.name.clone(),
                            TypeDefinition::Enum(EnumType {
                                possible_values: enum_type
                                    .values
                                    .iter()
                                    .map(|value| value.name.clone())
                                    .collect(),
                            }),
                        )
                    }
                    parsed_schema::TypeDefinition::Union(union) => (
                        union.name.clone(),
                        TypeDefinition::Union(union.name.clone()),
                    ),
                    parsed_schema::TypeDefinition::Scalar(scalar) => (
                        scalar.name.clone(),
                        TypeDefinition::Scalar(scalar.name.clone()),
                    ),
                };
                types.insert(name, Type { definition });
            }
            parsed_schema::Definition::TypeExtension(_)
            | parsed_schema::Definition::DirectiveDefinition(_) => {}
        }
    }
    Ok(Schema::from_parts(
        types,
        query_type,
        mutation_type,
        subscription_type,
    ))
}

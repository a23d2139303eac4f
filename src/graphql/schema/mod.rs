//! Consumable schema built from introspection JSON or SDL
use json::{FieldJson, FieldTypeJson, SchemaJson, TypeJson};
use std::collections::HashMap;

pub mod json;
pub mod remote;
mod sdl;

pub type FieldsLookup = HashMap<String, Field>;

#[derive(Debug)]
pub enum Error {
    MissingTypeOfForList,
    MissingTypeOfForNonNull,
    MissingNameForField,
    UnknownTypeKind(String, String),
    EnumMissingValues(String),
    UnknownNamedType(String),
    JsonParse(serde_json::Error),
    SdlParse(graphql_parser::schema::ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingTypeOfForList => write!(f, "list type is missing its `ofType`"),
            Error::MissingTypeOfForNonNull => write!(f, "non-null type is missing its `ofType`"),
            Error::MissingNameForField => write!(f, "field type is missing a name"),
            Error::UnknownTypeKind(name, kind) => {
                write!(f, "type `{name}` has unknown kind `{kind}`")
            }
            Error::EnumMissingValues(name) => write!(f, "enum `{name}` has no values"),
            Error::UnknownNamedType(name) => write!(f, "reference to undeclared type `{name}`"),
            Error::JsonParse(error) => write!(f, "malformed introspection JSON: {error}"),
            Error::SdlParse(error) => write!(f, "malformed schema SDL: {error}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarType {
    Custom(String),
    Boolean,
    String,
    Float,
    Int,
    ID,
}

impl From<&str> for ScalarType {
    fn from(name: &str) -> Self {
        match name {
            "Boolean" => ScalarType::Boolean,
            "String" => ScalarType::String,
            "Float" => ScalarType::Float,
            "Int" => ScalarType::Int,
            "ID" => ScalarType::ID,
            _ => ScalarType::Custom(name.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldType {
    pub nullable: bool,
    pub definition: FieldTypeDefinition,
}

#[derive(Debug, Clone)]
pub enum FieldTypeDefinition {
    List(Box<FieldType>),
    Object(String),
    Interface(String),
    Union(String),
    Enum(String),
    Scalar(ScalarType),
    InputObject(String),
}

impl FieldType {
    fn from_json(json: FieldTypeJson) -> Result<Self, Error> {
        let mut nullable = true;
        let mut iter = json;
        loop {
            match iter.kind.as_ref() {
                "NON_NULL" => {
                    nullable = false;
                    iter = *iter.of_type.ok_or(Error::MissingTypeOfForNonNull)?;
                }
                "LIST" => {
                    iter = *iter.of_type.ok_or(Error::MissingTypeOfForList)?;
                    let element = FieldType::from_json(iter)?;
                    return Ok(FieldType {
                        nullable,
                        definition: FieldTypeDefinition::List(Box::new(element)),
                    });
                }
                kind => {
                    let name = iter.name.ok_or(Error::MissingNameForField)?;
                    let definition = match kind {
                        "OBJECT" => FieldTypeDefinition::Object(name),
                        "INTERFACE" => FieldTypeDefinition::Interface(name),
                        "UNION" => FieldTypeDefinition::Union(name),
                        "ENUM" => FieldTypeDefinition::Enum(name),
                        "SCALAR" => FieldTypeDefinition::Scalar(ScalarType::from(name.as_ref())),
                        "INPUT_OBJECT" => FieldTypeDefinition::InputObject(name),
                        _ => return Err(Error::UnknownTypeKind(name, iter.kind)),
                    };
                    return Ok(FieldType {
                        nullable,
                        definition,
                    });
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub type_description: FieldType,
    pub deprecated: bool,
}

impl Field {
    /// The meta field available on every object and interface type.
    fn new_type_name() -> Self {
        Field {
            name: "__typename".to_string(),
            type_description: FieldType {
                nullable: false,
                definition: FieldTypeDefinition::Scalar(ScalarType::String),
            },
            deprecated: false,
        }
    }

    fn from_json(json: FieldJson) -> Result<Self, Error> {
        Ok(Field {
            name: json.name,
            type_description: FieldType::from_json(json.type_information)?,
            deprecated: json.is_deprecated,
        })
    }
}

#[derive(Debug)]
pub struct ObjectType {
    pub fields: FieldsLookup,
}

#[derive(Debug)]
pub struct InterfaceType {
    pub name: String,
    pub fields: FieldsLookup,
}

#[derive(Debug)]
pub struct InputObjectType {
    pub name: String,
    pub fields: FieldsLookup,
}

#[derive(Debug)]
pub struct EnumType {
    pub possible_values: Vec<String>,
}

#[derive(Debug)]
pub enum TypeDefinition {
    Object(ObjectType),
    Interface(InterfaceType),
    InputObject(InputObjectType),
    Enum(EnumType),
    Union(String),
    Scalar(String),
}

impl TypeDefinition {
    pub fn get_fields_lookup(&self) -> Option<&FieldsLookup> {
        match self {
            TypeDefinition::Object(object_type) => Some(&object_type.fields),
            TypeDefinition::Interface(interface_type) => Some(&interface_type.fields),
            TypeDefinition::InputObject(input_object_type) => Some(&input_object_type.fields),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Type {
    pub definition: TypeDefinition,
}

fn get_fields_for_complex(
    fields_json: Option<Vec<FieldJson>>,
    with_type_name: bool,
) -> Result<FieldsLookup, Error> {
    let fields_json = fields_json.unwrap_or_default();
    let mut fields = HashMap::with_capacity(fields_json.len() + 1);
    for field_json in fields_json {
        let field = Field::from_json(field_json)?;
        fields.insert(field.name.clone(), field);
    }
    if with_type_name {
        fields.insert("__typename".to_string(), Field::new_type_name());
    }
    Ok(fields)
}

impl Type {
    fn from_json(json: TypeJson) -> Result<Self, Error> {
        let definition = match json.kind.as_ref() {
            "OBJECT" => TypeDefinition::Object(ObjectType {
                fields: get_fields_for_complex(json.fields, true)?,
            }),
            "INTERFACE" => TypeDefinition::Interface(InterfaceType {
                name: json.name,
                fields: get_fields_for_complex(json.fields, true)?,
            }),
            "INPUT_OBJECT" => TypeDefinition::InputObject(InputObjectType {
                name: json.name,
                fields: get_fields_for_complex(json.input_fields, false)?,
            }),
            "ENUM" => {
                let possible_values = json
                    .enum_values
                    .ok_or(Error::EnumMissingValues(json.name))?
                    .into_iter()
                    .map(|value| value.name)
                    .collect();
                TypeDefinition::Enum(EnumType { possible_values })
            }
            "UNION" => TypeDefinition::Union(json.name),
            "SCALAR" => TypeDefinition::Scalar(json.name),
            _ => return Err(Error::UnknownTypeKind(json.name, json.kind)),
        };
        Ok(Type { definition })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn type_suffix(&self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
            OperationKind::Subscription => "Subscription",
        }
    }
}

pub struct Schema {
    types: HashMap<String, Type>,
    query_type: String,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl Schema {
    pub fn from_introspection(contents: &str) -> Result<Self, Error> {
        let schema_json = SchemaJson::from_str(contents).map_err(Error::JsonParse)?;
        let mut types = HashMap::with_capacity(schema_json.types.len());
        for type_json in schema_json.types {
            let name = type_json.name.clone();
            types.insert(name, Type::from_json(type_json)?);
        }
        Ok(Schema {
            types,
            query_type: schema_json
                .query_type
                .map(|root| root.name)
                .unwrap_or_else(|| "Query".to_string()),
            mutation_type: schema_json.mutation_type.map(|root| root.name),
            subscription_type: schema_json.subscription_type.map(|root| root.name),
        })
    }

    pub fn from_sdl(contents: &str) -> Result<Self, Error> {
        sdl::build(contents)
    }

    fn from_parts(
        types: HashMap<String, Type>,
        query_type: String,
        mutation_type: Option<String>,
        subscription_type: Option<String>,
    ) -> Self {
        Schema {
            types,
            query_type,
            mutation_type,
            subscription_type,
        }
    }

    pub fn get_type_for_name(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    pub fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Root type name for an operation kind. Subscriptions fall back to the
    /// query root when the schema does not declare a subscription type.
    pub fn operation_root(&self, kind: OperationKind) -> Option<&str> {
        match kind {
            OperationKind::Query => Some(&self.query_type),
            OperationKind::Mutation => self.mutation_type.as_deref(),
            OperationKind::Subscription => self
                .subscription_type
                .as_deref()
                .or(Some(self.query_type.as_str())),
        }
    }
}

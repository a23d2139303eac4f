//! Deserializing introspection JSON
use serde::Deserialize;

#[derive(Deserialize)]
pub struct FieldTypeJson {
    pub kind: String,
    pub name: Option<String>,
    #[serde(rename(deserialize = "ofType"))]
    pub of_type: Option<Box<FieldTypeJson>>,
}

#[derive(Deserialize)]
pub struct FieldJson {
    pub name: String,
    #[serde(rename(deserialize = "type"))]
    pub type_information: FieldTypeJson,
    #[serde(rename(deserialize = "isDeprecated"), default)]
    pub is_deprecated: bool,
}

#[derive(Deserialize)]
pub struct EnumValueJson {
    pub name: String,
}

#[derive(Deserialize)]
pub struct TypeJson {
    pub kind: String,
    pub name: String,
    pub fields: Option<Vec<FieldJson>>,
    #[serde(rename(deserialize = "inputFields"))]
    pub input_fields: Option<Vec<FieldJson>>,
    #[serde(rename(deserialize = "enumValues"))]
    pub enum_values: Option<Vec<EnumValueJson>>,
}

#[derive(Deserialize)]
pub struct RootTypeJson {
    pub name: String,
}

#[derive(Deserialize)]
pub struct SchemaJson {
    #[serde(rename(deserialize = "queryType"))]
    pub query_type: Option<RootTypeJson>,
    #[serde(rename(deserialize = "mutationType"))]
    pub mutation_type: Option<RootTypeJson>,
    #[serde(rename(deserialize = "subscriptionType"))]
    pub subscription_type: Option<RootTypeJson>,
    pub types: Vec<TypeJson>,
}

impl SchemaJson {
    pub fn from_str(contents: &str) -> Result<Self, serde_json::Error> {
        let parsed: RawSchemaJson = serde_json::from_str(contents)?;
        Ok(match parsed {
            RawSchemaJson::Response { data } => data.schema,
            RawSchemaJson::Bare { schema } => schema,
        })
    }
}

#[derive(Deserialize)]
struct DataJson {
    #[serde(rename(deserialize = "__schema"))]
    schema: SchemaJson,
}

/// Accepts both a full introspection response (`{"data": {"__schema": …}}`)
/// and a bare `{"__schema": …}` document.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSchemaJson {
    Response {
        data: DataJson,
    },
    Bare {
        #[serde(rename(deserialize = "__schema"))]
        schema: SchemaJson,
    },
}

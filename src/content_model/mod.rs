//! Content model schemas and the validator-module subcommand
//!
//! A content model is a small JSON document describing one editable value:
//! a scalar with a presentation kind, or a flat object of scalar fields.
//! The subcommand validates every input and emits a single module mapping
//! model names to runtime validators.
use crate::cli::{ContentModelConfig, Message};
use crate::output;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

mod emit;
mod remote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringKind {
    Text,
    Textarea,
    Markdown,
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberKind {
    Integer,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanKind {
    Checkbox,
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatetimeKind {
    Date,
    Datetime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StringValidation {
    #[serde(rename = "enum")]
    pub options: Option<Vec<EnumOption>>,
    pub max_length: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NumberValidation {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldModel {
    String {
        kind: StringKind,
        validation: Option<StringValidation>,
        help: Option<String>,
    },
    Number {
        kind: NumberKind,
        validation: Option<NumberValidation>,
        help: Option<String>,
    },
    Boolean {
        kind: BooleanKind,
        help: Option<String>,
    },
    Datetime {
        kind: DatetimeKind,
        help: Option<String>,
    },
    Object {
        fields: Vec<ObjectField>,
        help: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectField {
    pub name: String,
    pub label: Option<String>,
    #[serde(flatten)]
    pub model: FieldModel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentModel {
    pub name: String,
    pub label: Option<String>,
    pub json: FieldModel,
}

#[derive(Debug)]
pub enum ParseError {
    Json(serde_json::Error),
    NestedObject { field_name: String },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Json(error) => write!(f, "{error}"),
            ParseError::NestedObject { field_name } => {
                write!(f, "object field `{field_name}` cannot itself be an object")
            }
        }
    }
}

/// Parses and validates a single content model document.
pub fn parse_model(contents: &str) -> Result<ContentModel, ParseError> {
    let model: ContentModel = serde_json::from_str(contents).map_err(ParseError::Json)?;
    if let FieldModel::Object { fields, .. } = &model.json {
        for field in fields {
            if matches!(field.model, FieldModel::Object { .. }) {
                return Err(ParseError::NestedObject {
                    field_name: field.name.clone(),
                });
            }
        }
    }
    Ok(model)
}

fn read_input(path: &Path) -> Result<ContentModel, Message> {
    let contents =
        std::fs::read_to_string(path).map_err(|error| Message::new_read_io_error(&error, path))?;
    parse_model(&contents).map_err(|error| {
        Message::new_error(&format!("invalid content model `{}`: {error}", path.display()))
    })
}

pub fn run(config: &ContentModelConfig) -> Vec<Message> {
    let mut models: BTreeMap<String, ContentModel> = BTreeMap::new();
    // Built-ins come first so user-supplied models can override them.
    for model in remote::fetch_builtin_models(&config.api_url) {
        models.insert(model.name.clone(), model);
    }
    let mut messages = Vec::new();
    for path in &config.inputs {
        match read_input(path) {
            Ok(model) => {
                models.insert(model.name.clone(), model);
            }
            Err(message) => messages.push(message),
        }
    }
    if !messages.is_empty() {
        return messages;
    }

    let module = emit::emit_module(&models);
    if config.output.as_os_str() == "-" {
        print!("{module}");
        return Vec::new();
    }
    match output::write_if_changed(&config.output, &module) {
        Ok(_) => Vec::new(),
        Err(error) => vec![Message::new_write_io_error(&error, &config.output)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_model_with_enum() {
        let model = parse_model(
            r#"{
                "name": "Color",
                "label": "Color",
                "json": {
                    "type": "string",
                    "kind": "text",
                    "validation": {
                        "enum": [
                            { "label": "Red", "value": "red" },
                            { "label": "Blue", "value": "blue" }
                        ]
                    }
                }
            }"#,
        )
        .expect("model should parse");
        let FieldModel::String { validation, .. } = model.json else {
            panic!("expected a string model");
        };
        let options = validation.and_then(|validation| validation.options).expect("enum options");
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, "red");
    }

    #[test]
    fn parses_object_model_fields_in_order() {
        let model = parse_model(
            r#"{
                "name": "Hero",
                "json": {
                    "type": "object",
                    "fields": [
                        { "name": "title", "type": "string", "kind": "text" },
                        { "name": "count", "type": "number", "kind": "integer" }
                    ]
                }
            }"#,
        )
        .expect("model should parse");
        let FieldModel::Object { fields, .. } = model.json else {
            panic!("expected an object model");
        };
        assert_eq!(fields[0].name, "title");
        assert_eq!(fields[1].name, "count");
    }

    #[test]
    fn rejects_unknown_kinds() {
        let result = parse_model(
            r#"{ "name": "Bad", "json": { "type": "string", "kind": "mystery" } }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_nested_objects() {
        let result = parse_model(
            r#"{
                "name": "Bad",
                "json": {
                    "type": "object",
                    "fields": [
                        { "name": "inner", "type": "object", "fields": [] }
                    ]
                }
            }"#,
        );
        assert!(matches!(
            result,
            Err(ParseError::NestedObject { field_name }) if field_name == "inner"
        ));
    }
}

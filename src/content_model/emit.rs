//! Validator module emission
use super::{ContentModel, FieldModel};
use std::collections::BTreeMap;

const HEADER: &str = "/* eslint-disable */\n// This file was automatically generated and should not be edited.\n\n";

const RUNTIME: &str = "export type Validator = (value: unknown) => boolean;

const stringValidator: Validator = (value) => typeof value === \"string\";

const numberValidator: Validator = (value) => typeof value === \"number\";

const booleanValidator: Validator = (value) => typeof value === \"boolean\";

const enumerationValidator = (values: string[]): Validator => (value) =>
  typeof value === \"string\" && values.indexOf(value) !== -1;

const recordValidator = (fields: { [name: string]: Validator }): Validator => (value) => {
  if (typeof value !== \"object\" || value === null) {
    return false;
  }
  const record = value as { [name: string]: unknown };
  return Object.keys(fields).every((name) => fields[name](record[name]));
};
";

fn json_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

/// Strings fall through to the plain string validator unless an enum is
/// declared; datetimes are strings on the wire.
fn validator_expression(model: &FieldModel) -> String {
    match model {
        FieldModel::String { validation, .. } => {
            let options = validation
                .as_ref()
                .and_then(|validation| validation.options.as_ref());
            match options {
                Some(options) => {
                    let values = options
                        .iter()
                        .map(|option| json_string(&option.value))
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("enumerationValidator([{values}])")
                }
                None => "stringValidator".to_string(),
            }
        }
        FieldModel::Datetime { .. } => "stringValidator".to_string(),
        FieldModel::Number { .. } => "numberValidator".to_string(),
        FieldModel::Boolean { .. } => "booleanValidator".to_string(),
        FieldModel::Object { fields, .. } => {
            let entries = fields
                .iter()
                .map(|field| {
                    format!(
                        "    {}: {},",
                        json_string(&field.name),
                        validator_expression(&field.model)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("recordValidator({{\n{entries}\n  }})")
        }
    }
}

pub(super) fn emit_module(models: &BTreeMap<String, ContentModel>) -> String {
    let entries = models
        .values()
        .map(|model| {
            format!(
                "  {}: {},",
                json_string(&model.name),
                validator_expression(&model.json)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("{HEADER}{RUNTIME}\nexport default {{\n{entries}\n}};\n")
}

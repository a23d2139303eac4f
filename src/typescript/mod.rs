//! TypeScript emission
//!
//! Three kinds of output, all deterministic: the shared `types.ts` module,
//! one source-string module per fragment, and one per operation.
use crate::cli::Message;
use crate::graphql::imports;
use crate::graphql::ir::{self, ResolvedContext, ARBITRARY_OBJECT_TYPE};
use crate::graphql::package::ImportBundle;
use crate::graphql::schema::{Schema, TypeDefinition};
use render::declaration;
use std::path::PathBuf;

mod fragment;
mod minify;
mod operation;
mod render;

const HEADER: &str = "/* eslint-disable */\n// This file was automatically generated and should not be edited.\n\n";

#[derive(Debug)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug)]
pub struct EmitOptions {
    pub js_suffix: bool,
}

/// TypeScript string literal with the escapes the emitter can produce.
fn ts_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{escaped}\"")
}

fn enum_declaration(name: &str, possible_values: &[String]) -> String {
    let values = possible_values
        .iter()
        .map(|value| format!("\"{value}\""))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("export type {name} = {values};")
}

fn meta_declaration(key: &str) -> String {
    format!(
        "export interface {key}Meta {{\n  result: {key};\n  variables: {key}Variables;\n  kind: \"graphql-operation\";\n}}"
    )
}

fn types_module(
    schema: &Schema,
    context: &ResolvedContext,
    bundle: &ImportBundle,
    options: &EmitOptions,
) -> Result<GeneratedFile, Message> {
    let suffix = if options.js_suffix { ".js" } else { "" };
    let mut import_lines = Vec::new();
    if !bundle.embed {
        for loaded in &bundle.loaded {
            let base = imports::map_emitted_path(&loaded.source_path, &bundle.prefix_map);
            import_lines.push(format!(
                "import type {{ {}Fragment }} from \"{base}/types{suffix}\";",
                loaded.name
            ));
        }
    }

    let mut sections = Vec::new();
    sections.push(format!("export type {ARBITRARY_OBJECT_TYPE} = any;"));

    for name in &context.used_named_types {
        let schema_type = schema
            .get_type_for_name(name)
            .ok_or_else(|| Message::new_program_error(&format!("failed lookup of type `{name}`")))?;
        match &schema_type.definition {
            TypeDefinition::Enum(enum_type) => {
                sections.push(enum_declaration(name, &enum_type.possible_values));
            }
            TypeDefinition::InputObject(input_object_type) => {
                sections.push(declaration(
                    name,
                    &ir::input_object_type(input_object_type),
                    true,
                ));
            }
            _ => {
                return Err(Message::new_program_error(&format!(
                    "type `{name}` is not an enum or input object"
                )))
            }
        }
    }

    for (name, fragment) in &context.fragments {
        sections.push(declaration(
            &ir::fragment_type_name(name),
            &fragment.type_ir,
            false,
        ));
    }

    for (key, operation) in &context.operations {
        sections.push(declaration(key, &operation.result, false));
        sections.push(declaration(
            &format!("{key}Variables"),
            &operation.variables,
            true,
        ));
        sections.push(meta_declaration(key));
    }

    let mut contents = String::from(HEADER);
    if !import_lines.is_empty() {
        contents.push_str(&import_lines.join("\n"));
        contents.push_str("\n\n");
    }
    contents.push_str(&sections.join("\n\n"));
    contents.push('\n');
    Ok(GeneratedFile {
        path: PathBuf::from("types.ts"),
        contents,
    })
}

pub fn emit(
    schema: &Schema,
    context: &ResolvedContext,
    bundle: &ImportBundle,
    options: &EmitOptions,
) -> Result<Vec<GeneratedFile>, Vec<Message>> {
    let mut files = Vec::with_capacity(1 + context.fragments.len() + context.operations.len());
    files.push(types_module(schema, context, bundle, options).map_err(|message| vec![message])?);
    for (name, fragment_record) in &context.fragments {
        files.push(fragment::emit_fragment_file(name, fragment_record));
    }
    let mut messages = Vec::new();
    for (key, operation_record) in &context.operations {
        match operation::emit_operation_file(key, operation_record, context, bundle, options) {
            Ok(file) => files.push(file),
            Err(operation::Error::UnknownDependency(name)) => {
                messages.push(Message::new_program_error(&format!(
                    "operation `{key}` depends on unknown fragment `{name}`"
                )));
            }
        }
    }
    if messages.is_empty() {
        Ok(files)
    } else {
        Err(messages)
    }
}

//! The `graphql` subcommand pipeline
use crate::cli::{GraphqlConfig, Message};
use crate::output::OutputCoordinator;
use crate::typescript::{self, EmitOptions};

pub mod document;
pub mod imports;
pub mod ir;
pub mod package;
pub mod schema;
mod validate;

/// Loads the schema and every local document, resolves imports and types,
/// emits TypeScript, and reconciles the target directory.
pub fn run(config: &GraphqlConfig) -> Vec<Message> {
    let schema = match schema::remote::load_schema(&config.schema_location, config.token.as_deref())
    {
        Ok(schema) => schema,
        Err(message) => return vec![message],
    };

    let document_set = match document::load_directory(&config.root_dir) {
        Ok(document_set) => document_set,
        Err(messages) => return messages,
    };

    let validation_errors = validate::run_rules(
        &schema,
        &document_set,
        config.allow_unused_fragments,
    );
    if !validation_errors.is_empty() {
        return validation_errors
            .into_iter()
            .map(|error| {
                let path = &document_set.source(error.source_index).path;
                Message::new_error_at(&error.message, path, error.position.line)
            })
            .collect();
    }

    let include_rules = imports::parse_include_rules(&config.includes);
    let bundle = match package::resolve_imports(
        &schema,
        &document_set.imports,
        &include_rules,
        config.embed_imports,
    ) {
        Ok(bundle) => bundle,
        Err(messages) => return messages,
    };

    let (context, warnings) = match ir::resolve_document(&schema, &document_set, &bundle) {
        Ok(resolved) => resolved,
        Err(errors) => {
            return errors
                .into_iter()
                .map(|error| error.into_message(&document_set))
                .collect()
        }
    };
    let mut messages: Vec<Message> = warnings
        .into_iter()
        .map(|warning| warning.into_message(&document_set))
        .collect();

    let options = EmitOptions {
        js_suffix: config.js_suffix,
    };
    let files = match typescript::emit(&schema, &context, &bundle, &options) {
        Ok(files) => files,
        Err(mut emit_messages) => {
            messages.append(&mut emit_messages);
            return messages;
        }
    };

    let mut coordinator = match OutputCoordinator::new(&config.root_dir, config.quiet) {
        Ok(coordinator) => coordinator,
        Err(message) => {
            messages.push(message);
            return messages;
        }
    };
    for file in &files {
        if let Err(message) = coordinator.write(&file.path, &file.contents) {
            messages.push(message);
        }
    }
    messages.extend(coordinator.finish());
    messages
}

//! Cross-package fragment imports
//!
//! Each import path names a directory of `.graphql` fragment files. The
//! directory is loaded and resolved as its own document with no imports of
//! its own; the resulting context is either referenced externally by the
//! emitter or, in embed mode, pruned to the requested fragments and merged
//! into the primary document.
use super::document::{DocumentSet, LoadedDefinition, Source};
use super::imports::{self, ImportDirective, ImportSelection, IncludeRule};
use super::ir::{self, Fragment, ResolvedContext};
use super::schema::Schema;
use crate::cli::Message;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug)]
pub struct LoadedImport {
    pub name: String,
    pub source_path: String,
}

#[derive(Debug, Default)]
pub struct ImportBundle {
    /// One record per imported fragment, sorted by fragment name.
    pub loaded: Vec<LoadedImport>,
    by_name: BTreeMap<String, String>,
    pub packages: BTreeMap<String, ResolvedContext>,
    pub prefix_map: BTreeMap<String, String>,
    pub embed: bool,
}

impl ImportBundle {
    pub fn empty() -> Self {
        ImportBundle::default()
    }

    pub fn lookup(&self, fragment_name: &str) -> Option<(&str, &Fragment)> {
        let path = self.by_name.get(fragment_name)?;
        let fragment = self.packages.get(path)?.fragments.get(fragment_name)?;
        Some((path, fragment))
    }

    pub fn package(&self, path: &str) -> Option<&ResolvedContext> {
        self.packages.get(path)
    }

    pub fn fragment_names(&self) -> impl Iterator<Item = String> + '_ {
        self.by_name.keys().cloned()
    }
}

#[derive(Debug, Default)]
struct PathRequest {
    all: bool,
    names: BTreeSet<String>,
}

fn collect_requests(directives: &[ImportDirective]) -> Vec<(String, PathRequest)> {
    let mut order: Vec<String> = Vec::new();
    let mut requests: BTreeMap<String, PathRequest> = BTreeMap::new();
    for directive in directives {
        if !requests.contains_key(&directive.from) {
            order.push(directive.from.clone());
        }
        let request = requests.entry(directive.from.clone()).or_default();
        match &directive.selection {
            ImportSelection::All => request.all = true,
            ImportSelection::Named(names) => request.names.extend(names.iter().cloned()),
        }
    }
    order
        .into_iter()
        .filter_map(|path| requests.remove(&path).map(|request| (path, request)))
        .collect()
}

fn load_package_document(
    import_path: &str,
    directory: &Path,
) -> Result<DocumentSet, Vec<Message>> {
    let files = super::document::find_graphql_files(directory).map_err(|message| vec![message])?;
    if files.is_empty() {
        return Err(vec![Message::new_error(&format!(
            "import `{import_path}` resolves to `{}`, which contains no .graphql files",
            directory.display()
        ))]);
    }
    let mut document_set = DocumentSet::default();
    let mut messages = Vec::new();
    for path in files {
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) => {
                messages.push(Message::new_read_io_error(&error, &path));
                continue;
            }
        };
        if !imports::scan(&contents).is_empty() {
            messages.push(Message::new_error(&format!(
                "nested imports are not supported: `{}` (imported via `{import_path}`) has import directives",
                path.display()
            )));
            continue;
        }
        let source_index = document_set.sources.len();
        match super::document::parse_contents(&contents) {
            Ok(definitions) => {
                document_set
                    .definitions
                    .extend(definitions.into_iter().map(|definition| LoadedDefinition {
                        source_index,
                        definition,
                    }));
            }
            Err(error) => {
                messages.push(Message::new_error(&format!(
                    "could not parse `{}`: {error}",
                    path.display()
                )));
            }
        }
        document_set.sources.push(Source { path, contents });
    }
    if messages.is_empty() {
        Ok(document_set)
    } else {
        Err(messages)
    }
}

/// Keeps only the requested fragments and their transitive dependencies,
/// recomputing the context's named-type set from what survives.
fn prune_context(
    schema: &Schema,
    context: &mut ResolvedContext,
    request: &PathRequest,
) -> Result<(), ir::Error> {
    if request.all {
        return Ok(());
    }
    let mut keep: BTreeSet<String> = BTreeSet::new();
    let mut pending: Vec<String> = request.names.iter().cloned().collect();
    while let Some(name) = pending.pop() {
        if !keep.insert(name.clone()) {
            continue;
        }
        if let Some(dependencies) = context.fragment_dependencies.get(&name) {
            pending.extend(dependencies.iter().cloned());
        }
    }
    context.fragments.retain(|name, _| keep.contains(name));
    context
        .fragment_dependencies
        .retain(|name, _| keep.contains(name));
    let mut named_types = BTreeSet::new();
    for fragment in context.fragments.values() {
        named_types.extend(fragment.named_types.iter().cloned());
    }
    context.used_named_types = ir::close_named_types(schema, &named_types)?;
    Ok(())
}

pub fn resolve_imports(
    schema: &Schema,
    directives: &[ImportDirective],
    rules: &[IncludeRule],
    embed: bool,
) -> Result<ImportBundle, Vec<Message>> {
    let mut bundle = ImportBundle {
        embed,
        prefix_map: imports::prefix_map(rules),
        ..ImportBundle::default()
    };
    let mut messages = Vec::new();
    let requests = collect_requests(directives);
    for (import_path, request) in &requests {
        let directory = imports::resolve_import_directory(import_path, rules);
        let document_set = match load_package_document(import_path, &directory) {
            Ok(document_set) => document_set,
            Err(errors) => {
                messages.extend(errors);
                continue;
            }
        };
        let mut context = match ir::resolve_document(schema, &document_set, &ImportBundle::empty())
        {
            Ok((context, _)) => context,
            Err(errors) => {
                messages.extend(
                    errors
                        .into_iter()
                        .map(|error| error.into_message(&document_set)),
                );
                continue;
            }
        };

        // Every explicitly requested name must exist in the package.
        let mut request_ok = true;
        for name in &request.names {
            if !context.fragments.contains_key(name) {
                messages.push(Message::new_error(&format!(
                    "fragment `{name}` is not defined under import `{import_path}`"
                )));
                request_ok = false;
            }
        }
        if !request_ok {
            continue;
        }

        if embed {
            if let Err(error) = prune_context(schema, &mut context, request) {
                let positioned = ir::PositionedError {
                    source_index: 0,
                    error,
                };
                messages.push(positioned.into_message(&document_set));
                continue;
            }
        }

        let requested_names: Vec<String> = if request.all {
            context.fragments.keys().cloned().collect()
        } else {
            request.names.iter().cloned().collect()
        };
        for name in requested_names {
            match bundle.by_name.get(&name) {
                Some(previous_path) if previous_path != import_path => {
                    messages.push(Message::new_error(&format!(
                        "fragment `{name}` is imported from both `{previous_path}` and `{import_path}`"
                    )));
                }
                Some(_) => {}
                None => {
                    bundle.by_name.insert(name.clone(), import_path.clone());
                    bundle.loaded.push(LoadedImport {
                        name,
                        source_path: import_path.clone(),
                    });
                }
            }
        }
        bundle.packages.insert(import_path.clone(), context);
    }
    if !messages.is_empty() {
        return Err(messages);
    }
    bundle.loaded.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(bundle)
}

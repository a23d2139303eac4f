//! Per-operation source string modules
use super::minify::minified_definition;
use super::{ts_string, EmitOptions, GeneratedFile, HEADER};
use crate::graphql::imports;
use crate::graphql::ir::{Operation, ResolvedContext};
use crate::graphql::package::ImportBundle;
use graphql_parser::query as parsed_query;
use std::collections::BTreeSet;
use std::path::PathBuf;

const LOCAL_ORIGIN: &str = "..";

#[derive(Debug)]
pub(super) enum Error {
    UnknownDependency(String),
}

/// The transitive set of fragments an operation concatenates, as sorted
/// `(origin path, fragment name)` pairs. Local fragments originate at `..`;
/// dependencies of a foreign fragment resolve inside its own package, so
/// package-internal fragments are pulled in even when never imported by name.
fn dependency_closure(
    operation: &Operation,
    context: &ResolvedContext,
    bundle: &ImportBundle,
) -> Result<BTreeSet<(String, String)>, Error> {
    let mut closure = BTreeSet::new();
    let mut pending: Vec<(Option<String>, String)> = operation
        .dependencies
        .iter()
        .map(|name| (None, name.clone()))
        .collect();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    while let Some((package_hint, name)) = pending.pop() {
        if !seen.insert(name.clone()) {
            continue;
        }
        if package_hint.is_none() && context.fragments.contains_key(&name) {
            if let Some(dependencies) = context.fragment_dependencies.get(&name) {
                pending.extend(
                    dependencies
                        .iter()
                        .map(|dependency| (None, dependency.clone())),
                );
            }
            closure.insert((LOCAL_ORIGIN.to_string(), name));
            continue;
        }
        let path = match &package_hint {
            Some(path) => path.clone(),
            None => match bundle.lookup(&name) {
                Some((path, _)) => path.to_string(),
                None => return Err(Error::UnknownDependency(name)),
            },
        };
        let Some(fragment) = bundle
            .package(&path)
            .and_then(|package| package.fragments.get(&name))
        else {
            return Err(Error::UnknownDependency(name));
        };
        pending.extend(
            fragment
                .dependencies
                .iter()
                .map(|dependency| (Some(path.clone()), dependency.clone())),
        );
        closure.insert((path, name));
    }
    Ok(closure)
}

pub(super) fn emit_operation_file(
    key: &str,
    operation: &Operation,
    context: &ResolvedContext,
    bundle: &ImportBundle,
    options: &EmitOptions,
) -> Result<GeneratedFile, Error> {
    let suffix = if options.js_suffix { ".js" } else { "" };
    let closure = dependency_closure(operation, context, bundle)?;

    let mut lines = Vec::with_capacity(closure.len() + 1);
    for (origin, name) in &closure {
        let base = if origin == LOCAL_ORIGIN {
            LOCAL_ORIGIN.to_string()
        } else {
            imports::map_emitted_path(origin, &bundle.prefix_map)
        };
        lines.push(format!(
            "import {name} from \"{base}/fragments/{name}{suffix}\";"
        ));
    }
    lines.push(format!(
        "import type {{ {key}Meta }} from \"../types{suffix}\";"
    ));

    let minified =
        minified_definition(parsed_query::Definition::Operation(operation.node.clone()));
    let mut parts: Vec<String> = closure.iter().map(|(_, name)| name.clone()).collect();
    parts.push(ts_string(&format!("{minified}\n")));
    let contents = format!(
        "{HEADER}{}\n\nexport default ({}) as unknown as {key}Meta;\n",
        lines.join("\n"),
        parts.join(" + ")
    );
    Ok(GeneratedFile {
        path: PathBuf::from("operations").join(format!("{key}.ts")),
        contents,
    })
}

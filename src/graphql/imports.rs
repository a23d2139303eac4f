//! Import directives and include rules
//!
//! Import directives are scanned out of the raw file body before GraphQL
//! parsing. Two forms exist: `import * from "path"` and
//! `import { A, B } from "path"`. Anything that does not match is left for
//! the GraphQL parser to accept or reject.
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;

static STAR_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s*\*\s*from\s*"([^"]+)""#).unwrap());
static NAMED_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s*\{([A-Za-z0-9_\s,]*)\}\s*from\s*"([^"]+)""#).unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSelection {
    All,
    Named(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDirective {
    pub from: String,
    pub selection: ImportSelection,
}

/// Scans raw GraphQL source text for import directives, in source order.
pub fn scan(contents: &str) -> Vec<ImportDirective> {
    let mut found: Vec<(usize, ImportDirective)> = Vec::new();
    for capture in STAR_IMPORT.captures_iter(contents) {
        let whole = capture.get(0).map(|m| m.start()).unwrap_or_default();
        found.push((
            whole,
            ImportDirective {
                from: capture[1].to_string(),
                selection: ImportSelection::All,
            },
        ));
    }
    for capture in NAMED_IMPORT.captures_iter(contents) {
        let names: Vec<String> = capture[1]
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            continue;
        }
        let whole = capture.get(0).map(|m| m.start()).unwrap_or_default();
        found.push((
            whole,
            ImportDirective {
                from: capture[2].to_string(),
                selection: ImportSelection::Named(names),
            },
        ));
    }
    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, directive)| directive).collect()
}

/// An `-I NAME=DIR=PREFIX` rule. `@NAME` in an import path maps to `DIR` on
/// the filesystem and to `PREFIX` in emitted import paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeRule {
    pub key: String,
    pub directory: PathBuf,
    pub prefix: String,
}

/// Parses raw `-I` values. Malformed rules are silently skipped.
pub fn parse_include_rules(raw_rules: &[String]) -> Vec<IncludeRule> {
    raw_rules
        .iter()
        .filter_map(|raw| {
            let mut parts = raw.splitn(3, '=');
            let name = parts.next().filter(|part| !part.is_empty())?;
            let directory = parts.next().filter(|part| !part.is_empty())?;
            let prefix = parts.next().filter(|part| !part.is_empty())?;
            Some(IncludeRule {
                key: format!("@{name}"),
                directory: PathBuf::from(directory),
                prefix: prefix.to_string(),
            })
        })
        .collect()
}

/// Substitutes the `@NAME` abbreviation in an import path to get the
/// directory holding its `.graphql` files.
pub fn resolve_import_directory(path: &str, rules: &[IncludeRule]) -> PathBuf {
    for rule in rules {
        if let Some(rest) = path.strip_prefix(rule.key.as_str()) {
            let mut directory = rule.directory.clone();
            directory.push(rest.trim_start_matches('/'));
            return directory;
        }
    }
    PathBuf::from(path)
}

/// `@NAME` to emitted-prefix mapping used by the emitter.
pub fn prefix_map(rules: &[IncludeRule]) -> BTreeMap<String, String> {
    rules
        .iter()
        .map(|rule| (rule.key.clone(), rule.prefix.clone()))
        .collect()
}

/// Rewrites an import path for emission by replacing its `@NAME`
/// abbreviation with the configured prefix.
pub fn map_emitted_path(path: &str, prefixes: &BTreeMap<String, String>) -> String {
    for (key, prefix) in prefixes {
        if let Some(rest) = path.strip_prefix(key.as_str()) {
            return format!("{prefix}{rest}");
        }
    }
    path.to_string()
}

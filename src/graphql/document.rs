//! Loading and parsing `.graphql` source files
use super::imports::{self, ImportDirective};
use crate::cli::Message;
use graphql_parser::query as parsed_query;
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

pub type AstText = String;
pub type Definition = parsed_query::Definition<'static, AstText>;

#[derive(Debug)]
pub struct Source {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug)]
pub struct LoadedDefinition {
    pub source_index: usize,
    pub definition: Definition,
}

/// All local sources concatenated into a single logical document, with each
/// definition tracked back to the file it came from.
#[derive(Debug, Default)]
pub struct DocumentSet {
    pub sources: Vec<Source>,
    pub definitions: Vec<LoadedDefinition>,
    pub imports: Vec<ImportDirective>,
}

impl DocumentSet {
    pub fn source(&self, index: usize) -> &Source {
        &self.sources[index]
    }
}

fn read_graphql_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut buf_reader = BufReader::new(file);
    let mut contents = String::new();
    buf_reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Recursively collects `.graphql` files under `root`, sorted for
/// deterministic processing order.
pub fn find_graphql_files(root: &Path) -> Result<Vec<PathBuf>, Message> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_owned()];
    while let Some(directory) = pending.pop() {
        let entries =
            fs::read_dir(&directory).map_err(|error| Message::new_read_io_error(&error, &directory))?;
        for entry in entries {
            let path = entry
                .map_err(|error| Message::new_read_io_error(&error, &directory))?
                .path();
            if path.is_dir() {
                pending.push(path);
            } else if path.is_file() && path.extension().map_or(false, |ext| ext == "graphql") {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

pub fn parse_contents(
    contents: &str,
) -> Result<Vec<Definition>, parsed_query::ParseError> {
    let document = parsed_query::parse_query::<AstText>(contents)?.into_static();
    Ok(document.definitions)
}

/// Loads every `.graphql` file under `root` into one concatenated document.
pub fn load_directory(root: &Path) -> Result<DocumentSet, Vec<Message>> {
    let files = find_graphql_files(root).map_err(|message| vec![message])?;
    if files.is_empty() {
        return Err(vec![Message::new_error(&format!(
            "no .graphql files found under `{}`",
            root.display()
        ))]);
    }
    let mut document_set = DocumentSet::default();
    let mut messages = Vec::new();
    for path in files {
        let contents = match read_graphql_file(&path) {
            Ok(contents) => contents,
            Err(error) => {
                messages.push(Message::new_read_io_error(&error, &path));
                continue;
            }
        };
        document_set.imports.extend(imports::scan(&contents));
        let source_index = document_set.sources.len();
        match parse_contents(&contents) {
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

//! Per-fragment source string modules
use super::minify::minified_definition;
use super::{ts_string, GeneratedFile, HEADER};
use crate::graphql::ir::Fragment;
use graphql_parser::query as parsed_query;
use std::path::PathBuf;

/// A fragment file default-exports its minified GraphQL source, terminated
/// by a newline so concatenated operation documents stay well formed.
pub(super) fn emit_fragment_file(name: &str, fragment: &Fragment) -> GeneratedFile {
    let minified = minified_definition(parsed_query::Definition::Fragment(fragment.node.clone()));
    let contents = format!(
        "{HEADER}export default {};\n",
        ts_string(&format!("{minified}\n"))
    );
    GeneratedFile {
        path: PathBuf::from("fragments").join(format!("{name}.ts")),
        contents,
    }
}

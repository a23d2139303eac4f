//! GraphQL source minification
//!
//! Strips comments and ignorable whitespace from a formatted GraphQL
//! document. A single space survives only between two adjacent word tokens;
//! commas and all other punctuation pass through untouched, as do string
//! literals.

use crate::graphql::document::AstText;
use graphql_parser::query as parsed_query;

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Formats a single definition through the parser's printer, then minifies.
pub(super) fn minified_definition(definition: parsed_query::Definition<'static, AstText>) -> String {
    let document = parsed_query::Document {
        definitions: vec![definition],
    };
    minify(&document.to_string())
}

pub fn minify(source: &str) -> String {
    let mut output = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut pending_space = false;
    while let Some(c) = chars.next() {
        match c {
            '#' => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        break;
                    }
                }
            }
            '"' => {
                output.push('"');
                let mut escaped = false;
                for next in chars.by_ref() {
                    output.push(next);
                    if escaped {
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == '"' {
                        break;
                    }
                }
                pending_space = false;
            }
            c if c.is_whitespace() => {
                pending_space = true;
            }
            c => {
                // A space survives between two words, and before a spread
                // that follows a word (`1...F` would mislex as a float).
                if pending_space
                    && (is_word_char(c) || c == '.')
                    && output.chars().next_back().map_or(false, is_word_char)
                {
                    output.push(' ');
                }
                pending_space = false;
                output.push(c);
            }
        }
    }
    output
}

use clap::{crate_version, Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use std::fmt;
use std::path::{Path, PathBuf};

const DEFAULT_SCHEMA_URL: &str = "https://storefront.example.com/schema.graphql";
const DEFAULT_RELAY_URL: &str = "https://storefront.example.com/relay.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageLevel {
    Warning,
    Error,
    ProgramError,
}

/// A single diagnostic destined for the terminal, optionally pinned to a
/// `path:line` source location.
#[derive(Debug)]
pub struct Message {
    level: MessageLevel,
    message: String,
    location: Option<(PathBuf, usize)>,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = match self.level {
            MessageLevel::Warning => "warning".yellow(),
            MessageLevel::Error => "error".red(),
            MessageLevel::ProgramError => "program error".red(),
        };
        match &self.location {
            Some((path, line)) => write!(
                f,
                "{}{} {}:{}: {}",
                header.bold(),
                ":".bold(),
                path.display(),
                line,
                self.message
            ),
            None => write!(f, "{}{} {}", header.bold(), ":".bold(), self.message),
        }
    }
}

impl Message {
    pub fn new_error(message: &str) -> Self {
        Message {
            level: MessageLevel::Error,
            message: message.to_string(),
            location: None,
        }
    }

    pub fn new_error_at(message: &str, path: &Path, line: usize) -> Self {
        Message {
            level: MessageLevel::Error,
            message: message.to_string(),
            location: Some((path.to_owned(), line)),
        }
    }

    pub fn new_warning(message: &str) -> Self {
        Message {
            level: MessageLevel::Warning,
            message: message.to_string(),
            location: None,
        }
    }

    pub fn new_warning_at(message: &str, path: &Path, line: usize) -> Self {
        Message {
            level: MessageLevel::Warning,
            message: message.to_string(),
            location: Some((path.to_owned(), line)),
        }
    }

    pub fn new_program_error(message: &str) -> Self {
        Message {
            level: MessageLevel::ProgramError,
            message: message.to_string(),
            location: None,
        }
    }

    pub fn new_read_io_error(error: &std::io::Error, path: &Path) -> Self {
        Message::new_io_error("read", error, path)
    }

    pub fn new_write_io_error(error: &std::io::Error, path: &Path) -> Self {
        Message::new_io_error("write", error, path)
    }

    pub fn is_error(&self) -> bool {
        self.level != MessageLevel::Warning
    }

    fn new_io_error(operation_name: &str, error: &std::io::Error, path: &Path) -> Self {
        Message {
            level: MessageLevel::Error,
            message: format!(
                "could not {} `{}`: {}",
                operation_name,
                path.display(),
                error
            ),
            location: None,
        }
    }
}

pub fn similar_help_suggestions(
    comparison_name: &str,
    possible_names: impl Iterator<Item = String>,
) -> Option<String> {
    let similar_names: Vec<_> = possible_names
        .filter(|possible_name| strsim::damerau_levenshtein(comparison_name, possible_name) < 5)
        .collect();
    if similar_names.is_empty() {
        None
    } else {
        Some(format!(
            " Did you mean one of the following: `{}`?",
            similar_names.join("`, `")
        ))
    }
}

fn cli_parse() -> ArgMatches {
    Command::new("typegen")
        .version(crate_version!())
        .about("Compiles typed TypeScript modules from GraphQL documents and content model schemas.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("graphql")
                .about("Generate types and operation modules from a directory of .graphql files")
                .arg(
                    Arg::new("dir")
                        .value_name("DIR")
                        .required(true)
                        .help("Directory of .graphql sources; also the generation target"),
                )
                .arg(
                    Arg::new("include")
                        .short('I')
                        .long("include")
                        .value_name("NAME=DIR=PREFIX")
                        .action(ArgAction::Append)
                        .help("Include rule mapping @NAME imports to a directory and an emitted path prefix"),
                )
                .arg(
                    Arg::new("token")
                        .short('t')
                        .long("token")
                        .value_name("JWT")
                        .help("Bearer token for the introspection endpoint"),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .action(ArgAction::SetTrue)
                        .help("Suppress warnings and skip interactive prompts"),
                )
                .arg(
                    Arg::new("allow_unused_fragments")
                        .long("allow-unused-fragments")
                        .action(ArgAction::SetTrue)
                        .help("Do not fail when a fragment is never spread by an operation"),
                )
                .arg(
                    Arg::new("embed_imports")
                        .long("embed-imports")
                        .action(ArgAction::SetTrue)
                        .help("Inline imported fragments into the generated output instead of referencing them"),
                )
                .arg(
                    Arg::new("js_suffix")
                        .long("js-suffix")
                        .action(ArgAction::SetTrue)
                        .help("Append .js to emitted import paths"),
                )
                .arg(
                    Arg::new("schema")
                        .long("schema")
                        .value_name("PATH_OR_URL")
                        .default_value(DEFAULT_SCHEMA_URL)
                        .help("Schema location: HTTPS SDL, HTTPS introspection endpoint, or local file"),
                ),
        )
        .subcommand(
            Command::new("content-model")
                .about("Generate a runtime validator module from content model JSON schemas")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("FILE")
                        .action(ArgAction::Append)
                        .num_args(1..)
                        .required(true)
                        .help("Content model JSON schema files"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .required(true)
                        .help("Output path, or - for stdout"),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .action(ArgAction::SetTrue)
                        .help("Suppress warnings"),
                )
                .arg(
                    Arg::new("api")
                        .long("api")
                        .value_name("URL")
                        .default_value(DEFAULT_RELAY_URL)
                        .help("Relay endpoint supplying built-in content models"),
                ),
        )
        .get_matches()
}

#[derive(Debug)]
pub struct GraphqlConfig {
    pub root_dir: PathBuf,
    pub schema_location: String,
    pub token: Option<String>,
    pub includes: Vec<String>,
    pub quiet: bool,
    pub allow_unused_fragments: bool,
    pub embed_imports: bool,
    pub js_suffix: bool,
}

#[derive(Debug)]
pub struct ContentModelConfig {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub api_url: String,
    pub quiet: bool,
}

#[derive(Debug)]
pub enum RuntimeConfig {
    Graphql(GraphqlConfig),
    ContentModel(ContentModelConfig),
}

impl RuntimeConfig {
    pub fn from_cli() -> Self {
        let matches = cli_parse();
        match matches.subcommand() {
            Some(("graphql", sub)) => RuntimeConfig::Graphql(GraphqlConfig {
                root_dir: PathBuf::from(required_string(sub, "dir")),
                schema_location: required_string(sub, "schema"),
                token: sub.get_one::<String>("token").cloned(),
                includes: sub
                    .get_many::<String>("include")
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default(),
                quiet: sub.get_flag("quiet"),
                allow_unused_fragments: sub.get_flag("allow_unused_fragments"),
                embed_imports: sub.get_flag("embed_imports"),
                js_suffix: sub.get_flag("js_suffix"),
            }),
            Some(("content-model", sub)) => RuntimeConfig::ContentModel(ContentModelConfig {
                inputs: sub
                    .get_many::<String>("input")
                    .map(|values| values.map(PathBuf::from).collect())
                    .unwrap_or_default(),
                output: PathBuf::from(required_string(sub, "output")),
                api_url: required_string(sub, "api"),
                quiet: sub.get_flag("quiet"),
            }),
            _ => unreachable!("subcommand is required"),
        }
    }

    pub fn quiet(&self) -> bool {
        match self {
            RuntimeConfig::Graphql(config) => config.quiet,
            RuntimeConfig::ContentModel(config) => config.quiet,
        }
    }
}

fn required_string(matches: &ArgMatches, name: &str) -> String {
    matches.get_one::<String>(name).cloned().unwrap_or_default()
}

/// Prints collected diagnostics and exits nonzero when any of them is fatal.
pub fn print_exit_info(messages: &[Message], quiet: bool) {
    let mut warning_count = 0;
    let mut error_count = 0;
    for message in messages {
        if message.is_error() {
            error_count += 1;
        } else {
            warning_count += 1;
            if quiet {
                continue;
            }
        }
        println!("{message}");
    }
    if error_count > 0 {
        let plural = if error_count > 1 { "s" } else { "" };
        println!(
            "{}",
            Message::new_error(&format!("failure due to {error_count} error{plural}"))
        );
    }
    if warning_count > 0 && !quiet {
        let plural = if warning_count > 1 { "s" } else { "" };
        println!(
            "{}",
            Message::new_warning(&format!("{warning_count} warning{plural} emitted"))
        );
    }
    if error_count > 0 {
        std::process::exit(1);
    }
}

mod cli;
mod content_model;
mod graphql;
mod output;
mod typescript;

fn main() {
    let config = cli::RuntimeConfig::from_cli();
    let quiet = config.quiet();
    let messages = match &config {
        cli::RuntimeConfig::Graphql(graphql_config) => graphql::run(graphql_config),
        cli::RuntimeConfig::ContentModel(content_model_config) => {
            content_model::run(content_model_config)
        }
    };
    cli::print_exit_info(&messages, quiet);
}

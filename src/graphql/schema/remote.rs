//! Fetching the schema from disk or over HTTPS
use super::Schema;
use crate::cli::Message;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Introspection document sent to HTTPS endpoints. Descriptions and input
/// value deprecation are not requested.
const INTROSPECTION_QUERY: &str = "\
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types { ...FullType }
  }
}
fragment FullType on __Type {
  kind
  name
  fields(includeDeprecated: true) {
    name
    type { ...TypeRef }
    isDeprecated
  }
  inputFields {
    name
    type { ...TypeRef }
  }
  enumValues(includeDeprecated: true) { name }
}
fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType { kind name }
            }
          }
        }
      }
    }
  }
}";

#[derive(Debug)]
enum SchemaSource {
    SdlUrl(String),
    IntrospectionUrl(String),
    File(PathBuf),
}

fn classify(location: &str) -> SchemaSource {
    if location.starts_with("https://") {
        if location.ends_with(".graphql") {
            SchemaSource::SdlUrl(location.to_string())
        } else {
            SchemaSource::IntrospectionUrl(location.to_string())
        }
    } else {
        SchemaSource::File(PathBuf::from(location))
    }
}

#[derive(Deserialize)]
struct GraphqlErrorJson {
    message: String,
}

#[derive(Deserialize)]
struct ErrorProbeJson {
    errors: Option<Vec<GraphqlErrorJson>>,
}

fn http_client() -> Result<reqwest::blocking::Client, Message> {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|error| Message::new_error(&format!("could not build HTTP client: {error}")))
}

fn fetch_sdl(url: &str) -> Result<String, Message> {
    let response = http_client()?
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(|error| Message::new_error(&format!("schema download failed: {error}")))?;
    let bytes = response
        .bytes()
        .map_err(|error| Message::new_error(&format!("schema download failed: {error}")))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|error| Message::new_error(&format!("schema is not valid UTF-8: {error}")))
}

fn fetch_introspection(url: &str, token: Option<&str>) -> Result<String, Message> {
    let mut request = http_client()?
        .post(url)
        .json(&serde_json::json!({ "query": INTROSPECTION_QUERY }));
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    let body = request
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(|error| Message::new_error(&format!("schema introspection failed: {error}")))?;
    if let Ok(probe) = serde_json::from_str::<ErrorProbeJson>(&body) {
        if let Some(errors) = probe.errors {
            if !errors.is_empty() {
                let details: Vec<_> = errors.into_iter().map(|error| error.message).collect();
                return Err(Message::new_error(&format!(
                    "schema introspection returned errors: {}",
                    details.join("; ")
                )));
            }
        }
    }
    Ok(body)
}

fn is_sdl_file(path: &Path) -> bool {
    path.extension()
        .map_or(false, |extension| extension == "graphql" || extension == "gql")
}

pub fn load_schema(location: &str, token: Option<&str>) -> Result<Schema, Message> {
    match classify(location) {
        SchemaSource::SdlUrl(url) => {
            let sdl = fetch_sdl(&url)?;
            Schema::from_sdl(&sdl).map_err(|error| Message::new_error(&error.to_string()))
        }
        SchemaSource::IntrospectionUrl(url) => {
            let body = fetch_introspection(&url, token)?;
            Schema::from_introspection(&body)
                .map_err(|error| Message::new_error(&error.to_string()))
        }
        SchemaSource::File(path) => {
            let contents = std::fs::read_to_string(&path)
                .map_err(|error| Message::new_read_io_error(&error, &path))?;
            let result = if is_sdl_file(&path) {
                Schema::from_sdl(&contents)
            } else {
                Schema::from_introspection(&contents)
            };
            result.map_err(|error| {
                Message::new_error(&format!("in `{}`: {error}", path.display()))
            })
        }
    }
}

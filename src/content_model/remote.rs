//! Built-in content models from the relay endpoint
use super::ContentModel;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONTENT_MODELS_URL: &str = "info/content_models.json";

#[derive(Deserialize)]
struct BatchEnvelope {
    response: Vec<ContentModel>,
}

fn try_fetch(api_url: &str) -> Result<Vec<ContentModel>, Box<dyn std::error::Error>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    let body = serde_json::json!([{ "method": "GET", "url": CONTENT_MODELS_URL }]);
    let envelopes: Vec<BatchEnvelope> = client
        .post(api_url)
        .json(&body)
        .send()?
        .error_for_status()?
        .json()?;
    Ok(envelopes
        .into_iter()
        .next()
        .map(|envelope| envelope.response)
        .unwrap_or_default())
}

/// Fetch failures are tolerated: built-ins are a convenience, not a
/// requirement, and the generator must work offline.
pub(super) fn fetch_builtin_models(api_url: &str) -> Vec<ContentModel> {
    try_fetch(api_url).unwrap_or_default()
}

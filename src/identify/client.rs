use std::time::Duration;

use base64::Engine;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::{IdentifyError, IdentifyOutcome, PlantIdentifier};

pub const DEFAULT_PLANT_ID_URL: &str = "https://api.plant.id/v2/identify";

/// Detail fields requested for every suggestion.
pub const PLANT_DETAILS: [&str; 5] = [
    "common_names",
    "description",
    "edible_parts",
    "toxicity",
    "wiki_description",
];

#[derive(Debug, Clone)]
pub struct IdentifyConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub language: String,
    pub timeout: Duration,
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        IdentifyConfig {
            url: DEFAULT_PLANT_ID_URL.to_owned(),
            api_key: None,
            language: "en".to_owned(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize)]
struct IdentifyRequest<'a> {
    images: Vec<String>,
    plant_language: &'a str,
    plant_details: &'a [&'a str],
}

/// Blocking client for plant.id-style APIs.
pub struct PlantIdClient {
    config: IdentifyConfig,
    client: Client,
}

impl PlantIdClient {
    pub fn new(config: IdentifyConfig) -> Result<Self, IdentifyError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(PlantIdClient { config, client })
    }

    pub fn config(&self) -> &IdentifyConfig {
        &self.config
    }

    fn send(&self, image_bytes: &[u8]) -> Result<IdentifyOutcome, reqwest::Error> {
        let body = IdentifyRequest {
            images: vec![base64::engine::general_purpose::STANDARD.encode(image_bytes)],
            plant_language: &self.config.language,
            plant_details: &PLANT_DETAILS,
        };

        let mut request = self.client.post(&self.config.url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.header("Api-Key", key);
        }

        let response = request.send()?;
        if response.status() != StatusCode::OK {
            return Ok(IdentifyOutcome::Status(response.status().as_u16()));
        }

        let payload: Value = response.json()?;
        Ok(classify_payload(payload))
    }
}

impl PlantIdentifier for PlantIdClient {
    fn identify(&self, image_bytes: &[u8]) -> IdentifyOutcome {
        let outcome = match self.send(image_bytes) {
            Ok(outcome) => outcome,
            Err(e) if e.is_timeout() => IdentifyOutcome::Timeout,
            Err(e) => IdentifyOutcome::Transport(e.to_string()),
        };
        match &outcome {
            IdentifyOutcome::Suggestions(_) => info!(url = %self.config.url, "identification succeeded"),
            other => warn!(url = %self.config.url, outcome = ?other, "identification unsuccessful"),
        }
        outcome
    }
}

/// Splits a 200 response into suggestions / no suggestions.
pub(crate) fn classify_payload(payload: Value) -> IdentifyOutcome {
    match payload {
        Value::Object(map) if map.get("suggestions").is_some_and(is_truthy) => {
            IdentifyOutcome::Suggestions(map)
        }
        _ => IdentifyOutcome::NoSuggestions,
    }
}

/// JSON "truthiness": null, false, 0, "" and empty containers are empty.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

//! Client for the third-party plant identification API.

pub mod client;

pub use client::{IdentifyConfig, PlantIdClient, DEFAULT_PLANT_ID_URL, PLANT_DETAILS};

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentifyError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// How one identification call ended.  The client never retries.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentifyOutcome {
    /// 200 with a non-empty `suggestions` field; carries the whole JSON object.
    Suggestions(Map<String, Value>),
    /// 200 but `suggestions` missing or empty.
    NoSuggestions,
    /// Any status other than 200.
    Status(u16),
    Timeout,
    /// Connection, TLS or body decoding failure.
    Transport(String),
}

/// Something that can identify a plant photo.  Implemented by the HTTP
/// client; tests substitute their own.
pub trait PlantIdentifier: Send + Sync {
    fn identify(&self, image_bytes: &[u8]) -> IdentifyOutcome;
}

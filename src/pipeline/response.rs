//! JSON bodies returned by the service.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::classifier::Decision;

pub const NOT_A_PLANT_ERROR: &str =
    "The image may not contain a clear plant, or the model did not recognise the species.";
pub const NOT_A_PLANT_SUGGESTION: &str = "Try a closer photo of the leaves or flowers.";
pub const NO_SUGGESTIONS_ERROR: &str = "The identification service returned no suggestions for this image.";
pub const TIMEOUT_ERROR: &str = "Timed out waiting for the plant identification API";
pub const TEST_LOCAL_MESSAGE: &str = "Local classifier test (no external API call)";

/// Key under which the local analysis is attached to a successful API reply.
pub const ANALYSIS_KEY: &str = "efficientnet_analysis";

pub fn status_error(status: u16) -> String {
    format!("Plant identification API error: {status}")
}

pub fn transport_error(message: &str) -> String {
    format!("Failed to communicate with the plant identification API: {message}")
}

/// Local classification plus caption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CnnInfo {
    pub label: String,
    pub confidence: f64,
    pub is_plant: bool,
    pub visual_analysis: String,
}

impl CnnInfo {
    pub fn new(decision: Decision, visual_analysis: String) -> Self {
        CnnInfo {
            label: decision.label,
            confidence: decision.confidence,
            is_plant: decision.is_plant,
            visual_analysis,
        }
    }
}

/// Local analysis, optionally annotated with why no identification followed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub cnn_info: CnnInfo,
}

impl BaseResponse {
    pub fn new(cnn_info: CnnInfo) -> Self {
        BaseResponse { error: None, suggestion: None, cnn_info }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Input error reported before any analysis ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IdentifyResponse {
    /// The external API's reply with `efficientnet_analysis` added.
    Identified(Map<String, Value>),
    Analysis(BaseResponse),
    Rejected(ErrorResponse),
}

impl IdentifyResponse {
    pub fn rejected(error: impl ToString) -> Self {
        IdentifyResponse::Rejected(ErrorResponse { error: error.to_string() })
    }

    /// Merges the local analysis into the API reply.
    pub fn identified(mut api_reply: Map<String, Value>, cnn_info: &CnnInfo) -> Self {
        let analysis = serde_json::to_value(cnn_info).unwrap_or(Value::Null);
        api_reply.insert(ANALYSIS_KEY.to_owned(), analysis);
        IdentifyResponse::Identified(api_reply)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            IdentifyResponse::Identified(_) => None,
            IdentifyResponse::Analysis(base) => base.error.as_deref(),
            IdentifyResponse::Rejected(e) => Some(&e.error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestLocalResponse {
    pub is_plant: bool,
    pub detected_as: String,
    pub confidence: f64,
    pub confidence_percent: String,
    pub visual_analysis: Vec<String>,
    pub message: String,
}

impl TestLocalResponse {
    pub fn new(decision: Decision, visual_analysis: Vec<String>) -> Self {
        TestLocalResponse {
            confidence_percent: format!("{:.1}%", decision.confidence * 100.0),
            is_plant: decision.is_plant,
            detected_as: decision.label,
            confidence: decision.confidence,
            visual_analysis,
            message: TEST_LOCAL_MESSAGE.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfoResponse {
    pub model: String,
    pub input_size: String,
    pub pretrained_on: String,
    pub output_classes: usize,
    pub plant_categories: usize,
    pub plant_keywords: usize,
    pub top_k: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn info() -> CnnInfo {
        CnnInfo {
            label: "daisy".into(),
            confidence: 0.5,
            is_plant: true,
            visual_analysis: "Low contrast".into(),
        }
    }

    #[test]
    fn base_response_omits_unset_fields() {
        let v = serde_json::to_value(BaseResponse::new(info())).unwrap();
        assert!(v.get("error").is_none());
        assert!(v.get("suggestion").is_none());
        assert_eq!(v["cnn_info"]["label"], "daisy");
    }

    #[test]
    fn identified_carries_api_fields_and_analysis() {
        let api = json!({"id": 1, "suggestions": [{"plant_name": "Bellis perennis"}]});
        let resp = IdentifyResponse::identified(api.as_object().unwrap().clone(), &info());
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["id"], 1);
        assert_eq!(v["suggestions"][0]["plant_name"], "Bellis perennis");
        assert_eq!(v[ANALYSIS_KEY]["is_plant"], true);
        assert_eq!(resp.error(), None);
    }

    #[test]
    fn percent_has_one_decimal() {
        let d = Decision { is_plant: true, label: "sunflower".into(), confidence: 0.82 };
        assert_eq!(TestLocalResponse::new(d, vec![]).confidence_percent, "82.0%");
    }

    #[test]
    fn status_error_includes_code() {
        assert_eq!(status_error(503), "Plant identification API error: 503");
    }
}

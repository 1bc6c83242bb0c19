use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::model::{ImageModel, ModelDescriptor};
use super::topk::ClassificationResult;
use super::ClassifyError;
use crate::vocabulary::PlantVocabulary;

/// Label reported when the model returns no classes at all.
pub const NO_CLASS_LABEL: &str = "No class identified";

/// Number of ranked labels inspected for a plant match.
pub const DEFAULT_TOP_K: usize = 10;

/// Plant / non-plant judgment with the label and confidence behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub is_plant: bool,
    pub label: String,
    pub confidence: f64,
}

impl Decision {
    /// Non-plant decision carrying the failure text as its label.
    pub fn failed(err: &ClassifyError) -> Self {
        Decision { is_plant: false, label: format!("Error: {err}"), confidence: 0.0 }
    }
}

/// Scans `result` in rank order and returns the first label the vocabulary
/// accepts.  Without a match the top-ranked entry is reported as non-plant.
pub fn decide(result: &ClassificationResult, vocabulary: &PlantVocabulary) -> Decision {
    if let Some(hit) = result.iter().find(|p| vocabulary.is_plant_category(&p.label)) {
        return Decision { is_plant: true, label: hit.label.clone(), confidence: hit.probability };
    }
    match result.top() {
        Some(top) => Decision { is_plant: false, label: top.label.clone(), confidence: top.probability },
        None => Decision { is_plant: false, label: NO_CLASS_LABEL.to_owned(), confidence: 0.0 },
    }
}

/// Wraps an `ImageModel` and the plant vocabulary.
#[derive(Clone)]
pub struct PlantClassifier {
    model: Arc<dyn ImageModel>,
    vocabulary: Arc<PlantVocabulary>,
    top_k: usize,
}

impl PlantClassifier {
    pub fn new(model: Arc<dyn ImageModel>, vocabulary: Arc<PlantVocabulary>) -> Self {
        PlantClassifier { model, vocabulary, top_k: DEFAULT_TOP_K }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn vocabulary(&self) -> &PlantVocabulary {
        &self.vocabulary
    }

    pub fn descriptor(&self) -> ModelDescriptor {
        self.model.descriptor()
    }

    /// Decodes `image_bytes`, runs the model and applies the vocabulary.
    pub fn try_classify(&self, image_bytes: &[u8]) -> Result<Decision, ClassifyError> {
        let image = image::load_from_memory(image_bytes)?;
        let ranking = self.model.classify(&image, self.top_k)?;
        Ok(decide(&ranking, &self.vocabulary))
    }

    /// Like `try_classify`, but never fails: errors become a non-plant
    /// decision whose label describes the failure.
    pub fn classify(&self, image_bytes: &[u8]) -> Decision {
        match self.try_classify(image_bytes) {
            Ok(decision) => {
                info!(
                    is_plant = decision.is_plant,
                    label = %decision.label,
                    confidence = decision.confidence,
                    "classification decided"
                );
                decision
            }
            Err(err) => {
                warn!(error = %err, "classification failed");
                Decision::failed(&err)
            }
        }
    }
}

//! Turns a `FeatureVector` into short descriptive phrases.
//!
//! All thresholds and wording live in `SummaryPolicy` so they can be tuned
//! (or loaded from a JSON file) without touching the summarizer.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::features::{FeatureError, FeatureVector};

/// Separator used when the phrases are joined into a single caption.
pub const CAPTION_SEPARATOR: &str = " | ";

/// One rung of a ladder: used when the statistic is strictly above `above`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub above: f64,
    pub phrase: String,
}

/// Bands are checked in order; the first whose threshold is exceeded wins,
/// otherwise `fallback` is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ladder {
    pub bands: Vec<Band>,
    pub fallback: String,
}

impl Ladder {
    fn new(bands: &[(f64, &str)], fallback: &str) -> Self {
        Ladder {
            bands: bands
                .iter()
                .map(|&(above, phrase)| Band { above, phrase: phrase.to_owned() })
                .collect(),
            fallback: fallback.to_owned(),
        }
    }

    pub fn pick(&self, value: f64) -> &str {
        self.bands
            .iter()
            .find(|b| value > b.above)
            .map_or(self.fallback.as_str(), |b| b.phrase.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPolicy {
    pub saturation: Ladder,
    pub edge_density: Ladder,
    pub contrast: Ladder,
    pub green_threshold: f64,
    pub green_phrase: String,
    pub unavailable: String,
}

impl Default for SummaryPolicy {
    fn default() -> Self {
        SummaryPolicy {
            saturation: Ladder::new(
                &[(150.0, "Very vivid colors"), (100.0, "Moderately vivid colors"), (50.0, "Low saturation")],
                "Faded colors",
            ),
            edge_density: Ladder::new(
                &[(0.15, "Lots of detail and edges"), (0.05, "Moderate detail")],
                "Little visible detail",
            ),
            contrast: Ladder::new(&[(60.0, "High contrast"), (30.0, "Medium contrast")], "Low contrast"),
            green_threshold: 100.0,
            green_phrase: "Predominance of green".to_owned(),
            unavailable: "Visual analysis unavailable".to_owned(),
        }
    }
}

impl SummaryPolicy {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, crate::error::Error> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Phrases for saturation, edge density and contrast, plus the green
    /// phrase when green intensity is above the threshold.
    pub fn summarize(&self, features: &Result<FeatureVector, FeatureError>) -> Vec<String> {
        let f = match features {
            Ok(f) => f,
            Err(_) => return vec![self.unavailable.clone()],
        };

        let mut phrases = vec![
            self.saturation.pick(f.saturation).to_owned(),
            self.edge_density.pick(f.edge_density).to_owned(),
            self.contrast.pick(f.contrast).to_owned(),
        ];
        if f.green_intensity > self.green_threshold {
            phrases.push(self.green_phrase.clone());
        }
        phrases
    }
}

/// Joins phrases into the caption returned by `/identify`.
pub fn caption(phrases: &[String]) -> String {
    phrases.join(CAPTION_SEPARATOR)
}

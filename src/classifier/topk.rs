//! Ranking of raw class scores.

use serde::Serialize;

/// One ranked class with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub probability: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Prediction { label: label.into(), probability }
    }
}

/// Up to K predictions ordered by descending probability.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub predictions: Vec<Prediction>,
}

impl ClassificationResult {
    /// Keeps the order given; callers are expected to pass a ranked list.
    pub fn from_ranked(predictions: Vec<Prediction>) -> Self {
        ClassificationResult { predictions }
    }

    /// Ranks `scores` and keeps the best `k`.  Labels come from `labels` by
    /// index; a missing label falls back to the class index.
    pub fn top_k(scores: &[f64], labels: &[String], k: usize) -> Self {
        let mut indexed: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
        indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let predictions = indexed
            .into_iter()
            .take(k)
            .map(|(idx, score)| {
                let label = labels.get(idx).cloned().unwrap_or_else(|| idx.to_string());
                Prediction { label, probability: score }
            })
            .collect();
        ClassificationResult { predictions }
    }

    pub fn top(&self) -> Option<&Prediction> {
        self.predictions.first()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prediction> {
        self.predictions.iter()
    }
}

//! Plant classifier adapter: wraps an image model, ranks its output and
//! applies the plant vocabulary to reach a `Decision`.

pub mod adapter;
pub mod model;
pub mod preprocess;
pub mod topk;

pub use adapter::{decide, Decision, PlantClassifier};
pub use model::{ImageModel, ModelDescriptor, NetworkModel};
pub use topk::{ClassificationResult, Prediction};

use thiserror::Error;

/// Failures between receiving image bytes and obtaining a ranking.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("model expects {expected} input values, got {actual}")]
    InputMismatch { expected: usize, actual: usize },

    #[error("model produced {actual} outputs for {expected} labels")]
    OutputMismatch { expected: usize, actual: usize },

    #[error("model error: {0}")]
    Model(String),
}

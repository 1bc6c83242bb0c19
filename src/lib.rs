pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod vocabulary;
pub mod classifier;
pub mod features;
pub mod summary;
pub mod identify;
pub mod config;
pub mod error;
pub mod pipeline;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{InputType, ModelMetadata, Network, Normalization};
pub use vocabulary::PlantVocabulary;
pub use classifier::{Decision, ImageModel, NetworkModel, PlantClassifier};
pub use features::FeatureVector;
pub use summary::SummaryPolicy;
pub use identify::{IdentifyOutcome, PlantIdClient, PlantIdentifier};
pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::AppContext;

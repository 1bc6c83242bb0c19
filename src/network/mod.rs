pub mod metadata;
pub mod network;

pub use metadata::{InputType, ModelMetadata, Normalization};
pub use network::{ModelError, Network};

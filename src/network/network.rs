use crate::layers::dense::Layer;
use crate::network::metadata::ModelMetadata;
use serde::{Serialize, Deserialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a saved network.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse model JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model has no layers")]
    NoLayers,

    #[error("Layer {index} has inconsistent weight or bias shapes")]
    MalformedLayer { index: usize },

    #[error("Layer {index} expects {expected} inputs but the previous layer produces {actual}")]
    LayerMismatch { index: usize, expected: usize, actual: usize },

    #[error("Model does not declare an image input type")]
    MissingInputType,

    #[error("Input geometry needs {expected} values but the first layer takes {actual}")]
    InputMismatch { expected: usize, actual: usize },

    #[error("Model declares {labels} labels for {outputs} outputs")]
    LabelMismatch { labels: usize, outputs: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

impl Network {
    pub fn new(layers: Vec<Layer>, metadata: ModelMetadata) -> Network {
        Network { layers, metadata: Some(metadata) }
    }

    /// Forward pass over all layers.
    pub fn predict(&self, input: Vec<f64>) -> Vec<f64> {
        let mut current = input;
        for layer in &self.layers {
            current = layer.forward(current);
        }
        current
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size)
    }

    /// Checks the layer chain and the metadata against each other so a bad
    /// file is rejected at startup instead of panicking mid-request.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.layers.is_empty() {
            return Err(ModelError::NoLayers);
        }
        for (index, layer) in self.layers.iter().enumerate() {
            if !layer.is_consistent() {
                return Err(ModelError::MalformedLayer { index });
            }
            if index > 0 {
                let actual = self.layers[index - 1].size;
                if layer.input_size() != actual {
                    return Err(ModelError::LayerMismatch { index, expected: layer.input_size(), actual });
                }
            }
        }

        let metadata = self.metadata.as_ref();
        let input_type = metadata
            .and_then(|m| m.input_type.as_ref())
            .ok_or(ModelError::MissingInputType)?;
        if input_type.input_len() != self.input_size() {
            return Err(ModelError::InputMismatch {
                expected: input_type.input_len(),
                actual: self.input_size(),
            });
        }
        if let Some(labels) = metadata.and_then(|m| m.output_labels.as_ref()) {
            if labels.len() != self.output_size() {
                return Err(ModelError::LabelMismatch { labels: labels.len(), outputs: self.output_size() });
            }
        }
        Ok(())
    }

    /// Serializes the network weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a network previously written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network, ModelError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let network: Network = serde_json::from_reader(reader)?;
        network.validate()?;
        Ok(network)
    }
}

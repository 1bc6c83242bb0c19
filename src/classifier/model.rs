use image::DynamicImage;
use serde::Serialize;
use tracing::debug;

use super::preprocess::image_to_input;
use super::topk::ClassificationResult;
use super::ClassifyError;
use crate::network::{InputType, ModelError, Network, Normalization};

/// Static facts about a loaded model, served by `/model-info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDescriptor {
    pub name: String,
    pub input_width: u32,
    pub input_height: u32,
    pub pretrained_on: String,
    pub classes: usize,
}

/// A pretrained image classifier treated as a black box: image in, ranked
/// labels out.  Implementations must be shareable across request threads.
pub trait ImageModel: Send + Sync {
    /// Returns at most `top_k` predictions ordered by descending probability.
    fn classify(&self, image: &DynamicImage, top_k: usize) -> Result<ClassificationResult, ClassifyError>;

    fn descriptor(&self) -> ModelDescriptor;
}

/// `ImageModel` backed by a saved `Network` with image metadata.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    network: Network,
    input_type: InputType,
    normalization: Normalization,
    labels: Vec<String>,
    name: String,
    pretrained_on: String,
}

impl NetworkModel {
    /// Wraps a network, validating it first.
    pub fn new(network: Network) -> Result<Self, ModelError> {
        network.validate()?;
        let metadata = network.metadata.clone().unwrap_or_default();
        let input_type = metadata.input_type.ok_or(ModelError::MissingInputType)?;
        Ok(NetworkModel {
            input_type,
            normalization: metadata.normalization,
            labels: metadata.output_labels.unwrap_or_default(),
            name: metadata.name.unwrap_or_else(|| "unnamed".to_owned()),
            pretrained_on: metadata.pretrained_on.unwrap_or_else(|| "unknown".to_owned()),
            network,
        })
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ModelError> {
        NetworkModel::new(Network::load_json(path)?)
    }
}

impl ImageModel for NetworkModel {
    fn classify(&self, image: &DynamicImage, top_k: usize) -> Result<ClassificationResult, ClassifyError> {
        let input = image_to_input(image, &self.input_type, self.normalization);
        if input.len() != self.network.input_size() {
            return Err(ClassifyError::InputMismatch {
                expected: self.network.input_size(),
                actual: input.len(),
            });
        }

        let scores = self.network.predict(input);
        if !self.labels.is_empty() && scores.len() != self.labels.len() {
            return Err(ClassifyError::OutputMismatch { expected: self.labels.len(), actual: scores.len() });
        }
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(ClassifyError::Model("non-finite score in model output".to_owned()));
        }
        debug!(classes = scores.len(), top_k, "network forward pass complete");
        Ok(ClassificationResult::top_k(&scores, &self.labels, top_k))
    }

    fn descriptor(&self) -> ModelDescriptor {
        let (input_width, input_height) = self.input_type.dimensions();
        ModelDescriptor {
            name: self.name.clone(),
            input_width,
            input_height,
            pretrained_on: self.pretrained_on.clone(),
            classes: self.network.output_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::layers::dense::Layer;
    use crate::math::matrix::Matrix;
    use crate::network::ModelMetadata;
    use image::{Rgb, RgbImage};

    /// 1×1 RGB network whose logits are the red, green and blue channels.
    fn channel_network() -> Network {
        let weights = Matrix::from_data(vec![
            vec![10.0, 0.0, 0.0],
            vec![0.0, 10.0, 0.0],
            vec![0.0, 0.0, 10.0],
        ]);
        Network::new(
            vec![Layer::from_weights(weights, Matrix::row(vec![0.0; 3]), ActivationFunction::Softmax)],
            ModelMetadata {
                name: Some("ChannelNet".into()),
                pretrained_on: Some("synthetic".into()),
                input_type: Some(InputType::ImageRgb { width: 1, height: 1 }),
                output_labels: Some(vec!["poppy".into(), "lawn_grass".into(), "sky".into()]),
                ..Default::default()
            },
        )
    }

    #[test]
    fn green_image_ranks_green_label_first() {
        let model = NetworkModel::new(channel_network()).unwrap();
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(5, 5, Rgb([0, 255, 0])));
        let result = model.classify(&img, 2).unwrap();
        assert_eq!(result.predictions.len(), 2);
        assert_eq!(result.top().unwrap().label, "lawn_grass");
        assert!(result.top().unwrap().probability > 0.99);
    }

    #[test]
    fn descriptor_reports_metadata() {
        let model = NetworkModel::new(channel_network()).unwrap();
        let d = model.descriptor();
        assert_eq!(d.name, "ChannelNet");
        assert_eq!((d.input_width, d.input_height), (1, 1));
        assert_eq!(d.pretrained_on, "synthetic");
        assert_eq!(d.classes, 3);
    }

    #[test]
    fn network_without_input_type_is_rejected() {
        let mut net = channel_network();
        net.metadata = None;
        assert!(matches!(NetworkModel::new(net), Err(ModelError::MissingInputType)));
    }
}

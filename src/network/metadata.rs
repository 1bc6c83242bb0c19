use serde::{Deserialize, Serialize};

/// Describes how to interpret the input fed to a Network.
/// Stored in model JSON; the classifier reads this to prepare the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputType {
    /// Grayscale image resized to width×height.
    ImageGrayscale { width: u32, height: u32 },
    /// RGB image resized to width×height, flattened as R,G,B,...
    ImageRgb { width: u32, height: u32 },
}

impl InputType {
    pub fn dimensions(&self) -> (u32, u32) {
        match *self {
            InputType::ImageGrayscale { width, height } | InputType::ImageRgb { width, height } => {
                (width, height)
            }
        }
    }

    pub fn channels(&self) -> usize {
        match self {
            InputType::ImageGrayscale { .. } => 1,
            InputType::ImageRgb { .. } => 3,
        }
    }

    /// Length of the flattened input vector.
    pub fn input_len(&self) -> usize {
        let (w, h) = self.dimensions();
        w as usize * h as usize * self.channels()
    }
}

/// Scaling applied to 8-bit channel values before the forward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// `v / 255`, range [0, 1].
    #[default]
    Unit,
    /// `v / 127.5 - 1`, range [-1, 1].
    Symmetric,
    /// Channel values passed through unchanged, range [0, 255].
    Raw,
}

impl Normalization {
    pub fn apply(self, value: u8) -> f64 {
        let v = value as f64;
        match self {
            Normalization::Unit => v / 255.0,
            Normalization::Symmetric => v / 127.5 - 1.0,
            Normalization::Raw => v,
        }
    }
}

/// Annotations attached to a saved Network.
/// Optional fields let older model files deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    /// Display name reported by `/model-info`.
    pub name: Option<String>,
    pub description: Option<String>,
    /// Corpus the weights were trained on, e.g. "ImageNet (1000 classes)".
    pub pretrained_on: Option<String>,
    pub input_type: Option<InputType>,
    #[serde(default)]
    pub normalization: Normalization,
    /// Human-readable class labels for the output layer.
    pub output_labels: Option<Vec<String>>,
}

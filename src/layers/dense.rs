use crate::{math::matrix::Matrix, activation::activation::{ActivationFunction, softmax}};
use serde::{Serialize, Deserialize};

/// A fully connected layer holding trained weights.
///
/// `weights` is `input_size × size`, `biases` is `1 × size`.  The forward pass
/// borrows the layer immutably so one loaded network can serve many requests
/// at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
}

impl Layer {
    pub fn from_weights(weights: Matrix, biases: Matrix, activation: ActivationFunction) -> Layer {
        Layer {
            size: weights.cols,
            weights,
            biases,
            activator: activation,
        }
    }

    /// Number of values this layer expects as input.
    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// Checks that weights and biases agree on the layer width.
    pub fn is_consistent(&self) -> bool {
        self.weights.is_rectangular()
            && self.biases.is_rectangular()
            && self.biases.rows == 1
            && self.biases.cols == self.size
            && self.weights.cols == self.size
    }

    pub fn forward(&self, input: Vec<f64>) -> Vec<f64> {
        let z = &(&Matrix::row(input) * &self.weights) + &self.biases;
        let a = z.map(|x| self.activator.function(x));
        let row = a.data.into_iter().next().unwrap_or_default();
        if self.activator.is_softmax() {
            softmax(&row)
        } else {
            row
        }
    }
}

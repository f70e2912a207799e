// --- File: src/nn/head.rs ---

//! Fully-connected classifier head for transfer learning.

use burn::config::Config;
use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig, Relu};
use burn::tensor::activation::softmax;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Configuration for [`FcHead`].
#[derive(Config, Debug)]
pub struct FcHeadConfig {
    /// Flattened size of the backbone's output feature maps.
    pub in_features: usize,
    /// Number of output classes.
    pub classes: usize,
    /// Width of the hidden dense layer.
    pub hidden: usize,
    /// Dropout probability between the hidden and output layers.
    #[config(default = 0.5)]
    pub dropout: f64,
}

impl FcHeadConfig {
    /// Assembles the head on the given device.
    pub fn init<B: Backend>(&self, device: &B::Device) -> FcHead<B> {
        FcHead {
            fc1: LinearConfig::new(self.in_features, self.hidden).init(device),
            activation: Relu::new(),
            dropout: DropoutConfig::new(self.dropout).init(),
            fc2: LinearConfig::new(self.hidden, self.classes).init(device),
        }
    }
}

/// Flatten -> dense -> dropout -> dense(softmax) classification head.
///
/// Placed on top of a pretrained backbone: run the backbone to get its
/// feature maps `[batch, channels, h, w]`, then pass them through the head
/// to obtain class probabilities. `in_features` must equal
/// `channels * h * w` of the backbone output.
#[derive(Module, Debug)]
pub struct FcHead<B: Backend> {
    fc1: Linear<B>,
    activation: Relu,
    dropout: Dropout,
    fc2: Linear<B>,
}

impl<B: Backend> FcHead<B> {
    /// Forward pass over backbone feature maps `[batch, channels, h, w]`.
    ///
    /// Returns per-class probabilities of shape `[batch, classes]`.
    pub fn forward(&self, features: Tensor<B, 4>) -> Tensor<B, 2> {
        let x: Tensor<B, 2> = features.flatten(1, 3);
        let x = self.fc1.forward(x);
        let x = self.activation.forward(x);
        let x = self.dropout.forward(x);
        let x = self.fc2.forward(x);
        softmax(x, 1)
    }
}

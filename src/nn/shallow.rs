// --- File: src/nn/shallow.rs ---

//! Minimal convolutional network: one conv block and a softmax classifier.

use burn::config::Config;
use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::{Linear, LinearConfig, PaddingConfig2d, Relu};
use burn::tensor::activation::softmax;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Configuration for [`ShallowNet`].
#[derive(Config, Debug)]
pub struct ShallowNetConfig {
    /// Input image width.
    pub width: usize,
    /// Input image height.
    pub height: usize,
    /// Number of input channels.
    pub depth: usize,
    /// Number of output classes.
    pub classes: usize,
    /// Number of convolution filters.
    #[config(default = 32)]
    pub filters: usize,
}

impl ShallowNetConfig {
    /// Assembles the network on the given device.
    pub fn init<B: Backend>(&self, device: &B::Device) -> ShallowNet<B> {
        ShallowNet {
            conv: Conv2dConfig::new([self.depth, self.filters], [3, 3])
                .with_padding(PaddingConfig2d::Same)
                .init(device),
            activation: Relu::new(),
            fc: LinearConfig::new(self.filters * self.height * self.width, self.classes)
                .init(device),
        }
    }
}

/// Minimal CONV -> RELU -> flatten -> dense -> softmax network.
///
/// Same-padded 3x3 convolution keeps the spatial dimensions, so the dense
/// layer sees `filters * height * width` inputs.
#[derive(Module, Debug)]
pub struct ShallowNet<B: Backend> {
    conv: Conv2d<B>,
    activation: Relu,
    fc: Linear<B>,
}

impl<B: Backend> ShallowNet<B> {
    /// Forward pass over a channels-first batch `[batch, depth, height, width]`.
    ///
    /// Returns per-class probabilities of shape `[batch, classes]`.
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.conv.forward(input);
        let x = self.activation.forward(x);
        let x: Tensor<B, 2> = x.flatten(1, 3);
        let x = self.fc.forward(x);
        softmax(x, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_output_shape() {
        let device = Default::default();
        let model = ShallowNetConfig::new(8, 8, 3, 4).init::<TestBackend>(&device);

        let input = Tensor::<TestBackend, 4>::zeros([2, 3, 8, 8], &device);
        let output = model.forward(input);
        assert_eq!(output.dims(), [2, 4]);
    }

    #[test]
    fn test_rows_are_probabilities() {
        let device = Default::default();
        let model = ShallowNetConfig::new(6, 6, 1, 5).init::<TestBackend>(&device);

        let input = Tensor::<TestBackend, 4>::zeros([3, 1, 6, 6], &device);
        let output = model.forward(input);

        let values: Vec<f32> = output.into_data().to_vec().unwrap();
        for row in values.chunks(5) {
            let sum: f32 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "row does not sum to 1: {sum}");
        }
    }

    #[test]
    fn test_filters_override() {
        let config = ShallowNetConfig::new(8, 8, 3, 4);
        assert_eq!(config.filters, 32);
        let config = config.with_filters(16);
        assert_eq!(config.filters, 16);
    }
}

// --- File: src/nn/mod.rs ---

//! # Network Builders Module
//!
//! Small architecture factories for image classification, built on the
//! `burn` framework's layer constructors. Each builder is a config struct
//! whose `init` assembles the layer stack for a chosen backend.
//!
//! ## Available Builders
//!
//! - [`ShallowNet`]: minimal conv -> relu -> flatten -> dense -> softmax network
//! - [`FcHead`]: fully-connected classifier head to attach atop a pretrained
//!   backbone's feature maps
//!
//! ## Example
//!
//! ```ignore
//! use convkit::nn::ShallowNetConfig;
//!
//! let model = ShallowNetConfig::new(32, 32, 3, 10).init::<Backend>(&device);
//! let scores = model.forward(images); // [batch, 10]
//! ```

pub mod head;
pub mod shallow;

pub use head::{FcHead, FcHeadConfig};
pub use shallow::{ShallowNet, ShallowNetConfig};

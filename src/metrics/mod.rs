// --- File: src/metrics/mod.rs ---

//! # Metrics Module
//!
//! Evaluation metrics for classification workflows.
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use convkit::metrics::{Metric, RankedAccuracy};
//!
//! let mut ranked = RankedAccuracy::new(5);
//! ranked.update(&predictions, &targets);
//! let (rank1, rank5) = ranked.compute();
//! ranked.reset();
//! ```

pub mod ranked;

pub use ranked::{ranked_accuracy, RankedAccuracy};

/// Base trait for all metrics.
pub trait Metric: Send + Sync {
    /// Prediction type
    type Prediction;
    /// Target type
    type Target;
    /// Metric result type
    type Output;

    /// Updates the metric state with new data.
    fn update(&mut self, predictions: &Self::Prediction, targets: &Self::Target);

    /// Computes the current metric value.
    fn compute(&self) -> Self::Output;

    /// Resets the metric state.
    fn reset(&mut self);

    /// Returns the metric name.
    fn name(&self) -> &str;
}

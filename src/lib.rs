//! # convkit: Helpers for CNN Image-Classification Workflows
//!
//! **convkit** is a thin collection of utilities that sit around a deep
//! learning framework in an image-classification pipeline: a buffered
//! dataset writer for persisting large feature/label arrays to disk, a
//! ranked (rank-1 / rank-5) accuracy metric, and two small network
//! builders.
//!
//! ## Usage Example
//!
//! ```no_run
//! use convkit::io::NpyDatasetWriter;
//!
//! # fn main() -> Result<(), convkit::io::DatasetError> {
//! // 1. Create a dataset container for 10_000 RGB 32x32 images
//! let mut writer = NpyDatasetWriter::new(&[10_000, 3, 32, 32], "train_data")?;
//!
//! // 2. Accumulate rows; full buffers are flushed to disk automatically
//! let batch = ndarray::ArrayD::<f32>::zeros(ndarray::IxDyn(&[64, 3, 32, 32]));
//! let labels = vec![0i64; 64];
//! writer.add(batch.view(), &labels)?;
//!
//! // 3. Record human-readable class names, then finalize
//! writer.store_class_labels(&["cat", "dog"])?;
//! writer.close()?;
//! # Ok(())
//! # }
//! ```

// Declare public modules that constitute the core library API.
pub mod io;
pub mod metrics;
pub mod nn;

// --- File: src/io/mod.rs ---

//! # Dataset I/O Module
//!
//! Persists large feature/label datasets as a directory of NumPy `.npy`
//! arrays, written incrementally through a fixed-size in-memory buffer.
//!
//! ## Key Components
//!
//! - [`NpyDatasetWriter`]: Buffered writer creating the container
//! - [`NpyDatasetReader`]: Reads a finalized container back
//! - [`DatasetWriterConfig`]: Feature key and buffer-capacity settings
//!
//! ## Container Layout
//!
//! ```text
//! train_data/
//! ├── images.npy        feature array, shape (N, *feature_dims), f32
//! ├── labels.npy        label array, shape (N,), i64
//! ├── label_names.json  optional class-name table, index -> name
//! └── meta.json         manifest written on close
//! ```
//!
//! The feature key (`images` above) is configurable. A container without
//! `meta.json` was never finalized and is rejected by the reader.

pub mod reader;
pub mod writer;

pub use reader::NpyDatasetReader;
pub use writer::{DatasetWriterConfig, NpyDatasetWriter};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Fixed file name of the label array.
pub const LABELS_KEY: &str = "labels";
/// Fixed file name (stem) of the class-name table.
pub const LABEL_NAMES_KEY: &str = "label_names";
/// Manifest file name inside the container directory.
pub const META_FILE: &str = "meta.json";

/// Errors when writing or reading a dataset container.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("array dtype error: {0}")]
    Dtype(#[from] npyz::DTypeError),

    #[error("output path '{}' already exists and cannot be overwritten; delete it manually before continuing", .0.display())]
    AlreadyExists(PathBuf),

    #[error("dims must contain at least the row count, got {0:?}")]
    InvalidDims(Vec<usize>),

    #[error("row shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("row/label count mismatch: {rows} rows but {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("capacity exceeded: dataset holds {capacity} rows, {occupied} already taken, cannot add {requested} more")]
    CapacityExceeded {
        capacity: usize,
        occupied: usize,
        requested: usize,
    },

    #[error("class labels were already stored for this container")]
    LabelNamesAlreadyStored,

    #[error("writer is closed")]
    WriterClosed,

    #[error("missing manifest '{}': the container was never finalized", .0.display())]
    MissingMeta(PathBuf),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

/// Manifest describing a finalized container, stored as `meta.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Manifest format version.
    pub version: u32,
    /// File name (stem) of the feature array.
    pub data_key: String,
    /// Declared array shape: row count followed by the per-row feature shape.
    pub dims: Vec<usize>,
    /// Number of rows actually written before `close`; the remainder up to
    /// `dims[0]` is zero-filled.
    pub rows_written: usize,
}

/// Current manifest format version.
pub(crate) const MANIFEST_VERSION: u32 = 1;

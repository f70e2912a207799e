// --- File: src/io/reader.rs ---

//! Reads a finalized dataset container back into memory.

use super::{DatasetError, Manifest, Result, LABELS_KEY, LABEL_NAMES_KEY, META_FILE};
use ndarray::ArrayD;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Reader for a container produced by [`NpyDatasetWriter`].
///
/// Opening validates only the manifest; the arrays are loaded on demand.
///
/// [`NpyDatasetWriter`]: super::NpyDatasetWriter
pub struct NpyDatasetReader {
    root: PathBuf,
    manifest: Manifest,
}

impl NpyDatasetReader {
    /// Opens a container directory, reading its manifest.
    ///
    /// Fails with [`DatasetError::MissingMeta`] when the manifest is absent,
    /// which marks a container that was never finalized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let meta_path = root.join(META_FILE);
        if !meta_path.exists() {
            return Err(DatasetError::MissingMeta(meta_path));
        }
        let manifest: Manifest = serde_json::from_str(&fs::read_to_string(&meta_path)?)?;
        Ok(Self { root, manifest })
    }

    /// Number of rows actually written by the producer.
    pub fn len(&self) -> usize {
        self.manifest.rows_written
    }

    /// Whether no rows were written.
    pub fn is_empty(&self) -> bool {
        self.manifest.rows_written == 0
    }

    /// Total row count `N` the container was declared with.
    pub fn capacity(&self) -> usize {
        self.manifest.dims[0]
    }

    /// Per-row feature shape.
    pub fn feature_shape(&self) -> &[usize] {
        &self.manifest.dims[1..]
    }

    /// File name (stem) of the feature array.
    pub fn data_key(&self) -> &str {
        &self.manifest.data_key
    }

    /// Loads the full feature array, shape `(N, *feature_dims)`.
    pub fn read_features(&self) -> Result<ArrayD<f32>> {
        let values: Vec<f32> = self.read_array(&self.manifest.data_key, &self.manifest.dims)?;
        let len = values.len();
        ArrayD::from_shape_vec(ndarray::IxDyn(&self.manifest.dims), values).map_err(|_| {
            DatasetError::ShapeMismatch {
                expected: self.manifest.dims.clone(),
                actual: vec![len],
            }
        })
    }

    /// Loads the full label array, shape `(N,)`.
    pub fn read_labels(&self) -> Result<Vec<i64>> {
        self.read_array(LABELS_KEY, &self.manifest.dims[..1])
    }

    /// Loads the class-name table, if one was stored.
    pub fn read_label_names(&self) -> Result<Option<Vec<String>>> {
        let path = self.root.join(format!("{LABEL_NAMES_KEY}.json"));
        if !path.exists() {
            return Ok(None);
        }
        let names: Vec<String> = serde_json::from_str(&fs::read_to_string(&path)?)?;
        Ok(Some(names))
    }

    /// Reads one named `.npy` array, checking its header shape against the
    /// manifest.
    fn read_array<T: npyz::Deserialize>(&self, key: &str, dims: &[usize]) -> Result<Vec<T>> {
        let path = self.root.join(format!("{key}.npy"));
        let mut reader = BufReader::new(File::open(&path)?);
        let npy = npyz::NpyFile::new(&mut reader)?;

        let actual: Vec<usize> = npy.shape().iter().map(|&d| d as usize).collect();
        if actual != dims {
            return Err(DatasetError::ShapeMismatch {
                expected: dims.to_vec(),
                actual,
            });
        }

        let values = npy.data::<T>()?.collect::<std::io::Result<Vec<T>>>()?;
        Ok(values)
    }
}

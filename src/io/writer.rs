// --- File: src/io/writer.rs ---

//! Buffered dataset writer producing a directory of `.npy` arrays.

use super::{DatasetError, Manifest, Result, LABELS_KEY, LABEL_NAMES_KEY, MANIFEST_VERSION, META_FILE};
use log::{debug, warn};
use ndarray::ArrayViewD;
use npyz::{NpyWriter, WriterBuilder};
use std::fs::{self, File};
use std::io::BufWriter;
use std::iter;
use std::path::{Path, PathBuf};

/// Configuration for [`NpyDatasetWriter`].
#[derive(Debug, Clone)]
pub struct DatasetWriterConfig {
    /// File name (stem) of the feature array inside the container.
    pub data_key: String,
    /// Number of rows accumulated in memory before a flush is triggered.
    pub buf_size: usize,
}

impl Default for DatasetWriterConfig {
    fn default() -> Self {
        Self {
            data_key: "images".to_string(),
            buf_size: 1000,
        }
    }
}

impl DatasetWriterConfig {
    /// Creates the default configuration (`images`, 1000 rows).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the feature-array key.
    pub fn with_data_key(mut self, data_key: impl Into<String>) -> Self {
        self.data_key = data_key.into();
        self
    }

    /// Sets the buffer capacity in rows.
    pub fn with_buf_size(mut self, buf_size: usize) -> Self {
        self.buf_size = buf_size;
        self
    }
}

/// In-memory accumulation state: pending feature elements and labels.
#[derive(Debug, Default)]
struct RowBuffer {
    data: Vec<f32>,
    labels: Vec<i64>,
}

impl RowBuffer {
    fn rows(&self) -> usize {
        self.labels.len()
    }

    fn clear(&mut self) {
        self.data.clear();
        self.labels.clear();
    }
}

/// Buffered writer for a feature/label dataset container.
///
/// The container is a directory holding one `.npy` file per named array:
/// the feature array of shape `(N, *feature_dims)` with dtype `f32`, and a
/// `labels` array of shape `(N,)` with dtype `i64`. `N` is fixed at
/// creation time. Rows accumulate in memory via [`add`](Self::add) and are
/// streamed to disk whenever the buffer reaches its capacity; rows never
/// supplied before [`close`](Self::close) are zero-filled.
///
/// Arrays are staged as `*.npy.tmp` files and renamed into place on close,
/// together with a `meta.json` manifest. A container missing its manifest
/// was never finalized.
///
/// # Example
///
/// ```rust,ignore
/// let mut writer = NpyDatasetWriter::from_config(
///     &[70_000, 1, 28, 28],
///     "mnist_train",
///     DatasetWriterConfig::new().with_buf_size(256),
/// )?;
/// writer.add(batch.view(), &labels)?;
/// writer.close()?;
/// ```
pub struct NpyDatasetWriter {
    root: PathBuf,
    dims: Vec<usize>,
    row_len: usize,
    config: DatasetWriterConfig,
    features: Option<NpyWriter<f32, BufWriter<File>>>,
    labels: Option<NpyWriter<i64, BufWriter<File>>>,
    buffer: RowBuffer,
    idx: usize,
    label_names_stored: bool,
    closed: bool,
}

impl NpyDatasetWriter {
    /// Creates a new container at `path` with the default configuration.
    ///
    /// `dims[0]` is the total row count `N`; `dims[1..]` is the per-row
    /// feature shape. Fails with [`DatasetError::AlreadyExists`] if `path`
    /// is already occupied; the existing entry is left untouched.
    pub fn new(dims: &[usize], path: impl AsRef<Path>) -> Result<Self> {
        Self::from_config(dims, path, DatasetWriterConfig::default())
    }

    /// Creates a new container at `path` from a configuration.
    pub fn from_config(
        dims: &[usize],
        path: impl AsRef<Path>,
        config: DatasetWriterConfig,
    ) -> Result<Self> {
        if dims.is_empty() {
            return Err(DatasetError::InvalidDims(dims.to_vec()));
        }

        let root = path.as_ref().to_path_buf();
        fs::create_dir(&root).map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                DatasetError::AlreadyExists(root.clone())
            } else {
                DatasetError::Io(e)
            }
        })?;

        let shape: Vec<u64> = dims.iter().map(|&d| d as u64).collect();
        let features = begin_array::<f32>(&tmp_path(&root, &config.data_key), &shape)?;
        let labels = begin_array::<i64>(&tmp_path(&root, LABELS_KEY), &shape[..1])?;

        debug!(
            "created dataset container at '{}' for {} rows",
            root.display(),
            dims[0]
        );

        Ok(Self {
            root,
            row_len: dims[1..].iter().product(),
            dims: dims.to_vec(),
            config,
            features: Some(features),
            labels: Some(labels),
            buffer: RowBuffer::default(),
            idx: 0,
            label_names_stored: false,
            closed: false,
        })
    }

    /// Appends feature rows and their labels to the in-memory buffer.
    ///
    /// `rows` must have shape `(k, *feature_dims)` and `labels` length `k`.
    /// Validation happens before anything is buffered; on error the buffer
    /// is unchanged. Reaching the buffer capacity triggers a flush before
    /// this call returns.
    pub fn add(&mut self, rows: ArrayViewD<'_, f32>, labels: &[i64]) -> Result<()> {
        self.ensure_open()?;

        if rows.ndim() == 0 || rows.shape()[1..] != self.dims[1..] {
            return Err(DatasetError::ShapeMismatch {
                expected: self.dims[1..].to_vec(),
                actual: rows.shape().get(1..).unwrap_or(&[]).to_vec(),
            });
        }
        let incoming = rows.shape()[0];
        if incoming != labels.len() {
            return Err(DatasetError::LengthMismatch {
                rows: incoming,
                labels: labels.len(),
            });
        }
        let occupied = self.idx + self.buffer.rows();
        if occupied + incoming > self.dims[0] {
            return Err(DatasetError::CapacityExceeded {
                capacity: self.dims[0],
                occupied,
                requested: incoming,
            });
        }

        // Logical (row-major) iteration order matches the flat on-disk layout.
        self.buffer.data.extend(rows.iter());
        self.buffer.labels.extend_from_slice(labels);

        if self.buffer.rows() >= self.config.buf_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Writes every buffered row to disk and clears the buffer.
    ///
    /// Rows land at `[idx, idx + buffered_rows)` in both arrays and the
    /// cursor advances by exactly that count. Flushing an empty buffer is a
    /// no-op.
    pub fn flush(&mut self) -> Result<()> {
        self.ensure_open()?;
        let rows = self.buffer.rows();
        if rows == 0 {
            return Ok(());
        }

        let features = self.features.as_mut().ok_or(DatasetError::WriterClosed)?;
        features.extend(self.buffer.data.iter().copied())?;
        let labels = self.labels.as_mut().ok_or(DatasetError::WriterClosed)?;
        labels.extend(self.buffer.labels.iter().copied())?;

        self.idx += rows;
        self.buffer.clear();
        debug!("flushed {} rows, cursor now at {}", rows, self.idx);
        Ok(())
    }

    /// Stores the class-name table, one UTF-8 string per class index.
    ///
    /// May be called at most once per container; a second call fails with
    /// [`DatasetError::LabelNamesAlreadyStored`].
    pub fn store_class_labels<S: AsRef<str>>(&mut self, class_labels: &[S]) -> Result<()> {
        self.ensure_open()?;
        if self.label_names_stored {
            return Err(DatasetError::LabelNamesAlreadyStored);
        }

        let names: Vec<&str> = class_labels.iter().map(|s| s.as_ref()).collect();
        let path = self.root.join(format!("{LABEL_NAMES_KEY}.json"));
        fs::write(&path, serde_json::to_string_pretty(&names)?)?;
        self.label_names_stored = true;
        Ok(())
    }

    /// Flushes pending rows, zero-fills the remainder up to `N`, finalizes
    /// both arrays and writes the manifest.
    ///
    /// Any operation after `close`, including a second `close`, fails with
    /// [`DatasetError::WriterClosed`].
    pub fn close(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.flush()?;
        let rows_written = self.idx;

        let remaining = self.dims[0] - rows_written;
        let mut features = self.features.take().ok_or(DatasetError::WriterClosed)?;
        let mut labels = self.labels.take().ok_or(DatasetError::WriterClosed)?;
        if remaining > 0 {
            features.extend(iter::repeat(0f32).take(remaining * self.row_len))?;
            labels.extend(iter::repeat(0i64).take(remaining))?;
            debug!("zero-filled {} unwritten rows", remaining);
        }

        features.finish()?;
        labels.finish()?;
        promote(&self.root, &self.config.data_key)?;
        promote(&self.root, LABELS_KEY)?;

        let manifest = Manifest {
            version: MANIFEST_VERSION,
            data_key: self.config.data_key.clone(),
            dims: self.dims.clone(),
            rows_written,
        };
        fs::write(
            self.root.join(META_FILE),
            serde_json::to_string_pretty(&manifest)?,
        )?;

        self.closed = true;
        debug!(
            "closed dataset container '{}' with {} rows written",
            self.root.display(),
            rows_written
        );
        Ok(())
    }

    /// Total row count `N` declared at creation.
    pub fn capacity(&self) -> usize {
        self.dims[0]
    }

    /// Number of rows already flushed to disk.
    pub fn rows_written(&self) -> usize {
        self.idx
    }

    /// Number of rows currently held in the in-memory buffer.
    pub fn buffered_rows(&self) -> usize {
        self.buffer.rows()
    }

    /// Per-row feature shape (the declared dims without the row count).
    pub fn feature_shape(&self) -> &[usize] {
        &self.dims[1..]
    }

    /// Container directory.
    pub fn path(&self) -> &Path {
        &self.root
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(DatasetError::WriterClosed)
        } else {
            Ok(())
        }
    }
}

impl Drop for NpyDatasetWriter {
    fn drop(&mut self) {
        if !self.closed {
            warn!(
                "dataset writer for '{}' dropped without close; {} buffered rows were lost",
                self.root.display(),
                self.buffer.rows()
            );
        }
    }
}

fn tmp_path(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{key}.npy.tmp"))
}

fn begin_array<T: npyz::AutoSerialize>(
    path: &Path,
    shape: &[u64],
) -> Result<NpyWriter<T, BufWriter<File>>> {
    let file = File::create(path)?;
    let writer = npyz::WriteOptions::new()
        .default_dtype()
        .shape(shape)
        .writer(BufWriter::new(file))
        .begin_nd()?;
    Ok(writer)
}

/// Renames a finished `<key>.npy.tmp` stage file to its final name.
fn promote(root: &Path, key: &str) -> Result<()> {
    fs::rename(tmp_path(root, key), root.join(format!("{key}.npy")))?;
    Ok(())
}

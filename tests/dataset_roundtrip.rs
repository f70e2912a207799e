//! Integration tests for the buffered dataset writer and its reader.

use convkit::io::{DatasetError, DatasetWriterConfig, NpyDatasetReader, NpyDatasetWriter};
use ndarray::{ArrayD, IxDyn};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use tempfile::tempdir;

/// Rows with distinct, predictable values: row r is filled with
/// `base + r` in every element, label r is `base + r`.
fn sequential_rows(base: usize, count: usize, row_shape: &[usize]) -> (ArrayD<f32>, Vec<i64>) {
    let row_len: usize = row_shape.iter().product();
    let mut shape = vec![count];
    shape.extend_from_slice(row_shape);

    let mut values = Vec::with_capacity(count * row_len);
    let mut labels = Vec::with_capacity(count);
    for r in 0..count {
        values.extend(std::iter::repeat((base + r) as f32).take(row_len));
        labels.push((base + r) as i64);
    }
    (
        ArrayD::from_shape_vec(IxDyn(&shape), values).unwrap(),
        labels,
    )
}

#[test]
fn fresh_path_succeeds_and_collision_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ds");

    let mut writer = NpyDatasetWriter::new(&[4, 2], &path).unwrap();

    // A second writer at the same path must fail without touching the first.
    let second = NpyDatasetWriter::new(&[4, 2], &path);
    assert!(matches!(second, Err(DatasetError::AlreadyExists(_))));

    let (rows, labels) = sequential_rows(0, 4, &[2]);
    writer.add(rows.view(), &labels).unwrap();
    writer.close().unwrap();

    let reader = NpyDatasetReader::open(&path).unwrap();
    assert_eq!(reader.len(), 4);
    assert_eq!(reader.read_labels().unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn rows_round_trip_in_insertion_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ds");

    let mut writer = NpyDatasetWriter::new(&[10, 2, 2], &path).unwrap();
    let (rows, labels) = sequential_rows(0, 3, &[2, 2]);
    writer.add(rows.view(), &labels).unwrap();
    let (rows, labels) = sequential_rows(3, 4, &[2, 2]);
    writer.add(rows.view(), &labels).unwrap();
    writer.close().unwrap();

    let reader = NpyDatasetReader::open(&path).unwrap();
    assert_eq!(reader.len(), 7);
    assert_eq!(reader.capacity(), 10);
    assert_eq!(reader.feature_shape(), &[2, 2]);

    let features = reader.read_features().unwrap();
    assert_eq!(features.shape(), &[10, 2, 2]);
    for r in 0..7 {
        for v in features.index_axis(ndarray::Axis(0), r).iter() {
            assert_eq!(*v, r as f32);
        }
    }
    // Rows never supplied are zero-filled.
    for r in 7..10 {
        for v in features.index_axis(ndarray::Axis(0), r).iter() {
            assert_eq!(*v, 0.0);
        }
    }

    let labels = reader.read_labels().unwrap();
    assert_eq!(&labels[..7], &[0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(&labels[7..], &[0, 0, 0]);
}

#[test]
fn random_batch_survives_buffered_flushes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ds");

    let rows = ArrayD::<f32>::random(IxDyn(&[64, 3, 4]), Uniform::new(0.0, 1.0));
    let labels: Vec<i64> = (0..64).collect();

    let mut writer = NpyDatasetWriter::from_config(
        &[64, 3, 4],
        &path,
        DatasetWriterConfig::new().with_buf_size(16),
    )
    .unwrap();
    for chunk in 0..8 {
        let slice = rows.slice_axis(
            ndarray::Axis(0),
            ndarray::Slice::from(chunk * 8..(chunk + 1) * 8),
        );
        writer.add(slice, &labels[chunk * 8..(chunk + 1) * 8]).unwrap();
    }
    writer.close().unwrap();

    let reader = NpyDatasetReader::open(&path).unwrap();
    let features = reader.read_features().unwrap();
    assert_eq!(features, rows);
    assert_eq!(reader.read_labels().unwrap(), labels);
}

#[test]
fn second_close_fails_but_data_is_intact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ds");

    let mut writer = NpyDatasetWriter::new(&[2, 2], &path).unwrap();
    let (rows, labels) = sequential_rows(0, 2, &[2]);
    writer.add(rows.view(), &labels).unwrap();
    writer.close().unwrap();

    assert!(matches!(writer.close(), Err(DatasetError::WriterClosed)));

    let reader = NpyDatasetReader::open(&path).unwrap();
    assert_eq!(reader.read_labels().unwrap(), vec![0, 1]);
}

#[test]
fn operations_after_close_fail() {
    let dir = tempdir().unwrap();
    let mut writer = NpyDatasetWriter::new(&[2, 2], dir.path().join("ds")).unwrap();
    writer.close().unwrap();

    let (rows, labels) = sequential_rows(0, 1, &[2]);
    assert!(matches!(
        writer.add(rows.view(), &labels),
        Err(DatasetError::WriterClosed)
    ));
    assert!(matches!(writer.flush(), Err(DatasetError::WriterClosed)));
    assert!(matches!(
        writer.store_class_labels(&["cat"]),
        Err(DatasetError::WriterClosed)
    ));
}

#[test]
fn auto_flush_leaves_total_mod_capacity_buffered() {
    let dir = tempdir().unwrap();
    let mut writer = NpyDatasetWriter::from_config(
        &[20, 2],
        dir.path().join("ds"),
        DatasetWriterConfig::new().with_buf_size(4),
    )
    .unwrap();

    // Row-by-row adds: every fourth add crosses the threshold and drains
    // the buffer entirely.
    for r in 0..10 {
        let (rows, labels) = sequential_rows(r, 1, &[2]);
        writer.add(rows.view(), &labels).unwrap();
    }
    assert_eq!(writer.buffered_rows(), 10 % 4);
    assert_eq!(writer.rows_written(), 8);

    writer.close().unwrap();
}

#[test]
fn class_labels_round_trip_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ds");

    let mut writer = NpyDatasetWriter::new(&[2, 2], &path).unwrap();
    writer.store_class_labels(&["cat", "dog"]).unwrap();
    assert!(matches!(
        writer.store_class_labels(&["cat", "dog"]),
        Err(DatasetError::LabelNamesAlreadyStored)
    ));
    writer.close().unwrap();

    let reader = NpyDatasetReader::open(&path).unwrap();
    assert_eq!(
        reader.read_label_names().unwrap(),
        Some(vec!["cat".to_string(), "dog".to_string()])
    );
}

#[test]
fn missing_class_labels_read_as_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ds");

    let mut writer = NpyDatasetWriter::new(&[2, 2], &path).unwrap();
    writer.close().unwrap();

    let reader = NpyDatasetReader::open(&path).unwrap();
    assert_eq!(reader.read_label_names().unwrap(), None);
}

#[test]
fn configurable_data_key_is_recorded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ds");

    let mut writer = NpyDatasetWriter::from_config(
        &[2, 3],
        &path,
        DatasetWriterConfig::new().with_data_key("features"),
    )
    .unwrap();
    let (rows, labels) = sequential_rows(0, 2, &[3]);
    writer.add(rows.view(), &labels).unwrap();
    writer.close().unwrap();

    assert!(path.join("features.npy").exists());

    let reader = NpyDatasetReader::open(&path).unwrap();
    assert_eq!(reader.data_key(), "features");
    assert_eq!(reader.read_features().unwrap().shape(), &[2, 3]);
}

#[test]
fn unfinalized_container_is_rejected_by_reader() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ds");

    let writer = NpyDatasetWriter::new(&[2, 2], &path).unwrap();
    // Never closed: no manifest, only staged temp files.
    drop(writer);

    assert!(matches!(
        NpyDatasetReader::open(&path),
        Err(DatasetError::MissingMeta(_))
    ));
}

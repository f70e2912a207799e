//! End-to-end check that the network builders and the ranked accuracy
//! metric compose: model scores feed the metric directly.

use burn::tensor::{Distribution, Tensor};
use convkit::metrics::ranked_accuracy;
use convkit::nn::{FcHeadConfig, ShallowNetConfig};
use ndarray::{ArrayD, IxDyn};

type TestBackend = burn::backend::NdArray;

fn scores_to_array(values: Vec<f32>, rows: usize, classes: usize) -> ArrayD<f32> {
    ArrayD::from_shape_vec(IxDyn(&[rows, classes]), values).unwrap()
}

#[test]
fn shallow_net_scores_feed_ranked_accuracy() {
    let device = Default::default();
    let model = ShallowNetConfig::new(6, 6, 1, 4).init::<TestBackend>(&device);

    let images = Tensor::<TestBackend, 4>::random([8, 1, 6, 6], Distribution::Default, &device);
    let scores = model.forward(images);
    assert_eq!(scores.dims(), [8, 4]);

    let scores = scores_to_array(scores.into_data().to_vec().unwrap(), 8, 4);
    let targets = vec![0usize; 8];
    let (rank1, rank5) = ranked_accuracy(&scores, &targets);

    assert!((0.0..=1.0).contains(&rank1));
    assert!((0.0..=1.0).contains(&rank5));
    assert!(rank1 <= rank5);
    // Rank-5 over 4 classes degenerates to rank-4: always a hit.
    assert!((rank5 - 1.0).abs() < 1e-9);
}

#[test]
fn fc_head_scores_feed_ranked_accuracy() {
    let device = Default::default();
    let head = FcHeadConfig::new(16, 6, 12).init::<TestBackend>(&device);

    let features = Tensor::<TestBackend, 4>::random([5, 4, 2, 2], Distribution::Default, &device);
    let scores = head.forward(features);
    assert_eq!(scores.dims(), [5, 6]);

    let scores = scores_to_array(scores.into_data().to_vec().unwrap(), 5, 6);
    let targets = vec![1usize; 5];
    let (rank1, rank5) = ranked_accuracy(&scores, &targets);

    assert!(rank1 <= rank5);
    assert!((0.0..=1.0).contains(&rank5));
}

// --- File: src/metrics/ranked.rs ---

//! Ranked (rank-1 / rank-k) accuracy for multi-class classification.

use super::Metric;
use ndarray::ArrayD;

/// Ranked accuracy metric.
///
/// Tracks two counts over batches of predictions: how often the true class
/// is the single highest-scoring class (rank-1), and how often it appears
/// among the `k` highest-scoring classes (rank-k). Ranking is done over
/// class *indices* sorted by descending score; on tied scores the lower
/// index wins, so the ordering is deterministic.
///
/// When fewer than `k` classes exist, `k` is clamped to the class count.
#[derive(Debug, Clone)]
pub struct RankedAccuracy {
    k: usize,
    rank1_correct: usize,
    rank_k_correct: usize,
    total: usize,
}

impl RankedAccuracy {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            rank1_correct: 0,
            rank_k_correct: 0,
            total: 0,
        }
    }
}

impl Metric for RankedAccuracy {
    type Prediction = ArrayD<f32>;
    type Target = ArrayD<f32>;
    type Output = (f64, f64);

    fn update(&mut self, predictions: &Self::Prediction, targets: &Self::Target) {
        let batch_size = predictions.shape()[0];
        let num_classes = predictions.shape()[1];
        let k = self.k.min(num_classes);

        for i in 0..batch_size {
            let ranking = sort_class_indices(predictions, i, num_classes);

            // Targets are either one-hot rows or plain class indices.
            let actual_class = if targets.ndim() > 1 && targets.shape()[1] == num_classes {
                (0..num_classes)
                    .max_by(|&a, &b| {
                        targets[[i, a]]
                            .partial_cmp(&targets[[i, b]])
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .unwrap_or(0)
            } else {
                targets.as_slice().unwrap()[i] as usize
            };

            if ranking[0] == actual_class {
                self.rank1_correct += 1;
            }
            if ranking[..k].contains(&actual_class) {
                self.rank_k_correct += 1;
            }
            self.total += 1;
        }
    }

    fn compute(&self) -> Self::Output {
        if self.total == 0 {
            (0.0, 0.0)
        } else {
            (
                self.rank1_correct as f64 / self.total as f64,
                self.rank_k_correct as f64 / self.total as f64,
            )
        }
    }

    fn reset(&mut self) {
        self.rank1_correct = 0;
        self.rank_k_correct = 0;
        self.total = 0;
    }

    fn name(&self) -> &str {
        "RankedAccuracy"
    }
}

/// Computes rank-1 and rank-5 accuracy over a full prediction set.
///
/// `predictions` has shape `[num_examples, num_classes]`; `targets` holds
/// the ground-truth class index per example. Returns the `(rank1, rank5)`
/// fractions; an empty input yields `(0.0, 0.0)`.
pub fn ranked_accuracy(predictions: &ArrayD<f32>, targets: &[usize]) -> (f64, f64) {
    let num_classes = predictions.shape()[1];
    let k = 5.min(num_classes);
    let mut rank1 = 0usize;
    let mut rank5 = 0usize;

    for (i, &actual_class) in targets.iter().enumerate() {
        let ranking = sort_class_indices(predictions, i, num_classes);
        if ranking[0] == actual_class {
            rank1 += 1;
        }
        if ranking[..k].contains(&actual_class) {
            rank5 += 1;
        }
    }

    if targets.is_empty() {
        (0.0, 0.0)
    } else {
        (
            rank1 as f64 / targets.len() as f64,
            rank5 as f64 / targets.len() as f64,
        )
    }
}

/// Class indices of row `i`, sorted by descending score. `sort_by` is
/// stable, so tied scores keep ascending index order.
fn sort_class_indices(predictions: &ArrayD<f32>, i: usize, num_classes: usize) -> Vec<usize> {
    let mut scores: Vec<(usize, f32)> = (0..num_classes)
        .map(|c| (c, predictions[[i, c]]))
        .collect();
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scores.into_iter().map(|(c, _)| c).collect()
}

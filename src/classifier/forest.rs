//! A small random forest over tf-idf rows: bagged CART trees grown by gini
//! impurity, probabilities averaged over per-leaf class fractions.

use rand::rngs::StdRng;
use rand::Rng;

pub const N_TREES: usize = 25;
pub const MAX_DEPTH: usize = 8;
pub const MIN_SAMPLES_SPLIT: usize = 2;

#[derive(Debug, Clone)]
struct TreeNode {
    feature_idx: Option<usize>,
    threshold: f64,
    left: Option<usize>,
    right: Option<usize>,
    /// Fraction of class-1 samples that reached this node during training.
    class1_fraction: f64,
}

#[derive(Debug, Clone)]
struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn fit(
        rows: &[Vec<f64>],
        labels: &[u8],
        indices: &[usize],
        features_per_split: usize,
        rng: &mut StdRng,
    ) -> Self {
        let mut nodes = Vec::new();
        build_node(
            rows,
            labels,
            indices,
            0,
            features_per_split,
            rng,
            &mut nodes,
        );
        Self { nodes }
    }

    fn predict_proba(&self, sample: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            let node = &self.nodes[index];
            match (node.feature_idx, node.left, node.right) {
                (Some(feature), Some(left), Some(right)) => {
                    index = if sample.get(feature).copied().unwrap_or(0.0) <= node.threshold {
                        left
                    } else {
                        right
                    };
                }
                _ => return node.class1_fraction,
            }
        }
    }
}

fn build_node(
    rows: &[Vec<f64>],
    labels: &[u8],
    indices: &[usize],
    depth: usize,
    features_per_split: usize,
    rng: &mut StdRng,
    nodes: &mut Vec<TreeNode>,
) -> usize {
    let node_idx = nodes.len();

    let n_class_1 = indices.iter().filter(|&&i| labels[i] == 1).count();
    let n_class_0 = indices.len() - n_class_1;
    let class1_fraction = if indices.is_empty() {
        0.5
    } else {
        n_class_1 as f64 / indices.len() as f64
    };

    if depth >= MAX_DEPTH
        || indices.len() < MIN_SAMPLES_SPLIT
        || n_class_0 == 0
        || n_class_1 == 0
    {
        nodes.push(leaf(class1_fraction));
        return node_idx;
    }

    let Some((best_feature, best_threshold)) =
        find_best_split(rows, labels, indices, features_per_split, rng)
    else {
        nodes.push(leaf(class1_fraction));
        return node_idx;
    };

    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .partition(|&&i| rows[i][best_feature] <= best_threshold);

    if left_indices.is_empty() || right_indices.is_empty() {
        nodes.push(leaf(class1_fraction));
        return node_idx;
    }

    nodes.push(TreeNode {
        feature_idx: Some(best_feature),
        threshold: best_threshold,
        left: None,
        right: None,
        class1_fraction,
    });

    let left_idx = build_node(
        rows,
        labels,
        &left_indices,
        depth + 1,
        features_per_split,
        rng,
        nodes,
    );
    let right_idx = build_node(
        rows,
        labels,
        &right_indices,
        depth + 1,
        features_per_split,
        rng,
        nodes,
    );

    nodes[node_idx].left = Some(left_idx);
    nodes[node_idx].right = Some(right_idx);
    node_idx
}

fn leaf(class1_fraction: f64) -> TreeNode {
    TreeNode {
        feature_idx: None,
        threshold: 0.0,
        left: None,
        right: None,
        class1_fraction,
    }
}

/// Best gini split over a random feature subsample. `None` when no feature
/// in the subsample has two distinct values.
fn find_best_split(
    rows: &[Vec<f64>],
    labels: &[u8],
    indices: &[usize],
    features_per_split: usize,
    rng: &mut StdRng,
) -> Option<(usize, f64)> {
    let n_features = rows[indices[0]].len();
    let sampled = rand::seq::index::sample(
        rng,
        n_features,
        features_per_split.min(n_features),
    );

    let mut best: Option<(usize, f64)> = None;
    let mut best_gini = f64::MAX;

    for feature in sampled {
        let mut values: Vec<f64> = indices.iter().map(|&i| rows[i][feature]).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup();

        for window in values.windows(2) {
            let threshold = (window[0] + window[1]) / 2.0;
            let gini = split_gini(rows, labels, indices, feature, threshold);
            if gini < best_gini {
                best_gini = gini;
                best = Some((feature, threshold));
            }
        }
    }

    best
}

fn split_gini(
    rows: &[Vec<f64>],
    labels: &[u8],
    indices: &[usize],
    feature: usize,
    threshold: f64,
) -> f64 {
    let mut left = [0usize; 2];
    let mut right = [0usize; 2];

    for &i in indices {
        let side = if rows[i][feature] <= threshold {
            &mut left
        } else {
            &mut right
        };
        side[usize::from(labels[i] == 1)] += 1;
    }

    let total = indices.len() as f64;
    weighted_gini(&left, total) + weighted_gini(&right, total)
}

fn weighted_gini(counts: &[usize; 2], total: f64) -> f64 {
    let n = (counts[0] + counts[1]) as f64;
    if n == 0.0 {
        return 0.0;
    }
    let p0 = counts[0] as f64 / n;
    let p1 = counts[1] as f64 / n;
    let gini = 1.0 - p0 * p0 - p1 * p1;
    (n / total) * gini
}

/// Bagged ensemble of [`N_TREES`] CART trees.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Train on row-per-sample features with binary labels. `None` when the
    /// data is degenerate: no rows, no features, or a single class.
    pub fn fit(rows: &[Vec<f64>], labels: &[u8], rng: &mut StdRng) -> Option<Self> {
        let n_samples = rows.len();
        if n_samples == 0 || rows[0].is_empty() || labels.len() != n_samples {
            return None;
        }
        let n_class_1 = labels.iter().filter(|&&l| l == 1).count();
        if n_class_1 == 0 || n_class_1 == n_samples {
            return None;
        }

        let n_features = rows[0].len();
        let features_per_split = ((n_features as f64).sqrt().ceil() as usize).max(1);

        let trees = (0..N_TREES)
            .map(|_| {
                let bootstrap: Vec<usize> =
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
                DecisionTree::fit(rows, labels, &bootstrap, features_per_split, rng)
            })
            .collect();

        Some(Self { trees })
    }

    /// Mean class-1 probability over all trees, in `[0, 1]`.
    pub fn predict_proba(&self, sample: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }
        let total: f64 = self
            .trees
            .iter()
            .map(|tree| tree.predict_proba(sample))
            .sum();
        total / self.trees.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// Two well-separated clusters on two features.
    fn clustered_data(n_per_class: usize) -> (Vec<Vec<f64>>, Vec<u8>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..n_per_class {
            let jitter = (i % 7) as f64 * 0.01;
            rows.push(vec![0.1 + jitter, 0.9 - jitter]);
            labels.push(0);
            rows.push(vec![0.9 - jitter, 0.1 + jitter]);
            labels.push(1);
        }
        (rows, labels)
    }

    #[test]
    fn learns_a_separable_problem() {
        let (rows, labels) = clustered_data(30);
        let mut rng = StdRng::seed_from_u64(7);
        let forest = RandomForest::fit(&rows, &labels, &mut rng).expect("trains");

        assert!(forest.predict_proba(&[0.1, 0.9]) < 0.5);
        assert!(forest.predict_proba(&[0.9, 0.1]) > 0.5);
    }

    #[test]
    fn probabilities_stay_bounded() {
        let (rows, labels) = clustered_data(10);
        let mut rng = StdRng::seed_from_u64(3);
        let forest = RandomForest::fit(&rows, &labels, &mut rng).unwrap();
        for sample in [[0.0, 0.0], [0.5, 0.5], [1.0, 1.0], [-3.0, 9.0]] {
            let p = forest.predict_proba(&sample);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn single_class_data_is_rejected() {
        let rows = vec![vec![0.1, 0.2]; 8];
        let labels = vec![1u8; 8];
        let mut rng = StdRng::seed_from_u64(1);
        assert!(RandomForest::fit(&rows, &labels, &mut rng).is_none());
    }

    #[test]
    fn empty_data_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(RandomForest::fit(&[], &[], &mut rng).is_none());
        let rows = vec![Vec::new(), Vec::new()];
        assert!(RandomForest::fit(&rows, &[0, 1], &mut rng).is_none());
    }

    #[test]
    fn same_seed_trains_the_same_forest() {
        let (rows, labels) = clustered_data(15);
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let forest_a = RandomForest::fit(&rows, &labels, &mut rng_a).unwrap();
        let forest_b = RandomForest::fit(&rows, &labels, &mut rng_b).unwrap();

        let sample = [0.4, 0.6];
        assert_eq!(
            forest_a.predict_proba(&sample),
            forest_b.predict_proba(&sample)
        );
    }
}

//! Decision Tree implementation
//!
//! CART classification tree grown by exhaustive search over every feature and
//! every observed feature value, minimizing the weighted Gini impurity of the
//! two children.

use super::impurity::{weighted_counts_impurity, ClassCounts};
use crate::data::{Dataset, Direction};
use crate::error::{Result, TreeError};
use anyhow::Context;
use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info};

/// Anything usable as a class label
pub trait ClassLabel: Clone + PartialEq + fmt::Debug {}

impl<T: Clone + PartialEq + fmt::Debug> ClassLabel for T {}

/// Decision tree configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of tree (None = grow until nodes are pure or singletons)
    pub max_depth: Option<usize>,
}

/// Terminal node carrying a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafNode<L> {
    /// Majority class among samples that reached this leaf
    pub label: L,
    /// Gini impurity of the samples at this leaf
    pub impurity: f64,
    /// Per-class sample counts
    pub counts: ClassCounts<L>,
}

/// Internal node splitting on `feature <= threshold`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitNode<L> {
    /// Feature index for split
    pub feature_idx: usize,
    /// Threshold for split, always a value observed in training
    pub threshold: f64,
    /// Gini impurity before splitting
    pub impurity: f64,
    /// Weighted impurity of the chosen split
    pub split_impurity: f64,
    /// Per-class sample counts
    pub counts: ClassCounts<L>,
    /// Samples where feature <= threshold
    pub left: Box<TreeNode<L>>,
    /// Samples where feature > threshold
    pub right: Box<TreeNode<L>>,
}

/// A node in a decision tree (either split node or leaf).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode<L> {
    Leaf(LeafNode<L>),
    Split(SplitNode<L>),
}

impl<L: ClassLabel> TreeNode<L> {
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf(_))
    }

    /// Gini impurity of the samples that reached this node
    pub fn impurity(&self) -> f64 {
        match self {
            TreeNode::Leaf(leaf) => leaf.impurity,
            TreeNode::Split(split) => split.impurity,
        }
    }

    /// Weighted impurity achieved by the split, `None` for leaves
    pub fn split_impurity(&self) -> Option<f64> {
        match self {
            TreeNode::Leaf(_) => None,
            TreeNode::Split(split) => Some(split.split_impurity),
        }
    }

    pub fn counts(&self) -> &ClassCounts<L> {
        match self {
            TreeNode::Leaf(leaf) => &leaf.counts,
            TreeNode::Split(split) => &split.counts,
        }
    }

    /// Number of training samples that reached this node
    pub fn n_samples(&self) -> usize {
        self.counts().n_samples()
    }

    /// Depth of the subtree; a lone leaf has depth 0
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Split(split) => 1 + split.left.depth().max(split.right.depth()),
        }
    }

    pub fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 1,
            TreeNode::Split(split) => split.left.n_leaves() + split.right.n_leaves(),
        }
    }

    /// All leaves, left to right
    pub fn leaves(&self) -> Vec<&LeafNode<L>> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LeafNode<L>>) {
        match self {
            TreeNode::Leaf(leaf) => out.push(leaf),
            TreeNode::Split(split) => {
                split.left.collect_leaves(out);
                split.right.collect_leaves(out);
            }
        }
    }

    /// Walk from this node to a leaf and return its label
    pub fn predict(&self, sample: ArrayView1<f64>) -> Result<&L> {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return Ok(&leaf.label),
                TreeNode::Split(split) => {
                    let value = sample.get(split.feature_idx).ok_or(
                        TreeError::FeatureIndexOutOfBounds {
                            index: split.feature_idx,
                            len: sample.len(),
                        },
                    )?;
                    node = if *value <= split.threshold {
                        &*split.left
                    } else {
                        &*split.right
                    };
                }
            }
        }
    }

    /// Text rendering with feature names (`X1`, `X2`, ... when missing)
    pub fn display<'a>(&'a self, feature_names: &'a [String]) -> TreeDisplay<'a, L> {
        TreeDisplay {
            node: self,
            feature_names,
        }
    }
}

/// Indented text view of a tree, see [`TreeNode::display`]
pub struct TreeDisplay<'a, L> {
    node: &'a TreeNode<L>,
    feature_names: &'a [String],
}

impl<L: ClassLabel + fmt::Display> TreeDisplay<'_, L> {
    fn write_node(&self, f: &mut fmt::Formatter<'_>, node: &TreeNode<L>, indent: &str) -> fmt::Result {
        match node {
            TreeNode::Leaf(leaf) => writeln!(
                f,
                "--> predict: {} (gini={:.3}, samples={})",
                leaf.label,
                leaf.impurity,
                leaf.counts.n_samples()
            ),
            TreeNode::Split(split) => {
                let name = self
                    .feature_names
                    .get(split.feature_idx)
                    .cloned()
                    .unwrap_or_else(|| format!("X{}", split.feature_idx + 1));
                writeln!(
                    f,
                    "[{} <= {:.4}] gini={:.3} weighted={:.3} samples={}",
                    name,
                    split.threshold,
                    split.impurity,
                    split.split_impurity,
                    split.counts.n_samples()
                )?;
                write!(f, "{}|- yes ", indent)?;
                self.write_node(f, &split.left, &format!("{}|  ", indent))?;
                write!(f, "{}|_ no  ", indent)?;
                self.write_node(f, &split.right, &format!("{}   ", indent))
            }
        }
    }
}

impl<L: ClassLabel + fmt::Display> fmt::Display for TreeDisplay<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.node, "")
    }
}

/// Best split found at a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitCandidate {
    pub feature_idx: usize,
    pub threshold: f64,
    /// Weighted Gini impurity of the two children
    pub impurity: f64,
    /// Size of the class-pure child (left checked first), 0 if neither is pure
    pub pure_size: usize,
}

impl SplitCandidate {
    /// Lower impurity, then larger pure child, then larger threshold
    fn beats(&self, other: &SplitCandidate) -> bool {
        if self.impurity != other.impurity {
            return self.impurity < other.impurity;
        }
        if self.pure_size != other.pure_size {
            return self.pure_size > other.pure_size;
        }
        self.threshold > other.threshold
    }
}

/// Whether a node with these counts becomes a leaf.
///
/// Stops on a pure node, on reaching `max_depth`, or with fewer than 2 samples.
pub fn should_stop<L: PartialEq>(counts: &ClassCounts<L>, depth: usize, max_depth: Option<usize>) -> bool {
    if counts.is_pure() {
        return true;
    }
    if max_depth.map_or(false, |max| depth >= max) {
        return true;
    }
    counts.n_samples() < 2
}

/// Exhaustive search over every feature and every distinct value observed
/// among `indices` in that feature.
///
/// Candidates leaving either side empty are skipped. Fails with
/// [`TreeError::InvalidSplitSearch`] when nothing separates the samples.
pub fn find_best_split<L: ClassLabel>(
    features: ArrayView2<f64>,
    labels: &[L],
    indices: &[usize],
    depth: usize,
) -> Result<SplitCandidate> {
    let mut best: Option<SplitCandidate> = None;

    for feature_idx in 0..features.ncols() {
        let column = features.column(feature_idx);

        let mut values: Vec<f64> = indices.iter().map(|&i| column[i]).collect();
        values.sort_by(f64::total_cmp);
        values.dedup();

        for &threshold in &values {
            let mut left = ClassCounts::new();
            let mut right = ClassCounts::new();
            for &i in indices {
                if column[i] <= threshold {
                    left.add(&labels[i]);
                } else {
                    right.add(&labels[i]);
                }
            }

            if left.is_empty() || right.is_empty() {
                continue;
            }

            let pure_size = if left.is_pure() {
                left.n_samples()
            } else if right.is_pure() {
                right.n_samples()
            } else {
                0
            };

            let candidate = SplitCandidate {
                feature_idx,
                threshold,
                impurity: weighted_counts_impurity(&left, &right),
                pure_size,
            };

            if best.as_ref().map_or(true, |b| candidate.beats(b)) {
                best = Some(candidate);
            }
        }
    }

    best.ok_or(TreeError::InvalidSplitSearch {
        n_samples: indices.len(),
        depth,
    })
}

/// Grow a tree over `features` (n_samples x n_features) and `labels`.
///
/// `max_depth = None` grows until every leaf is pure or holds a single
/// sample. Any failure in a subtree fails the whole build.
pub fn build<L: ClassLabel>(
    features: ArrayView2<f64>,
    labels: &[L],
    max_depth: Option<usize>,
) -> Result<TreeNode<L>> {
    if features.nrows() != labels.len() {
        return Err(TreeError::ShapeMismatch {
            rows: features.nrows(),
            labels: labels.len(),
        });
    }
    if labels.is_empty() {
        return Err(TreeError::EmptyDataset);
    }
    if let Some(((row, col), _)) = features.indexed_iter().find(|(_, v)| v.is_nan()) {
        return Err(TreeError::MissingFeature { row, col });
    }

    let indices: Vec<usize> = (0..labels.len()).collect();
    build_node(features, labels, indices, 0, max_depth)
}

fn build_node<L: ClassLabel>(
    features: ArrayView2<f64>,
    labels: &[L],
    indices: Vec<usize>,
    depth: usize,
    max_depth: Option<usize>,
) -> Result<TreeNode<L>> {
    let counts = ClassCounts::from_iter_labels(indices.iter().map(|&i| &labels[i]));
    let impurity = counts.gini();

    if should_stop(&counts, depth, max_depth) {
        let label = counts.majority().cloned().ok_or(TreeError::EmptyDataset)?;
        debug!(depth, samples = indices.len(), impurity, label = ?label, "leaf");
        return Ok(TreeNode::Leaf(LeafNode {
            label,
            impurity,
            counts,
        }));
    }

    let split = find_best_split(features, labels, &indices, depth)?;
    debug!(
        depth,
        samples = indices.len(),
        feature = split.feature_idx,
        threshold = split.threshold,
        impurity,
        split_impurity = split.impurity,
        "split"
    );

    let column = features.column(split.feature_idx);
    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| column[i] <= split.threshold);

    let left = build_node(features, labels, left_indices, depth + 1, max_depth)?;
    let right = build_node(features, labels, right_indices, depth + 1, max_depth)?;

    Ok(TreeNode::Split(SplitNode {
        feature_idx: split.feature_idx,
        threshold: split.threshold,
        impurity,
        split_impurity: split.impurity,
        counts,
        left: Box::new(left),
        right: Box::new(right),
    }))
}

/// Impurity of the whole tree: leaf impurities weighted by leaf sample count.
///
/// Returns 0.0 when the leaves hold no samples.
pub fn total_impurity<L: ClassLabel>(root: &TreeNode<L>) -> f64 {
    let leaves = root.leaves();
    let n_total: usize = leaves.iter().map(|leaf| leaf.counts.n_samples()).sum();
    if n_total == 0 {
        return 0.0;
    }

    leaves
        .iter()
        .map(|leaf| leaf.counts.n_samples() as f64 / n_total as f64 * leaf.impurity)
        .sum()
}

/// Fraction of positions where `truth` and `predicted` agree, 0.0 if empty
pub fn accuracy<L: PartialEq>(truth: &[L], predicted: &[L]) -> f64 {
    let n = truth.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let correct = truth
        .iter()
        .zip(predicted.iter())
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / n as f64
}

/// Decision Tree model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode<Direction>>,
    feature_names: Vec<String>,
}

impl DecisionTree {
    /// Create a new decision tree with config
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            feature_names: Vec::new(),
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self::new(TreeConfig {
            max_depth: Some(max_depth),
        })
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Root of the fitted tree
    pub fn root(&self) -> Option<&TreeNode<Direction>> {
        self.root.as_ref()
    }

    fn fitted_root(&self) -> Result<&TreeNode<Direction>> {
        self.root.as_ref().ok_or(TreeError::NotFitted)
    }

    /// Train the decision tree
    pub fn fit(&mut self, dataset: &Dataset) -> Result<()> {
        let features = dataset.features_array();
        self.fit_matrix(features.view(), &dataset.labels, dataset.feature_names.clone())
    }

    /// Train on a raw feature matrix
    pub fn fit_matrix(
        &mut self,
        features: ArrayView2<f64>,
        labels: &[Direction],
        feature_names: Vec<String>,
    ) -> Result<()> {
        let root = build(features, labels, self.config.max_depth)?;

        info!(
            samples = labels.len(),
            depth = root.depth(),
            leaves = root.n_leaves(),
            total_impurity = total_impurity(&root),
            "decision tree fitted"
        );

        self.feature_names = feature_names;
        self.root = Some(root);
        Ok(())
    }

    /// Predict for a single sample
    pub fn predict_one(&self, features: &[f64]) -> Result<Direction> {
        self.fitted_root()?
            .predict(ArrayView1::from(features))
            .copied()
    }

    /// Predict every row of a feature matrix
    pub fn predict(&self, features: ArrayView2<f64>) -> Result<Vec<Direction>> {
        let root = self.fitted_root()?;
        features
            .rows()
            .into_iter()
            .map(|row| root.predict(row).copied())
            .collect()
    }

    /// Classification accuracy on a dataset
    pub fn accuracy(&self, dataset: &Dataset) -> Result<f64> {
        let predictions = self.predict(dataset.features_array().view())?;
        Ok(accuracy(&dataset.labels, &predictions))
    }

    /// Weighted leaf impurity of the fitted tree
    pub fn total_impurity(&self) -> Result<f64> {
        Ok(total_impurity(self.fitted_root()?))
    }

    /// Tree structure as indented text
    pub fn render(&self) -> Result<String> {
        Ok(self.fitted_root()?.display(&self.feature_names).to_string())
    }

    /// Print tree structure
    pub fn print_tree(&self) {
        match self.render() {
            Ok(text) => print!("{}", text),
            Err(_) => println!("(tree not fitted)"),
        }
    }

    /// Save model to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).context("Failed to serialize model")?;
        Ok(())
    }

    /// Load model from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
        let reader = BufReader::new(file);
        let model = serde_json::from_reader(reader).context("Failed to deserialize model")?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn assert_counts_conserved<L: ClassLabel>(node: &TreeNode<L>) {
        if let TreeNode::Split(split) = node {
            assert_eq!(
                split.left.n_samples() + split.right.n_samples(),
                node.n_samples()
            );
            for (label, count) in node.counts().iter() {
                assert_eq!(
                    split.left.counts().get(label) + split.right.counts().get(label),
                    count
                );
            }
            assert_counts_conserved(&split.left);
            assert_counts_conserved(&split.right);
        }
    }

    #[test]
    fn test_perfect_split_on_observed_value() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = ["Baixa", "Baixa", "Alta", "Alta"];

        let root = build(x.view(), &y, None).unwrap();
        let TreeNode::Split(split) = &root else {
            panic!("expected a split at the root");
        };
        assert_eq!(split.feature_idx, 0);
        assert_eq!(split.threshold, 2.0);
        assert_eq!(split.impurity, 0.5);
        assert_eq!(split.split_impurity, 0.0);

        match (split.left.as_ref(), split.right.as_ref()) {
            (TreeNode::Leaf(left), TreeNode::Leaf(right)) => {
                assert_eq!(left.label, "Baixa");
                assert_eq!(left.impurity, 0.0);
                assert_eq!(left.counts.n_samples(), 2);
                assert_eq!(right.label, "Alta");
                assert_eq!(right.impurity, 0.0);
            }
            other => panic!("expected two leaves, got {:?}", other),
        }
        assert_eq!(total_impurity(&root), 0.0);
    }

    #[test]
    fn test_pure_labels_give_single_leaf() {
        let x = array![[5.0, 1.0], [3.0, 2.0], [9.0, 0.5]];
        let y = ["Alta", "Alta", "Alta"];

        let root = build(x.view(), &y, None).unwrap();
        match &root {
            TreeNode::Leaf(leaf) => {
                assert_eq!(leaf.label, "Alta");
                assert_eq!(leaf.impurity, 0.0);
            }
            _ => panic!("expected a leaf"),
        }
    }

    #[test]
    fn test_max_depth_zero_gives_majority_leaf() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = ["Alta", "Baixa", "Baixa", "Alta", "Baixa"];

        let root = build(x.view(), &y, Some(0)).unwrap();
        assert!(root.is_leaf());
        assert_eq!(root.predict(ndarray::aview1(&[1.0])).unwrap(), &"Baixa");
        assert!((root.impurity() - 0.48).abs() < 1e-12);
    }

    #[test]
    fn test_majority_tie_goes_to_first_seen_label() {
        let x = array![[1.0], [1.0]];

        let root = build(x.view(), &["Alta", "Baixa"], Some(0)).unwrap();
        assert_eq!(root.predict(ndarray::aview1(&[1.0])).unwrap(), &"Alta");

        let root = build(x.view(), &["Baixa", "Alta"], Some(0)).unwrap();
        assert_eq!(root.predict(ndarray::aview1(&[1.0])).unwrap(), &"Baixa");
    }

    #[test]
    fn test_single_sample_is_leaf() {
        let x = array![[42.0, -1.0]];
        let root = build(x.view(), &["Baixa"], None).unwrap();
        assert!(root.is_leaf());
        assert_eq!(root.n_samples(), 1);
    }

    #[test]
    fn test_constant_features_fail_split_search() {
        let x = array![[1.0, 7.0], [1.0, 7.0], [1.0, 7.0]];
        let y = ["Alta", "Baixa", "Alta"];

        let err = build(x.view(), &y, None).unwrap_err();
        assert_eq!(
            err,
            TreeError::InvalidSplitSearch {
                n_samples: 3,
                depth: 0
            }
        );
        assert!(err.is_invariant_violation());

        let mut tree = DecisionTree::new(TreeConfig::default());
        let err = tree
            .fit_matrix(x.view(), &[Direction::Up, Direction::Down, Direction::Up], vec![])
            .unwrap_err();
        assert!(err.is_invariant_violation());
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_input_validation() {
        let x = array![[1.0], [2.0]];
        assert_eq!(
            build(x.view(), &["Alta"], None).unwrap_err(),
            TreeError::ShapeMismatch { rows: 2, labels: 1 }
        );

        let empty: Array2<f64> = Array2::zeros((0, 3));
        let no_labels: [&str; 0] = [];
        assert_eq!(
            build(empty.view(), &no_labels, None).unwrap_err(),
            TreeError::EmptyDataset
        );

        let x = array![[1.0], [f64::NAN]];
        assert_eq!(
            build(x.view(), &["Alta", "Baixa"], None).unwrap_err(),
            TreeError::MissingFeature { row: 1, col: 0 }
        );
    }

    #[test]
    fn test_infinite_values_are_ordinary_thresholds() {
        let x = array![[1.0], [2.0], [f64::INFINITY]];
        let y = ["Baixa", "Baixa", "Alta"];

        let root = build(x.view(), &y, None).unwrap();
        let TreeNode::Split(split) = &root else {
            panic!("expected a split at the root");
        };
        assert_eq!(split.threshold, 2.0);
        assert_eq!(split.split_impurity, 0.0);
        assert_eq!(root.predict(ndarray::aview1(&[f64::INFINITY])).unwrap(), &"Alta");

        let x = array![[f64::NEG_INFINITY], [0.0], [0.0]];
        let root = build(x.view(), &["Alta", "Baixa", "Baixa"], None).unwrap();
        let TreeNode::Split(split) = &root else {
            panic!("expected a split at the root");
        };
        assert_eq!(split.threshold, f64::NEG_INFINITY);
    }

    #[test]
    fn test_equal_candidates_prefer_larger_threshold() {
        let x = array![[1.0, 1.0], [2.0, 1.0], [3.0, 2.0], [4.0, 2.0]];
        let y = ["A", "B", "A", "B"];

        // feature 0 at 1.0 and at 3.0 both isolate one sample in a pure
        // child and leave the same mix on the other side
        let split = find_best_split(x.view(), &y, &[0, 1, 2, 3], 0).unwrap();
        assert_eq!(split.pure_size, 1);
        assert_eq!(split.feature_idx, 0);
        assert_eq!(split.threshold, 3.0);
        assert!((split.impurity - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_pure_size_uses_left_when_both_pure() {
        let candidate = SplitCandidate {
            feature_idx: 0,
            threshold: 1.0,
            impurity: 0.0,
            pure_size: 1,
        };
        let x = array![[1.0], [2.0], [3.0]];
        let split = find_best_split(x.view(), &["A", "B", "B"], &[0, 1, 2], 0).unwrap();
        assert_eq!(split, candidate);
    }

    #[test]
    fn test_larger_threshold_breaks_full_tie() {
        let lower = SplitCandidate {
            feature_idx: 1,
            threshold: 2.0,
            impurity: 0.25,
            pure_size: 0,
        };
        let higher = SplitCandidate {
            threshold: 3.0,
            feature_idx: 0,
            ..lower
        };
        assert!(higher.beats(&lower));
        assert!(!lower.beats(&higher));

        let purer = SplitCandidate {
            pure_size: 2,
            ..lower
        };
        assert!(purer.beats(&higher));

        let cleaner = SplitCandidate {
            impurity: 0.2,
            ..lower
        };
        assert!(cleaner.beats(&purer));
    }

    #[test]
    fn test_counts_conserved_and_deterministic() {
        let x = array![
            [1.0, 10.0],
            [2.0, 9.0],
            [3.0, 8.0],
            [4.0, 7.0],
            [5.0, 6.0],
            [6.0, 5.0],
            [7.0, 9.5],
            [8.0, 1.0]
        ];
        let y = ["A", "B", "A", "B", "B", "A", "A", "B"];

        let first = build(x.view(), &y, None).unwrap();
        let second = build(x.view(), &y, None).unwrap();
        assert_eq!(first, second);
        assert_counts_conserved(&first);
        assert_eq!(first.n_samples(), 8);
    }

    #[test]
    fn test_total_impurity_is_weighted_leaf_mean() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
        let y = ["A", "A", "B", "A", "B", "B"];

        let root = build(x.view(), &y, Some(1)).unwrap();
        let expected: f64 = root
            .leaves()
            .iter()
            .map(|leaf| leaf.counts.n_samples() as f64 / 6.0 * leaf.impurity)
            .sum();
        assert!((total_impurity(&root) - expected).abs() < 1e-12);
        assert!(total_impurity(&root) <= root.impurity() + 1e-12);
    }

    #[test]
    fn test_predict_out_of_bounds_sample() {
        let x = array![[0.0, 1.0], [0.0, 2.0]];
        let root = build(x.view(), &["A", "B"], None).unwrap();
        assert_eq!(
            root.predict(ndarray::aview1(&[0.0])).unwrap_err(),
            TreeError::FeatureIndexOutOfBounds { index: 1, len: 1 }
        );
    }

    #[test]
    fn test_render_uses_feature_names() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = ["Baixa", "Baixa", "Alta", "Alta"];
        let root = build(x.view(), &y, None).unwrap();

        let names = vec!["close".to_string()];
        let text = root.display(&names).to_string();
        assert!(text.starts_with("[close <= 2.0000]"));
        assert!(text.contains("|- yes --> predict: Baixa"));
        assert!(text.contains("|_ no  --> predict: Alta"));

        let text = root.display(&[]).to_string();
        assert!(text.starts_with("[X1 <= 2.0000]"));
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&["A", "B", "A", "B"], &["A", "B", "B", "B"]), 0.75);
        let empty: [&str; 0] = [];
        assert_eq!(accuracy(&empty, &empty), 0.0);
    }

    #[test]
    fn test_unfitted_model() {
        let tree = DecisionTree::new(TreeConfig::default());
        assert!(tree.root().is_none());
        assert_eq!(tree.predict_one(&[1.0]).unwrap_err(), TreeError::NotFitted);
        assert_eq!(tree.total_impurity().unwrap_err(), TreeError::NotFitted);
    }

    #[test]
    fn test_decision_tree_classification() {
        let mut dataset = Dataset::new(vec!["x".to_string()]);
        let start = chrono::NaiveDate::from_ymd_opt(2019, 1, 2).unwrap();
        for i in 0..100 {
            let x = i as f64 / 10.0;
            let label = if x > 5.0 { Direction::Up } else { Direction::Down };
            dataset.add_sample(vec![x], label, start + chrono::Duration::days(i));
        }

        let mut tree = DecisionTree::new(TreeConfig::default());
        tree.fit(&dataset).unwrap();

        assert_eq!(tree.accuracy(&dataset).unwrap(), 1.0);
        assert_eq!(tree.total_impurity().unwrap(), 0.0);
        assert_eq!(tree.predict_one(&[7.5]).unwrap(), Direction::Up);
        assert_eq!(tree.predict_one(&[5.0]).unwrap(), Direction::Down);
    }
}

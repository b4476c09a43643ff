//! Machine learning models module
//!
//! Provides the Gini impurity engine and the CART decision tree.

mod decision_tree;
pub mod impurity;

pub use decision_tree::{
    accuracy, build, find_best_split, should_stop, total_impurity, ClassLabel, DecisionTree,
    LeafNode, SplitCandidate, SplitNode, TreeConfig, TreeDisplay, TreeNode,
};
pub use impurity::{gini, weighted_impurity, ClassCounts};

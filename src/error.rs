//! Error types for tree construction and the data pipeline

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, TreeError>;

/// Main error type for the library
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    /// No (feature, threshold) pair separates a node that should have been split
    #[error("no valid split found for {n_samples} samples at depth {depth}")]
    InvalidSplitSearch { n_samples: usize, depth: usize },

    /// Training requires at least one sample
    #[error("cannot build a tree from an empty dataset")]
    EmptyDataset,

    /// Feature rows and labels disagree in length
    #[error("feature matrix has {rows} rows but {labels} labels were given")]
    ShapeMismatch { rows: usize, labels: usize },

    /// NaN feature value; missing values are not supported
    #[error("missing (NaN) feature value at row {row}, column {col}")]
    MissingFeature { row: usize, col: usize },

    /// Sample is too short for the feature a split node tests
    #[error("feature index {index} out of bounds for sample of length {len}")]
    FeatureIndexOutOfBounds { index: usize, len: usize },

    /// Train ratio leaves one side of the split empty
    #[error("train ratio {ratio} is invalid for {n_samples} samples")]
    InvalidSplitRatio { ratio: f64, n_samples: usize },

    /// Model used before `fit`
    #[error("model has not been fitted")]
    NotFitted,
}

impl TreeError {
    /// Whether the error points at a broken invariant rather than bad input
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, TreeError::InvalidSplitSearch { .. })
    }
}

//! # Bovespa Tree - CART Decision Tree for Daily Direction
//!
//! This library grows a binary decision tree with Gini impurity to predict
//! whether a stock closes higher tomorrow, using daily Bovespa quotes.
//!
//! ## Modules
//!
//! - `data` - Quote loading and the ML dataset
//! - `features` - Feature engineering (returns, moving averages, volatility)
//! - `models` - Gini impurity engine and the decision tree
//! - `error` - Error types
//!
//! ## Example
//!
//! ```rust
//! use bovespa_tree::models::{build, total_impurity, TreeNode};
//! use ndarray::array;
//!
//! let x = array![[1.0], [2.0], [3.0], [4.0]];
//! let y = ["Baixa", "Baixa", "Alta", "Alta"];
//!
//! let root = build(x.view(), &y, None).unwrap();
//! if let TreeNode::Split(split) = &root {
//!     assert_eq!(split.threshold, 2.0);
//! }
//! assert_eq!(total_impurity(&root), 0.0);
//! ```

pub mod data;
pub mod error;
pub mod features;
pub mod models;

pub use data::{Dataset, Direction, Quote, QuoteLoader};
pub use error::{Result, TreeError};
pub use features::FeatureEngine;
pub use models::{DecisionTree, TreeConfig, TreeNode};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::data::{Dataset, Direction, Quote, QuoteLoader, Split};
    pub use crate::error::{Result, TreeError};
    pub use crate::features::{Feature, FeatureEngine};
    pub use crate::models::{
        accuracy, build, gini, total_impurity, weighted_impurity, ClassCounts, DecisionTree,
        TreeConfig, TreeNode,
    };
}

//! Feature engineering module
//!
//! Provides technical indicators and feature generation for the tree.

mod engine;
mod indicators;

pub use engine::{Feature, FeatureEngine};
pub use indicators::*;

//! Dataset structure for machine learning

use crate::error::{Result, TreeError};
use anyhow::Context;
use chrono::NaiveDate;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Next-day price direction, the class being predicted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Next close strictly above today's close
    Up,
    /// Next close at or below today's close
    Down,
}

impl Direction {
    /// Direction implied by two consecutive closes
    pub fn from_closes(today: f64, tomorrow: f64) -> Self {
        if tomorrow > today {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

/// Dataset for machine learning with features and labels
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature matrix (n_samples x n_features)
    pub features: Vec<Vec<f64>>,
    /// Target labels
    pub labels: Vec<Direction>,
    /// Feature names
    pub feature_names: Vec<String>,
    /// Trading day of each sample
    pub dates: Vec<NaiveDate>,
}

/// Train/test split result
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

impl Dataset {
    /// Create a new empty dataset
    pub fn new(feature_names: Vec<String>) -> Self {
        Self {
            features: Vec::new(),
            labels: Vec::new(),
            feature_names,
            dates: Vec::new(),
        }
    }

    /// Number of samples
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    /// Number of features
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Add a sample observed on `date`
    pub fn add_sample(&mut self, features: Vec<f64>, label: Direction, date: NaiveDate) {
        assert_eq!(features.len(), self.feature_names.len());
        self.features.push(features);
        self.labels.push(label);
        self.dates.push(date);
    }

    /// Get feature matrix as ndarray
    pub fn features_array(&self) -> Array2<f64> {
        let n_samples = self.n_samples();
        let n_features = self.n_features();

        if n_samples == 0 {
            return Array2::zeros((0, n_features));
        }

        Array2::from_shape_fn((n_samples, n_features), |(i, j)| self.features[i][j])
    }

    /// Count of samples per direction as `(up, down)`
    pub fn class_balance(&self) -> (usize, usize) {
        let up = self.labels.iter().filter(|&&l| l == Direction::Up).count();
        (up, self.labels.len() - up)
    }

    /// Split into train and test sets (time-series aware)
    ///
    /// The first `floor(n * train_ratio)` samples train, the rest test.
    /// Fails when either side would be empty.
    pub fn train_test_split(&self, train_ratio: f64) -> Result<Split> {
        let n = self.n_samples();
        let limit = (n as f64 * train_ratio) as usize;

        if limit == 0 || limit >= n {
            return Err(TreeError::InvalidSplitRatio {
                ratio: train_ratio,
                n_samples: n,
            });
        }

        let train = Dataset {
            features: self.features[..limit].to_vec(),
            labels: self.labels[..limit].to_vec(),
            feature_names: self.feature_names.clone(),
            dates: self.dates[..limit].to_vec(),
        };

        let test = Dataset {
            features: self.features[limit..].to_vec(),
            labels: self.labels[limit..].to_vec(),
            feature_names: self.feature_names.clone(),
            dates: self.dates[limit..].to_vec(),
        };

        Ok(Split { train, test })
    }

    /// Save to CSV file with a leading `date` and a trailing `label` column
    pub fn save_csv(&self, path: &Path) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;

        let mut header = vec!["date".to_string()];
        header.extend(self.feature_names.iter().cloned());
        header.push("label".to_string());
        writer.write_record(&header)?;

        for ((row, label), date) in self.features.iter().zip(&self.labels).zip(&self.dates) {
            let mut record = vec![date.format("%Y-%m-%d").to_string()];
            record.extend(row.iter().map(|v| v.to_string()));
            record.push(label.to_string());
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}

//! Gini impurity and per-class sample counts

use serde::{Deserialize, Serialize};

/// Per-class sample counts, kept in the order labels were first seen.
///
/// The stable order is what breaks majority ties: when two classes have the
/// same count, the one counted first wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassCounts<L> {
    entries: Vec<(L, usize)>,
}

impl<L: PartialEq> ClassCounts<L> {
    /// Create an empty counter
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Count a single occurrence of `label`
    pub fn add(&mut self, label: &L)
    where
        L: Clone,
    {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((label.clone(), 1)),
        }
    }

    /// Count every label in a slice
    pub fn from_labels(labels: &[L]) -> Self
    where
        L: Clone,
    {
        Self::from_iter_labels(labels.iter())
    }

    /// Count labels yielded by an iterator of references
    pub fn from_iter_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a L>,
        L: Clone + 'a,
    {
        let mut counts = Self::new();
        for label in labels {
            counts.add(label);
        }
        counts
    }

    /// Count for `label`, zero if never seen
    pub fn get(&self, label: &L) -> usize {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// Total number of samples counted
    pub fn n_samples(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when at most one distinct label was counted
    pub fn is_pure(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Most frequent label; ties go to the label counted first
    pub fn majority(&self) -> Option<&L> {
        let mut best: Option<&(L, usize)> = None;
        for entry in &self.entries {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(label, _)| label)
    }

    /// Gini impurity of the counted population
    pub fn gini(&self) -> f64 {
        let n = self.n_samples();
        if n == 0 {
            return 0.0;
        }
        let n = n as f64;
        1.0 - self
            .entries
            .iter()
            .map(|(_, c)| {
                let p = *c as f64 / n;
                p * p
            })
            .sum::<f64>()
    }

    /// Iterate `(label, count)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&L, usize)> {
        self.entries.iter().map(|(l, c)| (l, *c))
    }
}

impl<L: PartialEq> Default for ClassCounts<L> {
    fn default() -> Self {
        Self::new()
    }
}

/// Gini impurity `1 - Σ p_c²` of a label collection.
///
/// Works for any number of distinct labels. An empty collection has
/// impurity 0.0 by convention.
pub fn gini<L: Clone + PartialEq>(labels: &[L]) -> f64 {
    ClassCounts::from_labels(labels).gini()
}

/// Sample-weighted average of the Gini impurity of two sides of a split.
///
/// Returns 0.0 when both sides are empty. An empty side contributes nothing.
pub fn weighted_impurity<L: Clone + PartialEq>(left: &[L], right: &[L]) -> f64 {
    weighted_counts_impurity(
        &ClassCounts::from_labels(left),
        &ClassCounts::from_labels(right),
    )
}

/// Same as [`weighted_impurity`], over already-counted sides
pub fn weighted_counts_impurity<L: PartialEq>(left: &ClassCounts<L>, right: &ClassCounts<L>) -> f64 {
    let n_left = left.n_samples();
    let n_right = right.n_samples();
    let n_total = n_left + n_right;
    if n_total == 0 {
        return 0.0;
    }

    let n_total = n_total as f64;
    (n_left as f64 / n_total) * left.gini() + (n_right as f64 / n_total) * right.gini()
}

//! Rolling-window confidence smoothing of per-frame expression labels.
//!
//! The smoother keeps the most recent raw labels and only confirms a label
//! once it dominates the history. Once the window has filled, a single
//! spurious frame cannot drive a game transition. While it is still filling,
//! shares are taken over the labels seen so far, so the very first frames
//! confirm quickly.

use crate::{
    classifier::Expression,
    constants::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_HISTORY_CAPACITY, EPSILON},
    Error, Result,
};
use std::collections::VecDeque;

/// Result of observing one raw label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Share of the full window taken by the label just observed, 0-100
    pub accuracy_percent: f64,
    /// Majority label, present only when it holds enough of the history
    pub confirmed: Option<Expression>,
}

/// Confidence smoother over a bounded expression history
#[derive(Debug, Clone)]
pub struct ConfidenceSmoother {
    capacity: usize,
    confidence_threshold: f64,
    history: VecDeque<Expression>,
}

impl Default for ConfidenceSmoother {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            history: VecDeque::with_capacity(DEFAULT_HISTORY_CAPACITY),
        }
    }
}

impl ConfidenceSmoother {
    /// Create a smoother with a custom window
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when `capacity` is zero or
    /// `confidence_threshold` is outside `[0, 1]`.
    pub fn new(capacity: usize, confidence_threshold: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidConfiguration(
                "History capacity must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&confidence_threshold) {
            return Err(Error::InvalidConfiguration(format!(
                "Confidence threshold must be between 0.0 and 1.0, got {confidence_threshold}"
            )));
        }

        Ok(Self {
            capacity,
            confidence_threshold,
            history: VecDeque::with_capacity(capacity),
        })
    }

    /// Record a raw label and derive accuracy and confirmation
    pub fn observe(&mut self, label: Expression) -> Observation {
        if self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(label);

        let occurrences = self.count(label);
        let accuracy_percent = 100.0 * occurrences as f64 / self.capacity as f64;

        let confirmed = self.majority().and_then(|(majority, count)| {
            let share = count as f64 / self.history.len() as f64;
            (share + EPSILON >= self.confidence_threshold).then_some(majority)
        });

        Observation {
            accuracy_percent,
            confirmed,
        }
    }

    /// Most frequent label and its count.
    ///
    /// Ties go to the label whose first occurrence in the history is oldest.
    #[must_use]
    pub fn majority(&self) -> Option<(Expression, usize)> {
        let mut tallies: Vec<(Expression, usize)> = Vec::new();
        for label in &self.history {
            match tallies.iter_mut().find(|(seen, _)| seen == label) {
                Some((_, count)) => *count += 1,
                None => tallies.push((*label, 1)),
            }
        }

        tallies.into_iter().fold(None, |best, (label, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((label, count)),
        })
    }

    /// Occurrences of `label` in the current history
    #[must_use]
    pub fn count(&self, label: Expression) -> usize {
        self.history.iter().filter(|&&seen| seen == label).count()
    }

    /// Labels oldest first
    pub fn history(&self) -> impl Iterator<Item = Expression> + '_ {
        self.history.iter().copied()
    }

    /// Number of labels currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no label has been observed since creation or the last reset
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Maximum number of labels held
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Share of the history a label needs to be confirmed
    #[must_use]
    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    /// Discard the history
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

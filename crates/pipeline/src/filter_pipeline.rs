//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::scoring::ScoredVideo;
use crate::traits::{Filter, FilterContext};
use anyhow::{Context, Result};

/// How many videos each filter removed, in pipeline order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterTally {
    entries: Vec<(String, usize)>,
}

impl FilterTally {
    /// Videos removed by the named filter (0 if it did not run)
    pub fn removed_by(&self, filter: &str) -> usize {
        self.entries
            .iter()
            .filter(|(name, _)| name == filter)
            .map(|(_, removed)| removed)
            .sum()
    }

    pub fn total_removed(&self) -> usize {
        self.entries.iter().map(|(_, removed)| removed).sum()
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }
}

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(DuplicateVideoFilter)
///     .add_filter(PublishedWithinFilter::days(90));
///
/// let (kept, tally) = pipeline.apply_with_tally(videos, &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    ///
    /// # Arguments
    /// * `filter` - Any type implementing the Filter trait
    ///
    /// # Returns
    /// Self for method chaining
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence.
    pub fn apply(&self, videos: Vec<ScoredVideo>, context: &FilterContext) -> Result<Vec<ScoredVideo>> {
        self.apply_with_tally(videos, context).map(|(kept, _)| kept)
    }

    /// Apply all filters in sequence, recording what each one removed.
    ///
    /// ## Algorithm
    /// 1. Start with the input videos
    /// 2. For each filter in order:
    ///    a. Log filter name and input count
    ///    b. Apply the filter
    ///    c. Record and log how many videos it removed
    /// 3. Return the kept videos with the tally
    ///
    /// # Returns
    /// * `Ok((kept, tally))` - The videos after all filters
    /// * `Err` - If any filter fails, naming the filter
    pub fn apply_with_tally(
        &self,
        videos: Vec<ScoredVideo>,
        context: &FilterContext,
    ) -> Result<(Vec<ScoredVideo>, FilterTally)> {
        let mut current = videos;
        let mut tally = FilterTally::default();
        for filter in &self.filters {
            let before = current.len();
            tracing::debug!("Applying filter: {} (input count: {})", filter.name(), before);
            current = filter
                .apply(current, context)
                .with_context(|| format!("filter {} failed", filter.name()))?;
            let removed = before.saturating_sub(current.len());
            tracing::debug!(
                "Filter applied: {} (output count: {}, removed: {})",
                filter.name(),
                current.len(),
                removed
            );
            tally.entries.push((filter.name().to_string(), removed));
        }
        Ok((current, tally))
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

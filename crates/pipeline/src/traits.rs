//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to scored videos before ranking.

use crate::scoring::ScoredVideo;
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Per-search facts a filter may consult.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterContext {
    /// Clock reading taken once at the start of the search
    pub now: DateTime<Utc>,
}

impl FilterContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

/// Core trait for filtering scored videos.
///
/// ## Design Note
/// - `Send + Sync` lets a pipeline live inside a shared orchestrator
/// - Filters take ownership of the Vec and return the kept videos, in
///   their original order
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging and tallies)
    fn name(&self) -> &str;

    /// Apply this filter to a set of videos.
    ///
    /// # Arguments
    /// * `videos` - The videos to filter (takes ownership)
    /// * `context` - Clock and content type of the current search
    ///
    /// # Returns
    /// * `Ok(Vec<ScoredVideo>)` - The kept videos
    /// * `Err` - If filtering fails
    fn apply(&self, videos: Vec<ScoredVideo>, context: &FilterContext) -> Result<Vec<ScoredVideo>>;
}

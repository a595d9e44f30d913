//! Optional filter on publish age.
//!
//! Drops videos published longer ago than a configured window, measured
//! from the search's clock reading.

use crate::scoring::ScoredVideo;
use crate::traits::{Filter, FilterContext};
use anyhow::Result;
use chrono::Duration;

/// Keeps videos published within `max_age` of `context.now`.
///
/// ## Algorithm
/// 1. Compute the cutoff as `now - max_age`
/// 2. Keep videos published at or after the cutoff
/// 3. Keep videos without a publish time; their age is unknown
pub struct PublishedWithinFilter {
    max_age: Duration,
}

impl PublishedWithinFilter {
    /// Create a filter for the last `days` days.
    ///
    /// # Arguments
    /// * `days` - Window length in whole days (typically 30-90)
    pub fn days(days: u32) -> Self {
        Self {
            max_age: Duration::days(i64::from(days)),
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }
}

impl Filter for PublishedWithinFilter {
    fn name(&self) -> &str {
        "PublishedWithinFilter"
    }

    fn apply(&self, videos: Vec<ScoredVideo>, context: &FilterContext) -> Result<Vec<ScoredVideo>> {
        let cutoff = context.now - self.max_age;
        Ok(videos
            .into_iter()
            .filter(|video| match video.record.published_at {
                Some(published) => published >= cutoff,
                None => true,
            })
            .collect())
    }
}

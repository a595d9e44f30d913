//! Drops repeated videos.
//!
//! The same video often comes back for several search terms. Only its
//! first occurrence is kept, so the term that surfaced it first wins.

use crate::scoring::ScoredVideo;
use crate::traits::{Filter, FilterContext};
use anyhow::Result;
use std::collections::HashSet;

/// Keep the first video per identifier, preserving order.
///
/// Returns the number of videos dropped.
pub fn retain_first_seen(videos: &mut Vec<ScoredVideo>) -> usize {
    let before = videos.len();
    let mut seen = HashSet::with_capacity(before);
    videos.retain(|video| seen.insert(video.record.id.clone()));
    before - videos.len()
}

/// Removes videos whose identifier already appeared earlier in the set.
pub struct DuplicateVideoFilter;

impl Filter for DuplicateVideoFilter {
    fn name(&self) -> &str {
        "DuplicateVideoFilter"
    }

    fn apply(&self, mut videos: Vec<ScoredVideo>, _context: &FilterContext) -> Result<Vec<ScoredVideo>> {
        retain_first_seen(&mut videos);
        Ok(videos)
    }
}

//! Final ordering of a search's videos.

use crate::filters::retain_first_seen;
use crate::scoring::ScoredVideo;
use catalog::ContentType;
use serde::Serialize;
use std::cmp::Ordering;

/// Ranked, deduplicated, capped videos for one search.
///
/// Invariants: identifiers are unique, view counts are non-increasing, and
/// the length never exceeds the content type's cap.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    videos: Vec<ScoredVideo>,
}

/// Most views first; equal views fall back to identifier order.
pub fn by_views_desc(a: &ScoredVideo, b: &ScoredVideo) -> Ordering {
    b.views()
        .cmp(&a.views())
        .then_with(|| a.record.id.cmp(&b.record.id))
}

impl ResultSet {
    /// Rank merged videos for `content_type`.
    ///
    /// ## Algorithm
    /// 1. Drop repeated identifiers, keeping the first occurrence
    /// 2. Sort by views descending, then identifier ascending
    /// 3. Truncate to the content type's cap (30 videos, 20 shorts)
    pub fn rank(videos: Vec<ScoredVideo>, content_type: ContentType) -> Self {
        Self::rank_with_cap(videos, content_type.result_cap())
    }

    pub fn rank_with_cap(mut videos: Vec<ScoredVideo>, cap: usize) -> Self {
        retain_first_seen(&mut videos);
        videos.sort_by(by_views_desc);
        videos.truncate(cap);
        Self { videos }
    }

    pub fn videos(&self) -> &[ScoredVideo] {
        &self.videos
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredVideo> {
        self.videos.iter()
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn into_videos(self) -> Vec<ScoredVideo> {
        self.videos
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ScoredVideo;
    type IntoIter = std::slice::Iter<'a, ScoredVideo>;

    fn into_iter(self) -> Self::IntoIter {
        self.videos.iter()
    }
}

//! Outlier scoring.
//!
//! A video's outlier score is its view count divided by its channel's
//! baseline, rounded to one decimal. A score of 2.0 means the video drew
//! twice the views the channel usually gets.

use catalog::{VideoId, VideoRecord};
use chrono::NaiveDate;
use serde::Serialize;
use sources::{Candidate, ChannelBaseline};
use std::fmt;

/// Scores above this are `High`
pub const HIGH_BAND_THRESHOLD: f64 = 1.5;

/// Scores above this (up to the high threshold) are `Medium`
pub const MEDIUM_BAND_THRESHOLD: f64 = 1.0;

/// Score a view count against a baseline.
///
/// Returns `round(views / baseline, 1)`, with ties going to the even tenth
/// (1.05 scores 1.0, 1.35 scores 1.4). A baseline that is zero, negative or
/// not finite scores 0.
///
/// # Examples
/// ```
/// use pipeline::outlier_score;
///
/// assert_eq!(outlier_score(500, 200.0), 2.5);
/// assert_eq!(outlier_score(500, 0.0), 0.0);
/// ```
pub fn outlier_score(views: u64, baseline: f64) -> f64 {
    if !baseline.is_finite() || baseline <= 0.0 {
        return 0.0;
    }
    let ratio = views as f64 / baseline;
    (ratio * 10.0).round_ties_even() / 10.0
}

/// Presentation banding of an outlier score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    /// Well above the channel's usual performance
    High,
    Medium,
    /// At or below the channel's usual performance
    Low,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_BAND_THRESHOLD {
            ScoreBand::High
        } else if score > MEDIUM_BAND_THRESHOLD {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::High => "high",
            ScoreBand::Medium => "medium",
            ScoreBand::Low => "low",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fetched video with its outlier score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredVideo {
    #[serde(flatten)]
    pub record: VideoRecord,
    pub score: f64,
    /// Baseline the score was computed against
    pub baseline: ChannelBaseline,
    /// Publish time as a UTC calendar date
    pub published_on: Option<NaiveDate>,
    /// Search term that surfaced the video
    pub term: String,
}

impl ScoredVideo {
    /// Score a candidate against its channel's baseline.
    pub fn new(candidate: Candidate, baseline: ChannelBaseline) -> Self {
        let score = outlier_score(candidate.record.view_count, baseline.value());
        let published_on = candidate.record.published_at.map(|at| at.date_naive());
        Self {
            record: candidate.record,
            score,
            baseline,
            published_on,
            term: candidate.term,
        }
    }

    pub fn id(&self) -> &VideoId {
        &self.record.id
    }

    pub fn views(&self) -> u64 {
        self.record.view_count
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }
}

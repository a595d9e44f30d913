//! Request and outcome values of a search.

use anyhow::anyhow;
use catalog::{ChannelId, ContentType};
use pipeline::{AggregateReport, ResultSet};
use serde::{Deserialize, Serialize};

/// What the caller wants searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub keyword: String,
    #[serde(default)]
    pub content_type: ContentType,
}

impl SearchRequest {
    pub fn new(keyword: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            keyword: keyword.into(),
            content_type,
        }
    }

    pub fn videos(keyword: impl Into<String>) -> Self {
        Self::new(keyword, ContentType::Video)
    }

    pub fn shorts(keyword: impl Into<String>) -> Self {
        Self::new(keyword, ContentType::Short)
    }
}

/// Bookkeeping for one search, for logging and `--explain`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchCounters {
    /// Search hits across all terms, before any skipping
    pub candidates_seen: usize,
    /// Hits skipped because their statistics were unavailable
    pub missing_statistics: usize,
    /// Repeats of a video already surfaced by an earlier term
    pub duplicates_dropped: usize,
    /// Videos dropped by the publish-age window
    pub outside_window: usize,
    /// Videos ranked below the content type's cap
    pub beyond_cap: usize,
    /// Channels whose baseline could not be fetched
    pub baseline_unavailable: usize,
}

/// Everything a completed search produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    pub keyword: String,
    pub content_type: ContentType,
    /// Terms actually searched, keyword first
    pub terms: Vec<String>,
    pub results: ResultSet,
    pub report: AggregateReport,
    pub counters: SearchCounters,
    /// Channels scored against an unknown baseline, sorted
    pub unavailable_channels: Vec<ChannelId>,
}

/// Result of one search invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Completed(SearchReport),
    /// A search or statistics call failed; no partial results are kept
    Failed { reason: String },
    /// The request was rejected before any service call
    InvalidRequest { reason: String },
}

impl SearchOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SearchOutcome::Completed(_))
    }

    pub fn report(&self) -> Option<&SearchReport> {
        match self {
            SearchOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }

    /// Convert into a `Result`, turning failures into errors.
    pub fn into_result(self) -> anyhow::Result<SearchReport> {
        match self {
            SearchOutcome::Completed(report) => Ok(report),
            SearchOutcome::Failed { reason } => Err(anyhow!("search failed: {reason}")),
            SearchOutcome::InvalidRequest { reason } => Err(anyhow!("invalid request: {reason}")),
        }
    }
}

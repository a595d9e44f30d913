//! Scoring, filtering, ranking and reporting of fetched videos.
//!
//! This crate provides:
//! - `outlier_score` and `ScoredVideo` for scoring candidates against their
//!   channel baseline
//! - Filter trait and implementations, composed with FilterPipeline
//! - `ResultSet` for the final deduplicated, sorted, capped ranking
//! - `AggregateReport` for the summary numbers and score histogram
//!
//! ## Architecture
//! Scored videos flow through the stages in order:
//! 1. Filters remove unwanted videos (repeats across terms, stale uploads)
//! 2. `ResultSet::rank` sorts by views and applies the content-type cap
//! 3. `AggregateReport` summarizes what is left
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::filters::*;
//! use pipeline::{AggregateReport, FilterContext, FilterPipeline, ResultSet};
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(DuplicateVideoFilter)
//!     .add_filter(PublishedWithinFilter::days(90));
//!
//! let context = FilterContext::new(now);
//! let (kept, tally) = pipeline.apply_with_tally(scored, &context)?;
//! let results = ResultSet::rank(kept, ContentType::Video);
//! let report = AggregateReport::from_results(&results, 20);
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod ranking;
pub mod report;
pub mod scoring;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use filter_pipeline::{FilterPipeline, FilterTally};
pub use ranking::ResultSet;
pub use report::{AggregateReport, BandCounts, ChannelSummary, Histogram, HistogramBin, DEFAULT_HISTOGRAM_BINS};
pub use scoring::{outlier_score, ScoreBand, ScoredVideo};
pub use traits::{Filter, FilterContext};

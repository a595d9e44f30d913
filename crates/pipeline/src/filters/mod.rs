//! Filter implementations for the scoring pipeline.
//!
//! This module contains the concrete filters that can be composed into a
//! FilterPipeline ahead of ranking.

pub mod duplicate;
pub mod recency;

// Re-export for convenience
pub use duplicate::{retain_first_seen, DuplicateVideoFilter};
pub use recency::PublishedWithinFilter;

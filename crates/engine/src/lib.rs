//! Engine crate for the Outlier Scout search.
//!
//! This crate contains the orchestrator that runs one outlier search end to
//! end, and the request and outcome values it exchanges with callers.

pub mod orchestrator;
pub mod outcome;

pub use orchestrator::{OutlierSearchOrchestrator, SearchSettings};
pub use outcome::{SearchCounters, SearchOutcome, SearchReport, SearchRequest};

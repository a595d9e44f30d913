//! # Sources Crate
//!
//! Candidate generation for outlier searches: everything that talks to the
//! catalog or suggestion service on behalf of a single search.
//!
//! ## Components
//!
//! ### Query expansion (`terms`)
//! The keyword plus up to two suggested phrasings. A failing or silent
//! suggestion service degrades to the keyword alone.
//!
//! ### Candidate retrieval (`retrieval`)
//! One search per term, then one batched statistics call for its hits.
//!
//! ### Channel baselines (`baseline`)
//! Mean views over a channel's recent uploads, memoized per search.
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::ContentType;
//! use sources::{BaselineEstimator, BaselineLedger, CandidateRetriever, QueryExpander};
//!
//! let terms = QueryExpander::new().expand(&suggester, "cooking", ContentType::Video).await;
//! let batch = CandidateRetriever::new().fetch_term(&catalog, &terms[0], ContentType::Video).await?;
//!
//! let estimator = BaselineEstimator::new();
//! let mut ledger = BaselineLedger::new();
//! for candidate in &batch.candidates {
//!     let baseline = ledger.resolve(&estimator, &catalog, &candidate.record.channel_id).await;
//! }
//! ```

// Public modules
pub mod baseline;
pub mod retrieval;
pub mod terms;
pub mod types;

// Re-export commonly used types
pub use baseline::{BaselineEstimator, BaselineLedger, DEFAULT_UPLOADS_SAMPLE};
pub use retrieval::{CandidateRetriever, TermBatch};
pub use terms::{QueryExpander, DEFAULT_MAX_SUGGESTIONS};
pub use types::{Candidate, ChannelBaseline};

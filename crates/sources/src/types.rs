//! Types shared by the candidate sources.

use catalog::VideoRecord;
use serde::{Deserialize, Serialize};

/// A channel's expected performance, derived from its recent uploads.
///
/// Only `Measured` carries a usable number. `NoUploads` and `Unavailable`
/// both score as zero, but stay distinguishable so that a failed lookup is
/// never mistaken for a genuinely quiet channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChannelBaseline {
    /// Mean views over `samples` recent uploads
    Measured { mean_views: f64, samples: usize },
    /// The channel has no uploads with readable statistics
    NoUploads,
    /// The baseline could not be fetched
    Unavailable { reason: String },
}

impl ChannelBaseline {
    /// Build from the view counts of a channel's recent uploads.
    pub fn from_views(views: &[u64]) -> Self {
        if views.is_empty() {
            return ChannelBaseline::NoUploads;
        }
        let total: f64 = views.iter().map(|&v| v as f64).sum();
        ChannelBaseline::Measured {
            mean_views: total / views.len() as f64,
            samples: views.len(),
        }
    }

    /// Numeric baseline used for scoring; 0 unless measured.
    pub fn value(&self) -> f64 {
        match self {
            ChannelBaseline::Measured { mean_views, .. } => *mean_views,
            ChannelBaseline::NoUploads | ChannelBaseline::Unavailable { .. } => 0.0,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, ChannelBaseline::Unavailable { .. })
    }
}

/// A fetched video together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub record: VideoRecord,
    /// Search term that surfaced this video
    pub term: String,
}

impl Candidate {
    pub fn new(record: VideoRecord, term: impl Into<String>) -> Self {
        Self {
            record,
            term: term.into(),
        }
    }
}

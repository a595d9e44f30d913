//! Aggregate statistics over a ranked result set.
//!
//! Pure functions; nothing here calls a collaborator.

use crate::ranking::ResultSet;
use crate::scoring::{ScoreBand, ScoredVideo};
use catalog::ChannelId;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Default number of histogram bins
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Channels listed in the top-channels table
pub const TOP_CHANNELS: usize = 5;

/// One equal-width histogram bin, `[lower, upper)`.
///
/// The last bin of a histogram also includes `upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Fixed-bin histogram of outlier scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Bin `scores` into `bin_count` equal-width bins over `[min, max]`.
    ///
    /// No scores gives no bins. When every score is equal the span is
    /// `[min, min + 1)`, so all of them land in the first bin. A bin count of
    /// zero is treated as one.
    pub fn from_scores(scores: &[f64], bin_count: usize) -> Self {
        let finite: Vec<f64> = scores.iter().copied().filter(|s| s.is_finite()).collect();
        if finite.is_empty() {
            return Self::default();
        }

        let bin_count = bin_count.max(1);
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max <= min {
            max = min + 1.0;
        }
        let width = (max - min) / bin_count as f64;

        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                lower: min + width * i as f64,
                upper: if i + 1 == bin_count {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for score in finite {
            let index = (((score - min) / width).floor() as usize).min(bin_count - 1);
            bins[index].count += 1;
        }

        Self { bins }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Largest bin count, for scaling bar charts
    pub fn peak(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// A channel's showing within the result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub videos: usize,
    pub mean_views: f64,
}

/// Videos per score band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BandCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl BandCounts {
    pub fn count(&self, band: ScoreBand) -> usize {
        match band {
            ScoreBand::High => self.high,
            ScoreBand::Medium => self.medium,
            ScoreBand::Low => self.low,
        }
    }
}

/// Summary numbers for a result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateReport {
    pub mean_views: f64,
    pub mean_score: f64,
    pub distinct_channels: usize,
    pub histogram: Histogram,
    pub top_channels: Vec<ChannelSummary>,
    pub bands: BandCounts,
}

impl AggregateReport {
    /// Summarize a ranked result set.
    pub fn from_results(results: &ResultSet, histogram_bins: usize) -> Self {
        Self::summarize(results.videos(), histogram_bins)
    }

    /// Summarize any slice of scored videos.
    ///
    /// Empty input gives zero means, zero channels and an empty histogram.
    pub fn summarize(videos: &[ScoredVideo], histogram_bins: usize) -> Self {
        if videos.is_empty() {
            return Self::default();
        }

        let count = videos.len() as f64;
        let mean_views = videos.iter().map(|v| v.views() as f64).sum::<f64>() / count;
        let mean_score = videos.iter().map(|v| v.score).sum::<f64>() / count;
        let distinct_channels = videos
            .iter()
            .map(|v| v.record.channel_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        let scores: Vec<f64> = videos.iter().map(|v| v.score).collect();

        let mut bands = BandCounts::default();
        for video in videos {
            match video.band() {
                ScoreBand::High => bands.high += 1,
                ScoreBand::Medium => bands.medium += 1,
                ScoreBand::Low => bands.low += 1,
            }
        }

        Self {
            mean_views,
            mean_score,
            distinct_channels,
            histogram: Histogram::from_scores(&scores, histogram_bins),
            top_channels: top_channels(videos, TOP_CHANNELS),
            bands,
        }
    }
}

/// Channels ranked by mean views of their videos, best first.
///
/// Ties are broken by channel name, then channel id.
pub fn top_channels(videos: &[ScoredVideo], limit: usize) -> Vec<ChannelSummary> {
    // channel id -> (name, video count, total views)
    let mut per_channel: HashMap<&str, (&str, usize, f64)> = HashMap::new();
    for video in videos {
        let entry = per_channel
            .entry(video.record.channel_id.as_str())
            .or_insert((video.record.channel_name.as_str(), 0, 0.0));
        entry.1 += 1;
        entry.2 += video.views() as f64;
    }

    let mut summaries: Vec<ChannelSummary> = per_channel
        .into_iter()
        .map(|(id, (name, videos, total))| ChannelSummary {
            channel_id: id.to_string(),
            channel_name: name.to_string(),
            videos,
            mean_views: total / videos as f64,
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.mean_views
            .total_cmp(&a.mean_views)
            .then_with(|| a.channel_name.cmp(&b.channel_name))
            .then_with(|| a.channel_id.cmp(&b.channel_id))
    });
    summaries.truncate(limit);
    summaries
}

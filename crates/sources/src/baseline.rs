//! Channel baselines.
//!
//! A channel's baseline is the mean view count of its most recent uploads.
//!
//! ## Algorithm
//! 1. Resolve the channel's uploads playlist
//! 2. List the newest `sample_size` video ids from it
//! 3. Fetch statistics for those ids in one batch
//! 4. Average the view counts that came back
//!
//! A channel with no playlist, no items or no readable statistics is
//! `NoUploads`. Any service error makes it `Unavailable`; nothing here
//! propagates an error to the caller.

use crate::types::ChannelBaseline;
use catalog::{CatalogService, ChannelId};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Recent uploads averaged per channel
pub const DEFAULT_UPLOADS_SAMPLE: usize = 10;

/// Upper bound on the sample, one playlist page
pub const MAX_UPLOADS_SAMPLE: usize = 50;

/// Estimates channel baselines from recent uploads
#[derive(Debug, Clone)]
pub struct BaselineEstimator {
    sample_size: usize,
}

impl BaselineEstimator {
    pub fn new() -> Self {
        Self {
            sample_size: DEFAULT_UPLOADS_SAMPLE,
        }
    }

    /// Configure how many recent uploads to average (default: 10, range 1..=50)
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size.clamp(1, MAX_UPLOADS_SAMPLE);
        self
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Estimate the baseline for one channel.
    #[instrument(skip(self, catalog))]
    pub async fn estimate<C: CatalogService>(&self, catalog: &C, channel_id: &str) -> ChannelBaseline {
        match self.measure(catalog, channel_id).await {
            Ok(baseline) => {
                debug!("Baseline for {}: {:?}", channel_id, baseline);
                baseline
            }
            Err(e) => {
                warn!("Baseline unavailable for channel {}: {}", channel_id, e);
                ChannelBaseline::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn measure<C: CatalogService>(
        &self,
        catalog: &C,
        channel_id: &str,
    ) -> catalog::Result<ChannelBaseline> {
        let Some(playlist) = catalog.channel_uploads_playlist(channel_id).await? else {
            return Ok(ChannelBaseline::NoUploads);
        };

        let mut recent = catalog.playlist_recent_items(&playlist, self.sample_size).await?;
        recent.truncate(self.sample_size);
        if recent.is_empty() {
            return Ok(ChannelBaseline::NoUploads);
        }

        let stats = catalog.video_statistics(&recent).await?;
        let views: Vec<u64> = recent
            .iter()
            .filter_map(|id| stats.get(id))
            .map(|s| s.view_count)
            .collect();

        Ok(ChannelBaseline::from_views(&views))
    }
}

impl Default for BaselineEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Baselines resolved during one search, so each channel is fetched once.
#[derive(Debug, Default)]
pub struct BaselineLedger {
    entries: HashMap<ChannelId, ChannelBaseline>,
}

impl BaselineLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached baseline for `channel_id`, estimating it on first use.
    pub async fn resolve<C: CatalogService>(
        &mut self,
        estimator: &BaselineEstimator,
        catalog: &C,
        channel_id: &str,
    ) -> ChannelBaseline {
        if let Some(known) = self.entries.get(channel_id) {
            return known.clone();
        }
        let baseline = estimator.estimate(catalog, channel_id).await;
        self.entries.insert(channel_id.to_string(), baseline.clone());
        baseline
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Channels whose baseline could not be fetched, sorted
    pub fn unavailable_channels(&self) -> Vec<ChannelId> {
        let mut channels: Vec<ChannelId> = self
            .entries
            .iter()
            .filter(|(_, baseline)| baseline.is_unavailable())
            .map(|(id, _)| id.clone())
            .collect();
        channels.sort();
        channels
    }
}

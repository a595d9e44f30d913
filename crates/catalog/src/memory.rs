//! In-memory collaborators.
//!
//! `InMemoryCatalog` and `StaticSuggestions` answer from data held in memory.
//! They back offline runs from a fixture file and stand in for the real
//! services in tests.
//!
//! Fixture format (JSON):
//! ```json
//! {
//!   "suggestions": ["easy cooking", "cooking tips"],
//!   "catalog": {
//!     "searches":   { "cooking": [ { "video_id": "v1", "title": "...", ... } ] },
//!     "statistics": { "v1": { "view_count": 500, "like_count": null, "comment_count": null } },
//!     "uploads":    { "UC1": ["u1", "u2"] }
//!   }
//! }
//! ```

use crate::error::{Result, ServiceError, CATALOG_SERVICE, SUGGESTION_SERVICE};
use crate::service::{CatalogService, SuggestionService};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

const UPLOADS_PREFIX: &str = "uploads:";

/// Errors that can occur while loading a fixture file
#[derive(Error, Debug)]
pub enum FixtureError {
    /// I/O error occurred while reading the file
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid fixture document
    #[error("Invalid fixture {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Catalog that answers from in-memory tables.
///
/// Search results are returned most-viewed first (videos without statistics
/// last), truncated to the query limit. Every call is recorded so tests can
/// assert on the exact sequence of requests.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    #[serde(default)]
    searches: HashMap<String, Vec<SearchHit>>,
    #[serde(default)]
    statistics: HashMap<VideoId, VideoStatistics>,
    /// Channel uploads, newest first
    #[serde(default)]
    uploads: HashMap<ChannelId, Vec<VideoId>>,
    #[serde(default)]
    failing_channels: HashSet<ChannelId>,
    #[serde(default)]
    failing_terms: HashSet<String>,
    #[serde(skip)]
    calls: Mutex<Vec<String>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a search result under a term (appended in order).
    pub fn insert_hit(&mut self, term: &str, hit: SearchHit) {
        self.searches.entry(term.to_string()).or_default().push(hit);
    }

    /// Register statistics for a video.
    pub fn insert_statistics(&mut self, video_id: &str, stats: VideoStatistics) {
        self.statistics.insert(video_id.to_string(), stats);
    }

    /// Register a channel's uploads, newest first.
    pub fn insert_uploads(&mut self, channel_id: &str, video_ids: Vec<VideoId>) {
        self.uploads.insert(channel_id.to_string(), video_ids);
    }

    /// Make every lookup for this channel fail as if the service were down.
    pub fn fail_channel(&mut self, channel_id: &str) {
        self.failing_channels.insert(channel_id.to_string());
    }

    /// Make searches for this term fail as if the service were down.
    pub fn fail_term(&mut self, term: &str) {
        self.failing_terms.insert(term.to_string());
    }

    /// Requests received so far, formatted as `operation:argument`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Terms that were searched, in call order.
    pub fn searched_terms(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| call.strip_prefix("search:").map(str::to_string))
            .collect()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn unavailable(reason: String) -> ServiceError {
        ServiceError::Unavailable {
            service: CATALOG_SERVICE,
            reason,
        }
    }
}

impl CatalogService for InMemoryCatalog {
    async fn channel_uploads_playlist(&self, channel_id: &str) -> Result<Option<PlaylistId>> {
        self.record(format!("channel:{channel_id}"));
        if self.failing_channels.contains(channel_id) {
            return Err(Self::unavailable(format!("channel {channel_id} lookup failed")));
        }
        Ok(self
            .uploads
            .contains_key(channel_id)
            .then(|| format!("{UPLOADS_PREFIX}{channel_id}")))
    }

    async fn playlist_recent_items(&self, playlist_id: &str, limit: usize) -> Result<Vec<VideoId>> {
        self.record(format!("playlist:{playlist_id}"));
        let channel_id = playlist_id.strip_prefix(UPLOADS_PREFIX).unwrap_or(playlist_id);
        if self.failing_channels.contains(channel_id) {
            return Err(Self::unavailable(format!("playlist {playlist_id} lookup failed")));
        }
        Ok(self
            .uploads
            .get(channel_id)
            .map(|ids| ids.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn video_statistics(
        &self,
        video_ids: &[VideoId],
    ) -> Result<HashMap<VideoId, VideoStatistics>> {
        self.record(format!("statistics:{}", video_ids.join(",")));
        Ok(video_ids
            .iter()
            .filter_map(|id| self.statistics.get(id).map(|s| (id.clone(), *s)))
            .collect())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        self.record(format!("search:{}", query.term));
        if self.failing_terms.contains(&query.term) {
            return Err(Self::unavailable(format!("search for '{}' failed", query.term)));
        }
        let mut hits = self.searches.get(&query.term).cloned().unwrap_or_default();
        // Stable sort keeps registration order among equal view counts.
        hits.sort_by_key(|hit| {
            std::cmp::Reverse(self.statistics.get(&hit.video_id).map(|s| s.view_count))
        });
        hits.truncate(query.limit);
        Ok(hits)
    }
}

/// Suggestion service with a fixed reply.
///
/// `None` makes every call fail as if the service were down.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticSuggestions {
    reply: Option<Vec<String>>,
}

impl StaticSuggestions {
    pub fn replying(reply: Vec<String>) -> Self {
        Self { reply: Some(reply) }
    }

    pub fn failing() -> Self {
        Self { reply: None }
    }
}

impl SuggestionService for StaticSuggestions {
    async fn suggest(&self, _prompt: &str) -> Result<Vec<String>> {
        self.reply.clone().ok_or_else(|| ServiceError::Unavailable {
            service: SUGGESTION_SERVICE,
            reason: "no suggestions configured".to_string(),
        })
    }
}

/// Both collaborators loaded from one fixture document.
#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub catalog: InMemoryCatalog,
}

impl Fixture {
    /// Load a fixture from a JSON file.
    pub fn load_from_file(path: &Path) -> std::result::Result<Self, FixtureError> {
        let display = path.display().to_string();
        let body = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| FixtureError::Parse {
            path: display,
            source,
        })
    }

    /// Split into the two collaborators.
    pub fn into_services(self) -> (InMemoryCatalog, StaticSuggestions) {
        (self.catalog, StaticSuggestions::replying(self.suggestions))
    }
}

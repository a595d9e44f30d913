//! YouTube Data API v3 catalog client.
//!
//! Endpoints used (documentation: https://developers.google.com/youtube/v3/docs):
//! - `channels?part=contentDetails`      -> uploads playlist id
//! - `playlistItems?part=snippet`        -> recent upload ids
//! - `videos?part=statistics`            -> view/like/comment counts
//! - `search?part=snippet&type=video`    -> candidate videos

use std::collections::HashMap;

use catalog::parser;
use catalog::{
    CatalogService, PlaylistId, SearchHit, SearchQuery, VideoId, VideoStatistics, CATALOG_SERVICE,
};
use tracing::{debug, instrument};

use crate::{fetch_body, normalize_base_url, require_key, ClientError};

/// Public API root
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Largest page / id batch the API accepts
const MAX_PAGE_SIZE: usize = 50;

/// Catalog backed by the YouTube Data API.
#[derive(Clone)]
pub struct YouTubeCatalog {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YouTubeCatalog {
    /// Create a client against the public API.
    ///
    /// # Arguments
    /// * `http` - Shared HTTP client (see `build_http_client`)
    /// * `api_key` - Data API key; blank keys are rejected
    pub fn new(http: reqwest::Client, api_key: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: require_key(CATALOG_SERVICE, api_key)?,
        })
    }

    /// Point the client at a different API root (proxies, test servers).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ClientError> {
        self.base_url = normalize_base_url(CATALOG_SERVICE, base_url)?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, resource: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}/{}", self.base_url, resource))
            .query(&[("key", self.api_key.as_str())])
    }
}

impl CatalogService for YouTubeCatalog {
    #[instrument(skip(self))]
    async fn channel_uploads_playlist(&self, channel_id: &str) -> catalog::Result<Option<PlaylistId>> {
        let request = self
            .get("channels")
            .query(&[("part", "contentDetails"), ("id", channel_id)]);
        let body = fetch_body(CATALOG_SERVICE, request).await?;
        parser::parse_uploads_playlist(&body)
    }

    #[instrument(skip(self))]
    async fn playlist_recent_items(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> catalog::Result<Vec<VideoId>> {
        let max_results = limit.clamp(1, MAX_PAGE_SIZE).to_string();
        let request = self.get("playlistItems").query(&[
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ]);
        let body = fetch_body(CATALOG_SERVICE, request).await?;
        let mut ids = parser::parse_playlist_video_ids(&body)?;
        ids.truncate(limit);
        Ok(ids)
    }

    #[instrument(skip(self, video_ids), fields(count = video_ids.len()))]
    async fn video_statistics(
        &self,
        video_ids: &[VideoId],
    ) -> catalog::Result<HashMap<VideoId, VideoStatistics>> {
        let mut stats = HashMap::with_capacity(video_ids.len());
        for chunk in video_ids.chunks(MAX_PAGE_SIZE) {
            let ids = chunk.join(",");
            let request = self
                .get("videos")
                .query(&[("part", "statistics"), ("id", ids.as_str())]);
            let body = fetch_body(CATALOG_SERVICE, request).await?;
            stats.extend(parser::parse_video_statistics(&body)?);
        }
        debug!("Statistics available for {} of {} videos", stats.len(), video_ids.len());
        Ok(stats)
    }

    #[instrument(skip(self, query), fields(term = %query.term))]
    async fn search(&self, query: &SearchQuery) -> catalog::Result<Vec<SearchHit>> {
        let max_results = query.limit.clamp(1, MAX_PAGE_SIZE).to_string();
        // Searches are always most-viewed first and limited to HD uploads.
        let request = self.get("search").query(&[
            ("part", "snippet"),
            ("type", "video"),
            ("q", query.term.as_str()),
            ("order", "viewCount"),
            ("videoDuration", query.duration.as_param()),
            ("videoDefinition", "high"),
            ("maxResults", max_results.as_str()),
        ]);
        let body = fetch_body(CATALOG_SERVICE, request).await?;
        let mut hits = parser::parse_search_hits(&body)?;
        hits.truncate(query.limit);
        Ok(hits)
    }
}

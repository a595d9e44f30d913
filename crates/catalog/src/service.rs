//! Collaborator traits consumed by the outlier pipeline.
//!
//! The pipeline never talks HTTP itself. It is handed implementations of
//! these traits, which lets tests substitute in-memory fakes.

use crate::error::Result;
use crate::types::{PlaylistId, SearchHit, SearchQuery, VideoId, VideoStatistics};
use std::collections::HashMap;
use std::future::Future;

/// Paged search and statistics provider for the video platform.
///
/// Implementations must report transport, status and body-shape failures as
/// errors, and must treat absent fields inside a valid body as "unavailable"
/// (an empty result, `None`, or a missing map entry) rather than failing.
pub trait CatalogService: Send + Sync {
    /// Look up the playlist holding a channel's uploads.
    ///
    /// `Ok(None)` means the channel exists but has no uploads list (or is unknown).
    fn channel_uploads_playlist(
        &self,
        channel_id: &str,
    ) -> impl Future<Output = Result<Option<PlaylistId>>> + Send;

    /// Most recent video ids in a playlist, newest first, at most `limit`.
    fn playlist_recent_items(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<VideoId>>> + Send;

    /// Statistics for a batch of videos.
    ///
    /// Videos whose statistics are unavailable are absent from the map.
    fn video_statistics(
        &self,
        video_ids: &[VideoId],
    ) -> impl Future<Output = Result<HashMap<VideoId, VideoStatistics>>> + Send;

    /// One page of search results for a query.
    fn search(&self, query: &SearchQuery) -> impl Future<Output = Result<Vec<SearchHit>>> + Send;
}

/// Free-text suggestion provider used for keyword expansion.
pub trait SuggestionService: Send + Sync {
    /// Suggestions for a prompt, one entry per suggested line.
    fn suggest(&self, prompt: &str) -> impl Future<Output = Result<Vec<String>>> + Send;
}

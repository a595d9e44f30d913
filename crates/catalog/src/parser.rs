//! Parser for catalog response payloads.
//!
//! Handles the four documents the pipeline reads:
//! - search:        items[].id.videoId + items[].snippet
//! - videos:        items[].id + items[].statistics.{viewCount,likeCount,commentCount}
//! - channels:      items[].contentDetails.relatedPlaylists.uploads
//! - playlistItems: items[].snippet.resourceId.videoId
//!
//! A body that is not JSON of the expected shape is an `InvalidResponse`.
//! Individual items that lack a required field are skipped with a debug log;
//! the rest of the page is still returned.

use crate::error::{Result, ServiceError, CATALOG_SERVICE};
use crate::types::*;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::debug;

// =============================================================================
// Wire shapes
// =============================================================================
// Every field is optional: the platform omits fields freely and absence must
// never fail the whole page.

#[derive(Debug, Deserialize)]
struct ItemList<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    id: Option<SearchItemId>,
    snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    published_at: Option<String>,
    channel_id: Option<String>,
    title: Option<String>,
    channel_title: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: Option<String>,
    statistics: Option<RawStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStatistics {
    view_count: Option<Count>,
    like_count: Option<Count>,
    comment_count: Option<Count>,
}

/// Counters arrive as decimal strings; some mirrors send plain numbers.
/// Anything else (negative, fractional, nested) reads as no value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Count {
    Number(u64),
    Text(String),
    Other(serde_json::Value),
}

impl Count {
    fn value(&self) -> Option<u64> {
        match self {
            Count::Number(n) => Some(*n),
            Count::Text(s) => s.trim().parse().ok(),
            Count::Other(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
    snippet: Option<PlaylistSnippet>,
    content_details: Option<PlaylistContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistSnippet {
    resource_id: Option<ResourceId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistContentDetails {
    video_id: Option<String>,
}

fn parse_document<T: DeserializeOwned>(body: &str, document: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| ServiceError::InvalidResponse {
        service: CATALOG_SERVICE,
        reason: format!("{document} document: {e}"),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// =============================================================================
// Public parsing entry points
// =============================================================================

/// Parse an RFC 3339 timestamp and normalize it to UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Parse a search page into hits.
///
/// Items without a video id (channel or playlist results) or without a
/// channel id are skipped.
pub fn parse_search_hits(body: &str) -> Result<Vec<SearchHit>> {
    let page: ItemList<SearchItem> = parse_document(body, "search")?;
    let mut hits = Vec::with_capacity(page.items.len());

    for item in page.items {
        let Some(video_id) = non_empty(item.id.and_then(|id| id.video_id)) else {
            debug!("Skipping search item without a video id");
            continue;
        };
        let Some(snippet) = item.snippet else {
            debug!("Skipping search item {} without a snippet", video_id);
            continue;
        };
        let Some(channel_id) = non_empty(snippet.channel_id) else {
            debug!("Skipping search item {} without a channel id", video_id);
            continue;
        };

        let thumbnail_url = snippet.thumbnails.and_then(|t| {
            [t.high, t.medium, t.default]
                .into_iter()
                .flatten()
                .find_map(|thumb| non_empty(thumb.url))
        });

        hits.push(SearchHit {
            video_id,
            title: snippet.title.unwrap_or_default(),
            channel_id,
            channel_name: snippet.channel_title.unwrap_or_default(),
            thumbnail_url,
            published_at: snippet.published_at.as_deref().and_then(parse_timestamp),
        });
    }

    Ok(hits)
}

/// Parse a videos page into a statistics map keyed by video id.
///
/// Videos without a parseable view count are left out of the map, which is
/// how the pipeline learns their statistics are unavailable.
pub fn parse_video_statistics(body: &str) -> Result<HashMap<VideoId, VideoStatistics>> {
    let page: ItemList<VideoItem> = parse_document(body, "videos")?;
    let mut stats = HashMap::with_capacity(page.items.len());

    for item in page.items {
        let Some(id) = non_empty(item.id) else {
            continue;
        };
        let Some(raw) = item.statistics else {
            debug!("Video {} has no statistics block", id);
            continue;
        };
        let Some(view_count) = raw.view_count.as_ref().and_then(Count::value) else {
            debug!("Video {} has no view count", id);
            continue;
        };
        stats.insert(
            id,
            VideoStatistics {
                view_count,
                like_count: raw.like_count.as_ref().and_then(Count::value),
                comment_count: raw.comment_count.as_ref().and_then(Count::value),
            },
        );
    }

    Ok(stats)
}

/// Parse a channels page into the channel's uploads playlist id.
///
/// Returns `None` when the channel is unknown or exposes no uploads list.
pub fn parse_uploads_playlist(body: &str) -> Result<Option<PlaylistId>> {
    let page: ItemList<ChannelItem> = parse_document(body, "channels")?;
    Ok(page
        .items
        .into_iter()
        .filter_map(|item| item.content_details)
        .filter_map(|details| details.related_playlists)
        .find_map(|playlists| non_empty(playlists.uploads)))
}

/// Parse a playlistItems page into video ids, in playlist order.
pub fn parse_playlist_video_ids(body: &str) -> Result<Vec<VideoId>> {
    let page: ItemList<PlaylistItem> = parse_document(body, "playlistItems")?;
    Ok(page
        .items
        .into_iter()
        .filter_map(|item| {
            let from_snippet = item
                .snippet
                .and_then(|s| s.resource_id)
                .and_then(|r| non_empty(r.video_id));
            from_snippet.or_else(|| item.content_details.and_then(|c| non_empty(c.video_id)))
        })
        .collect())
}

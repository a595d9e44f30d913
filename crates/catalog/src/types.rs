//! Core domain types for the video catalog.
//!
//! Everything here is created fresh for a search invocation and is
//! immutable once fetched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// Platform identifier of a video (e.g. `dQw4w9WgXcQ`)
pub type VideoId = String;

/// Platform identifier of a channel (e.g. `UC...`)
pub type ChannelId = String;

/// Platform identifier of a playlist, used for a channel's uploads list
pub type PlaylistId = String;

/// Base for canonical watch URLs
const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

// =============================================================================
// Search parameters
// =============================================================================

/// Which kind of content a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Standard-length videos
    #[default]
    Video,
    /// Short-form videos
    Short,
}

impl ContentType {
    /// Maximum number of videos in a final result set for this content type.
    pub fn result_cap(self) -> usize {
        match self {
            ContentType::Video => 30,
            ContentType::Short => 20,
        }
    }

    /// Duration filter passed to the catalog search.
    ///
    /// Standard content is not restricted by duration on the platform side;
    /// only short-form content narrows the search.
    pub fn duration_class(self) -> DurationClass {
        match self {
            ContentType::Video => DurationClass::Any,
            ContentType::Short => DurationClass::Short,
        }
    }

    /// Singular noun used when talking about this content type.
    pub fn noun(self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Short => "short",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" | "videos" => Ok(ContentType::Video),
            "short" | "shorts" => Ok(ContentType::Short),
            other => Err(format!("unknown content type: {other}")),
        }
    }
}

/// Duration class filter understood by the catalog search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationClass {
    Any,
    Short,
}

impl DurationClass {
    /// Value of the `videoDuration` search parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            DurationClass::Any => "any",
            DurationClass::Short => "short",
        }
    }
}

/// One page request against the catalog search.
///
/// Catalogs return hits most-viewed first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub duration: DurationClass,
    pub limit: usize,
}

impl SearchQuery {
    /// Most-viewed-first query for a content type, capped at its result limit.
    pub fn for_content(term: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            term: term.into(),
            duration: content_type.duration_class(),
            limit: content_type.result_cap(),
        }
    }
}

// =============================================================================
// Catalog payload types
// =============================================================================

/// A single search result, before statistics are known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub video_id: VideoId,
    pub title: String,
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub thumbnail_url: Option<String>,
    /// Publish time normalized to UTC; `None` when missing or unparseable
    pub published_at: Option<DateTime<Utc>>,
}

/// Engagement counters for a video.
///
/// Only the view count is required. Likes and comments can be hidden by the
/// uploader, so they stay optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStatistics {
    pub view_count: u64,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
}

impl VideoStatistics {
    pub fn with_views(view_count: u64) -> Self {
        Self {
            view_count,
            like_count: None,
            comment_count: None,
        }
    }
}

/// A fully fetched video: search metadata joined with statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: VideoId,
    pub title: String,
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub thumbnail_url: Option<String>,
    pub view_count: u64,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub published_at: Option<DateTime<Utc>>,
    pub url: String,
}

impl VideoRecord {
    /// Join a search hit with its statistics.
    pub fn from_parts(hit: SearchHit, stats: VideoStatistics) -> Self {
        let url = canonical_url(&hit.video_id);
        Self {
            id: hit.video_id,
            title: hit.title,
            channel_id: hit.channel_id,
            channel_name: hit.channel_name,
            thumbnail_url: hit.thumbnail_url,
            view_count: stats.view_count,
            like_count: stats.like_count,
            comment_count: stats.comment_count,
            published_at: hit.published_at,
            url,
        }
    }
}

/// Canonical watch URL for a video id.
pub fn canonical_url(video_id: &str) -> String {
    format!("{WATCH_URL_BASE}{video_id}")
}

//! Builders shared by the unit tests in this crate.

use crate::scoring::ScoredVideo;
use crate::traits::FilterContext;
use catalog::{SearchHit, VideoRecord, VideoStatistics};
use chrono::{TimeZone, Utc};
use sources::{Candidate, ChannelBaseline};

/// Clock fixed at 2024-06-01T00:00:00Z.
pub fn context() -> FilterContext {
    FilterContext::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
}

/// A video scored against a baseline of 100 views.
pub fn video(id: &str, channel: &str, views: u64, term: &str) -> ScoredVideo {
    scored(id, channel, views, term, 100.0)
}

pub fn scored(id: &str, channel: &str, views: u64, term: &str, baseline: f64) -> ScoredVideo {
    let hit = SearchHit {
        video_id: id.to_string(),
        title: format!("Video {id}"),
        channel_id: channel.to_string(),
        channel_name: format!("Channel {channel}"),
        thumbnail_url: None,
        published_at: None,
    };
    let record = VideoRecord::from_parts(hit, VideoStatistics::with_views(views));
    ScoredVideo::new(
        Candidate::new(record, term),
        ChannelBaseline::Measured {
            mean_views: baseline,
            samples: 10,
        },
    )
}

/// Set the publish time to midnight UTC on the given date.
pub fn published(mut video: ScoredVideo, year: i32, month: u32, day: u32) -> ScoredVideo {
    let at = Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap();
    video.record.published_at = Some(at);
    video.published_on = Some(at.date_naive());
    video
}

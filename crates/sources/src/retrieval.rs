//! Candidate retrieval for a single search term.
//!
//! ## Algorithm
//! 1. Search the catalog for the term (most-viewed first, capped per content type)
//! 2. Fetch statistics for every hit in one batched call
//! 3. Join hits with their statistics; hits without statistics are dropped
//!    and counted

use crate::types::Candidate;
use catalog::{CatalogService, ContentType, SearchQuery, VideoId, VideoRecord};
use tracing::{debug, instrument};

/// Candidates gathered for one term
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermBatch {
    pub candidates: Vec<Candidate>,
    /// Hits returned by the search
    pub hits: usize,
    /// Hits dropped because the catalog had no statistics for them
    pub missing_statistics: usize,
}

/// Fetches and joins search hits with their statistics
#[derive(Debug, Clone, Default)]
pub struct CandidateRetriever;

impl CandidateRetriever {
    pub fn new() -> Self {
        Self
    }

    /// Retrieve candidates for `term`.
    ///
    /// Errors from either the search or the statistics call are returned
    /// unchanged; the caller decides whether the whole search fails.
    #[instrument(skip(self, catalog))]
    pub async fn fetch_term<C: CatalogService>(
        &self,
        catalog: &C,
        term: &str,
        content_type: ContentType,
    ) -> catalog::Result<TermBatch> {
        let query = SearchQuery::for_content(term, content_type);
        let mut hits = catalog.search(&query).await?;
        hits.truncate(query.limit);

        let mut batch = TermBatch {
            hits: hits.len(),
            ..TermBatch::default()
        };
        if hits.is_empty() {
            debug!("No hits for '{}'", term);
            return Ok(batch);
        }

        let ids: Vec<VideoId> = hits.iter().map(|hit| hit.video_id.clone()).collect();
        let stats = catalog.video_statistics(&ids).await?;

        for hit in hits {
            match stats.get(&hit.video_id) {
                Some(&video_stats) => batch.candidates.push(Candidate::new(
                    VideoRecord::from_parts(hit, video_stats),
                    term,
                )),
                None => {
                    debug!("No statistics for {}, skipping", hit.video_id);
                    batch.missing_statistics += 1;
                }
            }
        }

        debug!(
            "Term '{}': {} hits, {} candidates",
            term,
            batch.hits,
            batch.candidates.len()
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{InMemoryCatalog, SearchHit, ServiceError, VideoStatistics};

    fn hit(id: &str, channel: &str) -> SearchHit {
        SearchHit {
            video_id: id.to_string(),
            title: format!("Video {id}"),
            channel_id: channel.to_string(),
            channel_name: format!("Channel {channel}"),
            thumbnail_url: None,
            published_at: None,
        }
    }

    fn catalog_with(term: &str, videos: &[(&str, Option<u64>)]) -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        for (id, views) in videos {
            catalog.insert_hit(term, hit(id, "c1"));
            if let Some(views) = views {
                catalog.insert_statistics(id, VideoStatistics::with_views(*views));
            }
        }
        catalog
    }

    #[tokio::test]
    async fn test_hits_joined_with_statistics() {
        let catalog = catalog_with("cooking", &[("a", Some(500)), ("b", Some(900))]);
        let batch = CandidateRetriever::new()
            .fetch_term(&catalog, "cooking", ContentType::Video)
            .await
            .unwrap();

        assert_eq!(batch.hits, 2);
        assert_eq!(batch.missing_statistics, 0);
        let ids: Vec<&str> = batch.candidates.iter().map(|c| c.record.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(batch.candidates[0].record.view_count, 900);
        assert_eq!(batch.candidates[0].term, "cooking");
    }

    #[tokio::test]
    async fn test_statistics_fetched_in_one_batch() {
        let catalog = catalog_with("cooking", &[("a", Some(1)), ("b", Some(2)), ("c", Some(3))]);
        CandidateRetriever::new()
            .fetch_term(&catalog, "cooking", ContentType::Video)
            .await
            .unwrap();

        let stat_calls: Vec<String> = catalog
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("statistics:"))
            .collect();
        assert_eq!(stat_calls, vec!["statistics:c,b,a".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_statistics_are_counted_and_skipped() {
        let catalog = catalog_with("cooking", &[("a", Some(10)), ("ghost", None)]);
        let batch = CandidateRetriever::new()
            .fetch_term(&catalog, "cooking", ContentType::Video)
            .await
            .unwrap();

        assert_eq!(batch.hits, 2);
        assert_eq!(batch.missing_statistics, 1);
        assert_eq!(batch.candidates.len(), 1);
        assert_eq!(batch.candidates[0].record.id, "a");
    }

    #[tokio::test]
    async fn test_no_hits_skips_statistics() {
        let catalog = InMemoryCatalog::new();
        let batch = CandidateRetriever::new()
            .fetch_term(&catalog, "nothing", ContentType::Short)
            .await
            .unwrap();

        assert!(batch.candidates.is_empty());
        assert_eq!(catalog.calls(), vec!["search:nothing".to_string()]);
    }

    #[tokio::test]
    async fn test_short_search_is_capped() {
        let videos: Vec<(String, Option<u64>)> =
            (0..25).map(|i| (format!("s{i:02}"), Some(i as u64))).collect();
        let borrowed: Vec<(&str, Option<u64>)> =
            videos.iter().map(|(id, v)| (id.as_str(), *v)).collect();
        let catalog = catalog_with("cooking", &borrowed);

        let batch = CandidateRetriever::new()
            .fetch_term(&catalog, "cooking", ContentType::Short)
            .await
            .unwrap();
        assert_eq!(batch.candidates.len(), 20);
    }

    #[tokio::test]
    async fn test_search_failure_propagates() {
        let mut catalog = catalog_with("cooking", &[("a", Some(10))]);
        catalog.fail_term("cooking");
        let err = CandidateRetriever::new()
            .fetch_term(&catalog, "cooking", ContentType::Video)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable { .. }));
    }
}

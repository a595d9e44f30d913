//! # Outlier Search Orchestrator
//!
//! This module runs one outlier search end to end:
//! 1. Validate the request
//! 2. Expand the keyword into search terms
//! 3. For each term, in order: search, fetch statistics, resolve channel
//!    baselines, score
//! 4. Filter the merged videos (repeats, optional publish-age window)
//! 5. Rank and cap
//! 6. Summarize
//!
//! Collaborator calls are awaited one at a time. A failed search or
//! statistics call fails the whole invocation with no partial results; a
//! failed baseline lookup or suggestion call degrades instead.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use catalog::{CatalogService, ContentType, SuggestionService};
use pipeline::filters::{DuplicateVideoFilter, PublishedWithinFilter};
use pipeline::{
    AggregateReport, FilterContext, FilterPipeline, ResultSet, ScoredVideo, DEFAULT_HISTOGRAM_BINS,
};
use sources::{
    BaselineEstimator, BaselineLedger, CandidateRetriever, ChannelBaseline, QueryExpander,
    DEFAULT_MAX_SUGGESTIONS, DEFAULT_UPLOADS_SAMPLE,
};

use crate::outcome::{SearchCounters, SearchOutcome, SearchReport, SearchRequest};

const DUPLICATE_FILTER: &str = "DuplicateVideoFilter";
const RECENCY_FILTER: &str = "PublishedWithinFilter";

/// Tunables for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// Suggested terms searched in addition to the keyword
    pub max_suggestions: usize,
    /// Recent uploads averaged per channel baseline
    pub uploads_sample: usize,
    pub histogram_bins: usize,
    /// Drop videos published more than this many days ago
    pub max_age_days: Option<u32>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            uploads_sample: DEFAULT_UPLOADS_SAMPLE,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            max_age_days: None,
        }
    }
}

/// Runs outlier searches against injected collaborators.
///
/// Holds no state between invocations; baselines are memoized only for the
/// duration of one search.
#[derive(Clone)]
pub struct OutlierSearchOrchestrator<C, S> {
    catalog: C,
    suggester: S,
    expander: QueryExpander,
    retriever: CandidateRetriever,
    estimator: BaselineEstimator,
    filter_pipeline: Arc<FilterPipeline>,
    settings: SearchSettings,
}

impl<C, S> OutlierSearchOrchestrator<C, S>
where
    C: CatalogService,
    S: SuggestionService,
{
    /// Create an orchestrator with default settings.
    ///
    /// # Arguments
    /// * `catalog` - Video catalog (search, statistics, channel uploads)
    /// * `suggester` - Text-generation service for related search terms
    pub fn new(catalog: C, suggester: S) -> Self {
        let settings = SearchSettings::default();
        Self {
            catalog,
            suggester,
            expander: QueryExpander::new(),
            retriever: CandidateRetriever::new(),
            estimator: BaselineEstimator::new(),
            filter_pipeline: Arc::new(build_filter_pipeline(&settings)),
            settings,
        }
    }

    /// Replace the settings (builder pattern).
    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.expander = QueryExpander::new().with_max_suggestions(settings.max_suggestions);
        self.estimator = BaselineEstimator::new().with_sample_size(settings.uploads_sample);
        self.filter_pipeline = Arc::new(build_filter_pipeline(&settings));
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Main entry point: run a search at the current time.
    pub async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        self.search_at(request, Utc::now()).await
    }

    /// Run a search with an explicit clock reading.
    ///
    /// `now` only matters when a publish-age window is configured.
    #[instrument(skip(self, request, now), fields(keyword = %request.keyword, content_type = %request.content_type))]
    pub async fn search_at(&self, request: &SearchRequest, now: DateTime<Utc>) -> SearchOutcome {
        let keyword = request.keyword.trim();
        if keyword.is_empty() {
            warn!("Rejecting search with a blank keyword");
            return SearchOutcome::InvalidRequest {
                reason: "keyword must not be blank".to_string(),
            };
        }

        match self.run(keyword, request.content_type, now).await {
            Ok(report) => SearchOutcome::Completed(report),
            Err(e) => {
                warn!("Search for '{}' failed: {:#}", keyword, e);
                SearchOutcome::Failed {
                    reason: format!("{e:#}"),
                }
            }
        }
    }

    /// Baseline for a single channel, outside of any search.
    pub async fn channel_baseline(&self, channel_id: &str) -> ChannelBaseline {
        self.estimator.estimate(&self.catalog, channel_id).await
    }

    async fn run(
        &self,
        keyword: &str,
        content_type: ContentType,
        now: DateTime<Utc>,
    ) -> Result<SearchReport> {
        let start_time = Instant::now();

        let terms = self
            .expander
            .expand(&self.suggester, keyword, content_type)
            .await;
        info!("Searching {} terms: {:?}", terms.len(), terms);

        let mut counters = SearchCounters::default();
        let mut ledger = BaselineLedger::new();
        let scored = self
            .score_terms(&terms, content_type, &mut ledger, &mut counters)
            .await?;
        info!(
            "Scored {} candidates across {} channels",
            scored.len(),
            ledger.len()
        );

        let context = FilterContext::new(now);
        let (kept, tally) = self
            .filter_pipeline
            .apply_with_tally(scored, &context)
            .context("Failed to apply filters")?;
        counters.duplicates_dropped = tally.removed_by(DUPLICATE_FILTER);
        counters.outside_window = tally.removed_by(RECENCY_FILTER);

        let kept_count = kept.len();
        let results = ResultSet::rank(kept, content_type);
        counters.beyond_cap = kept_count - results.len();

        let unavailable_channels = ledger.unavailable_channels();
        counters.baseline_unavailable = unavailable_channels.len();
        if !unavailable_channels.is_empty() {
            warn!(
                "{} channels scored without a baseline: {:?}",
                unavailable_channels.len(),
                unavailable_channels
            );
        }

        let report = AggregateReport::from_results(&results, self.settings.histogram_bins);

        info!(
            "Ranked {} videos for '{}' in {:.2?} ({:?})",
            results.len(),
            keyword,
            start_time.elapsed(),
            counters
        );

        Ok(SearchReport {
            keyword: keyword.to_string(),
            content_type,
            terms,
            results,
            report,
            counters,
            unavailable_channels,
        })
    }

    /// Retrieve and score every term's candidates, in term order.
    async fn score_terms(
        &self,
        terms: &[String],
        content_type: ContentType,
        ledger: &mut BaselineLedger,
        counters: &mut SearchCounters,
    ) -> Result<Vec<ScoredVideo>> {
        let mut scored = Vec::new();
        for term in terms {
            let batch = self
                .retriever
                .fetch_term(&self.catalog, term, content_type)
                .await
                .with_context(|| format!("Failed to fetch videos for '{term}'"))?;
            counters.candidates_seen += batch.hits;
            counters.missing_statistics += batch.missing_statistics;

            for candidate in batch.candidates {
                let baseline = ledger
                    .resolve(&self.estimator, &self.catalog, &candidate.record.channel_id)
                    .await;
                scored.push(ScoredVideo::new(candidate, baseline));
            }
        }
        Ok(scored)
    }
}

fn build_filter_pipeline(settings: &SearchSettings) -> FilterPipeline {
    let pipeline = FilterPipeline::new().add_filter(DuplicateVideoFilter);
    match settings.max_age_days {
        Some(days) => pipeline.add_filter(PublishedWithinFilter::days(days)),
        None => pipeline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{InMemoryCatalog, SearchHit, StaticSuggestions, VideoStatistics};
    use chrono::TimeZone;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn hit(id: &str, channel: &str) -> SearchHit {
        SearchHit {
            video_id: id.to_string(),
            title: format!("Video {id}"),
            channel_id: channel.to_string(),
            channel_name: format!("Channel {channel}"),
            thumbnail_url: None,
            published_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()),
        }
    }

    /// Register a channel whose recent uploads average `mean` views.
    fn add_channel(catalog: &mut InMemoryCatalog, channel: &str, mean: u64) {
        let upload = format!("{channel}-upload");
        catalog.insert_statistics(&upload, VideoStatistics::with_views(mean));
        catalog.insert_uploads(channel, vec![upload]);
    }

    /// Register `views.len()` videos under `term`, one channel each.
    fn add_term(catalog: &mut InMemoryCatalog, term: &str, views: &[u64]) {
        for (i, &count) in views.iter().enumerate() {
            let id = format!("{}-{}", term.replace(' ', "_"), i + 1);
            let channel = format!("chan-{}", i + 1);
            catalog.insert_hit(term, hit(&id, &channel));
            catalog.insert_statistics(&id, VideoStatistics::with_views(count));
        }
    }

    fn suggestions(items: &[&str]) -> StaticSuggestions {
        StaticSuggestions::replying(items.iter().map(|s| s.to_string()).collect())
    }

    /// "cooking" plus two suggestions, views 100..=500 per term, baselines 200.
    fn cooking_catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        for term in ["cooking", "easy cooking", "cooking tips"] {
            add_term(&mut catalog, term, &[100, 200, 300, 400, 500]);
        }
        for i in 1..=5 {
            add_channel(&mut catalog, &format!("chan-{i}"), 200);
        }
        catalog
    }

    fn cooking_orchestrator() -> OutlierSearchOrchestrator<InMemoryCatalog, StaticSuggestions> {
        OutlierSearchOrchestrator::new(
            cooking_catalog(),
            suggestions(&["easy cooking", "cooking tips"]),
        )
    }

    fn completed(outcome: SearchOutcome) -> SearchReport {
        match outcome {
            SearchOutcome::Completed(report) => report,
            other => panic!("expected a completed search, got {other:?}"),
        }
    }

    // ============================================================================
    // End-to-end searches
    // ============================================================================

    #[tokio::test]
    async fn test_cooking_scenario() {
        let orchestrator = cooking_orchestrator();
        let report = completed(orchestrator.search(&SearchRequest::videos("cooking")).await);

        assert_eq!(report.terms, vec!["cooking", "easy cooking", "cooking tips"]);
        assert_eq!(report.results.len(), 15);

        let top = &report.results.videos()[0];
        assert_eq!(top.views(), 500);
        assert_eq!(top.score, 2.5);

        let mut scores: Vec<f64> = report
            .results
            .iter()
            .filter(|v| v.term == "cooking")
            .map(|v| v.score)
            .collect();
        scores.sort_by(f64::total_cmp);
        assert_eq!(scores, vec![0.5, 1.0, 1.5, 2.0, 2.5]);

        assert_eq!(report.counters.candidates_seen, 15);
        assert_eq!(report.counters.duplicates_dropped, 0);
        assert_eq!(report.report.distinct_channels, 5);
        assert_eq!(report.report.mean_views, 300.0);
    }

    #[tokio::test]
    async fn test_terms_searched_in_order() {
        let orchestrator = cooking_orchestrator();
        orchestrator.search(&SearchRequest::videos("cooking")).await;
        assert_eq!(
            orchestrator.catalog().searched_terms(),
            vec!["cooking", "easy cooking", "cooking tips"]
        );
    }

    #[tokio::test]
    async fn test_baselines_fetched_once_per_channel() {
        let orchestrator = cooking_orchestrator();
        orchestrator.search(&SearchRequest::videos("cooking")).await;

        let channel_lookups = orchestrator
            .catalog()
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("channel:"))
            .count();
        assert_eq!(channel_lookups, 5);
    }

    #[tokio::test]
    async fn test_suggestion_failure_searches_keyword_only() {
        let orchestrator =
            OutlierSearchOrchestrator::new(cooking_catalog(), StaticSuggestions::failing());
        let report = completed(orchestrator.search(&SearchRequest::videos("cooking")).await);

        assert_eq!(report.terms, vec!["cooking"]);
        assert_eq!(report.results.len(), 5);
        assert_eq!(orchestrator.catalog().searched_terms(), vec!["cooking"]);
    }

    #[tokio::test]
    async fn test_empty_suggestions_search_keyword_only() {
        let orchestrator = OutlierSearchOrchestrator::new(cooking_catalog(), suggestions(&[]));
        let report = completed(orchestrator.search(&SearchRequest::videos("cooking")).await);
        assert_eq!(report.terms, vec!["cooking"]);
    }

    #[tokio::test]
    async fn test_video_found_by_two_terms_kept_once() {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert_hit("cooking", hit("shared", "chan-1"));
        catalog.insert_hit("easy cooking", hit("shared", "chan-1"));
        catalog.insert_hit("easy cooking", hit("other", "chan-1"));
        catalog.insert_statistics("shared", VideoStatistics::with_views(900));
        catalog.insert_statistics("other", VideoStatistics::with_views(100));
        add_channel(&mut catalog, "chan-1", 300);

        let orchestrator = OutlierSearchOrchestrator::new(catalog, suggestions(&["easy cooking"]));
        let report = completed(orchestrator.search(&SearchRequest::videos("cooking")).await);

        let ids: Vec<&str> = report.results.iter().map(|v| v.record.id.as_str()).collect();
        assert_eq!(ids, vec!["shared", "other"]);
        assert_eq!(report.results.videos()[0].term, "cooking");
        assert_eq!(report.counters.duplicates_dropped, 1);
    }

    #[tokio::test]
    async fn test_zero_upload_channel_scores_zero() {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert_hit("cooking", hit("v1", "fresh"));
        catalog.insert_statistics("v1", VideoStatistics::with_views(1_000_000));
        catalog.insert_uploads("fresh", Vec::new());

        let orchestrator = OutlierSearchOrchestrator::new(catalog, suggestions(&[]));
        let report = completed(orchestrator.search(&SearchRequest::videos("cooking")).await);

        let video = &report.results.videos()[0];
        assert_eq!(video.score, 0.0);
        assert_eq!(video.baseline, ChannelBaseline::NoUploads);
        assert_eq!(report.counters.baseline_unavailable, 0);
    }

    #[tokio::test]
    async fn test_baseline_failure_degrades_and_is_counted() {
        let mut catalog = cooking_catalog();
        catalog.fail_channel("chan-5");

        let orchestrator = OutlierSearchOrchestrator::new(catalog, suggestions(&[]));
        let report = completed(orchestrator.search(&SearchRequest::videos("cooking")).await);

        let top = &report.results.videos()[0];
        assert_eq!(top.record.channel_id, "chan-5");
        assert_eq!(top.score, 0.0);
        assert!(top.baseline.is_unavailable());
        assert_eq!(report.unavailable_channels, vec!["chan-5".to_string()]);
        assert_eq!(report.counters.baseline_unavailable, 1);
    }

    #[tokio::test]
    async fn test_missing_statistics_are_skipped() {
        let mut catalog = cooking_catalog();
        catalog.insert_hit("cooking", hit("no-stats", "chan-1"));

        let orchestrator = OutlierSearchOrchestrator::new(catalog, suggestions(&[]));
        let report = completed(orchestrator.search(&SearchRequest::videos("cooking")).await);

        assert_eq!(report.results.len(), 5);
        assert_eq!(report.counters.candidates_seen, 6);
        assert_eq!(report.counters.missing_statistics, 1);
    }

    #[tokio::test]
    async fn test_shorts_capped_at_twenty() {
        let mut catalog = InMemoryCatalog::new();
        let views: Vec<u64> = (1..=20).map(|i| i * 10).collect();
        add_term(&mut catalog, "cooking", &views);
        add_term(&mut catalog, "easy cooking", &views);
        add_channel(&mut catalog, "chan-1", 100);

        let orchestrator = OutlierSearchOrchestrator::new(catalog, suggestions(&["easy cooking"]));
        let report = completed(orchestrator.search(&SearchRequest::shorts("cooking")).await);

        assert_eq!(report.results.len(), 20);
        assert_eq!(report.counters.beyond_cap, 20);
        assert!(report
            .results
            .videos()
            .windows(2)
            .all(|w| w[0].views() >= w[1].views()));
    }

    // ============================================================================
    // Failure handling
    // ============================================================================

    #[tokio::test]
    async fn test_blank_keyword_is_rejected_without_calls() {
        let orchestrator = cooking_orchestrator();
        let outcome = orchestrator.search(&SearchRequest::videos("   ")).await;

        assert!(matches!(outcome, SearchOutcome::InvalidRequest { .. }));
        assert!(orchestrator.catalog().calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_discards_partial_results() {
        let mut catalog = cooking_catalog();
        catalog.fail_term("cooking tips");

        let orchestrator =
            OutlierSearchOrchestrator::new(catalog, suggestions(&["easy cooking", "cooking tips"]));
        let outcome = orchestrator.search(&SearchRequest::videos("cooking")).await;

        match outcome {
            SearchOutcome::Failed { reason } => assert!(reason.contains("cooking tips")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    // ============================================================================
    // Settings
    // ============================================================================

    #[tokio::test]
    async fn test_max_age_window_filters_old_uploads() {
        let mut catalog = InMemoryCatalog::new();
        let mut old = hit("old", "chan-1");
        old.published_at = Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        catalog.insert_hit("cooking", old);
        catalog.insert_hit("cooking", hit("recent", "chan-1"));
        catalog.insert_statistics("old", VideoStatistics::with_views(10_000));
        catalog.insert_statistics("recent", VideoStatistics::with_views(500));
        add_channel(&mut catalog, "chan-1", 250);

        let settings = SearchSettings {
            max_age_days: Some(90),
            ..SearchSettings::default()
        };
        let orchestrator =
            OutlierSearchOrchestrator::new(catalog, suggestions(&[])).with_settings(settings);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let report = completed(
            orchestrator
                .search_at(&SearchRequest::videos("cooking"), now)
                .await,
        );

        let ids: Vec<&str> = report.results.iter().map(|v| v.record.id.as_str()).collect();
        assert_eq!(ids, vec!["recent"]);
        assert_eq!(report.counters.outside_window, 1);
        assert_eq!(report.results.videos()[0].score, 2.0);
    }

    #[tokio::test]
    async fn test_zero_suggestions_setting() {
        let settings = SearchSettings {
            max_suggestions: 0,
            ..SearchSettings::default()
        };
        let orchestrator = cooking_orchestrator().with_settings(settings);
        let report = completed(orchestrator.search(&SearchRequest::videos("cooking")).await);
        assert_eq!(report.terms, vec!["cooking"]);
    }

    #[tokio::test]
    async fn test_channel_baseline_lookup() {
        let orchestrator = cooking_orchestrator();
        let baseline = orchestrator.channel_baseline("chan-3").await;
        assert_eq!(baseline.value(), 200.0);
    }
}

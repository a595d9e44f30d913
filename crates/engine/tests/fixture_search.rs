//! End-to-end searches against the recorded cooking fixture.
//!
//! The fixture is the same document `outlier-scout --fixture` accepts, so
//! these tests also pin down the offline demo's output.

use std::path::PathBuf;

use catalog::{ContentType, Fixture, InMemoryCatalog, StaticSuggestions};
use chrono::{TimeZone, Utc};
use engine::{OutlierSearchOrchestrator, SearchOutcome, SearchRequest, SearchSettings};
use sources::ChannelBaseline;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/cooking.json")
}

fn orchestrator() -> OutlierSearchOrchestrator<InMemoryCatalog, StaticSuggestions> {
    let fixture = Fixture::load_from_file(&fixture_path()).expect("fixture should load");
    let (catalog, suggester) = fixture.into_services();
    OutlierSearchOrchestrator::new(catalog, suggester)
}

#[tokio::test]
async fn test_fixture_search_ranks_by_views() {
    let outcome = orchestrator().search(&SearchRequest::videos("cooking")).await;
    let report = outcome.into_result().expect("search should complete");

    assert_eq!(report.terms, vec!["cooking", "easy cooking", "cooking tips"]);
    assert_eq!(report.content_type, ContentType::Video);

    let ids: Vec<&str> = report.results.iter().map(|v| v.record.id.as_str()).collect();
    assert_eq!(ids, vec!["tp1", "ck2", "ez1", "ck1", "ck4", "ck3", "ez2", "tp2", "tp3"]);

    let scores: Vec<f64> = report.results.iter().map(|v| v.score).collect();
    assert_eq!(scores, vec![5.0, 1.4, 0.8, 4.8, 0.8, 9.6, 0.8, 0.0, 0.4]);
}

#[tokio::test]
async fn test_fixture_report_and_counters() {
    let report = orchestrator()
        .search(&SearchRequest::videos("cooking"))
        .await
        .into_result()
        .unwrap();

    assert_eq!(report.counters.candidates_seen, 10);
    assert_eq!(report.counters.duplicates_dropped, 1);
    assert_eq!(report.counters.missing_statistics, 0);
    assert_eq!(report.report.distinct_channels, 5);
    assert_eq!(report.report.top_channels[0].channel_name, "Chef Tips Daily");
    assert_eq!(report.report.histogram.total(), 9);
    assert_eq!(report.report.bands.high, 3);

    let ck3 = report.results.iter().find(|v| v.record.id == "ck3").unwrap();
    assert_eq!(ck3.term, "cooking");

    let newcomer = report.results.iter().find(|v| v.record.id == "tp2").unwrap();
    assert_eq!(newcomer.baseline, ChannelBaseline::NoUploads);
}

#[tokio::test]
async fn test_fixture_recent_window() {
    let settings = SearchSettings {
        max_age_days: Some(30),
        ..SearchSettings::default()
    };
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let outcome = orchestrator()
        .with_settings(settings)
        .search_at(&SearchRequest::videos("cooking"), now)
        .await;

    let SearchOutcome::Completed(report) = outcome else {
        panic!("search should complete");
    };
    let ids: Vec<&str> = report.results.iter().map(|v| v.record.id.as_str()).collect();
    assert_eq!(ids, vec!["tp1", "ez1", "ck1", "ck3", "tp2", "tp3"]);
    assert_eq!(report.counters.outside_window, 3);
}

#[tokio::test]
async fn test_fixture_report_serializes() {
    let outcome = orchestrator().search(&SearchRequest::shorts("cooking")).await;
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["status"], "completed");
    assert_eq!(json["content_type"], "short");
    assert_eq!(json["results"][0]["id"], "tp1");
    assert_eq!(json["results"][0]["baseline"]["state"], "measured");
}

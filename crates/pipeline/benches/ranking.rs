//! Benchmarks for ranking and reporting
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic merge of three search terms with heavy overlap, the
//! shape a real search produces before the cap is applied.

use catalog::{ContentType, SearchHit, VideoRecord, VideoStatistics};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipeline::filters::DuplicateVideoFilter;
use pipeline::{AggregateReport, FilterContext, FilterPipeline, ResultSet, ScoredVideo};
use sources::{Candidate, ChannelBaseline};

fn synthetic_merge(per_term: usize) -> Vec<ScoredVideo> {
    let mut videos = Vec::with_capacity(per_term * 3);
    for term in 0..3 {
        for i in 0..per_term {
            // Half of each term's page overlaps with the previous term.
            let id = format!("v{}", term * per_term / 2 + i);
            let hit = SearchHit {
                video_id: id,
                title: format!("Video {i}"),
                channel_id: format!("c{}", i % 17),
                channel_name: format!("Channel {}", i % 17),
                thumbnail_url: None,
                published_at: None,
            };
            let views = ((i * 7919) % 100_000) as u64;
            let record = VideoRecord::from_parts(hit, VideoStatistics::with_views(views));
            videos.push(ScoredVideo::new(
                Candidate::new(record, format!("term {term}")),
                ChannelBaseline::Measured {
                    mean_views: 10_000.0 + (i % 17) as f64 * 1_000.0,
                    samples: 10,
                },
            ));
        }
    }
    videos
}

fn bench_rank(c: &mut Criterion) {
    let videos = synthetic_merge(30);

    c.bench_function("rank_standard_search", |b| {
        b.iter(|| {
            let results = ResultSet::rank(black_box(videos.clone()), ContentType::Video);
            black_box(results)
        })
    });
}

fn bench_filter_and_rank(c: &mut Criterion) {
    let videos = synthetic_merge(500);
    let pipeline = FilterPipeline::new().add_filter(DuplicateVideoFilter);
    let context = FilterContext::new(chrono::Utc::now());

    c.bench_function("filter_and_rank_large_merge", |b| {
        b.iter(|| {
            let kept = pipeline.apply(black_box(videos.clone()), &context).unwrap();
            black_box(ResultSet::rank(kept, ContentType::Video))
        })
    });
}

fn bench_report(c: &mut Criterion) {
    let videos = synthetic_merge(500);

    c.bench_function("aggregate_report", |b| {
        b.iter(|| {
            let report = AggregateReport::summarize(black_box(&videos), black_box(20));
            black_box(report)
        })
    });
}

criterion_group!(benches, bench_rank, bench_filter_and_rank, bench_report);
criterion_main!(benches);

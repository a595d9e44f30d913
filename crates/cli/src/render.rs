//! Terminal rendering of search results.
//!
//! Every function returns a `String` so output can be tested with coloring
//! disabled; `main` does the printing.

use std::fmt::Write;

use colored::{ColoredString, Colorize};
use engine::SearchReport;
use pipeline::{AggregateReport, Histogram, ScoreBand, ScoredVideo};
use sources::ChannelBaseline;

/// Widest histogram bar, in characters
const BAR_WIDTH: usize = 40;

/// `1234567` -> `1,234,567`
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Score colored by band: green high, yellow medium, red low.
pub fn colored_score(score: f64) -> ColoredString {
    let text = format!("{score:.1}x");
    match ScoreBand::from_score(score) {
        ScoreBand::High => text.green().bold(),
        ScoreBand::Medium => text.yellow(),
        ScoreBand::Low => text.red(),
    }
}

pub fn describe_baseline(baseline: &ChannelBaseline) -> String {
    match baseline {
        ChannelBaseline::Measured {
            mean_views,
            samples,
        } => format!(
            "{} avg views over {} recent uploads",
            format_count(mean_views.round() as u64),
            samples
        ),
        ChannelBaseline::NoUploads => "no recent uploads".to_string(),
        ChannelBaseline::Unavailable { reason } => format!("baseline unknown ({reason})"),
    }
}

fn format_video(out: &mut String, rank: usize, video: &ScoredVideo, explain: bool) {
    let _ = writeln!(
        out,
        "{:>3}. {} {}",
        rank,
        colored_score(video.score),
        video.record.title.bold()
    );
    let published = video
        .published_on
        .map(|d| d.to_string())
        .unwrap_or_else(|| "unknown date".to_string());
    let _ = writeln!(
        out,
        "     {} views | {} | {}",
        format_count(video.views()),
        video.record.channel_name.cyan(),
        published
    );
    let _ = writeln!(out, "     {}", video.record.url.underline());
    if let Some(thumbnail) = &video.record.thumbnail_url {
        let _ = writeln!(out, "     thumbnail: {}", thumbnail.dimmed());
    }
    if explain {
        let _ = writeln!(
            out,
            "     found via '{}', channel {}",
            video.term,
            describe_baseline(&video.baseline)
        );
    }
}

pub fn format_histogram(histogram: &Histogram) -> String {
    let mut out = String::new();
    let peak = histogram.peak().max(1);
    let last = histogram.bins.len().saturating_sub(1);
    for (i, bin) in histogram.bins.iter().enumerate() {
        let close = if i == last { ']' } else { ')' };
        let bar_len = (bin.count * BAR_WIDTH).div_ceil(peak);
        let _ = writeln!(
            out,
            "  [{:>6.2}, {:>6.2}{} {:<width$} {}",
            bin.lower,
            bin.upper,
            close,
            "#".repeat(bar_len),
            bin.count,
            width = BAR_WIDTH
        );
    }
    out
}

pub fn format_summary(report: &AggregateReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Mean views: {}   Mean outlier score: {:.2}   Channels: {}",
        format_count(report.mean_views.round() as u64),
        report.mean_score,
        report.distinct_channels
    );
    let _ = writeln!(
        out,
        "Bands: {} high, {} medium, {} low",
        report.bands.high.to_string().green(),
        report.bands.medium.to_string().yellow(),
        report.bands.low.to_string().red()
    );
    if !report.top_channels.is_empty() {
        let _ = writeln!(out, "\n{}", "Top channels by mean views:".bold());
        for (i, channel) in report.top_channels.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} ({} videos, {} avg views)",
                i + 1,
                channel.channel_name.cyan(),
                channel.videos,
                format_count(channel.mean_views.round() as u64)
            );
        }
    }
    if !report.histogram.is_empty() {
        let _ = writeln!(out, "\n{}", "Outlier score distribution:".bold());
        out.push_str(&format_histogram(&report.histogram));
    }
    out
}

pub fn format_explain(report: &SearchReport) -> String {
    let c = &report.counters;
    let mut out = String::new();
    let _ = writeln!(out, "{}", "How these results were built:".bold());
    let _ = writeln!(out, "  terms searched: {}", report.terms.join(" | "));
    let _ = writeln!(out, "  search hits: {}", c.candidates_seen);
    let _ = writeln!(out, "  skipped (no statistics): {}", c.missing_statistics);
    let _ = writeln!(out, "  repeats across terms: {}", c.duplicates_dropped);
    let _ = writeln!(out, "  outside age window: {}", c.outside_window);
    let _ = writeln!(out, "  beyond result cap: {}", c.beyond_cap);
    if !report.unavailable_channels.is_empty() {
        let _ = writeln!(
            out,
            "  {} channels without a baseline: {}",
            c.baseline_unavailable,
            report.unavailable_channels.join(", ")
        );
    }
    out
}

/// Full human-readable rendering of a completed search.
pub fn format_search(report: &SearchReport, explain: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!(
            "Outlier {}s for '{}' ({} results)",
            report.content_type.noun(),
            report.keyword,
            report.results.len()
        )
        .bold()
        .blue()
    );

    if report.results.is_empty() {
        let _ = writeln!(out, "No videos found.");
    }
    for (i, video) in report.results.iter().enumerate() {
        format_video(&mut out, i + 1, video, explain);
    }

    let _ = writeln!(out);
    out.push_str(&format_summary(&report.report));

    if explain {
        let _ = writeln!(out);
        out.push_str(&format_explain(report));
    }
    out
}

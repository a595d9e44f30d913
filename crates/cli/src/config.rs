//! Runtime configuration read from the environment.
//!
//! Command-line flags override these values in `main`.

use std::time::Duration;

use engine::SearchSettings;
use pipeline::DEFAULT_HISTOGRAM_BINS;
use sources::DEFAULT_UPLOADS_SAMPLE;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// YouTube Data API key
    pub youtube_api_key: Option<String>,
    /// Generative Language API key
    pub gemini_api_key: Option<String>,
    /// Override for the YouTube API root (proxies, test servers)
    pub youtube_base_url: Option<String>,
    /// Override for the Generative Language API root
    pub gemini_base_url: Option<String>,
    pub gemini_model: String,
    /// Per-request HTTP timeout in seconds
    pub timeout_secs: u64,
    /// Recent uploads averaged per channel baseline
    pub uploads_sample: usize,
    pub histogram_bins: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            gemini_api_key: None,
            youtube_base_url: None,
            gemini_base_url: None,
            gemini_model: clients::gemini::DEFAULT_MODEL.to_string(),
            timeout_secs: 30,
            uploads_sample: DEFAULT_UPLOADS_SAMPLE,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// Blank values count as unset. Unparseable numbers are logged and the
    /// default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        config.youtube_api_key = get("YOUTUBE_API_KEY");
        config.gemini_api_key = get("GEMINI_API_KEY");
        config.youtube_base_url = get("YOUTUBE_API_BASE_URL");
        config.gemini_base_url = get("GEMINI_API_BASE_URL");
        if let Some(model) = get("GEMINI_MODEL") {
            config.gemini_model = model;
        }
        if let Some(val) = get("OUTLIER_SCOUT_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout_secs = secs,
                _ => warn!("Ignoring OUTLIER_SCOUT_TIMEOUT_SECS={}", val),
            }
        }
        if let Some(val) = get("OUTLIER_SCOUT_UPLOADS_SAMPLE") {
            match val.parse() {
                Ok(v) => config.uploads_sample = v,
                Err(_) => warn!("Ignoring OUTLIER_SCOUT_UPLOADS_SAMPLE={}", val),
            }
        }
        if let Some(val) = get("OUTLIER_SCOUT_HISTOGRAM_BINS") {
            match val.parse() {
                Ok(v) => config.histogram_bins = v,
                Err(_) => warn!("Ignoring OUTLIER_SCOUT_HISTOGRAM_BINS={}", val),
            }
        }

        config
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Search settings before per-command flags are applied
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            uploads_sample: self.uploads_sample,
            histogram_bins: self.histogram_bins,
            ..SearchSettings::default()
        }
    }
}

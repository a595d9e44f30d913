//! Suggestion client for the Generative Language (Gemini) API.

use catalog::{ServiceError, SuggestionService, SUGGESTION_SERVICE};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::{fetch_body, normalize_base_url, require_key, ClientError};

/// Public API root
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-pro";

// ─── Wire shapes ─────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Split the first candidate's text into non-empty lines.
///
/// A reply without candidates (for example one withheld by safety filters)
/// yields no suggestions rather than an error.
pub fn parse_generate_response(body: &str) -> catalog::Result<Vec<String>> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::InvalidResponse {
            service: SUGGESTION_SERVICE,
            reason: e.to_string(),
        })?;

    let Some(content) = response.candidates.into_iter().find_map(|c| c.content) else {
        warn!("Suggestion reply contained no candidates");
        return Ok(Vec::new());
    };

    let text: String = content
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Suggestion service backed by `models/{model}:generateContent`.
#[derive(Clone)]
pub struct GeminiSuggester {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiSuggester {
    pub fn new(http: reqwest::Client, api_key: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: require_key(SUGGESTION_SERVICE, api_key)?,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ClientError> {
        self.base_url = normalize_base_url(SUGGESTION_SERVICE, base_url)?;
        Ok(self)
    }

    pub fn with_model(mut self, model: &str) -> Self {
        let model = model.trim();
        if !model.is_empty() {
            self.model = model.to_string();
        }
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl SuggestionService for GeminiSuggester {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn suggest(&self, prompt: &str) -> catalog::Result<Vec<String>> {
        let payload = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };
        let request = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&payload);
        let body = fetch_body(SUGGESTION_SERVICE, request).await?;
        parse_generate_response(&body)
    }
}

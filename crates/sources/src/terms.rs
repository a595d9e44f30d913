//! Query expansion.
//!
//! Turns a user keyword into the list of search terms: the keyword itself
//! followed by up to `max_suggestions` related phrasings from the suggestion
//! service. Suggestion failures never fail the search; they collapse the
//! list to just the keyword.

use catalog::{ContentType, SuggestionService};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// Suggestions kept in addition to the keyword
pub const DEFAULT_MAX_SUGGESTIONS: usize = 2;

/// Prompt sent to the suggestion service.
pub fn suggestion_prompt(keyword: &str, content_type: ContentType) -> String {
    format!(
        "Suggest relevant search terms for '{keyword}' in the context of YouTube {}s",
        content_type.noun()
    )
}

/// Strip list decoration from one line of a suggestion reply.
///
/// Removes bullets, `1. `/`1) ` numbering, markdown bold and surrounding
/// quotes. Blank lines and headings ending in `:` yield `None`.
pub fn clean_suggestion(line: &str) -> Option<String> {
    let mut text = line
        .trim()
        .trim_start_matches(['-', '*', '•', '+'])
        .trim_start();

    let digits = text.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &text[digits..];
        let marker = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'));
        // `3.5 inch knives` is a term, `3. knives` is a list item.
        if let Some(stripped) = marker.filter(|s| s.is_empty() || s.starts_with(char::is_whitespace)) {
            text = stripped.trim_start();
        }
    }

    let unbolded = text.replace("**", "");
    let cleaned = unbolded
        .trim()
        .trim_matches(['"', '\'', '`', '“', '”'])
        .trim();

    if cleaned.is_empty() || cleaned.ends_with(':') {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Keyword first, then cleaned suggestions, without case-insensitive repeats.
pub fn assemble_terms(keyword: &str, suggestions: &[String], max_suggestions: usize) -> Vec<String> {
    let keyword = keyword.trim();
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(keyword.to_lowercase());

    let mut terms = vec![keyword.to_string()];
    for suggestion in suggestions.iter().filter_map(|s| clean_suggestion(s)) {
        if terms.len() > max_suggestions {
            break;
        }
        if seen.insert(suggestion.to_lowercase()) {
            terms.push(suggestion);
        }
    }
    terms
}

/// Expands a keyword into search terms using a suggestion service.
#[derive(Debug, Clone)]
pub struct QueryExpander {
    max_suggestions: usize,
}

impl QueryExpander {
    pub fn new() -> Self {
        Self {
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }

    /// Configure how many suggestions to keep (default: 2)
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    /// Search terms for `keyword`, never empty.
    ///
    /// On service failure or an empty reply the result is exactly `[keyword]`.
    #[instrument(skip(self, suggester))]
    pub async fn expand<S: SuggestionService>(
        &self,
        suggester: &S,
        keyword: &str,
        content_type: ContentType,
    ) -> Vec<String> {
        let keyword = keyword.trim();
        if self.max_suggestions == 0 {
            return vec![keyword.to_string()];
        }

        let prompt = suggestion_prompt(keyword, content_type);
        let suggestions = match suggester.suggest(&prompt).await {
            Ok(lines) => lines,
            Err(e) => {
                warn!("Suggestion service failed, searching for '{}' only: {}", keyword, e);
                Vec::new()
            }
        };

        let terms = assemble_terms(keyword, &suggestions, self.max_suggestions);
        debug!("Expanded '{}' into {} terms: {:?}", keyword, terms.len(), terms);
        terms
    }
}

impl Default for QueryExpander {
    fn default() -> Self {
        Self::new()
    }
}

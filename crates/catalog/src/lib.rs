//! # Catalog Crate
//!
//! Domain types and collaborator boundaries for the video catalog.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (SearchHit, VideoStatistics, VideoRecord, ContentType)
//! - **parser**: Turn raw catalog payloads into domain types, dropping incomplete items
//! - **service**: The `CatalogService` and `SuggestionService` traits the pipeline consumes
//! - **error**: Error taxonomy for collaborator calls
//! - **memory**: In-memory collaborators for offline runs and tests
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogService, ContentType, SearchQuery};
//!
//! let query = SearchQuery::for_content("cooking", ContentType::Video);
//! let hits = catalog.search(&query).await?;
//! let ids: Vec<_> = hits.iter().map(|h| h.video_id.clone()).collect();
//! let stats = catalog.video_statistics(&ids).await?;
//! ```

// Public modules
pub mod error;
pub mod memory;
pub mod parser;
pub mod service;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{Result, ServiceError, CATALOG_SERVICE, SUGGESTION_SERVICE};
pub use memory::{Fixture, FixtureError, InMemoryCatalog, StaticSuggestions};
pub use service::{CatalogService, SuggestionService};
pub use types::{
    // Type aliases
    ChannelId,
    PlaylistId,
    VideoId,
    // Core types
    SearchHit,
    SearchQuery,
    VideoRecord,
    VideoStatistics,
    // Enums
    ContentType,
    DurationClass,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_caps() {
        assert_eq!(ContentType::Video.result_cap(), 30);
        assert_eq!(ContentType::Short.result_cap(), 20);
    }

    #[test]
    fn test_content_type_duration_class() {
        assert_eq!(ContentType::Video.duration_class(), DurationClass::Any);
        assert_eq!(ContentType::Short.duration_class(), DurationClass::Short);
    }

    #[test]
    fn test_query_for_content_uses_cap_and_duration() {
        let query = SearchQuery::for_content("cooking", ContentType::Short);
        assert_eq!(query.term, "cooking");
        assert_eq!(query.limit, 20);
        assert_eq!(query.duration, DurationClass::Short);
    }
}

//! Domain types: the search parameters the user edits and the result
//! snapshot returned by the external search webhook.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PubseekError, Result};

/// Lower bound for the publication-year filter.
pub const MIN_YEAR: u16 = 1900;

/// Accepted range for the result limit.
pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 200;

/// Limit used when the form field is blank or unparseable.
pub const DEFAULT_LIMIT: u32 = 10;

/// Search parameters owned and mutated by the form.
///
/// `year_from == 0` means the year filter is unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub keywords: String,
    pub limit: u32,
    pub year_from: u16,
    pub open_access: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            keywords: String::new(),
            limit: DEFAULT_LIMIT,
            year_from: 0,
            open_access: false,
        }
    }
}

impl SearchParams {
    /// Reject parameters that must never reach the network.
    pub fn validate(&self) -> Result<()> {
        if self.keywords.trim().is_empty() {
            return Err(PubseekError::Validation(
                "keywords must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Current calendar year — the upper bound for the year filter.
pub fn current_year() -> u16 {
    Utc::now().year() as u16
}

/// Clamp a parsed result limit into the accepted range.
pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(MIN_LIMIT, MAX_LIMIT)
}

/// Clamp a parsed year filter. Zero stays zero (filter unset); any other
/// value is forced into `MIN_YEAR..=current_year()`.
pub fn clamp_year(year: u16) -> u16 {
    if year == 0 {
        0
    } else {
        year.clamp(MIN_YEAR, current_year())
    }
}

/// A single publication record. Immutable once received; owned by the
/// result snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    /// Identifier assigned by the search service.
    pub id: String,

    /// Publication title.
    pub title: String,

    /// Author names as a single pre-joined string.
    pub authors: String,

    /// Publication year, if known.
    #[serde(default)]
    pub year: Option<u16>,

    /// Full `https://doi.org/...` URL, if known.
    #[serde(default)]
    pub doi: Option<String>,

    /// Citation count.
    #[serde(default)]
    pub citations: u32,

    /// Whether a free full text is available.
    #[serde(default)]
    pub open_access: bool,

    /// Label of the repository the record came from.
    #[serde(default)]
    pub source: String,

    /// Direct URL to an open-access PDF, if available.
    #[serde(default)]
    pub pdf_url: Option<String>,

    /// URL of the publication's landing page, if available.
    #[serde(default)]
    pub landing_page_url: Option<String>,

    /// Ranking number computed by the search service, passed through
    /// unmodified for display.
    #[serde(default)]
    pub relevance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: u16,
    pub max: u16,
}

/// Entry in the service's top-cited list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCited {
    pub title: String,
    pub citations: u32,
    #[serde(default)]
    pub year: Option<u16>,
}

/// Aggregate figures computed by the search service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_publications: u32,
    pub open_access_count: u32,
    pub avg_citations: f64,
    pub max_citations: u32,
    pub year_range: YearRange,
    #[serde(default)]
    pub top_cited: Vec<TopCited>,
}

/// One complete search response. Replaces any prior snapshot wholesale on
/// success; never merged or partially populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub search_query: String,
    pub statistics: Statistics,
    pub publications: Vec<Publication>,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params() {
        let params = SearchParams::default();
        assert!(params.keywords.is_empty());
        assert_eq!(params.limit, 10);
        assert_eq!(params.year_from, 0);
        assert!(!params.open_access);
    }

    #[test]
    fn validate_rejects_empty_and_whitespace_keywords() {
        let mut params = SearchParams::default();
        assert!(params.validate().is_err());

        params.keywords = "   \t  ".to_string();
        assert!(params.validate().is_err());

        params.keywords = "neural networks".to_string();
        assert!(params.validate().is_ok());
    }

    #[test]
    fn limit_clamping() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(1), 1);
        assert_eq!(clamp_limit(50), 50);
        assert_eq!(clamp_limit(200), 200);
        assert_eq!(clamp_limit(10_000), 200);
    }

    #[test]
    fn year_clamping() {
        assert_eq!(clamp_year(0), 0);
        assert_eq!(clamp_year(1850), 1900);
        assert_eq!(clamp_year(2020), 2020);
        assert_eq!(clamp_year(u16::MAX), current_year());
    }

    #[test]
    fn deserialize_full_snapshot() {
        let json = r#"{
            "search_query": "neural networks",
            "statistics": {
                "total_publications": 3,
                "open_access_count": 2,
                "avg_citations": 41.7,
                "max_citations": 100,
                "year_range": {"min": 2019, "max": 2024},
                "top_cited": [{"title": "A", "citations": 100, "year": 2020}]
            },
            "publications": [{
                "id": "W1",
                "title": "Deep things",
                "authors": "A. Author; B. Author",
                "year": 2020,
                "doi": "https://doi.org/10.1000/xyz",
                "citations": 100,
                "open_access": true,
                "source": "openalex",
                "pdf_url": "https://example.org/x.pdf",
                "landing_page_url": null,
                "relevance_score": 12.5
            }],
            "generated_at": "2024-06-01T12:00:00Z"
        }"#;

        let results: SearchResults = serde_json::from_str(json).unwrap();
        assert_eq!(results.statistics.total_publications, 3);
        assert_eq!(results.publications.len(), 1);
        let p = &results.publications[0];
        assert_eq!(p.year, Some(2020));
        assert!(p.landing_page_url.is_none());
        assert_eq!(p.relevance_score, 12.5);
    }

    #[test]
    fn deserialize_tolerates_missing_optional_fields() {
        let json = r#"{
            "id": "W2",
            "title": "Untitled work",
            "authors": "Unknown"
        }"#;
        let p: Publication = serde_json::from_str(json).unwrap();
        assert_eq!(p.year, None);
        assert_eq!(p.citations, 0);
        assert!(!p.open_access);
        assert!(p.doi.is_none());
    }
}

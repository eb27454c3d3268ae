//! Canonical request encoding for the recommendation endpoints.

use url::form_urlencoded;

pub const RECOMMEND_PATH: &str = "api/recommend";
pub const TAG_SEARCH_PATH: &str = "api/search-by-tag";
pub const ALL_LOCATIONS_PATH: &str = "api/locations/all";

/// Free-text recommendation query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub result_count: usize,
    pub min_score: f64,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, result_count: usize, min_score: f64) -> Self {
        Self {
            text: text.into(),
            result_count,
            min_score,
        }
    }
}

/// Exact-tag lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagQuery {
    pub tag: String,
    pub result_count: usize,
}

impl TagQuery {
    pub fn new(tag: impl Into<String>, result_count: usize) -> Self {
        Self {
            tag: tag.into(),
            result_count,
        }
    }
}

/// Everything a search controller can be asked to fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchRequest {
    Recommend(SearchQuery),
    ByTag(TagQuery),
    AllLocations,
}

/// Endpoint path (relative to the API base) plus ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
    pub path: &'static str,
    pub params: Vec<(&'static str, String)>,
}

impl EncodedRequest {
    /// `application/x-www-form-urlencoded` rendering of the parameters.
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}

impl SearchRequest {
    /// Encode the request. `None` means there is nothing to submit (blank
    /// text or tag) and no request may be issued.
    pub fn encode(&self) -> Option<EncodedRequest> {
        match self {
            Self::Recommend(q) => {
                let text = q.text.trim();
                if text.is_empty() {
                    return None;
                }
                Some(EncodedRequest {
                    path: RECOMMEND_PATH,
                    params: vec![
                        ("query", text.to_string()),
                        ("n", q.result_count.max(1).to_string()),
                        ("min_score", clamp_score(q.min_score).to_string()),
                    ],
                })
            }
            Self::ByTag(q) => {
                let tag = q.tag.trim();
                if tag.is_empty() {
                    return None;
                }
                Some(EncodedRequest {
                    path: TAG_SEARCH_PATH,
                    params: vec![
                        ("tag", tag.to_string()),
                        ("n", q.result_count.max(1).to_string()),
                    ],
                })
            }
            Self::AllLocations => Some(EncodedRequest {
                path: ALL_LOCATIONS_PATH,
                params: Vec::new(),
            }),
        }
    }

    /// Short label for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Recommend(q) => format!("recommend '{}'", q.text.trim()),
            Self::ByTag(q) => format!("tag '{}'", q.tag.trim()),
            Self::AllLocations => "all locations".to_string(),
        }
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

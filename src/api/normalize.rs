//! Reconciles the backend's response envelopes into [`SearchResults`].
//!
//! The service has shipped two envelope versions for the ranked endpoints.
//! The first returned raw metadata rows with comma-joined `tags` and
//! `best_for` strings; the current one returns arrays plus optional
//! `similarity_score`, `rank`, `total_results` and `message`. The bulk
//! listing endpoint wraps its rows in `locations` instead of `results`.

use serde_json::{Map, Value};

use crate::models::{Popularity, RecommendationResult, SearchResults};

/// The envelope shapes the client understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `{results: [...], total_results?, message?}`
    Ranked {
        results: Vec<Value>,
        total_results: Option<usize>,
        message: Option<String>,
    },
    /// `{locations: [...]}`
    Listing { locations: Vec<Value> },
    /// Anything else, including a non-array `results`.
    Unrecognized,
}

impl Envelope {
    pub fn classify(body: Value) -> Self {
        let Value::Object(mut obj) = body else {
            return Self::Unrecognized;
        };

        match obj.remove("results") {
            Some(Value::Array(results)) => Self::Ranked {
                results,
                total_results: obj.get("total_results").and_then(as_count),
                message: obj
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
            Some(_) => Self::Unrecognized,
            None => match obj.remove("locations") {
                Some(Value::Array(locations)) => Self::Listing { locations },
                _ => Self::Unrecognized,
            },
        }
    }
}

/// Total, infallible normalization of a parsed response body.
pub fn normalize(body: Value) -> SearchResults {
    match Envelope::classify(body) {
        Envelope::Ranked {
            results,
            total_results,
            message,
        } => {
            let results = read_items(&results);
            SearchResults {
                total_results: total_results.unwrap_or(results.len()),
                results,
                message: message.unwrap_or_default(),
            }
        }
        Envelope::Listing { locations } => {
            let results = read_items(&locations);
            SearchResults {
                total_results: results.len(),
                results,
                message: String::new(),
            }
        }
        Envelope::Unrecognized => {
            tracing::warn!("Response body has no results array, treating as empty");
            SearchResults::default()
        }
    }
}

fn read_items(items: &[Value]) -> Vec<RecommendationResult> {
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match item {
            Value::Object(obj) => Some(read_item(obj)),
            other => {
                tracing::warn!("Skipping result {idx}: expected an object, got {other}");
                None
            }
        })
        .collect()
}

fn read_item(obj: &Map<String, Value>) -> RecommendationResult {
    RecommendationResult {
        name: string_field(obj, &["name"]).unwrap_or_default(),
        location: string_field(obj, &["location"]).unwrap_or_default(),
        tags: list_field(obj, &["tags"]).unwrap_or_default(),
        best_for: list_field(obj, &["best_for", "bestFor"]),
        popularity: string_field(obj, &["popularity"])
            .map(|p| Popularity::parse_lenient(&p))
            .unwrap_or_default(),
        similarity_score: field(obj, &["similarity_score", "similarityScore"])
            .and_then(Value::as_f64)
            .filter(|s| s.is_finite())
            .map(|s| s.clamp(0.0, 1.0)),
        rank: field(obj, &["rank"]).and_then(as_rank),
        description_snippet: string_field(obj, &["description_snippet", "descriptionSnippet"]),
    }
}

/// First present, non-null value among `keys`.
fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    field(obj, keys).and_then(Value::as_str).map(str::to_string)
}

/// Array of strings, or a comma-joined string from the old envelope.
fn list_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<Vec<String>> {
    match field(obj, keys)? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Value::String(joined) => Some(
            joined
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

/// Positive integer rank. Integral floats such as `1.0` count; `1.5` does not.
fn as_rank(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok().filter(|r| *r >= 1);
    }
    value
        .as_f64()
        .filter(|n| n.is_finite() && n.fract() == 0.0)
        .filter(|n| (1.0..=f64::from(u32::MAX)).contains(n))
        .map(|n| n as u32)
}

/// Non-negative number as a count; fractional values truncate.
fn as_count(value: &Value) -> Option<usize> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn place(name: &str) -> Value {
        json!({
            "name": name,
            "location": "Southern Province",
            "tags": ["beach", "surfing"],
            "best_for": ["couples"],
            "popularity": "high",
            "similarity_score": 0.82,
            "rank": 1,
            "description_snippet": "Golden sand"
        })
    }

    #[test]
    fn test_total_results_prefers_backend_count() {
        let out = normalize(json!({
            "results": [place("Mirissa"), place("Unawatuna")],
            "total_results": 17,
            "message": "Found 2 matches"
        }));
        assert_eq!(out.results.len(), 2);
        assert_eq!(out.total_results, 17);
        assert_eq!(out.message, "Found 2 matches");
    }

    #[test]
    fn test_total_results_falls_back_to_length() {
        let out = normalize(json!({ "results": [place("A"), place("B"), place("C")] }));
        assert_eq!(out.total_results, 3);
        assert_eq!(out.message, "");
    }

    #[test]
    fn test_non_numeric_total_is_ignored() {
        let out = normalize(json!({ "results": [place("A")], "total_results": "many" }));
        assert_eq!(out.total_results, 1);
    }

    #[test]
    fn test_fractional_total_truncates() {
        let out = normalize(json!({ "results": [], "total_results": 4.9 }));
        assert_eq!(out.total_results, 4);
    }

    #[test]
    fn test_missing_results_degrades_to_empty() {
        assert_eq!(normalize(json!({ "detail": "nope" })), SearchResults::default());
        assert_eq!(normalize(json!({ "results": "oops" })), SearchResults::default());
        assert_eq!(normalize(json!([1, 2, 3])), SearchResults::default());
        assert_eq!(normalize(Value::Null), SearchResults::default());
    }

    #[test]
    fn test_listing_envelope() {
        let out = normalize(json!({ "locations": [place("Sigiriya"), place("Ella")] }));
        assert_eq!(out.total_results, 2);
        assert_eq!(out.results[1].name, "Ella");
    }

    #[test]
    fn test_new_envelope_item_fields() {
        let out = normalize(json!({ "results": [place("Mirissa")] }));
        let r = &out.results[0];
        assert_eq!(r.name, "Mirissa");
        assert_eq!(r.tags, vec!["beach", "surfing"]);
        assert_eq!(r.best_for.as_deref(), Some(&["couples".to_string()][..]));
        assert_eq!(r.popularity, Popularity::High);
        assert_eq!(r.similarity_score, Some(0.82));
        assert_eq!(r.rank, Some(1));
        assert_eq!(r.description_snippet.as_deref(), Some("Golden sand"));
    }

    #[test]
    fn test_old_envelope_comma_joined_lists() {
        let out = normalize(json!({
            "results": [{
                "name": "Yala",
                "location": "Southern Province",
                "tags": "wildlife, safari, leopards",
                "best_for": "families, photographers",
                "popularity": "Very High"
            }]
        }));
        let r = &out.results[0];
        assert_eq!(r.tags, vec!["wildlife", "safari", "leopards"]);
        assert_eq!(
            r.best_for,
            Some(vec!["families".to_string(), "photographers".to_string()])
        );
        assert_eq!(r.popularity, Popularity::VeryHigh);
    }

    #[test]
    fn test_missing_optionals_stay_absent() {
        let out = normalize(json!({ "results": [{ "name": "Knuckles" }] }));
        let r = &out.results[0];
        assert_eq!(r.location, "");
        assert!(r.tags.is_empty());
        assert_eq!(r.best_for, None);
        assert_eq!(r.popularity, Popularity::Unknown);
        assert_eq!(r.similarity_score, None);
        assert_eq!(r.rank, None);
        assert_eq!(r.description_snippet, None);
    }

    #[test]
    fn test_invalid_rank_and_score() {
        let out = normalize(json!({
            "results": [
                { "name": "A", "rank": 0, "similarity_score": 1.4 },
                { "name": "B", "rank": -2, "similarityScore": -0.2 },
                { "name": "C", "rank": "first", "similarity_score": "high" }
            ]
        }));
        assert_eq!(out.results[0].rank, None);
        assert_eq!(out.results[0].similarity_score, Some(1.0));
        assert_eq!(out.results[1].rank, None);
        assert_eq!(out.results[1].similarity_score, Some(0.0));
        assert_eq!(out.results[2].rank, None);
        assert_eq!(out.results[2].similarity_score, None);
    }

    #[test]
    fn test_integral_float_rank_is_kept() {
        let out = normalize(json!({
            "results": [
                { "name": "A", "rank": 1.0 },
                { "name": "B", "rank": 2.5 },
                { "name": "C", "rank": 0.0 },
                { "name": "D", "rank": 3 }
            ]
        }));
        assert_eq!(out.results[0].rank, Some(1));
        assert_eq!(out.results[1].rank, None);
        assert_eq!(out.results[2].rank, None);
        assert_eq!(out.results[3].rank, Some(3));
    }

    #[test]
    fn test_non_object_items_are_skipped() {
        let out = normalize(json!({ "results": [place("A"), 42, null, "x", place("B")] }));
        assert_eq!(out.results.len(), 2);
        assert_eq!(out.total_results, 2);
    }

    #[test]
    fn test_classify_prefers_results_over_locations() {
        let env = Envelope::classify(json!({ "results": [], "locations": [place("A")] }));
        assert!(matches!(env, Envelope::Ranked { ref results, .. } if results.is_empty()));
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the recommendation API (`/api/recommend`, `/api/search-by-tag`, ...)
    pub api_base_url: String,
    /// Base URL of the chat backend (`/chat`)
    pub chat_base_url: String,
    /// Result count used when the caller does not pick one
    pub default_result_count: usize,
    /// Minimum similarity score used when the caller does not pick one
    pub default_min_score: f64,
    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            chat_base_url: "http://localhost:8080".to_string(),
            default_result_count: 5,
            default_min_score: 0.0,
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Unparseable values
    /// keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("RECOMMENDER_API_URL") {
            config.api_base_url = url;
        }
        if let Some(url) = lookup("RECOMMENDER_CHAT_URL") {
            config.chat_base_url = url;
        }
        if let Some(val) = lookup("RECOMMENDER_RESULT_COUNT") {
            if let Ok(v) = val.parse::<usize>() {
                config.default_result_count = v.max(1);
            }
        }
        if let Some(val) = lookup("RECOMMENDER_MIN_SCORE") {
            if let Ok(v) = val.parse::<f64>() {
                if v.is_finite() {
                    config.default_min_score = v.clamp(0.0, 1.0);
                }
            }
        }
        if let Some(val) = lookup("RECOMMENDER_CONNECT_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.connect_timeout_secs = v;
            }
        }
        if let Some(val) = lookup("RECOMMENDER_REQUEST_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.request_timeout_secs = v;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.chat_base_url, "http://localhost:8080");
        assert_eq!(config.default_result_count, 5);
        assert_eq!(config.default_min_score, 0.0);
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[test]
    fn test_overrides_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("RECOMMENDER_API_URL", "http://api.internal:9000"),
            ("RECOMMENDER_RESULT_COUNT", "12"),
            ("RECOMMENDER_MIN_SCORE", "0.4"),
        ]));
        assert_eq!(config.api_base_url, "http://api.internal:9000");
        assert_eq!(config.default_result_count, 12);
        assert!((config.default_min_score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("RECOMMENDER_RESULT_COUNT", "lots"),
            ("RECOMMENDER_MIN_SCORE", "NaN"),
            ("RECOMMENDER_REQUEST_TIMEOUT_SECS", "-3"),
        ]));
        assert_eq!(config.default_result_count, 5);
        assert_eq!(config.default_min_score, 0.0);
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[test]
    fn test_min_score_clamped() {
        let config = Config::from_lookup(lookup_from(&[("RECOMMENDER_MIN_SCORE", "1.7")]));
        assert_eq!(config.default_min_score, 1.0);
    }
}

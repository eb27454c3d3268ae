use serde::{Deserialize, Serialize};

/// Popularity bucket reported by the recommendation service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Popularity {
    VeryHigh,
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Popularity {
    /// Lenient parse: case-insensitive, accepts `very_high`, `very high` and
    /// `very-high`. Anything unrecognised is `Unknown`.
    pub fn parse_lenient(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "very_high" => Self::VeryHigh,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown,
        }
    }
}

/// A canonical search result, independent of the backend envelope version.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationResult {
    pub name: String,
    pub location: String,
    pub tags: Vec<String>,
    pub best_for: Option<Vec<String>>,
    pub popularity: Popularity,
    /// In [0, 1] when present.
    pub similarity_score: Option<f64>,
    /// 1-based; absent unless the backend sent one.
    pub rank: Option<u32>,
    pub description_snippet: Option<String>,
}

/// Normalized payload of any of the search endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub results: Vec<RecommendationResult>,
    pub total_results: usize,
    pub message: String,
}

/// Observable state of a search controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Success(SearchResults),
    Error { message: String },
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Results of the current state; empty unless `Success`.
    pub fn results(&self) -> &[RecommendationResult] {
        match self {
            Self::Success(found) => &found.results,
            _ => &[],
        }
    }

    pub fn total_results(&self) -> usize {
        match self {
            Self::Success(found) => found.total_results,
            _ => 0,
        }
    }

    /// Backend message on success, or the user-facing error on failure.
    pub fn message(&self) -> &str {
        match self {
            Self::Success(found) => &found.message,
            Self::Error { message } => message,
            _ => "",
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// A single chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub text: String,
    pub sender: Sender,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
        }
    }
}

/// Chat request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Chat response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

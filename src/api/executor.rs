use anyhow::{Context, Result};
use reqwest::Url;
use serde_json::Value;

use crate::api::normalize::normalize;
use crate::api::query::EncodedRequest;
use crate::config::Config;
use crate::error::FetchError;
use crate::models::{ChatReply, ChatRequest, SearchResults};

const CHAT_PATH: &str = "chat";

/// Issues exactly one HTTP call per invocation and classifies the outcome.
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: reqwest::Client,
    api_base: Url,
    chat_base: Url,
}

impl RequestExecutor {
    pub fn new(client: reqwest::Client, config: &Config) -> Result<Self> {
        Ok(Self {
            client,
            api_base: parse_base(&config.api_base_url).context("Invalid recommendation API URL")?,
            chat_base: parse_base(&config.chat_base_url).context("Invalid chat URL")?,
        })
    }

    /// Absolute URL for an encoded request, query string included.
    pub fn endpoint_url(&self, encoded: &EncodedRequest) -> Result<Url, url::ParseError> {
        let mut url = self.api_base.join(encoded.path)?;
        if !encoded.params.is_empty() {
            url.set_query(Some(&encoded.query_string()));
        }
        Ok(url)
    }

    /// GET a search endpoint and normalize the body.
    ///
    /// A 2xx body that is not JSON degrades to an empty result set rather
    /// than an error.
    pub async fn fetch(&self, encoded: &EncodedRequest) -> Result<SearchResults, FetchError> {
        let url = self
            .endpoint_url(encoded)
            .map_err(|e| FetchError::TransportError(format!("Invalid request URL: {e}")))?;
        tracing::debug!("GET {url}");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(&e))?;

        if let Some(err) = FetchError::from_status(resp.status()) {
            tracing::warn!("Search request returned {}: {err}", resp.status());
            return Err(err);
        }

        let bytes = resp.bytes().await.map_err(|e| FetchError::transport(&e))?;
        let body = match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Malformed search response body: {e}");
                Value::Null
            }
        };

        Ok(normalize(body))
    }

    /// POST one chat message and return the bot's reply text.
    pub async fn exchange_chat(&self, message: &str) -> Result<String, FetchError> {
        let url = self
            .chat_base
            .join(CHAT_PATH)
            .map_err(|e| FetchError::TransportError(format!("Invalid chat URL: {e}")))?;
        tracing::debug!("POST {url}");

        let resp = self
            .client
            .post(url)
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await
            .map_err(|e| FetchError::transport(&e))?;

        if let Some(err) = FetchError::from_status(resp.status()) {
            return Err(err);
        }

        let reply: ChatReply = resp.json().await.map_err(|e| {
            FetchError::TransportError(format!("Failed to parse chat response: {e}"))
        })?;
        Ok(reply.response)
    }
}

/// Parse a base URL, forcing a trailing slash so relative joins append.
fn parse_base(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{trimmed}/"))
    }
}

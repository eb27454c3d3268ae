use std::time::Duration;

use crate::api::executor::RequestExecutor;
use crate::chat::ChatController;
use crate::config::Config;
use crate::models::SearchState;
use crate::search::SearchController;

/// Everything one page of the client owns: a controller per data view plus
/// the chat. Controllers share the HTTP connection pool and nothing else.
#[derive(Clone)]
pub struct Session {
    pub config: Config,
    pub recommendations: SearchController,
    pub tag_search: SearchController,
    pub all_locations: SearchController,
    pub chat: ChatController,
}

impl Session {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let executor = RequestExecutor::new(http_client, &config)?;

        Ok(Self {
            recommendations: SearchController::new(executor.clone()),
            tag_search: SearchController::new(executor.clone()),
            all_locations: SearchController::new(executor.clone()),
            chat: ChatController::new(executor),
            config,
        })
    }

    /// Recommendation query using the configured result count and threshold.
    pub async fn recommend(&self, text: &str) -> Option<SearchState> {
        self.recommendations
            .recommend(
                text,
                self.config.default_result_count,
                self.config.default_min_score,
            )
            .await
    }

    /// Tag search using the configured result count.
    pub async fn search_by_tag(&self, tag: &str) -> Option<SearchState> {
        self.tag_search
            .search_by_tag(tag, self.config.default_result_count)
            .await
    }
}

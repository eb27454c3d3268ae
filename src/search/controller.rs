use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::api::executor::RequestExecutor;
use crate::api::query::{SearchQuery, SearchRequest, TagQuery};
use crate::models::SearchState;

/// Owns the observable state of one search view. Clones are handles to the
/// same state.
///
/// Every submission takes the next generation number; a response is only
/// committed if its generation is still the latest when it arrives, so an
/// older request resolving late can never overwrite a newer one.
#[derive(Debug, Clone)]
pub struct SearchController {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    executor: RequestExecutor,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<SearchState>,
}

#[derive(Debug, Default)]
struct Inner {
    generation: u64,
    last_request: Option<SearchRequest>,
}

impl SearchController {
    pub fn new(executor: RequestExecutor) -> Self {
        let (state_tx, _) = watch::channel(SearchState::Idle);
        Self {
            shared: Arc::new(Shared {
                executor,
                inner: Mutex::new(Inner::default()),
                state_tx,
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.shared.state_tx.borrow().clone()
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.state_tx.subscribe()
    }

    pub fn last_request(&self) -> Option<SearchRequest> {
        self.shared.inner.lock().last_request.clone()
    }

    /// Submit a request and wait for it to resolve.
    ///
    /// The fetch runs on its own task, so dropping the returned future does
    /// not strand the controller in `Loading`; the response is still
    /// committed if it is the latest.
    ///
    /// Returns the committed state, or `None` when nothing was committed:
    /// the request was blank, or a newer submission (or `clear`) superseded
    /// it while it was in flight.
    pub async fn submit(&self, request: SearchRequest) -> Option<SearchState> {
        let Some(encoded) = request.encode() else {
            tracing::debug!("Ignoring blank search submission");
            return None;
        };

        let generation = {
            let mut inner = self.shared.inner.lock();
            inner.generation += 1;
            tracing::debug!("Search #{} started: {}", inner.generation, request.describe());
            inner.last_request = Some(request);
            self.shared.state_tx.send_replace(SearchState::Loading);
            inner.generation
        };

        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            let next = match shared.executor.fetch(&encoded).await {
                Ok(found) => SearchState::Success(found),
                Err(e) => SearchState::Error {
                    message: e.to_string(),
                },
            };
            shared.commit(generation, next)
        });

        match task.await {
            Ok(committed) => committed,
            Err(e) => {
                tracing::warn!("Search #{generation} task failed: {e}");
                None
            }
        }
    }

    /// Re-issue the last submitted request verbatim. No-op if there is none.
    pub async fn refetch(&self) -> Option<SearchState> {
        let last = self.last_request();
        match last {
            Some(request) => self.submit(request).await,
            None => None,
        }
    }

    /// Reset to `Idle`. In-flight requests are invalidated; the last
    /// request is kept so `refetch` still works.
    pub fn clear(&self) {
        let mut inner = self.shared.inner.lock();
        inner.generation += 1;
        self.shared.state_tx.send_replace(SearchState::Idle);
    }

    pub async fn recommend(
        &self,
        text: &str,
        result_count: usize,
        min_score: f64,
    ) -> Option<SearchState> {
        self.submit(SearchRequest::Recommend(SearchQuery::new(
            text,
            result_count,
            min_score,
        )))
        .await
    }

    pub async fn search_by_tag(&self, tag: &str, result_count: usize) -> Option<SearchState> {
        self.submit(SearchRequest::ByTag(TagQuery::new(tag, result_count)))
            .await
    }

    pub async fn load_all(&self) -> Option<SearchState> {
        self.submit(SearchRequest::AllLocations).await
    }
}

impl Shared {
    fn commit(&self, generation: u64, next: SearchState) -> Option<SearchState> {
        let inner = self.inner.lock();
        if inner.generation != generation {
            tracing::debug!(
                "Discarding stale search #{generation} (latest is #{})",
                inner.generation
            );
            return None;
        }
        self.state_tx.send_replace(next.clone());
        Some(next)
    }
}

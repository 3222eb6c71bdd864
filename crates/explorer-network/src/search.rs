//! Search aggregation across local nodes, stream search and place search.
//!
//! A query flows through three sources:
//! 1. Local node match (synchronous): case-insensitive substring of the
//!    node title or id. Always lands first.
//! 2. Stream search and place search (remote): awaited concurrently and
//!    appended in the order they resolve, never replacing earlier hits.
//!
//! Every query is tagged with the store's search generation. Results that
//! resolve after the phrase has changed are dropped silently, and a failed
//! source only logs a warning.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use explorer_protocol::{
    Node, ResultKind, SearchResult, MIN_SEARCH_PHRASE_LEN, SEARCH_QUIET_PERIOD_MS,
};

use crate::source::SearchSource;
use crate::SharedStore;

/// Tuning for the aggregator.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Shorter phrases (in characters) short-circuit to no results.
    pub min_phrase_len: usize,
    /// Input must be quiet this long before a query is issued.
    pub quiet_period: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_phrase_len: MIN_SEARCH_PHRASE_LEN,
            quiet_period: Duration::from_millis(SEARCH_QUIET_PERIOD_MS),
        }
    }
}

/// Local node matches for an already-normalized phrase.
pub fn match_nodes(nodes: &[Node], phrase: &str) -> Vec<SearchResult> {
    let phrase = phrase.to_lowercase();
    nodes
        .iter()
        .filter(|node| {
            node.title.to_lowercase().contains(&phrase) || node.id.to_lowercase().contains(&phrase)
        })
        .map(|node| {
            SearchResult::new(
                ResultKind::Nodes,
                node.id.clone(),
                node.title.clone(),
                Some(node.id.clone()),
            )
        })
        .collect()
}

/// Runs aggregate searches against the shared store.
pub struct SearchAggregator {
    store: SharedStore,
    streams: Arc<dyn SearchSource>,
    places: Arc<dyn SearchSource>,
    config: SearchConfig,
}

impl SearchAggregator {
    pub fn new(
        store: SharedStore,
        streams: Arc<dyn SearchSource>,
        places: Arc<dyn SearchSource>,
        config: SearchConfig,
    ) -> Self {
        Self {
            store,
            streams,
            places,
            config,
        }
    }

    /// Start a search for `phrase` and feed its results into the store as
    /// they resolve. Returns the generation of this search.
    pub async fn update_results(&self, phrase: &str) -> u64 {
        let (generation, normalized) = {
            let mut store = self.store.write().await;
            let generation = store.update_search(phrase);
            let normalized = store.state().search_phrase.clone();
            if normalized.chars().count() < self.config.min_phrase_len {
                tracing::trace!(phrase = %normalized, "Search phrase too short");
                return generation;
            }
            let local = match_nodes(store.nodes(), &normalized);
            store.add_search_results_for(generation, local);
            (generation, normalized)
        };

        let phrase = normalized.as_str();
        let sources: [&dyn SearchSource; 2] = [self.streams.as_ref(), self.places.as_ref()];
        let mut pending: FuturesUnordered<_> = sources
            .into_iter()
            .map(|source| async move { (source.kind(), source.search(phrase).await) })
            .collect();

        while let Some((kind, outcome)) = pending.next().await {
            let results = match outcome {
                Ok(results) => results,
                Err(e) => {
                    tracing::warn!(source = %kind, phrase, error = %e, "Search source failed");
                    continue;
                }
            };
            let results: Vec<SearchResult> = results
                .into_iter()
                .map(|hit| SearchResult { kind, ..hit })
                .collect();
            let mut store = self.store.write().await;
            if !store.add_search_results_for(generation, results) {
                // the phrase moved on; nothing left here can apply
                break;
            }
        }
        tracing::debug!(phrase, generation, "Search settled");
        generation
    }

    /// Run a search to completion and return the merged results, or an
    /// empty list if the phrase changed in the meantime.
    pub async fn search(&self, phrase: &str) -> Vec<SearchResult> {
        let generation = self.update_results(phrase).await;
        let mut store = self.store.write().await;
        if !store.is_current_search(generation) {
            return Vec::new();
        }
        store.search_results().to_vec()
    }

    /// Debounce loop: consume phrases as they are typed and issue one
    /// search per quiet period. Returns once the sender side closes and
    /// the last search has settled.
    pub async fn run(self: Arc<Self>, mut phrases: mpsc::Receiver<String>) {
        let mut in_flight: Option<JoinHandle<()>> = None;
        while let Some(mut phrase) = phrases.recv().await {
            let mut closed = false;
            loop {
                tokio::select! {
                    next = phrases.recv() => match next {
                        Some(next) => phrase = next,
                        None => {
                            closed = true;
                            break;
                        }
                    },
                    _ = tokio::time::sleep(self.config.quiet_period) => break,
                }
            }

            let aggregator = Arc::clone(&self);
            in_flight = Some(tokio::spawn(async move {
                aggregator.update_results(&phrase).await;
            }));
            if closed {
                break;
            }
        }

        if let Some(handle) = in_flight {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Search task failed");
            }
        }
    }
}

//! Per-session cache of segment summaries

use crate::dispatch::DispatchError;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Result of fetching one segment summary
pub type SegmentOutcome = Result<String, DispatchError>;

type PendingFetch = Shared<BoxFuture<'static, SegmentOutcome>>;

/// Observable state of a cached segment
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentState {
    Pending,
    Ready(String),
    Failed(String),
}

enum Entry {
    Pending(PendingFetch),
    Ready(String),
    Failed(DispatchError),
}

#[derive(Default)]
struct Inner {
    entries: HashMap<u32, Entry>,
    visible: HashSet<u32>,
    /// Bumped by `clear` so fetches from a discarded session cannot land
    generation: u64,
}

/// Maps segment ids to their fetched summaries
///
/// At most one fetch per segment is ever in flight: callers arriving while a
/// fetch is pending await that same fetch. Entries move `Pending -> Ready` or
/// `Pending -> Failed` and never back.
#[derive(Clone, Default)]
pub struct SegmentSummaryCache {
    inner: Arc<Mutex<Inner>>,
}

impl SegmentSummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached summary, or run `fetcher` once and cache its outcome
    ///
    /// `fetcher` is only invoked when the segment has no entry at all.
    pub async fn get_or_fetch<F, Fut>(&self, segment_id: u32, fetcher: F) -> SegmentOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SegmentOutcome> + Send + 'static,
    {
        self.lookup(None, segment_id, fetcher).await
    }

    /// Current generation, advanced by every [`clear`](Self::clear)
    pub async fn generation(&self) -> u64 {
        self.inner.lock().await.generation
    }

    /// Like [`get_or_fetch`](Self::get_or_fetch), bound to the generation the
    /// fetcher was built in
    ///
    /// Fails without touching the cache when it has been cleared since, so a
    /// fetcher for a previous video can never fill the current one.
    pub async fn get_or_fetch_in<F, Fut>(
        &self,
        generation: u64,
        segment_id: u32,
        fetcher: F,
    ) -> SegmentOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SegmentOutcome> + Send + 'static,
    {
        self.lookup(Some(generation), segment_id, fetcher).await
    }

    async fn lookup<F, Fut>(
        &self,
        expected: Option<u64>,
        segment_id: u32,
        fetcher: F,
    ) -> SegmentOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SegmentOutcome> + Send + 'static,
    {
        let pending = {
            let mut inner = self.inner.lock().await;

            if let Some(expected) = expected {
                if expected != inner.generation {
                    debug!("Segment {} requested for a discarded page, skipping", segment_id);
                    return Err(DispatchError::InvalidRequest(
                        "The video changed before the segment summary was requested".to_string(),
                    ));
                }
            }

            match inner.entries.get(&segment_id) {
                Some(Entry::Ready(summary)) => {
                    debug!("📚 Segment {} served from cache", segment_id);
                    return Ok(summary.clone());
                }
                Some(Entry::Failed(err)) => {
                    debug!("Segment {} previously failed: {}", segment_id, err);
                    return Err(err.clone());
                }
                Some(Entry::Pending(fetch)) => {
                    debug!("⏳ Segment {} already in flight, joining", segment_id);
                    fetch.clone()
                }
                None => {
                    let fetch = self.start_fetch(segment_id, inner.generation, fetcher());
                    inner.entries.insert(segment_id, Entry::Pending(fetch.clone()));
                    fetch
                }
            }
        };

        pending.await
    }

    /// Wrap a fetch so that its completion settles the entry exactly once
    fn start_fetch<Fut>(&self, segment_id: u32, generation: u64, fetch: Fut) -> PendingFetch
    where
        Fut: Future<Output = SegmentOutcome> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        info!("🔍 Fetching summary for segment {}", segment_id);

        async move {
            let outcome = fetch.await;

            let mut inner = inner.lock().await;
            if inner.generation == generation {
                let settled = match &outcome {
                    Ok(summary) => Entry::Ready(summary.clone()),
                    Err(err) => {
                        warn!("❌ Segment {} summary failed: {}", segment_id, err);
                        Entry::Failed(err.clone())
                    }
                };
                inner.entries.insert(segment_id, settled);
            }

            outcome
        }
        .boxed()
        .shared()
    }

    /// Current state of a segment, `None` if it was never requested
    pub async fn state(&self, segment_id: u32) -> Option<SegmentState> {
        let inner = self.inner.lock().await;
        inner.entries.get(&segment_id).map(|entry| match entry {
            Entry::Pending(_) => SegmentState::Pending,
            Entry::Ready(summary) => SegmentState::Ready(summary.clone()),
            Entry::Failed(err) => SegmentState::Failed(err.to_string()),
        })
    }

    /// Cached summary for a ready segment
    pub async fn summary(&self, segment_id: u32) -> Option<String> {
        match self.state(segment_id).await {
            Some(SegmentState::Ready(summary)) => Some(summary),
            _ => None,
        }
    }

    /// Flip whether a segment's summary panel is shown; returns the new visibility
    ///
    /// Display only: never touches the cached entry or starts a fetch.
    pub async fn toggle_visibility(&self, segment_id: u32) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.visible.remove(&segment_id) {
            false
        } else {
            inner.visible.insert(segment_id);
            true
        }
    }

    pub async fn is_visible(&self, segment_id: u32) -> bool {
        self.inner.lock().await.visible.contains(&segment_id)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.entries.is_empty()
    }

    /// Discard everything, as when the session ends
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.entries.clear();
        inner.visible.clear();
        inner.generation += 1;
    }
}

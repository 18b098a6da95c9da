use crate::core::store::SnapshotStore;
use crate::domain::model::Property;
use crate::domain::ports::PropertySource;
use crate::utils::error::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// What a successful refresh cycle did to the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The snapshot was replaced with `accepted` properties; `dropped`
    /// documents failed to decode and were left out.
    Replaced { accepted: usize, dropped: usize },
    /// The response carried no result array. The snapshot was kept.
    NoResult,
}

/// Decodes each document on its own. Returns the decoded properties in
/// upstream order along with the number of documents that were dropped.
pub fn decode_properties(documents: Vec<serde_json::Value>) -> (Vec<Property>, usize) {
    let mut properties = Vec::with_capacity(documents.len());
    let mut dropped = 0;

    for document in documents {
        let id = document
            .get("_id")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        match serde_json::from_value::<Property>(document) {
            Ok(property) => properties.push(property),
            Err(e) => {
                dropped += 1;
                tracing::warn!(
                    document_id = id.as_deref().unwrap_or("<unknown>"),
                    "Failed to decode property, skipping it: {}",
                    e
                );
            }
        }
    }

    (properties, dropped)
}

/// Pulls properties from a [`PropertySource`] into a [`SnapshotStore`] on a
/// fixed interval.
pub struct Refresher<S: PropertySource> {
    source: S,
    store: Arc<SnapshotStore>,
    interval: Duration,
}

impl<S: PropertySource + 'static> Refresher<S> {
    pub fn new(source: S, store: Arc<SnapshotStore>, interval: Duration) -> Self {
        Self {
            source,
            store,
            interval,
        }
    }

    /// Runs one fetch-decode-replace cycle.
    ///
    /// The store is only written when the response carried a result array.
    /// Errors and [`RefreshOutcome::NoResult`] leave it untouched.
    pub async fn refresh_once(&self) -> Result<RefreshOutcome> {
        let response = self.source.fetch().await?;

        if let Some(ms) = response.ms {
            tracing::debug!("{} answered the query in {}ms", self.source.source_name(), ms);
        }

        let Some(documents) = response.into_documents() else {
            return Ok(RefreshOutcome::NoResult);
        };

        let (properties, dropped) = decode_properties(documents);
        let accepted = properties.len();
        self.store.replace(properties);

        Ok(RefreshOutcome::Replaced { accepted, dropped })
    }

    async fn run_cycle(&self) {
        let source = self.source.source_name();
        tracing::info!("Starting property fetch from {}...", source);
        let start = Instant::now();

        match self.refresh_once().await {
            Ok(RefreshOutcome::Replaced { accepted, dropped }) => {
                tracing::info!(
                    accepted,
                    dropped,
                    "Properties successfully updated from {}",
                    source
                );
            }
            Ok(RefreshOutcome::NoResult) => {
                tracing::warn!(
                    cached = self.store.len(),
                    "No properties found in {} response, keeping the current snapshot",
                    source
                );
            }
            Err(e) => {
                tracing::error!(
                    category = ?e.category(),
                    cached = self.store.len(),
                    "Failed to fetch properties from {}: {}",
                    source,
                    e
                );
            }
        }

        tracing::info!("Property fetch completed in {:?}", start.elapsed());
    }

    /// Runs a cycle immediately and then once per interval until `cancel`
    /// fires. A cycle in flight is abandoned on cancellation; the store is
    /// never left half-written because replacement is a single swap.
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.run_cycle() => {}
            }

            match chrono::TimeDelta::from_std(self.interval)
                .ok()
                .and_then(|delta| Utc::now().checked_add_signed(delta))
            {
                Some(next) => tracing::info!(
                    "Next update will occur in {:?} (at {})",
                    self.interval,
                    next.to_rfc3339()
                ),
                None => tracing::info!("Next update will occur in {:?}", self.interval),
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("Property refresher stopped");
    }

    /// Starts [`Refresher::run`] on the runtime.
    pub fn spawn(self, cancel: CancellationToken) -> RefresherHandle {
        let handle = tokio::spawn(self.run(cancel.clone()));
        RefresherHandle { cancel, handle }
    }
}

/// Foreground handle to a spawned refresher. Dropping it aborts the task.
pub struct RefresherHandle {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl RefresherHandle {
    /// Signals the loop to stop and waits for it to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Err(e) = (&mut self.handle).await {
            tracing::error!("Property refresher task failed: {}", e);
        }
    }
}

impl Drop for RefresherHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

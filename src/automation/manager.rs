use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::cache::{CacheIndex, NodeCache};
use super::dispatcher::{Action, ActionDispatcher, ActionOutcome};
use super::fingerprint::{self, Fingerprint};
use super::locator::{self, Criterion};
use super::platform::AccessibilityProvider;
use super::serializer::{self, RenderOptions};
use super::snapshot::build_snapshot;
use super::types::{ElementInfo, NodeId, Snapshot};
use crate::config::EngineConfig;
use crate::error::{AppError, Result};

pub const MAX_IDLE_TIMEOUT_MS: u64 = 60_000;
pub const MIN_POLL_INTERVAL_MS: u64 = 10;

/// Rendered snapshot returned to callers
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotText {
    pub snapshot_id: String,
    pub generation: u64,
    pub row_count: usize,
    pub text: String,
}

/// Element resolved from the current cache
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedElement {
    #[serde(flatten)]
    pub element: ElementInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    pub child_count: usize,
}

/// Result of a wait-for-idle poll loop; a timeout is reported, not raised
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdleOutcome {
    pub settled: bool,
    pub polls: u32,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_similarity: Option<u8>,
}

/// UI automation manager
///
/// Single entry point for callers: captures snapshots from the accessibility
/// provider, keeps the node cache current and routes actions through the
/// dispatcher.
pub struct AutomationManager {
    provider: Arc<dyn AccessibilityProvider>,
    cache: Arc<NodeCache>,
    dispatcher: ActionDispatcher,
    config: EngineConfig,
}

impl AutomationManager {
    pub fn new(provider: Arc<dyn AccessibilityProvider>, config: EngineConfig) -> Self {
        let cache = Arc::new(NodeCache::new());
        let dispatcher = ActionDispatcher::new(
            Arc::clone(&provider),
            Arc::clone(&cache),
            config.action_wait,
            config.action_timeout,
        );
        Self {
            provider,
            cache,
            dispatcher,
            config,
        }
    }

    pub fn cache(&self) -> &NodeCache {
        &self.cache
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a snapshot of every window and publish it to the cache
    pub async fn capture(&self) -> Result<Snapshot> {
        Ok(self.capture_indexed().await?.0)
    }

    /// `capture`, also returning the cache index built from this snapshot
    async fn capture_indexed(&self) -> Result<(Snapshot, Arc<CacheIndex>)> {
        let mut windows = self.provider.list_windows().await?;

        let missing = windows.iter().filter(|w| w.root.is_none()).count();
        if missing > 0 && missing < windows.len() {
            tracing::warn!("Skipping {} window(s) without an accessible root", missing);
        }

        if missing == windows.len() {
            if !windows.is_empty() {
                tracing::warn!(
                    "No window root available among {} window(s), using the active window",
                    windows.len()
                );
            }
            windows = self.provider.active_window().await?.into_iter().collect();
            if windows.iter().all(|w| w.root.is_none()) {
                tracing::warn!("Active window unavailable, snapshot will be empty");
            }
        }

        let snapshot = build_snapshot(&windows, self.provider.screen_info());
        drop(windows);

        let index = self.cache.populate(&snapshot).await;
        Ok((snapshot, index))
    }

    /// Capture and render the current screen
    pub async fn snapshot(&self, include_detail: bool) -> Result<SnapshotText> {
        let (snapshot, index) = self.capture_indexed().await?;
        let generation = index.generation;

        let rendered = serializer::render(
            &snapshot,
            &RenderOptions {
                max_text_len: self.config.max_text_len,
                include_detail,
            },
        );

        tracing::info!(
            "Snapshot {}: {} window(s), {} of {} nodes rendered",
            snapshot.snapshot_id,
            snapshot.windows.len(),
            rendered.row_count,
            snapshot.node_count()
        );

        Ok(SnapshotText {
            snapshot_id: snapshot.snapshot_id,
            generation,
            row_count: rendered.row_count,
            text: rendered.text,
        })
    }

    /// Capture a fresh snapshot and return every node matching the query
    pub async fn find(&self, criterion: Criterion, value: &str, exact: bool) -> Result<Vec<ElementInfo>> {
        if value.is_empty() {
            return Err(AppError::InvalidParams("search value must not be empty".to_string()));
        }
        let snapshot = self.capture().await?;
        let found = locator::find(&snapshot.windows, criterion, value, exact);
        tracing::debug!("find {:?} {:?} (exact: {}): {} match(es)", criterion, value, exact, found.len());
        Ok(found)
    }

    /// Look `id` up in the most recent snapshot without capturing a new one
    pub async fn resolve(&self, id: &NodeId) -> Result<ResolvedElement> {
        let resolved = self
            .cache
            .lookup(id)
            .await
            .ok_or_else(|| AppError::ElementNotFound(id.clone()))?;

        Ok(ResolvedElement {
            element: ElementInfo::from_node(&resolved.node, resolved.window_id),
            package_name: resolved.package_name,
            child_count: resolved.node.children.len(),
        })
    }

    pub async fn perform(&self, action: &Action) -> Result<ActionOutcome> {
        self.dispatcher.perform(action).await
    }

    /// Poll until two consecutive snapshots are at least `similarity_threshold`
    /// percent alike, or `timeout_ms` passes.
    pub async fn wait_for_idle(
        &self,
        timeout_ms: u64,
        poll_interval_ms: u64,
        similarity_threshold: u32,
    ) -> Result<IdleOutcome> {
        if !(MIN_POLL_INTERVAL_MS..=MAX_IDLE_TIMEOUT_MS).contains(&timeout_ms) {
            return Err(AppError::InvalidParams(format!(
                "timeout_ms must be between {} and {}, got {}",
                MIN_POLL_INTERVAL_MS, MAX_IDLE_TIMEOUT_MS, timeout_ms
            )));
        }
        if poll_interval_ms < MIN_POLL_INTERVAL_MS || poll_interval_ms > timeout_ms {
            return Err(AppError::InvalidParams(format!(
                "poll_interval_ms must be between {} and timeout_ms ({}), got {}",
                MIN_POLL_INTERVAL_MS, timeout_ms, poll_interval_ms
            )));
        }
        if similarity_threshold > 100 {
            return Err(AppError::InvalidParams(format!(
                "similarity_threshold must be between 0 and 100, got {}",
                similarity_threshold
            )));
        }
        let threshold = similarity_threshold as u8;

        let started = Instant::now();
        let deadline = started + Duration::from_millis(timeout_ms);
        let interval = Duration::from_millis(poll_interval_ms);

        let mut previous = self.fingerprint().await?;
        let mut polls = 1;
        let mut last_similarity = None;

        let settled = loop {
            let now = Instant::now();
            if now >= deadline {
                break false;
            }
            tokio::time::sleep(interval.min(deadline - now)).await;

            let current = self.fingerprint().await?;
            polls += 1;
            let similarity = fingerprint::compare(&previous, &current);
            last_similarity = Some(similarity);

            if similarity >= threshold {
                break true;
            }
            previous = current;
        };

        let outcome = IdleOutcome {
            settled,
            polls,
            elapsed_ms: started.elapsed().as_millis() as u64,
            last_similarity,
        };
        if settled {
            tracing::debug!("Screen settled after {} polls ({}ms)", outcome.polls, outcome.elapsed_ms);
        } else {
            tracing::info!(
                "Screen still changing after {}ms (last similarity {:?})",
                outcome.elapsed_ms,
                outcome.last_similarity
            );
        }
        Ok(outcome)
    }

    async fn fingerprint(&self) -> Result<Fingerprint> {
        let snapshot = self.capture().await?;
        Ok(fingerprint::generate(&snapshot, self.config.fingerprint_buckets))
    }
}

//! Cache consumer: turns queued invalidation events into stale entries and
//! refetches.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use metrics::{counter, histogram};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::config::CacheConfig;
use super::events::EventQueue;
use super::planner::InvalidationPlan;
use super::{METRIC_CACHE_CONSUME_MS, METRIC_CACHE_REFETCH, QueryCache};
use crate::client::Transport;
use crate::endpoints::Query;

/// Drains the queue, merges the batch into one plan and applies it.
///
/// 1. Drain up to `consume_batch_limit` events
/// 2. Merge them into an [`InvalidationPlan`]
/// 3. Mark every entry providing a planned tag stale
/// 4. Re-fetch the stale entries that still have subscribers, once per key
pub struct CacheConsumer {
    config: CacheConfig,
    cache: Arc<QueryCache>,
    queue: Arc<EventQueue>,
    transport: Arc<dyn Transport>,
}

impl CacheConsumer {
    pub fn new(
        config: CacheConfig,
        cache: Arc<QueryCache>,
        queue: Arc<EventQueue>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config,
            cache,
            queue,
            transport,
        }
    }

    /// Consume one batch. Returns true if any events were processed.
    #[instrument(skip(self))]
    pub async fn consume(&self) -> bool {
        let started_at = Instant::now();
        let events = self.queue.drain(self.config.consume_batch_limit_non_zero());
        if events.is_empty() {
            return false;
        }

        let event_count = events.len();
        let event_ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
        let plan = InvalidationPlan::from_events(events);

        info!(
            event_count,
            event_ids = ?event_ids,
            plan = %plan,
            "Cache consumption starting"
        );

        let watched = self.cache.invalidate(&plan.tags);
        let refetched = if self.config.refetch_on_invalidate {
            self.refetch(watched).await
        } else {
            0
        };

        info!(
            event_count,
            tags = plan.tags.len(),
            refetched,
            "Cache consumption complete"
        );

        histogram!(METRIC_CACHE_CONSUME_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);

        true
    }

    /// Drain the queue completely, batch by batch.
    pub async fn consume_all(&self) -> usize {
        let mut batches = 0;
        while self.consume().await {
            batches += 1;
        }
        batches
    }

    /// Re-fetch concurrently. Failures leave the entry stale and are reported
    /// to subscribers; there is no retry.
    async fn refetch(&self, queries: Vec<Query>) -> usize {
        let fetches = queries.into_iter().map(|query| async move {
            counter!(METRIC_CACHE_REFETCH, "endpoint" => query.name()).increment(1);
            match self.transport.execute(&query.request()).await {
                Ok(envelope) => {
                    self.cache.fill(&query, envelope);
                    true
                }
                Err(err) => {
                    warn!(
                        key = %query.key(),
                        error = %err,
                        "Refetch after invalidation failed; entry left stale"
                    );
                    self.cache.fail(&query.key(), &err);
                    false
                }
            }
        });

        join_all(fetches)
            .await
            .into_iter()
            .filter(|succeeded| *succeeded)
            .count()
    }
}

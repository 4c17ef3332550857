//! Merges a batch of invalidation events into one plan.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use uuid::Uuid;

use super::events::{Epoch, InvalidationEvent};
use super::tags::TagSet;

/// What one consumption pass has to do.
#[derive(Debug, Default)]
pub struct InvalidationPlan {
    /// Distinct events folded into this plan, in arrival order.
    pub event_ids: Vec<Uuid>,
    pub mutations: BTreeSet<&'static str>,
    /// Union of every event's tags.
    pub tags: TagSet,
    pub latest_epoch: Option<Epoch>,
}

impl fmt::Display for InvalidationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InvalidationPlan {{ events: {}, mutations: {:?}, tags: {} }}",
            self.event_ids.len(),
            self.mutations,
            self.tags.len(),
        )
    }
}

impl InvalidationPlan {
    /// Dedupe by event id and union the tags of what remains.
    pub fn from_events(events: Vec<InvalidationEvent>) -> Self {
        let mut plan = Self::default();
        let mut seen_ids = HashSet::new();

        for event in events {
            if !seen_ids.insert(event.id) {
                continue;
            }
            plan.event_ids.push(event.id);
            plan.mutations.insert(event.mutation);
            plan.latest_epoch = plan.latest_epoch.max(Some(event.epoch));
            plan.tags.extend(event.tags);
        }

        plan
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

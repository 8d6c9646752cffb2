//! Change notifications
//!
//! The store publishes a notification whenever a collection changes. A
//! dashboard subscribes for one user and turns bursts of notifications into
//! a single request to re-pull the affected collections. Aggregates are
//! always recomputed from fresh snapshots, never patched in place.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::EntityKind;

/// Default channel capacity; slow subscribers past this get a full refresh.
pub const DEFAULT_BUS_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Inserted,
    Updated,
    Deleted,
    /// Bulk load of a whole collection
    Imported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub entity: EntityKind,
    pub user_id: String,
    pub kind: ChangeKind,
}

impl ChangeNotification {
    pub fn new(entity: EntityKind, user_id: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            entity,
            user_id: user_id.into(),
            kind,
        }
    }
}

/// Collections a subscriber should fetch again
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RefreshRequest {
    pub entities: BTreeSet<EntityKind>,
}

impl RefreshRequest {
    /// Every collection, used after missed notifications
    pub fn everything() -> Self {
        Self {
            entities: EntityKind::ALL.into_iter().collect(),
        }
    }

    pub fn includes(&self, entity: EntityKind) -> bool {
        self.entities.contains(&entity)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Fan-out of change notifications to any number of subscribers
#[derive(Debug, Clone)]
pub struct ChangeBus {
    tx: broadcast::Sender<ChangeNotification>,
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

impl ChangeBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish a notification, returning how many subscribers received it.
    pub fn publish(&self, notification: ChangeNotification) -> usize {
        log::debug!(
            "Change {:?} on {} for user {}",
            notification.kind,
            notification.entity,
            notification.user_id
        );
        // No subscribers is not an error, nobody is watching
        self.tx.send(notification).unwrap_or(0)
    }

    pub fn subscribe(&self, user_id: impl Into<String>) -> ChangeSubscription {
        ChangeSubscription {
            user_id: user_id.into(),
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// One user's view of the bus
#[derive(Debug)]
pub struct ChangeSubscription {
    user_id: String,
    rx: broadcast::Receiver<ChangeNotification>,
}

impl ChangeSubscription {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Wait for the next change to this user's records.
    ///
    /// Blocks until one relevant notification arrives, then folds in every
    /// notification already queued. Returns `None` once the bus is dropped.
    pub async fn next_refresh(&mut self) -> Option<RefreshRequest> {
        let mut request = RefreshRequest::default();
        while request.is_empty() {
            match self.rx.recv().await {
                Ok(n) => self.absorb(&mut request, n),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("Subscriber for {} missed {} notifications", self.user_id, skipped);
                    return Some(RefreshRequest::everything());
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
        self.drain_into(&mut request);
        Some(request)
    }

    /// Coalesce whatever is queued right now without waiting.
    pub fn try_refresh(&mut self) -> Option<RefreshRequest> {
        let mut request = RefreshRequest::default();
        self.drain_into(&mut request);
        (!request.is_empty()).then_some(request)
    }

    fn drain_into(&mut self, request: &mut RefreshRequest) {
        loop {
            match self.rx.try_recv() {
                Ok(n) => self.absorb(request, n),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    log::warn!("Subscriber for {} missed {} notifications", self.user_id, skipped);
                    *request = RefreshRequest::everything();
                }
                Err(_) => break,
            }
        }
    }

    fn absorb(&self, request: &mut RefreshRequest, notification: ChangeNotification) {
        if notification.user_id == self.user_id {
            request.entities.insert(notification.entity);
        }
    }
}

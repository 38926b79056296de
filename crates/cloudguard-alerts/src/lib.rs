#![warn(missing_docs)]
//! # cloudguard-alerts
//!
//! ## Purpose
//! Provides the alert persistence seam and its live-query semantics.
//!
//! ## Responsibilities
//! - Define a backend-agnostic alert store trait keyed by owner uid.
//! - Derive deterministic record identifiers for idempotent writes.
//! - Expose an in-process store for tests, demos, and CI.
//!
//! ## Data flow
//! App records an [`AlertDraft`] -> store assigns an id and persists ->
//! every subscriber for that owner receives a fresh newest-first snapshot.
//!
//! ## Ownership and lifetimes
//! Snapshots are owned copies; subscribers never borrow store internals, so
//! the hosted backend can replace [`MemoryAlertStore`] without touching
//! callers.
//!
//! ## Error model
//! Draft validation failures surface as [`AlertStoreError`]; the hosted
//! backend maps its transport failures onto the same variants.
//!
//! ## Security and privacy notes
//! Alert descriptions come from model summaries, never from raw uploaded
//! log text.

use std::collections::HashMap;
use std::sync::Mutex;

use cloudguard_core::{Alert, AlertDraft, CoreError, sort_newest_first};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Callback receiving a newest-first snapshot after every store change.
pub type SnapshotCallback = Box<dyn Fn(&[Alert]) + Send + Sync>;

/// Opaque handle identifying one live-query registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Abstract alert store backed by the hosted document database.
///
/// Ordering contract: snapshots are always newest-first. Live-query
/// contract: a subscriber receives one snapshot immediately on registration
/// and one after every subsequent change for its owner; the caller owns
/// unsubscription on teardown.
pub trait AlertStore: Send + Sync {
    /// Persists one draft and returns the stored record.
    ///
    /// # Errors
    /// Returns [`AlertStoreError::InvalidDraft`] when the draft fails record
    /// validation.
    fn record(&self, draft: AlertDraft) -> Result<Alert, AlertStoreError>;

    /// Returns the owner's alerts, newest first.
    fn snapshot_for(&self, owner_uid: &str) -> Vec<Alert>;

    /// Registers a live-query callback for one owner.
    fn subscribe(&self, owner_uid: &str, callback: SnapshotCallback) -> SubscriptionId;

    /// Removes a registration; unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Derives the deterministic record id for a draft.
///
/// The id is the hex SHA-256 of owner, timestamp, and description, so
/// re-recording an identical draft is idempotent rather than duplicating
/// the feed entry.
pub fn alert_id_for_draft(draft: &AlertDraft) -> String {
    let mut hasher = Sha256::new();
    hasher.update(draft.owner_uid.as_bytes());
    hasher.update(draft.timestamp_ms.to_be_bytes());
    hasher.update(draft.description.as_bytes());
    hex::encode(hasher.finalize())
}

struct Subscriber {
    owner_uid: String,
    callback: SnapshotCallback,
}

struct StoreInner {
    alerts: Vec<Alert>,
    subscribers: HashMap<u64, Subscriber>,
    next_subscription: u64,
}

/// In-process alert store used by tests and the demo shell.
///
/// # Notes
/// Callbacks run synchronously on the recording thread and must not call
/// back into the store.
pub struct MemoryAlertStore {
    inner: Mutex<StoreInner>,
}

impl MemoryAlertStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                alerts: Vec::new(),
                subscribers: HashMap::new(),
                next_subscription: 1,
            }),
        }
    }
}

impl Default for MemoryAlertStore {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot_for_owner(alerts: &[Alert], owner_uid: &str) -> Vec<Alert> {
    let mut snapshot: Vec<Alert> = alerts
        .iter()
        .filter(|alert| alert.owner_uid == owner_uid)
        .cloned()
        .collect();
    sort_newest_first(&mut snapshot);
    snapshot
}

impl AlertStore for MemoryAlertStore {
    fn record(&self, draft: AlertDraft) -> Result<Alert, AlertStoreError> {
        let id = alert_id_for_draft(&draft);
        let alert = Alert::new(
            id,
            draft.owner_uid,
            draft.risk_level,
            draft.description,
            draft.timestamp_ms,
        )
        .map_err(AlertStoreError::InvalidDraft)?;

        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AlertStoreError::Backend("alert store lock poisoned".to_string()))?;

        if let Some(existing) = inner.alerts.iter().find(|entry| entry.id == alert.id) {
            return Ok(existing.clone());
        }

        inner.alerts.push(alert.clone());

        let owner_snapshot = snapshot_for_owner(&inner.alerts, &alert.owner_uid);
        for subscriber in inner.subscribers.values() {
            if subscriber.owner_uid == alert.owner_uid {
                (subscriber.callback)(&owner_snapshot);
            }
        }

        Ok(alert)
    }

    fn snapshot_for(&self, owner_uid: &str) -> Vec<Alert> {
        match self.inner.lock() {
            Ok(inner) => snapshot_for_owner(&inner.alerts, owner_uid),
            Err(_) => Vec::new(),
        }
    }

    fn subscribe(&self, owner_uid: &str, callback: SnapshotCallback) -> SubscriptionId {
        let mut inner = match self.inner.lock() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };

        let id = inner.next_subscription;
        inner.next_subscription += 1;

        let initial = snapshot_for_owner(&inner.alerts, owner_uid);
        callback(&initial);

        inner.subscribers.insert(
            id,
            Subscriber {
                owner_uid: owner_uid.to_string(),
                callback,
            },
        );

        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.subscribers.remove(&id.0);
        }
    }
}

/// Alert store error type.
#[derive(Debug, Error)]
pub enum AlertStoreError {
    /// Draft failed record validation.
    #[error("invalid alert draft: {0}")]
    InvalidDraft(#[source] CoreError),
    /// Backend runtime failure.
    #[error("alert store failure: {0}")]
    Backend(String),
}

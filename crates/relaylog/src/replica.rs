//! In-memory replicas of a grow-only operation log.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use futures::future;
use futures::stream::{self, StreamExt};
use tracing::{debug, trace};

use relaylog_core::OrdTree;
use relaylog_sync::{Exchange, Inbound, Outbound};

/// The acknowledgement type flowing back to a pushing replica. The push
/// protocol never sends any.
pub type Ack = ();

/// A named replica holding an ordered set of operations.
///
/// Writers swap in a new tree under a short write lock; readers take an O(1)
/// snapshot and never observe a half-applied insert.
///
/// As an [`Exchange`], a replica pushes: `send` streams a snapshot of its
/// log to the peer, `receive` appends every operation it is given. After
/// one round in each direction both replicas hold the union of their logs.
pub struct Replica<T> {
    name: String,
    log: Arc<RwLock<OrdTree<T>>>,
}

impl<T> Replica<T>
where
    T: Ord + Clone,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log: Arc::new(RwLock::new(OrdTree::new())),
        }
    }

    /// Create a replica already holding `ops`.
    pub fn from_ops(name: impl Into<String>, ops: impl IntoIterator<Item = T>) -> Self {
        Self {
            name: name.into(),
            log: Arc::new(RwLock::new(ops.into_iter().collect())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append an operation. Returns false if it was already present.
    pub fn append(&self, op: T) -> bool {
        append(&self.log, op)
    }

    pub fn contains(&self, op: &T) -> bool {
        self.snapshot().contains(op)
    }

    /// The current log. Later appends do not affect the snapshot.
    pub fn snapshot(&self) -> OrdTree<T> {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

/// The lock only ever guards a pointer swap, so a poisoned lock still holds
/// a valid tree.
fn append<T: Ord + Clone>(log: &RwLock<OrdTree<T>>, op: T) -> bool {
    let mut log = log.write().unwrap_or_else(PoisonError::into_inner);
    let next = log.insert(op);
    if next.ptr_eq(&log) {
        return false;
    }
    *log = next;
    true
}

impl<T> Exchange<Ack, T> for Replica<T>
where
    T: Ord + Clone + Send + Sync + 'static,
{
    fn send(&self, _acks: Inbound<Ack>) -> Outbound<T> {
        let ops = self.snapshot();
        debug!(replica = %self.name, ops = ops.len(), "pushing snapshot");
        stream::iter(ops.into_iter().map(Ok)).boxed()
    }

    fn receive(&self, ops: Inbound<T>) -> Outbound<Ack> {
        let log = Arc::clone(&self.log);
        let name = self.name.clone();
        ops.filter_map(move |op| {
            if append(&log, op) {
                trace!(replica = %name, "applied remote op");
            }
            future::ready(None)
        })
        .boxed()
    }
}

impl<T: fmt::Debug> fmt::Debug for Replica<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let log = self.log.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Replica")
            .field("name", &self.name)
            .field("log", &*log)
            .finish()
    }
}

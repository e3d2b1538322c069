//! Topology drivers: sync N exchanges as a chain or fully connected.
//!
//! A driver only decides which ordered pairs `(left, right)` to connect.
//! Every pair runs two directional syncs,
//!
//! ```text
//! left.send    -> right.receive     (O values left to right, I values back)
//! left.receive <- right.send        (I values right to left, O values back)
//! ```
//!
//! and every pair runs concurrently with every other, inside one scope.

use std::sync::Arc;

use tracing::{debug, debug_span, Instrument};

use crate::error::Result;
use crate::exchange::Exchange;
use crate::protocol::{Replicator, SyncReport};
use crate::scope::Scope;

/// How a set of exchanges is paired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Adjacent pairs `(e0, e1), (e1, e2), ...`. Values only travel along
    /// the chain; a stalled link cuts off everything beyond it.
    Chain,
    /// Every ordered pair `(ei, ej)` with `i != j`. Each unordered pair is
    /// therefore connected twice, once from each end.
    FullyConnected,
}

impl Topology {
    /// The ordered index pairs to sync for `n` exchanges.
    pub fn pairs(self, n: usize) -> Vec<(usize, usize)> {
        match self {
            Topology::Chain => (1..n).map(|i| (i - 1, i)).collect(),
            Topology::FullyConnected => (0..n)
                .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
                .collect(),
        }
    }
}

impl Replicator {
    /// Sync exchanges along a chain. Returns once every adjacent pair has
    /// finished both directions.
    pub async fn sync_chain<I, O, E>(&self, exchanges: &[Arc<E>]) -> Result<SyncReport>
    where
        I: Send + 'static,
        O: Send + 'static,
        E: Exchange<I, O> + ?Sized + 'static,
    {
        self.sync_topology(Topology::Chain, exchanges).await
    }

    /// Sync every exchange with every other one.
    pub async fn sync_all<I, O, E>(&self, exchanges: &[Arc<E>]) -> Result<SyncReport>
    where
        I: Send + 'static,
        O: Send + 'static,
        E: Exchange<I, O> + ?Sized + 'static,
    {
        self.sync_topology(Topology::FullyConnected, exchanges).await
    }

    /// Sync the pairs `topology` derives for `exchanges`, all concurrently.
    ///
    /// The first failure in any pair cancels every other pair and is
    /// returned once all of them have unwound.
    pub async fn sync_topology<I, O, E>(
        &self,
        topology: Topology,
        exchanges: &[Arc<E>],
    ) -> Result<SyncReport>
    where
        I: Send + 'static,
        O: Send + 'static,
        E: Exchange<I, O> + ?Sized + 'static,
    {
        let pairs = topology.pairs(exchanges.len());
        debug!(?topology, exchanges = exchanges.len(), pairs = pairs.len(), "topology sync started");

        let mut scope = Scope::new();
        for (l, r) in pairs {
            let left = Arc::clone(&exchanges[l]);
            let right = Arc::clone(&exchanges[r]);
            let replicator = self.clone();
            scope.spawn(
                async move { replicator.sync_pair(left, right).await }
                    .instrument(debug_span!("sync.pair", left = l, right = r)),
            );
        }

        let report: SyncReport = scope.join().await?.into_iter().sum();
        debug!(
            syncs = report.syncs,
            forwarded = report.forwarded(),
            "topology sync finished"
        );
        Ok(report)
    }

    /// Run both directional syncs between `left` and `right` concurrently.
    async fn sync_pair<I, O, E>(&self, left: Arc<E>, right: Arc<E>) -> Result<SyncReport>
    where
        I: Send + 'static,
        O: Send + 'static,
        E: Exchange<I, O> + ?Sized + 'static,
    {
        let mut scope = Scope::new();

        let (sender, receiver) = (Arc::clone(&left), Arc::clone(&right));
        let replicator = self.clone();
        scope.spawn(async move {
            replicator
                .sync(
                    move |input| sender.send(input),
                    move |input| receiver.receive(input),
                )
                .await
        });

        let replicator = self.clone();
        scope.spawn(async move {
            replicator
                .sync(
                    move |input| left.receive(input),
                    move |input| right.send(input),
                )
                .await
        });

        Ok(scope.join().await?.into_iter().sum())
    }
}

/// Run [`Replicator::sync_chain`] with the default configuration.
pub async fn sync_chain<I, O, E>(exchanges: &[Arc<E>]) -> Result<SyncReport>
where
    I: Send + 'static,
    O: Send + 'static,
    E: Exchange<I, O> + ?Sized + 'static,
{
    Replicator::default().sync_chain(exchanges).await
}

/// Run [`Replicator::sync_all`] with the default configuration.
pub async fn sync_all<I, O, E>(exchanges: &[Arc<E>]) -> Result<SyncReport>
where
    I: Send + 'static,
    O: Send + 'static,
    E: Exchange<I, O> + ?Sized + 'static,
{
    Replicator::default().sync_all(exchanges).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{Inbound, Outbound};
    use futures::{stream, StreamExt};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sends its id once, then reports every id it hears to a shared log.
    struct Beacon {
        id: u32,
        heard: Arc<std::sync::Mutex<Vec<(u32, u32)>>>,
        calls: AtomicUsize,
    }

    impl Beacon {
        fn new(id: u32, heard: &Arc<std::sync::Mutex<Vec<(u32, u32)>>>) -> Arc<Self> {
            Arc::new(Self {
                id,
                heard: Arc::clone(heard),
                calls: AtomicUsize::new(0),
            })
        }

        fn listen(&self, input: Inbound<u32>) -> Outbound<u32> {
            let (me, heard) = (self.id, Arc::clone(&self.heard));
            input
                .filter_map(move |from| {
                    heard.lock().unwrap().push((from, me));
                    async { None }
                })
                .boxed()
        }
    }

    impl Exchange<u32, u32> for Beacon {
        fn send(&self, _input: Inbound<u32>) -> Outbound<u32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            stream::iter([Ok(self.id)]).boxed()
        }

        fn receive(&self, input: Inbound<u32>) -> Outbound<u32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.listen(input)
        }
    }

    #[test]
    fn test_chain_pairs() {
        assert_eq!(Topology::Chain.pairs(0), vec![]);
        assert_eq!(Topology::Chain.pairs(1), vec![]);
        assert_eq!(Topology::Chain.pairs(2), vec![(0, 1)]);
        assert_eq!(Topology::Chain.pairs(4), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_fully_connected_pairs() {
        assert!(Topology::FullyConnected.pairs(1).is_empty());
        assert_eq!(Topology::FullyConnected.pairs(2), vec![(0, 1), (1, 0)]);

        let pairs = Topology::FullyConnected.pairs(5);
        assert_eq!(pairs.len(), 5 * 4);
        assert!(pairs.iter().all(|(i, j)| i != j));
    }

    #[tokio::test]
    async fn test_chain_links_only_neighbours() {
        let heard = Arc::new(std::sync::Mutex::new(Vec::new()));
        let beacons = vec![Beacon::new(1, &heard), Beacon::new(2, &heard), Beacon::new(3, &heard)];

        let report = sync_chain(&beacons).await.unwrap();
        assert_eq!(report.syncs, 4);

        let mut heard = heard.lock().unwrap().clone();
        heard.sort_unstable();
        assert_eq!(heard, vec![(1, 2), (2, 1), (2, 3), (3, 2)]);
    }

    #[tokio::test]
    async fn test_sync_all_reaches_everyone() {
        let heard = Arc::new(std::sync::Mutex::new(Vec::new()));
        let beacons: Vec<_> = (1..=4).map(|id| Beacon::new(id, &heard)).collect();

        let report = sync_all(&beacons).await.unwrap();
        assert_eq!(report.syncs, 4 * 3 * 2);

        let heard = heard.lock().unwrap();
        for from in 1..=4u32 {
            for to in (1..=4u32).filter(|&to| to != from) {
                assert!(heard.contains(&(from, to)), "{} never heard {}", to, from);
            }
        }
    }

    #[tokio::test]
    async fn test_single_exchange_does_nothing() {
        let heard = Arc::new(std::sync::Mutex::new(Vec::new()));
        let beacon = Beacon::new(1, &heard);

        let report = sync_all(&[Arc::clone(&beacon)]).await.unwrap();
        assert_eq!(report, SyncReport::default());
        assert_eq!(beacon.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_trait_objects() {
        let heard = Arc::new(std::sync::Mutex::new(Vec::new()));
        let exchanges: Vec<Arc<dyn Exchange<u32, u32>>> =
            vec![Beacon::new(1, &heard), Beacon::new(2, &heard)];

        let report = Replicator::default().sync_chain(&exchanges).await.unwrap();
        assert_eq!(report.syncs, 2);
        assert_eq!(report.forwarded(), 2);
    }
}

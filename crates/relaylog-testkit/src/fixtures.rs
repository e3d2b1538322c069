//! Exchanges with scripted behavior.
//!
//! All fixtures speak `Exchange<Message, Message>` so they can be mixed in a
//! single `Vec<Arc<dyn Exchange<Message, Message>>>`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::anyhow;
use futures::future;
use futures::stream::{self, StreamExt};

use relaylog_sync::{BoxError, Exchange, Inbound, Outbound};

/// A value sent by a [`ScriptedExchange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Message {
    pub from: u32,
    pub seq: u32,
}

/// Shared record of `(from, to)` deliveries.
#[derive(Debug, Clone, Default)]
pub struct LinkLog {
    links: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl LinkLog {
    pub fn record(&self, from: u32, to: u32) {
        self.links
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((from, to));
    }

    /// Every delivery so far, sorted.
    pub fn sorted(&self) -> Vec<(u32, u32)> {
        let mut links = self
            .links
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        links.sort_unstable();
        links
    }

    /// Sorted, with duplicates removed.
    pub fn distinct(&self) -> Vec<(u32, u32)> {
        let mut links = self.sorted();
        links.dedup();
        links
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sends `count` messages stamped with its id and records every message it
/// receives in a [`LinkLog`].
#[derive(Debug)]
pub struct ScriptedExchange {
    id: u32,
    count: u32,
    links: LinkLog,
    invocations: AtomicUsize,
}

impl ScriptedExchange {
    pub fn new(id: u32, count: u32, links: &LinkLog) -> Self {
        Self {
            id,
            count,
            links: links.clone(),
            invocations: AtomicUsize::new(0),
        }
    }

    /// `n` exchanges with ids `0..n` sharing one link log.
    pub fn network(n: u32, count: u32, links: &LinkLog) -> Vec<Arc<Self>> {
        (0..n)
            .map(|id| Arc::new(Self::new(id, count, links)))
            .collect()
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// How many times `send` or `receive` was called.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

impl Exchange<Message, Message> for ScriptedExchange {
    fn send(&self, _input: Inbound<Message>) -> Outbound<Message> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        let from = self.id;
        stream::iter((0..self.count).map(move |seq| Ok(Message { from, seq }))).boxed()
    }

    fn receive(&self, input: Inbound<Message>) -> Outbound<Message> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        let (me, links) = (self.id, self.links.clone());
        input
            .filter_map(move |message| {
                links.record(message.from, me);
                future::ready(None)
            })
            .boxed()
    }
}

/// Counts live [`LiveGuard`]s.
#[derive(Debug, Clone, Default)]
pub struct LiveCounter {
    live: Arc<AtomicUsize>,
}

impl LiveCounter {
    pub fn guard(&self) -> LiveGuard {
        self.live.fetch_add(1, Ordering::SeqCst);
        LiveGuard {
            live: Arc::clone(&self.live),
        }
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// Decrements its counter when dropped.
#[derive(Debug)]
pub struct LiveGuard {
    live: Arc<AtomicUsize>,
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Returns streams that never yield and never end.
///
/// Each stream holds its inbound stream and a [`LiveGuard`], so the counter
/// shows how many of them have not been dropped yet.
#[derive(Debug, Default)]
pub struct StallingExchange {
    counter: LiveCounter,
}

impl StallingExchange {
    pub fn new(counter: &LiveCounter) -> Self {
        Self {
            counter: counter.clone(),
        }
    }

    fn stall(&self, input: Inbound<Message>) -> Outbound<Message> {
        let guard = self.counter.guard();
        stream::pending()
            .map(move |never: Message| {
                let _held = (&guard, &input);
                Ok::<_, BoxError>(never)
            })
            .boxed()
    }
}

impl Exchange<Message, Message> for StallingExchange {
    fn send(&self, input: Inbound<Message>) -> Outbound<Message> {
        self.stall(input)
    }

    fn receive(&self, input: Inbound<Message>) -> Outbound<Message> {
        self.stall(input)
    }
}

/// Fails on `send`; drains and discards on `receive`.
#[derive(Debug, Clone)]
pub struct FailingExchange {
    reason: &'static str,
}

impl FailingExchange {
    pub fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

impl Exchange<Message, Message> for FailingExchange {
    fn send(&self, _input: Inbound<Message>) -> Outbound<Message> {
        let reason = self.reason;
        stream::once(async move {
            Err::<Message, BoxError>(anyhow!("injected failure: {}", reason).into())
        })
        .boxed()
    }

    fn receive(&self, input: Inbound<Message>) -> Outbound<Message> {
        input.filter_map(|_| future::ready(None)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_counter() {
        let counter = LiveCounter::default();
        let a = counter.guard();
        let b = counter.guard();
        assert_eq!(counter.live(), 2);

        drop(a);
        assert_eq!(counter.live(), 1);
        drop(b);
        assert_eq!(counter.live(), 0);
    }

    #[test]
    fn test_stalling_streams_hold_guards() {
        let counter = LiveCounter::default();
        let exchange = StallingExchange::new(&counter);

        let send = exchange.send(stream::empty().boxed());
        let receive = exchange.receive(stream::empty().boxed());
        assert_eq!(counter.live(), 2);

        drop(send);
        drop(receive);
        assert_eq!(counter.live(), 0);
    }

    #[test]
    fn test_link_log() {
        let links = LinkLog::default();
        assert!(links.is_empty());

        links.record(1, 0);
        links.record(0, 1);
        links.record(0, 1);

        assert_eq!(links.len(), 3);
        assert_eq!(links.sorted(), vec![(0, 1), (0, 1), (1, 0)]);
        assert_eq!(links.distinct(), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_network_ids() {
        let links = LinkLog::default();
        let ids: Vec<_> = ScriptedExchange::network(3, 1, &links)
            .iter()
            .map(|e| e.id())
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}

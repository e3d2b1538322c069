//! The bidirectional sync primitive.
//!
//! Two transforms, `first: Stream<I> -> Stream<O>` and
//! `second: Stream<O> -> Stream<I>`, are wired through two channels and run
//! as sibling tasks until both output streams are exhausted.

use std::iter::Sum;
use std::ops::AddAssign;

use futures::StreamExt;
use tracing::{debug, debug_span, trace, Instrument};

use crate::channel::{channel, SendError, Sender};
use crate::error::{Result, Side, SyncError};
use crate::exchange::{Inbound, Outbound};
use crate::scope::Scope;

/// Configuration for sync behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncConfig {
    /// Capacity of each directional channel. Zero (the default) makes every
    /// channel a rendezvous point, so a producer can only run ahead of its
    /// consumer by the value currently being handed over.
    pub buffer: usize,
}

impl SyncConfig {
    /// Bounded channels of the given capacity instead of rendezvous.
    pub fn buffered(buffer: usize) -> Self {
        Self { buffer }
    }
}

/// Result of a sync call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Number of pairwise sync invocations that ran to completion.
    pub syncs: usize,
    /// Values forwarded from first transforms to second transforms.
    pub forwarded_first: usize,
    /// Values forwarded from second transforms to first transforms.
    pub forwarded_second: usize,
}

impl SyncReport {
    /// Total values forwarded in either direction.
    pub fn forwarded(&self) -> usize {
        self.forwarded_first + self.forwarded_second
    }
}

impl AddAssign for SyncReport {
    fn add_assign(&mut self, other: Self) {
        self.syncs += other.syncs;
        self.forwarded_first += other.forwarded_first;
        self.forwarded_second += other.forwarded_second;
    }
}

impl Sum for SyncReport {
    fn sum<It: Iterator<Item = Self>>(iter: It) -> Self {
        iter.fold(Self::default(), |mut total, report| {
            total += report;
            total
        })
    }
}

/// Entry point for running syncs with a given configuration.
///
/// The free functions [`sync`], [`sync_chain`](crate::sync_chain) and
/// [`sync_all`](crate::sync_all) use [`SyncConfig::default`].
#[derive(Debug, Clone, Default)]
pub struct Replicator {
    config: SyncConfig,
}

impl Replicator {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run `first` and `second` against each other until both finish.
    ///
    /// Each transform runs in its own task. Every value it produces is sent
    /// to the other transform's inbound stream; when its output ends, that
    /// stream is closed. The call returns once both tasks are done. If
    /// either fails, the other is cancelled and the error is returned.
    ///
    /// A transform that drops its inbound stream early is treated as having
    /// hung up: the peer's task stops forwarding and finishes normally.
    pub async fn sync<I, O, A, B>(&self, first: A, second: B) -> Result<SyncReport>
    where
        I: Send + 'static,
        O: Send + 'static,
        A: FnOnce(Inbound<I>) -> Outbound<O> + Send + 'static,
        B: FnOnce(Inbound<O>) -> Outbound<I> + Send + 'static,
    {
        let (to_second, from_first) = channel::<O>(self.config.buffer);
        let (to_first, from_second) = channel::<I>(self.config.buffer);

        debug!(buffer = self.config.buffer, "pairwise sync started");

        let mut scope = Scope::new();
        scope.spawn(
            async move {
                let output = first(from_second.into_stream());
                forward(Side::First, output, to_second).await
            }
            .instrument(debug_span!("sync.forward", side = %Side::First)),
        );
        scope.spawn(
            async move {
                let output = second(from_first.into_stream());
                forward(Side::Second, output, to_first).await
            }
            .instrument(debug_span!("sync.forward", side = %Side::Second)),
        );

        let mut report = SyncReport {
            syncs: 1,
            ..SyncReport::default()
        };
        for (side, forwarded) in scope.join().await? {
            match side {
                Side::First => report.forwarded_first = forwarded,
                Side::Second => report.forwarded_second = forwarded,
            }
        }

        debug!(
            forwarded_first = report.forwarded_first,
            forwarded_second = report.forwarded_second,
            "pairwise sync finished"
        );
        Ok(report)
    }
}

/// Run [`Replicator::sync`] with the default configuration.
pub async fn sync<I, O, A, B>(first: A, second: B) -> Result<SyncReport>
where
    I: Send + 'static,
    O: Send + 'static,
    A: FnOnce(Inbound<I>) -> Outbound<O> + Send + 'static,
    B: FnOnce(Inbound<O>) -> Outbound<I> + Send + 'static,
{
    Replicator::default().sync(first, second).await
}

/// Drain a transform's output into a channel, then close it.
///
/// Returns the side and the number of values handed over.
async fn forward<T>(
    side: Side,
    mut output: Outbound<T>,
    mut channel: Sender<T>,
) -> Result<(Side, usize)>
where
    T: Send + 'static,
{
    let mut forwarded = 0;

    while let Some(item) = output.next().await {
        let value = item.map_err(|source| SyncError::Transform { side, source })?;
        match channel.send(value).await {
            Ok(()) => forwarded += 1,
            Err(SendError::Disconnected) => {
                debug!(forwarded, "peer stopped consuming, ending output early");
                break;
            }
            Err(SendError::Closed) => return Err(SyncError::ChannelClosed),
        }
    }

    channel.close();
    trace!(forwarded, "output exhausted, channel closed");
    Ok((side, forwarded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use futures::{stream, FutureExt};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const DEADLINE: Duration = Duration::from_secs(5);

    fn recorder<T>() -> Arc<Mutex<Vec<T>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[tokio::test]
    async fn test_empty_streams_forward_nothing() {
        let report = sync(
            |_input: Inbound<u32>| -> Outbound<u8> { stream::empty().boxed() },
            |_input: Inbound<u8>| -> Outbound<u32> { stream::empty().boxed() },
        )
        .await
        .unwrap();

        assert_eq!(report.syncs, 1);
        assert_eq!(report.forwarded(), 0);
    }

    #[tokio::test]
    async fn test_two_out_one_back() {
        let seen_by_second = recorder();
        let seen_by_first = recorder();

        let first = {
            let seen = Arc::clone(&seen_by_first);
            move |input: Inbound<&'static str>| -> Outbound<&'static str> {
                // Emit both values, then keep consuming until the peer closes.
                let drain = input.filter_map(move |i| {
                    seen.lock().unwrap().push(i);
                    async { None }
                });
                stream::iter([Ok("o1"), Ok("o2")]).chain(drain).boxed()
            }
        };
        let second = {
            let seen = Arc::clone(&seen_by_second);
            move |input: Inbound<&'static str>| -> Outbound<&'static str> {
                input
                    .take(2)
                    .fold(seen, |seen, o| async move {
                        seen.lock().unwrap().push(o);
                        seen
                    })
                    .into_stream()
                    .map(|_| Ok("i1"))
                    .boxed()
            }
        };

        let report = tokio::time::timeout(DEADLINE, sync(first, second))
            .await
            .expect("sync deadlocked")
            .unwrap();

        assert_eq!(report.forwarded_first, 2);
        assert_eq!(report.forwarded_second, 1);
        assert_eq!(*seen_by_second.lock().unwrap(), vec!["o1", "o2"]);
        assert_eq!(*seen_by_first.lock().unwrap(), vec!["i1"]);
    }

    #[tokio::test]
    async fn test_peer_stopping_early_does_not_hang() {
        let first = |_input: Inbound<()>| -> Outbound<u64> { stream::iter(0u64..).map(Ok).boxed() };
        let second = |input: Inbound<u64>| -> Outbound<()> {
            input
                .take(1)
                .filter_map(|_| async { None })
                .boxed()
        };

        let report = tokio::time::timeout(DEADLINE, sync(first, second))
            .await
            .expect("sync deadlocked")
            .unwrap();

        assert_eq!(report.forwarded_first, 1);
        assert_eq!(report.forwarded_second, 0);
    }

    #[tokio::test]
    async fn test_handshake_echo() {
        // `first` emits the next value only after the echo of the previous one.
        let first = |input: Inbound<u32>| -> Outbound<u32> {
            stream::unfold((input, 0u32), |(mut input, k)| async move {
                if k > 0 {
                    input.next().await?;
                }
                if k == 3 {
                    return None;
                }
                Some((Ok(k), (input, k + 1)))
            })
            .boxed()
        };
        let second = |input: Inbound<u32>| -> Outbound<u32> { input.map(|o| Ok(o * 10)).boxed() };

        let report = tokio::time::timeout(DEADLINE, sync(first, second))
            .await
            .expect("sync deadlocked")
            .unwrap();

        assert_eq!(report.forwarded_first, 3);
        assert_eq!(report.forwarded_second, 3);
    }

    #[tokio::test]
    async fn test_transform_failure_cancels_peer() {
        let first = |_input: Inbound<()>| -> Outbound<u8> {
            stream::iter([Ok(1u8), Err::<u8, BoxError>("broken pipe".into())]).boxed()
        };
        // Never finishes on its own.
        let second = |input: Inbound<u8>| -> Outbound<()> {
            input
                .chain(stream::pending())
                .filter_map(|_| async { None })
                .boxed()
        };

        let err = tokio::time::timeout(DEADLINE, sync(first, second))
            .await
            .expect("failure did not cancel the peer")
            .unwrap_err();

        assert_eq!(err.side(), Some(Side::First));
        assert!(err.to_string().contains("broken pipe"));
    }

    #[tokio::test]
    async fn test_buffered_config() {
        let replicator = Replicator::new(SyncConfig::buffered(8));
        assert_eq!(replicator.config().buffer, 8);

        let collected = recorder();
        let sink = Arc::clone(&collected);
        let report = replicator
            .sync(
                |_input: Inbound<()>| stream::iter((0..20u32).map(Ok)).boxed(),
                move |input: Inbound<u32>| {
                    input
                        .filter_map(move |v| {
                            sink.lock().unwrap().push(v);
                            async { None }
                        })
                        .boxed()
                },
            )
            .await
            .unwrap();

        assert_eq!(report.forwarded_first, 20);
        assert_eq!(*collected.lock().unwrap(), (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_report_sum() {
        let one = SyncReport {
            syncs: 1,
            forwarded_first: 2,
            forwarded_second: 3,
        };
        let total: SyncReport = vec![one.clone(), one].into_iter().sum();
        assert_eq!(total.syncs, 2);
        assert_eq!(total.forwarded(), 10);
    }
}

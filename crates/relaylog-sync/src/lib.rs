//! # Relaylog Sync
//!
//! Bidirectional sync between replicas exchanging values over asynchronous
//! streams.
//!
//! ## Overview
//!
//! A replica is represented by an [`Exchange`]: a pair of stream transforms,
//! `send: Stream<I> -> Stream<O>` and `receive: Stream<O> -> Stream<I>`.
//! [`sync`] connects two transforms through two channels and runs them until
//! both are exhausted. [`sync_chain`] and [`sync_all`] apply that primitive
//! across N exchanges.
//!
//! ## Key Properties
//!
//! - **Backpressure**: channels are rendezvous points by default, so a fast
//!   producer waits for its consumer instead of buffering without bound
//! - **Structured**: every task runs inside a [`Scope`]; nothing outlives the
//!   call that spawned it, and dropping the call's future cancels everything
//! - **Fail-fast**: the first transform error cancels all sibling tasks and
//!   is returned exactly once
//! - **No timeouts**: a transform that never finishes keeps its sync pending;
//!   wrap the call in `tokio::time::timeout` if that matters
//!
//! ## Usage
//!
//! ```rust,no_run
//! use futures::{stream, StreamExt};
//! use relaylog_sync::{sync, Inbound, Outbound};
//!
//! async fn example() {
//!     let report = sync(
//!         |_acks: Inbound<()>| -> Outbound<u32> { stream::iter([Ok(1), Ok(2)]).boxed() },
//!         |values: Inbound<u32>| -> Outbound<()> {
//!             values.filter_map(|_| async { None }).boxed()
//!         },
//!     )
//!     .await
//!     .unwrap();
//!
//!     assert_eq!(report.forwarded_first, 2);
//! }
//! ```
//!
//! ## Data Flow
//!
//! ```text
//!            O channel
//!   first ------------> second
//!     ^                   |
//!     +-------------------+
//!            I channel
//! ```
//!
//! Each arrow is driven by its own task. When a transform's output ends, its
//! channel is closed and the other transform sees its input end.

pub mod channel;
pub mod error;
pub mod exchange;
pub mod protocol;
pub mod scope;
pub mod topology;

pub use channel::{channel, Receiver, SendError, Sender};
pub use error::{BoxError, Result, Side, SyncError};
pub use exchange::{Exchange, Inbound, Outbound};
pub use protocol::{sync, Replicator, SyncConfig, SyncReport};
pub use scope::Scope;
pub use topology::{sync_all, sync_chain, Topology};

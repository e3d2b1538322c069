//! # Relaylog
//!
//! Replicated operation logs that converge by exchanging operations over
//! bidirectional asynchronous streams.
//!
//! ## Overview
//!
//! - **Logs**: each replica stores its operations in an [`OrdTree`], a
//!   persistent ordered set; snapshots are O(1) and never block writers
//! - **Exchanges**: a replica syncs through the [`Exchange`] capability, a
//!   pair of stream transforms
//! - **Topologies**: [`sync_chain`] connects neighbours, [`sync_all`]
//!   connects every replica with every other
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use relaylog::{sync_all, Replica};
//!
//! async fn example() {
//!     let replicas: Vec<Arc<Replica<u64>>> = (0..3)
//!         .map(|i| Arc::new(Replica::from_ops(format!("r{}", i), [i * 10, i * 10 + 1])))
//!         .collect();
//!
//!     sync_all(&replicas).await.unwrap();
//!
//!     for replica in &replicas {
//!         assert_eq!(replica.len(), 6);
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `relaylog::core` - The persistent ordered container
//! - `relaylog::sync` - Channels, exchanges, and topology drivers

pub mod replica;

// Re-export component crates
pub use relaylog_core as core;
pub use relaylog_sync as sync;

pub use replica::{Ack, Replica};

// Re-export commonly used types
pub use relaylog_core::{Comparator, Natural, OrdTree};
pub use relaylog_sync::{
    sync_all, sync_chain, Exchange, Inbound, Outbound, Replicator, Result, SyncConfig, SyncError,
    SyncReport, Topology,
};

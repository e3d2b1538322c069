//! # Relaylog Testkit
//!
//! Testing utilities for relaylog.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: scripted, stalling and failing exchanges for driving the
//!   sync topologies into specific situations
//! - **Generators**: proptest strategies for tree operations and replica logs
//! - **Tracing**: a test subscriber honoring `RUST_LOG`
//!
//! ## Test Fixtures
//!
//! ```rust
//! use relaylog_testkit::fixtures::{LinkLog, ScriptedExchange};
//!
//! let links = LinkLog::default();
//! let exchanges = ScriptedExchange::network(3, 2, &links);
//! assert_eq!(exchanges.len(), 3);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use relaylog_testkit::generators::{apply, tree_ops};
//!
//! proptest! {
//!     #[test]
//!     fn stays_valid(ops in tree_ops(64, 200)) {
//!         let versions = apply(&ops);
//!         prop_assert!(versions.iter().all(|t| t.validate().is_ok()));
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{
    FailingExchange, LinkLog, LiveCounter, LiveGuard, Message, ScriptedExchange, StallingExchange,
};
pub use generators::{apply, replica_logs, tree_ops, TreeOp};

use tracing_subscriber::EnvFilter;

/// Install a test-friendly tracing subscriber. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

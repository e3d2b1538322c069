//! Proptest generators for property-based testing.

use proptest::prelude::*;

use relaylog_core::OrdTree;

/// One update applied to an [`OrdTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeOp {
    Insert(u16),
    Remove(u16),
}

/// A single operation on keys below `max_key`.
pub fn tree_op(max_key: u16) -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        3 => (0..max_key).prop_map(TreeOp::Insert),
        1 => (0..max_key).prop_map(TreeOp::Remove),
    ]
}

/// Up to `max_len` operations on keys below `max_key`. Inserts outnumber
/// removals so trees grow.
pub fn tree_ops(max_key: u16, max_len: usize) -> impl Strategy<Value = Vec<TreeOp>> {
    prop::collection::vec(tree_op(max_key), 0..=max_len)
}

/// Apply `ops` to an empty tree, keeping every version.
///
/// The result starts with the empty tree and has one more entry than `ops`.
pub fn apply(ops: &[TreeOp]) -> Vec<OrdTree<u16>> {
    let mut versions = Vec::with_capacity(ops.len() + 1);
    versions.push(OrdTree::new());

    for op in ops {
        let Some(current) = versions.last() else {
            break;
        };
        let next = match *op {
            TreeOp::Insert(key) => current.insert(key),
            TreeOp::Remove(key) => current.remove(&key),
        };
        versions.push(next);
    }

    versions
}

/// Initial operation logs for between `2` and `max_replicas` replicas.
pub fn replica_logs(
    max_replicas: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<Vec<u16>>> {
    prop::collection::vec(
        prop::collection::vec(any::<u16>(), 0..=max_ops),
        2..=max_replicas.max(2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    proptest! {
        #[test]
        fn test_every_version_matches_history(ops in tree_ops(64, 200)) {
            let versions = apply(&ops);
            prop_assert_eq!(versions.len(), ops.len() + 1);

            let mut model = BTreeSet::new();
            for (op, version) in ops.iter().zip(&versions[1..]) {
                match *op {
                    TreeOp::Insert(key) => model.insert(key),
                    TreeOp::Remove(key) => model.remove(&key),
                };
                prop_assert!(version.validate().is_ok());
                prop_assert!(version.iter().eq(model.iter()));
            }
        }

        #[test]
        fn test_replica_logs_bounds(logs in replica_logs(5, 10)) {
            prop_assert!((2..=5).contains(&logs.len()));
            prop_assert!(logs.iter().all(|log| log.len() <= 10));
        }
    }

    #[test]
    fn test_apply_keeps_empty_root() {
        let versions = apply(&[TreeOp::Insert(1), TreeOp::Insert(2), TreeOp::Remove(1)]);
        assert!(versions[0].is_empty());
        assert_eq!(versions[2].len(), 2);
        assert_eq!(versions[3].iter().copied().collect::<Vec<_>>(), vec![2]);
    }
}

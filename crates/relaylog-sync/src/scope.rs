//! Structured concurrency over a tokio `JoinSet`.
//!
//! A [`Scope`] owns every task spawned into it. [`Scope::join`] waits for
//! all of them and fails fast: the first error or panic aborts the rest,
//! which are drained before that error is returned. Dropping a scope aborts
//! whatever it still owns, so cancelling the future that holds a scope tears
//! down its tasks and, through their own scopes, theirs.

use std::any::Any;
use std::future::Future;

use tokio::task::{JoinError, JoinSet};
use tracing::warn;

use crate::error::{Result, SyncError};

/// A set of sibling tasks that succeed or fail as a unit.
pub struct Scope<T> {
    tasks: JoinSet<Result<T>>,
}

impl<T: Send + 'static> Scope<T> {
    pub fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
        }
    }

    /// Spawn a task into the scope. Must be called within a tokio runtime.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    /// Number of tasks not yet joined.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every task. Outputs are in completion order.
    pub async fn join(mut self) -> Result<Vec<T>> {
        let mut outputs = Vec::with_capacity(self.tasks.len());

        while let Some(joined) = self.tasks.join_next().await {
            match joined.map_err(from_join_error).and_then(|result| result) {
                Ok(output) => outputs.push(output),
                Err(err) => {
                    warn!(
                        error = %err,
                        siblings = self.tasks.len(),
                        "sync task failed, cancelling siblings"
                    );
                    self.tasks.abort_all();
                    while self.tasks.join_next().await.is_some() {}
                    return Err(err);
                }
            }
        }

        Ok(outputs)
    }
}

impl<T: Send + 'static> Default for Scope<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn from_join_error(err: JoinError) -> SyncError {
    if err.is_panic() {
        SyncError::TaskPanicked(panic_message(err.into_panic()))
    } else {
        SyncError::Cancelled
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Counts how many guarded futures were dropped.
    struct DropGuard(Arc<AtomicUsize>);

    impl Drop for DropGuard {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn wait_for(counter: &AtomicUsize, expected: usize) {
        for _ in 0..100 {
            if counter.load(Ordering::SeqCst) == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {} drops, saw {}",
            expected,
            counter.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn test_join_collects_all_outputs() {
        let mut scope = Scope::new();
        for i in 0..5u32 {
            scope.spawn(async move { Ok(i) });
        }
        assert_eq!(scope.len(), 5);

        let mut outputs = scope.join().await.unwrap();
        outputs.sort_unstable();
        assert_eq!(outputs, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_empty_scope_joins_immediately() {
        let scope: Scope<()> = Scope::new();
        assert!(scope.is_empty());
        assert!(scope.join().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_first_failure_cancels_siblings() {
        let dropped = Arc::new(AtomicUsize::new(0));
        let mut scope = Scope::new();

        for _ in 0..3 {
            let guard = DropGuard(Arc::clone(&dropped));
            scope.spawn(async move {
                let _guard = guard;
                std::future::pending::<()>().await;
                Ok(())
            });
        }
        scope.spawn(async { Err(SyncError::ChannelClosed) });

        let err = scope.join().await.unwrap_err();
        assert!(matches!(err, SyncError::ChannelClosed));
        assert_eq!(dropped.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_panic_becomes_error() {
        let mut scope: Scope<()> = Scope::new();
        scope.spawn(async {
            if true {
                panic!("boom");
            }
            Ok(())
        });

        match scope.join().await {
            Err(SyncError::TaskPanicked(message)) => assert_eq!(message, "boom"),
            other => panic!("expected panic error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_drop_aborts_tasks() {
        let dropped = Arc::new(AtomicUsize::new(0));
        let mut scope = Scope::new();

        for _ in 0..2 {
            let guard = DropGuard(Arc::clone(&dropped));
            scope.spawn(async move {
                let _guard = guard;
                std::future::pending::<()>().await;
                Ok(())
            });
        }
        drop(scope);

        wait_for(&dropped, 2).await;
    }
}

//! Compute-once async cell whose result is shared by every caller.
//!
//! The first caller installs the computation as a shared future; callers
//! arriving while it runs await a clone of that same future, and callers
//! arriving afterwards read the stored result. Failures are stored the same
//! way as successes, so a failed computation is never re-run.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};

type SharedResult<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

enum Slot<T, E>
where
    T: Clone,
    E: Clone,
{
    Unstarted,
    Pending(SharedResult<T, E>),
    Done(Result<T, E>),
}

/// Lazily computed, memoized async result.
pub struct SingleFlight<T, E>
where
    T: Clone,
    E: Clone,
{
    slot: Mutex<Slot<T, E>>,
}

impl<T, E> SingleFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates an empty cell. Nothing runs until the first [`get_or_run`](Self::get_or_run).
    #[must_use]
    pub fn new() -> Self {
        Self { slot: Mutex::new(Slot::Unstarted) }
    }

    /// Returns `true` once some caller has started the computation.
    pub fn is_started(&self) -> bool {
        !matches!(*self.lock(), Slot::Unstarted)
    }

    /// Returns the memoized result, running `compute` only if no caller has
    /// started it yet.
    ///
    /// `compute` is invoked under the cell's lock and must only build the
    /// future; the future itself is driven outside the lock. Dropping the
    /// returned future before it resolves leaves the computation in place,
    /// and the next caller resumes it instead of starting another.
    ///
    /// # Errors
    ///
    /// Returns the error produced by the (single) computation.
    pub async fn get_or_run<F, Fut>(&self, compute: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let pending = {
            let mut slot = self.lock();
            match &*slot {
                Slot::Done(result) => return result.clone(),
                Slot::Pending(shared) => shared.clone(),
                Slot::Unstarted => {
                    let shared = compute().boxed().shared();
                    *slot = Slot::Pending(shared.clone());
                    shared
                }
            }
        };

        let result = pending.await;

        let mut slot = self.lock();
        if matches!(*slot, Slot::Pending(_)) {
            *slot = Slot::Done(result.clone());
        }
        result
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T, E>> {
        // The slot is only ever replaced wholesale, so a poisoned guard still
        // holds a consistent state.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, E> Default for SingleFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> std::fmt::Debug for SingleFlight<T, E>
where
    T: Clone + std::fmt::Debug,
    E: Clone + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let state = match &*guard {
            Slot::Unstarted => "unstarted".to_string(),
            Slot::Pending(_) => "pending".to_string(),
            Slot::Done(result) => format!("done({result:?})"),
        };
        f.debug_struct("SingleFlight").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use futures::FutureExt;
    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn sequential_calls_compute_once() {
        let cell: SingleFlight<String, String> = SingleFlight::new();
        let runs = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cell
                .get_or_run(|| {
                    runs.fetch_add(1, Ordering::SeqCst);
                    async { Ok("main".to_string()) }
                })
                .await;
            assert_eq!(value, Ok("main".to_string()));
        }

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(format!("{cell:?}").contains("done(Ok("));
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_computation() {
        let cell: Arc<SingleFlight<Vec<String>, String>> = Arc::new(SingleFlight::new());
        let runs = Arc::new(AtomicUsize::new(0));

        let call = || {
            let cell = Arc::clone(&cell);
            let runs = Arc::clone(&runs);
            async move {
                cell.get_or_run(move || {
                    runs.fetch_add(1, Ordering::SeqCst);
                    async {
                        tokio::task::yield_now().await;
                        Ok(vec!["a.txt".to_string()])
                    }
                })
                .await
            }
        };

        let (a, b, c) = tokio::join!(call(), call(), call());

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(a, Ok(vec!["a.txt".to_string()]));
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[tokio::test]
    async fn failure_is_cached() {
        let cell: SingleFlight<String, String> = SingleFlight::new();
        let runs = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cell
                .get_or_run(|| {
                    runs.fetch_add(1, Ordering::SeqCst);
                    async { Err("exit code: 1".to_string()) }
                })
                .await;
            assert_eq!(value, Err("exit code: 1".to_string()));
        }

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropped_waiter_does_not_restart_computation() {
        let cell: SingleFlight<String, String> = SingleFlight::new();
        let runs = AtomicUsize::new(0);
        let (tx, rx) = oneshot::channel::<String>();

        let first = cell
            .get_or_run(|| {
                runs.fetch_add(1, Ordering::SeqCst);
                async move { rx.await.map_err(|e| e.to_string()) }
            })
            .now_or_never();
        assert!(first.is_none());
        assert!(cell.is_started());
        assert!(format!("{cell:?}").contains("pending"));

        tx.send("main".to_string()).unwrap();

        let second = cell
            .get_or_run(|| {
                runs.fetch_add(1, Ordering::SeqCst);
                async { Ok("second".to_string()) }
            })
            .await;

        assert_eq!(second, Ok("main".to_string()));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn new_cell_is_unstarted() {
        let cell: SingleFlight<String, String> = SingleFlight::default();
        assert!(!cell.is_started());
        assert!(format!("{cell:?}").contains("unstarted"));
    }
}

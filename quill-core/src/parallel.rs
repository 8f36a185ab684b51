//! Bounded worker pool used by the persona-dialogue and section-generation phases.
//!
//! Each unit of work runs on a dedicated rayon pool sized
//! `min(max_threads, units)` and reports through a channel, so results are
//! collected in completion order. A panicking unit is reported as
//! [`QuillError::WorkerPanicked`] instead of tearing down the phase.

use std::panic::{self, AssertUnwindSafe};

use crossbeam_channel::unbounded;
use tracing::{debug, warn};

use crate::errors::{QuillError, QuillResult};

/// Outcome of one unit of work, tagged with its label.
#[derive(Debug)]
pub struct UnitOutcome<R> {
    pub label: String,
    pub result: QuillResult<R>,
}

/// Run `work` over every item on a bounded pool and return outcomes in
/// completion order.
pub fn run_bounded<T, R, L, F>(
    items: Vec<T>,
    max_threads: usize,
    label: L,
    work: F,
) -> Vec<UnitOutcome<R>>
where
    T: Send,
    R: Send,
    L: Fn(&T) -> String + Sync,
    F: Fn(T) -> QuillResult<R> + Sync,
{
    if items.is_empty() {
        return Vec::new();
    }

    let threads = max_threads.max(1).min(items.len());
    let total = items.len();

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("quill-worker-{i}"))
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "worker pool unavailable, running units inline");
            return items
                .into_iter()
                .map(|item| {
                    let label = label(&item);
                    let result = guarded(&label, || work(item));
                    UnitOutcome { label, result }
                })
                .collect();
        }
    };

    debug!(threads, units = total, "starting bounded phase");

    let (tx, rx) = unbounded();
    pool.scope(|scope| {
        for item in items {
            let tx = tx.clone();
            let work = &work;
            let label_fn = &label;
            scope.spawn(move |_| {
                let label = label_fn(&item);
                let result = guarded(&label, || work(item));
                // The receiver outlives the scope.
                let _ = tx.send(UnitOutcome { label, result });
            });
        }
    });
    drop(tx);

    rx.into_iter().collect()
}

fn guarded<R>(label: &str, f: impl FnOnce() -> QuillResult<R>) -> QuillResult<R> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(QuillError::WorkerPanicked {
                unit: label.to_string(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn runs_every_unit() {
        let outcomes = run_bounded(vec![1, 2, 3, 4, 5], 2, |n| n.to_string(), |n| Ok(n * 10));
        let mut values: Vec<i32> = outcomes.into_iter().map(|o| o.result.unwrap()).collect();
        values.sort();
        assert_eq!(values, vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn empty_input_returns_nothing() {
        let outcomes = run_bounded(Vec::<u8>::new(), 4, |_| String::new(), |n| Ok(n));
        assert!(outcomes.is_empty());
    }

    #[test]
    fn panicking_unit_is_reported_not_propagated() {
        let outcomes = run_bounded(
            vec!["ok", "boom"],
            2,
            |s| s.to_string(),
            |s| {
                if s == "boom" {
                    panic!("unit exploded");
                }
                Ok(s.len())
            },
        );
        assert_eq!(outcomes.len(), 2);
        let failed = outcomes.iter().find(|o| o.label == "boom").unwrap();
        assert!(matches!(
            failed.result,
            Err(QuillError::WorkerPanicked { .. })
        ));
        let ok = outcomes.iter().find(|o| o.label == "ok").unwrap();
        assert_eq!(*ok.result.as_ref().unwrap(), 2);
    }

    #[test]
    fn pool_never_exceeds_thread_cap() {
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        run_bounded(
            (0..16).collect::<Vec<_>>(),
            3,
            |n| n.to_string(),
            |_| {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(std::time::Duration::from_millis(5));
                active.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            },
        );
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }
}

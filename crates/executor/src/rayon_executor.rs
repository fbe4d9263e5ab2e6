//! Rayon-backed parallel executor.

use folio_traits::{Executor, ExecutorError};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;

/// Runs documents on rayon's global pool, or on a dedicated pool when
/// built with [`RayonExecutor::with_threads`].
#[derive(Debug, Clone, Default)]
pub struct RayonExecutor {
    pool: Option<Arc<ThreadPool>>,
}

impl RayonExecutor {
    pub fn new() -> Self {
        Self { pool: None }
    }

    pub fn with_threads(threads: usize) -> Result<Self, ExecutorError> {
        if threads == 0 {
            return Err(ExecutorError::new("thread count must be at least 1"));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("folio-layout-{i}"))
            .build()
            .map_err(|e| ExecutorError::new(e.to_string()))?;
        Ok(Self { pool: Some(Arc::new(pool)) })
    }

    fn run<R: Send>(&self, job: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(job),
            None => job(),
        }
    }
}

impl Executor for RayonExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        // Indexed parallel iterators collect in input order.
        self.run(move || items.into_par_iter().map(f).collect())
    }

    fn execute_all_fallible<T, R, E, F>(&self, items: Vec<T>, f: F) -> Vec<Result<R, E>>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + Clone + 'static,
    {
        self.run(move || items.into_par_iter().map(f).collect())
    }

    fn parallelism(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn name(&self) -> &'static str {
        "RayonExecutor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_results_keep_input_order() {
        let executor = RayonExecutor::new();
        let results = executor.execute_all((0..100).collect(), |x: i32| x * 2);
        assert_eq!(results, (0..100).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_dedicated_pool_runs_every_item() {
        let executor = RayonExecutor::with_threads(3).unwrap();
        assert_eq!(executor.parallelism(), 3);
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = counter.clone();
        executor.execute_all(vec![(); 64], move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(counter.load(Ordering::SeqCst), 64);
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(RayonExecutor::with_threads(0).is_err());
    }
}

//! Executors for laying out batches of independent documents.
//!
//! Each document owns its own area tree and reference registry, so a
//! batch is embarrassingly parallel. [`ExecutorImpl`] picks between
//! sequential execution and rayon at runtime.

#[cfg(feature = "rayon")]
mod rayon_executor;

#[cfg(feature = "rayon")]
pub use rayon_executor::RayonExecutor;

pub use folio_traits::{Executor, ExecutorError, SyncExecutor};

/// A concrete executor chosen at runtime.
///
/// `Executor` has generic methods and cannot be a trait object, so this
/// enum stands in for `dyn Executor`.
#[derive(Clone, Debug)]
pub enum ExecutorImpl {
    Sync(SyncExecutor),

    #[cfg(feature = "rayon")]
    Rayon(RayonExecutor),
}

macro_rules! dispatch {
    ($self:expr, $exec:ident => $call:expr) => {
        match $self {
            ExecutorImpl::Sync($exec) => $call,
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon($exec) => $call,
        }
    };
}

impl ExecutorImpl {
    pub fn sequential() -> Self {
        ExecutorImpl::Sync(SyncExecutor::new())
    }

    /// A parallel executor, or the sequential one when rayon support is
    /// compiled out. `threads` requests a dedicated pool of that size
    /// instead of rayon's global pool.
    pub fn parallel(threads: Option<usize>) -> Result<Self, ExecutorError> {
        #[cfg(feature = "rayon")]
        {
            let executor = match threads {
                Some(n) => RayonExecutor::with_threads(n)?,
                None => RayonExecutor::new(),
            };
            Ok(ExecutorImpl::Rayon(executor))
        }
        #[cfg(not(feature = "rayon"))]
        {
            log::warn!("Rayon support is disabled; {:?} threads requested, running sequentially", threads);
            Ok(Self::sequential())
        }
    }

    pub fn is_parallel(&self) -> bool {
        self.parallelism() > 1
    }
}

impl Executor for ExecutorImpl {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        dispatch!(self, exec => exec.execute_all(items, f))
    }

    fn execute_all_fallible<T, R, E, F>(&self, items: Vec<T>, f: F) -> Vec<Result<R, E>>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + Clone + 'static,
    {
        dispatch!(self, exec => exec.execute_all_fallible(items, f))
    }

    fn parallelism(&self) -> usize {
        dispatch!(self, exec => exec.parallelism())
    }

    fn name(&self) -> &'static str {
        dispatch!(self, exec => exec.name())
    }
}

impl Default for ExecutorImpl {
    fn default() -> Self {
        #[cfg(feature = "rayon")]
        {
            ExecutorImpl::Rayon(RayonExecutor::new())
        }
        #[cfg(not(feature = "rayon"))]
        {
            Self::sequential()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_delegates() {
        let executor = ExecutorImpl::sequential();
        assert_eq!(executor.execute_all(vec![1, 2, 3], |x| x + 1), vec![2, 3, 4]);
        assert_eq!(executor.name(), "SyncExecutor");
        assert!(!executor.is_parallel());
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_parallel_with_dedicated_pool() {
        let executor = ExecutorImpl::parallel(Some(2)).unwrap();
        assert_eq!(executor.name(), "RayonExecutor");
        assert_eq!(executor.parallelism(), 2);
        let pages: Vec<Result<usize, String>> =
            executor.execute_all_fallible(vec![3, 0, 1], |n| if n == 0 { Err("empty".into()) } else { Ok(n) });
        assert_eq!(pages, vec![Ok(3), Err("empty".to_string()), Ok(1)]);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_default_is_rayon() {
        assert_eq!(ExecutorImpl::default().name(), "RayonExecutor");
    }
}

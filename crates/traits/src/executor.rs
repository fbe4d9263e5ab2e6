//! Executor trait for running independent documents, possibly in parallel.
//!
//! Layout of a single document is sequential. Parallelism only exists
//! across documents, each of which owns its own area tree and reference
//! registry, so work items never share mutable state.

use std::fmt::Debug;
use thiserror::Error;

/// Error type for executor operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Executor error: {message}")]
pub struct ExecutorError {
    pub message: String,
}

impl ExecutorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// A trait for executing work items, potentially in parallel.
///
/// # Implementations
///
/// - `SyncExecutor`: Sequential execution, no threading (always available)
/// - `RayonExecutor`: Work-stealing thread pool (in `folio-executor`)
pub trait Executor: Send + Sync + Debug {
    /// Execute a batch of work items, returning results in input order.
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static;

    /// Execute a batch of work items that may fail. One failing item does
    /// not affect the others.
    fn execute_all_fallible<T, R, E, F>(&self, items: Vec<T>, f: F) -> Vec<Result<R, E>>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + Clone + 'static;

    /// Returns the level of parallelism this executor can provide.
    fn parallelism(&self) -> usize;

    /// Returns a human-readable name for this executor (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A synchronous executor that processes items sequentially.
#[derive(Debug, Clone, Default)]
pub struct SyncExecutor;

impl SyncExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for SyncExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        items.into_iter().map(f).collect()
    }

    fn execute_all_fallible<T, R, E, F>(&self, items: Vec<T>, f: F) -> Vec<Result<R, E>>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + Clone + 'static,
    {
        items.into_iter().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "SyncExecutor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_executor_processes_items_in_order() {
        let executor = SyncExecutor::new();
        let results = executor.execute_all(vec![1, 2, 3, 4, 5], |x| x * 2);
        assert_eq!(results, vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_sync_executor_isolates_failures() {
        let executor = SyncExecutor::new();
        let results: Vec<Result<i32, &str>> = executor.execute_all_fallible(vec![1, 2, 0, 4], |x| {
            if x == 0 { Err("division by zero") } else { Ok(10 / x) }
        });
        assert_eq!(results, vec![Ok(10), Ok(5), Err("division by zero"), Ok(2)]);
    }

    #[test]
    fn test_sync_executor_metadata() {
        let executor = SyncExecutor::new();
        assert_eq!(executor.parallelism(), 1);
        assert_eq!(executor.name(), "SyncExecutor");
    }

    #[test]
    fn test_executor_error_display() {
        let err = ExecutorError::new("worker panicked");
        assert_eq!(err.to_string(), "Executor error: worker panicked");
    }
}

//! Rayon thread pool configuration for roster-wide comparisons.

use rayon::ThreadPoolBuilder;

use crate::error::EngineError;

/// Number of worker threads used for batch comparisons. 0 means the global Rayon pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }

    /// Runs `f` on a pool of [workers](WorkerPool::workers) threads, or on the global pool when 0.
    pub fn install<F, R>(&self, f: F) -> Result<R, EngineError>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return Ok(f());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|err| EngineError::WorkerPool(err.to_string()))?;
        Ok(pool.install(f))
    }
}

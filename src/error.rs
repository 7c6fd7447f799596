use std::io;

use thiserror::Error;

/// Errors raised while setting up or running the parallel sieve.
#[derive(Error, Debug)]
pub enum SieveError {
    /// The pool needs at least one worker to drain the job queue.
    #[error("worker count must be at least 1")]
    NoWorkers,

    /// A bounded buffer with no slots can never accept a job.
    #[error("job queue capacity must be at least 1")]
    ZeroCapacity,

    /// The OS refused to start a worker thread.
    #[error("failed to spawn worker {index}")]
    WorkerSpawn {
        /// Position of the worker in the pool.
        index: usize,
        /// Underlying OS error.
        source: io::Error,
    },

    /// A worker thread panicked before receiving its shutdown job.
    #[error("worker {index} panicked")]
    WorkerPanicked {
        /// Position of the worker in the pool.
        index: usize,
    },

    /// The parallel count disagreed with the sequential sieve.
    #[error("count mismatch for limit {limit}: sequential sieve found {expected}, parallel sieve found {actual}")]
    VerificationFailed {
        /// Upper bound of the checked range.
        limit: usize,
        /// Count from the sequential sieve.
        expected: usize,
        /// Count from the parallel pipeline.
        actual: usize,
    },
}

pub type SieveResult<T> = Result<T, SieveError>;

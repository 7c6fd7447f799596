use std::io;
use std::num::NonZeroUsize;
use std::thread::{self, ScopedJoinHandle};

use crate::error::{SieveError, SieveResult};
use crate::queue::{ChannelQueue, Job, JobQueue, MonitorQueue};
use crate::sieve::SieveArray;

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_CAPACITY: usize = 10;
pub const DEFAULT_VARIATION: u32 = 1;

/// Settings for one parallel sieve run.
#[derive(Debug, Clone)]
pub struct SieveConfig {
    /// Upper bound (inclusive) of the range to count primes in.
    pub limit: usize,
    /// Number of worker threads marking the upper range.
    pub workers: usize,
    /// Slots in the bounded job queue.
    pub capacity: usize,
    /// Job queue backend: 1 = mutex/condvar ring buffer, 2 = bounded channel.
    pub variation: u32,
}

impl SieveConfig {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            workers: DEFAULT_WORKERS,
            capacity: DEFAULT_CAPACITY,
            variation: DEFAULT_VARIATION,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_variation(mut self, variation: u32) -> Self {
        self.variation = variation;
        self
    }
}

/// Result of a completed sieve run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SieveOutcome {
    /// Number of primes in `[1, limit]`.
    pub count: usize,
    /// Primes up to sqrt(limit) handed to the worker pool.
    pub dispatched: usize,
    /// Prime jobs handled by each worker, indexed by worker position.
    pub jobs_per_worker: Vec<usize>,
}

/// Counts the primes in `[1, config.limit]` with a producer/worker pipeline.
///
/// The calling thread acts as the producer: it sieves `[2, sqrt(limit)]`
/// and feeds each prime it finds through a bounded job queue. Workers strike
/// out the multiples above sqrt(limit). Once every worker has exited, the
/// shared array is scanned once to produce the count.
pub fn count_primes(config: &SieveConfig) -> SieveResult<SieveOutcome> {
    let workers = NonZeroUsize::new(config.workers).ok_or(SieveError::NoWorkers)?;
    let capacity = NonZeroUsize::new(config.capacity).ok_or(SieveError::ZeroCapacity)?;

    match config.variation {
        1 => run_pipeline(config.limit, workers, &MonitorQueue::new(capacity)),
        2 => run_pipeline(config.limit, workers, &ChannelQueue::new(capacity)),
        _ => {
            tracing::warn!(
                "Unknown variation {}, using variation {}",
                config.variation,
                DEFAULT_VARIATION
            );
            run_pipeline(config.limit, workers, &MonitorQueue::new(capacity))
        }
    }
}

fn run_pipeline<Q: JobQueue>(
    limit: usize,
    workers: NonZeroUsize,
    queue: &Q,
) -> SieveResult<SieveOutcome> {
    let workers = workers.get();
    let sqrt_limit = limit.isqrt();
    let mut sieve = SieveArray::new(limit);

    tracing::debug!(
        limit,
        sqrt_limit,
        workers,
        capacity = queue.capacity(),
        "starting sieve pipeline"
    );

    let (dispatched, jobs_per_worker) = thread::scope(|scope| -> SieveResult<_> {
        let sieve = &sieve;
        let handles = spawn_workers(workers, queue, move |index| {
            thread::Builder::new()
                .name(format!("sieve-worker-{index}"))
                .spawn_scoped(scope, move || work(queue, sieve, sqrt_limit, limit))
        })?;

        let dispatched = produce(queue, sieve, sqrt_limit, workers);
        tracing::debug!(dispatched, backlog = queue.len(), "producer finished");

        // Join everything before inspecting results so no worker outlives the scope
        let joined: Vec<_> = handles.into_iter().map(|handle| handle.join()).collect();
        let jobs_per_worker = joined
            .into_iter()
            .enumerate()
            .map(|(index, result)| result.map_err(|_| SieveError::WorkerPanicked { index }))
            .collect::<SieveResult<Vec<usize>>>()?;

        // Every worker consumed exactly one shutdown job
        debug_assert!(queue.is_empty());

        Ok((dispatched, jobs_per_worker))
    })?;

    for (index, jobs) in jobs_per_worker.iter().enumerate() {
        tracing::debug!(worker = index, jobs, "worker exited");
    }

    Ok(SieveOutcome {
        count: sieve.count_primes(),
        dispatched,
        jobs_per_worker,
    })
}

/// Starts `workers` threads through `spawn`, which receives the worker index.
///
/// If a spawn fails, every worker already started is sent a `Shutdown` so the
/// enclosing scope can join it, and the spawn error is returned.
fn spawn_workers<'scope, Q, F>(
    workers: usize,
    queue: &Q,
    mut spawn: F,
) -> SieveResult<Vec<ScopedJoinHandle<'scope, usize>>>
where
    Q: JobQueue,
    F: FnMut(usize) -> io::Result<ScopedJoinHandle<'scope, usize>>,
{
    let mut handles = Vec::with_capacity(workers);

    for index in 0..workers {
        match spawn(index) {
            Ok(handle) => handles.push(handle),
            Err(source) => {
                for _ in 0..handles.len() {
                    queue.enqueue(Job::Shutdown);
                }
                return Err(SieveError::WorkerSpawn { index, source });
            }
        }
    }

    Ok(handles)
}

/// Producer side: sieves `[2, sqrt_limit]` in place, hands every prime found
/// to the workers, then queues one `Shutdown` per worker.
///
/// Returns the number of primes dispatched.
pub fn produce<Q: JobQueue>(
    queue: &Q,
    sieve: &SieveArray,
    sqrt_limit: usize,
    workers: usize,
) -> usize {
    let mut dispatched = 0;

    for k in 2..=sqrt_limit {
        if !sieve.is_candidate(k) {
            continue;
        }

        queue.enqueue(Job::Prime(k));
        dispatched += 1;

        // Keep the low range exact so later candidates are really prime
        let square = k * k;
        if square <= sqrt_limit {
            sieve.mark_multiples(square, k, sqrt_limit);
        }
    }

    for _ in 0..workers {
        queue.enqueue(Job::Shutdown);
    }

    dispatched
}

/// Worker side: marks multiples of each received prime in
/// `(sqrt_limit, limit]` until a `Shutdown` arrives.
///
/// Returns the number of prime jobs handled.
pub fn work<Q: JobQueue>(
    queue: &Q,
    sieve: &SieveArray,
    sqrt_limit: usize,
    limit: usize,
) -> usize {
    let mut handled = 0;

    loop {
        match queue.dequeue() {
            Job::Prime(k) => {
                sieve.mark_multiples(first_multiple_above(sqrt_limit, k), k, limit);
                handled += 1;
            }
            Job::Shutdown => return handled,
        }
    }
}

/// Smallest multiple of `k` strictly greater than `sqrt_limit`.
#[inline]
pub fn first_multiple_above(sqrt_limit: usize, k: usize) -> usize {
    let low = sqrt_limit + 1;
    if low % k == 0 { low } else { low / k * k + k }
}

/// Basic single-threaded Sieve of Eratosthenes
///
/// Reference count used to cross-check the parallel pipeline.
/// - Time complexity: O(n log log n)
/// - Space complexity: O(n) - 1 byte per number
pub fn sequential_count(limit: usize) -> usize {
    if limit < 2 {
        return 0;
    }

    let mut is_prime = vec![true; limit + 1];
    is_prime[0] = false;
    is_prime[1] = false;

    for i in 2..=limit.isqrt() {
        if is_prime[i] {
            let mut j = i * i;
            while j <= limit {
                is_prime[j] = false;
                j += i;
            }
        }
    }

    is_prime.iter().filter(|&&prime| prime).count()
}

/// Checks a pipeline count against [`sequential_count`].
pub fn verify_count(limit: usize, count: usize) -> SieveResult<()> {
    let expected = sequential_count(limit);

    if count != expected {
        return Err(SieveError::VerificationFailed {
            limit,
            expected,
            actual: count,
        });
    }

    Ok(())
}

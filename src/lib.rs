pub mod error;
pub mod primes;
pub mod queue;
pub mod report;
pub mod sieve;

pub use error::{SieveError, SieveResult};
pub use primes::{SieveConfig, SieveOutcome, count_primes, sequential_count, verify_count};

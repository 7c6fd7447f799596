use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use countprimes::primes::{self, DEFAULT_CAPACITY, DEFAULT_VARIATION, DEFAULT_WORKERS, SieveConfig};
use countprimes::report;

#[derive(Parser)]
#[command(name = "countprimes")]
#[command(about = "Count the primes in [1, N] with a parallel producer/worker sieve", long_about = None)]
struct Cli {
    #[arg(help = "The upper limit (inclusive) to count primes up to")]
    limit: usize,
    #[arg(default_value_t = DEFAULT_WORKERS, help = "Number of worker threads")]
    workers: usize,
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_CAPACITY,
        help = "Number of slots in the bounded job queue"
    )]
    capacity: usize,
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_VARIATION,
        help = "Job queue backend: 1 = mutex/condvar ring buffer, 2 = bounded channel"
    )]
    variation: u32,
    #[arg(long, help = "Cross-check the result against a sequential sieve")]
    verify: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout only carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SieveConfig::new(cli.limit)
        .with_workers(cli.workers)
        .with_capacity(cli.capacity)
        .with_variation(cli.variation);

    tracing::info!(
        "Counting primes up to {} with {} worker threads (variation {})",
        config.limit,
        config.workers,
        config.variation
    );

    let start = Instant::now();

    let outcome = primes::count_primes(&config)?;
    let elapsed = start.elapsed();

    tracing::info!(
        "Dispatched {} sieving primes across {} workers",
        outcome.dispatched,
        outcome.jobs_per_worker.len()
    );
    if cli.verify {
        primes::verify_count(config.limit, outcome.count)?;
        tracing::info!("Sequential sieve agrees: {} primes", outcome.count);
    }

    print!("{}", report::format_report(config.limit, outcome.count, elapsed));

    Ok(())
}

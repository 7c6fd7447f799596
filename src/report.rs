use std::time::Duration;

/// Renders the two-line summary printed after a run.
pub fn format_report(limit: usize, count: usize, elapsed: Duration) -> String {
    // itoa keeps large limits cheap to print
    let mut limit_buf = itoa::Buffer::new();
    let mut count_buf = itoa::Buffer::new();

    format!(
        "Total number of prime numbers between 1 to {} = {}\nTotal elapsed time: {:.4} s\n",
        limit_buf.format(limit),
        count_buf.format(count),
        elapsed.as_secs_f64()
    )
}

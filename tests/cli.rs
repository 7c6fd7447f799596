use std::process::Command;

fn countprimes(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_countprimes"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute countprimes")
}

#[test]
fn test_prints_count_and_elapsed_time() {
    let output = countprimes(&["100"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Total number of prime numbers between 1 to 100 = 25");

    let secs = lines[1]
        .strip_prefix("Total elapsed time: ")
        .and_then(|rest| rest.strip_suffix(" s"))
        .expect("Unexpected elapsed time line");
    let (_, decimals) = secs.split_once('.').expect("Elapsed time has no decimals");
    assert_eq!(decimals.len(), 4);
    assert!(secs.parse::<f64>().is_ok());
}

#[test]
fn test_worker_count_argument() {
    let output = countprimes(&["1000", "8", "--capacity", "3", "--variation", "2", "--verify"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Total number of prime numbers between 1 to 1000 = 168\n"));
}

#[test]
fn test_degenerate_limits() {
    for (limit, expected) in [("0", 0), ("1", 0), ("2", 1), ("3", 2)] {
        let output = countprimes(&[limit]);
        assert!(output.status.success());

        let stdout = String::from_utf8_lossy(&output.stdout);
        let expected_line = format!(
            "Total number of prime numbers between 1 to {} = {}",
            limit, expected
        );
        assert_eq!(stdout.lines().next(), Some(expected_line.as_str()));
    }
}

#[test]
fn test_missing_limit_fails_without_output() {
    let output = countprimes(&[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_zero_workers_is_rejected() {
    let output = countprimes(&["100", "0"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("worker count must be at least 1"));
}

use std::io::Write;
use std::process::{Command, Stdio};

fn cli_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pkt-count-kmers"))
}

fn run_ok(args: &[&str]) -> String {
    let output = cli_cmd().args(args).output().expect("Failed to execute");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout should be UTF-8")
}

#[test]
fn cli_help_flag() {
    let output = cli_cmd().arg("--help").output().expect("Failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pkt-count-kmers"));
    assert!(stdout.contains("--moltype"));
}

#[test]
fn cli_version_flag() {
    let output = cli_cmd().arg("--version").output().expect("Failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_missing_k() {
    let output = cli_cmd().output().expect("Failed to execute");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("required") || stderr.contains("Usage"));
}

#[test]
fn cli_invalid_k() {
    for k in ["abc", "0", "65"] {
        let output = cli_cmd()
            .args([k, "tests/fixtures/simple.fa"])
            .output()
            .expect("Failed to execute");
        assert_eq!(output.status.code(), Some(1), "k = {k}");
    }
}

#[test]
fn cli_k_too_large_for_alphabet() {
    let output = cli_cmd()
        .args(["7", "tests/fixtures/protein.faa", "--moltype", "protein"])
        .output()
        .expect("Failed to execute");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Application error"));
}

#[test]
fn cli_invalid_file_path() {
    let output = cli_cmd()
        .args(["5", "/nonexistent/path/to/file.fa"])
        .output()
        .expect("Failed to execute");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn cli_tsv_k1() {
    let stdout = run_ok(&["1", "tests/fixtures/simple.fa", "--quiet"]);
    assert_eq!(
        stdout,
        "name\tA\tC\tG\tT\nseq1\t2\t2\t2\t3\nseq2\t6\t2\t2\t4\nseq3\t2\t2\t2\t2\n"
    );
}

#[test]
fn cli_tsv_has_one_column_per_kmer() {
    let stdout = run_ok(&["3", "tests/fixtures/simple.fa", "-q"]);
    for line in stdout.lines() {
        assert_eq!(line.split('\t').count(), 1 + 64);
    }
}

#[test]
fn cli_strategies_produce_same_sparse_counts() {
    let mut rolling: Vec<_> = run_ok(&["2", "tests/fixtures/with_n.fa", "-q", "-f", "sparse"])
        .lines()
        .map(String::from)
        .collect();
    let mut tally: Vec<_> = run_ok(&[
        "2",
        "tests/fixtures/with_n.fa",
        "-q",
        "-f",
        "sparse",
        "--strategy",
        "tally",
    ])
    .lines()
    .map(String::from)
    .collect();

    rolling.sort();
    tally.sort();
    assert_eq!(rolling, tally);
    assert!(!rolling.iter().any(|line| line.contains('N')));
}

#[test]
fn cli_sparse_min_count() {
    let stdout = run_ok(&[
        "2",
        "tests/fixtures/simple.fa",
        "-q",
        "--format",
        "sparse",
        "--min-count",
        "2",
    ]);
    assert!(stdout.lines().all(|line| {
        let count: u64 = line.rsplit('\t').next().unwrap().parse().unwrap();
        count >= 2
    }));
    assert!(stdout.contains("seq1\tCG\t2\n"));
}

#[test]
fn cli_json_output() {
    let stdout = run_ok(&["1", "tests/fixtures/simple.fq", "-q", "-f", "json"]);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(value["k"], 1);
    assert_eq!(value["rows"][0]["name"], "read1");
    assert_eq!(value["rows"][1]["counts"], serde_json::json!([0, 0, 4, 0]));
}

#[test]
fn cli_serial_matches_parallel() {
    let parallel = run_ok(&["4", "tests/fixtures/simple.fa", "-q"]);
    let serial = run_ok(&["4", "tests/fixtures/simple.fa", "-q", "--serial"]);
    let threaded = run_ok(&["4", "tests/fixtures/simple.fa", "-q", "--threads", "2"]);
    assert_eq!(parallel, serial);
    assert_eq!(parallel, threaded);
}

#[test]
fn cli_protein() {
    let stdout = run_ok(&["1", "tests/fixtures/protein.faa", "-q", "-m", "protein"]);
    let header = stdout.lines().next().unwrap();
    assert_eq!(header.split('\t').count(), 21);
    assert!(header.starts_with("name\tA\tC\tD\tE"));
}

#[test]
fn cli_stdin_default_when_path_omitted() {
    let mut child = cli_cmd()
        .args(["2", "--quiet", "--format", "sparse"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(b">s\nACGT\n")
        .expect("Failed to write to stdin");

    let output = child.wait_with_output().expect("Failed to wait");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "s\tAC\t1\ns\tCG\t1\ns\tGT\t1\n"
    );
}

#[test]
fn cli_status_goes_to_stderr() {
    let output = cli_cmd()
        .args(["2", "tests/fixtures/simple.fa"])
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.starts_with("name\t"));
    assert!(stderr.contains("k-length"));
    assert!(stderr.contains("3 sequences"));
}

use assert_fs::prelude::*;
use predicates::prelude::*;

#[test]
fn simulate_prints_empirical_statistics() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("queuesim");
    cmd.args(["simulate", "--horizon", "200", "--seed", "42"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Seed: 42"))
        .stdout(predicate::str::contains("Empirical statistics"))
        .stdout(predicate::str::contains("Probability of rejection:"))
        .stdout(predicate::str::contains("Sum: 1.000000"));
}

#[test]
fn simulate_is_reproducible_with_a_seed() {
    let run = || {
        let mut cmd = assert_cmd::cargo_bin_cmd!("queuesim");
        cmd.args(["simulate", "--horizon", "100", "--seed", "7"]);
        let output = cmd.output().unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap()
    };

    assert_eq!(run(), run());
}

#[test]
fn simulate_supports_patience_disabled_with_several_servers() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("queuesim");
    cmd.args(["simulate", "--horizon", "100", "--seed", "3", "--no-patience"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("reneged 0"));
}

#[test]
fn simulate_writes_a_json_report() {
    let temp = assert_fs::TempDir::new().unwrap();
    let output = temp.child("empirical.json");

    let mut cmd = assert_cmd::cargo_bin_cmd!("queuesim");
    cmd.args([
        "simulate",
        "--horizon",
        "100",
        "--seed",
        "9",
        "-o",
        output.path().to_str().unwrap(),
    ]);
    cmd.assert().success();

    let contents = std::fs::read_to_string(output.path()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(report["empirical"]["seed"], 9);
    assert_eq!(
        report["empirical"]["metrics"]["probabilities"]
            .as_array()
            .unwrap()
            .len(),
        8
    );
    assert!(report["analytic"].is_null());
}

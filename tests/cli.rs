use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("finsec").unwrap()
}

#[test]
fn analyze_local_writes_results() {
    let tmp = TempDir::new().expect("create temp dir");
    let input = tmp.path().join("transactions.csv");
    let output = tmp.path().join("results.csv");
    fs::write(
        &input,
        "transaction_id,amount,fee,merchant\ntx_1,45,5,acme\ntx_2,-140,10,acme\ntx_3,240,10,shop\n",
    )
    .unwrap();

    cmd()
        .arg("analyze")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--local")
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines[0],
        "transaction_id,amount,fee,merchant,status,risk_score,severity,recommendation"
    );
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("tx_1,45,5,acme,🟢 Normal,50.0,Low,Monitor"));
    assert!(lines[2].starts_with("tx_2,-140,10,acme,🔴 Suspicious,150.0,Medium,Monitor"));
    assert!(lines[3].starts_with("tx_3,240,10,shop,🔴 Suspicious,250.0,High,Review"));
}

#[test]
fn analyze_missing_file_fails() {
    let tmp = TempDir::new().expect("create temp dir");
    cmd()
        .arg("analyze")
        .arg(tmp.path().join("nope.csv"))
        .arg("--local")
        .assert()
        .failure()
        .stderr(contains("Failed to open"));
}

#[test]
fn score_json_prints_merged_record() {
    cmd()
        .args(["score-json", r#"{"id": "tx_9", "amount": 120.5}"#])
        .assert()
        .success()
        .stdout(contains("\"severity\": \"Medium\""))
        .stdout(contains("\"risk_score\": 120.5"))
        .stdout(contains("\"id\": \"tx_9\""));
}

#[test]
fn score_json_rejects_non_object() {
    cmd()
        .args(["score-json", "[1, 2]"])
        .assert()
        .failure()
        .stderr(contains("JSON object"));
}

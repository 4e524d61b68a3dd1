mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use rangearb::testkit::domain::{binary, child_below, no, parent_above, quote, tiled_partition, yes};
use rust_decimal_macros::dec;
use support::files::Workspace;

fn rangearb() -> Command {
    let mut cmd = Command::cargo_bin("rangearb").expect("binary built");
    cmd.env_remove("RUST_LOG")
        .env_remove("RANGEARB_MIN_PROFIT_BPS")
        .env_remove("RANGEARB_COOLDOWN_MS")
        .env_remove("RANGEARB_MAX_BATCH_SIZE");
    cmd
}

#[test]
fn check_prints_group_census() {
    let ws = Workspace::new();
    let mut markets = tiled_partition("p", 3, 10);
    markets.push(binary("m"));
    let catalog = ws.catalog(&markets);

    rangearb()
        .args(["check", "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog is valid"))
        .stdout(predicate::str::is_match(r"combination\s+1").unwrap())
        .stdout(predicate::str::is_match(r"binary\s+5").unwrap());
}

#[test]
fn check_fails_on_gapped_partition() {
    let ws = Workspace::new();
    let catalog = ws.write(
        "catalog.json",
        r#"{"markets":[
            {"condition_id":"p","yes_token":"p-yes","no_token":"p-no","kind":"range_parent","lower":"0","upper":"100"},
            {"condition_id":"a","yes_token":"a-yes","no_token":"a-no","kind":"range_child","lower":"0","upper":"50","parent":"p"},
            {"condition_id":"b","yes_token":"b-yes","no_token":"b-no","kind":"range_child","lower":"60","upper":"100","parent":"p"}
        ]}"#,
    );

    rangearb()
        .args(["check", "--catalog"])
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed group"));
}

#[test]
fn check_validates_config_when_given() {
    let ws = Workspace::new();
    let catalog = ws.catalog(&[binary("m")]);
    let config = ws.config("[engine]\nmax_batch_size = 0\n");

    rangearb()
        .args(["check", "--catalog"])
        .arg(&catalog)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_batch_size"));
}

#[test]
fn replay_writes_plans_as_json_lines() {
    let ws = Workspace::new();
    let catalog = ws.catalog(&[parent_above("p", dec!(50)), child_below("c", "p", dec!(50))]);
    let quotes = ws.quotes(&[
        quote(&yes("p"), dec!(0.54), 100, dec!(0.55), 120, 1),
        quote(&yes("c"), dec!(0.38), 100, dec!(0.40), 70, 1),
    ]);
    let config = ws.config("[engine]\nmin_profit_bps = 100\n");

    let output = rangearb()
        .args(["replay", "--config"])
        .arg(&config)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--quotes")
        .arg(&quotes)
        .output()
        .expect("run rangearb");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let plans: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("plan line is JSON"))
        .collect();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0]["strategy"], "BUY_CHILD_YES_SELL_PARENT_NO");
    assert_eq!(plans[0]["orders"].as_array().map(Vec::len), Some(2));
}

#[test]
fn replay_dry_run_prints_summary() {
    let ws = Workspace::new();
    let catalog = ws.catalog(&[binary("m")]);
    let quotes = ws.quotes(&[
        quote(&yes("m"), dec!(0.40), 10, dec!(0.45), 10, 1),
        quote(&no("m"), dec!(0.40), 10, dec!(0.50), 10, 1),
    ]);
    let config = ws.config("");

    rangearb()
        .args(["replay", "--dry-run", "--config"])
        .arg(&config)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--quotes")
        .arg(&quotes)
        .assert()
        .success()
        .stdout(predicate::str::contains("Replay summary"))
        .stdout(predicate::str::is_match(r"Plans\s+1").unwrap())
        .stderr(predicate::str::contains("Dry-run plan"));
}

#[test]
fn replay_fails_on_missing_quotes_file() {
    let ws = Workspace::new();
    let catalog = ws.catalog(&[binary("m")]);
    let config = ws.config("");

    rangearb()
        .args(["replay", "--config"])
        .arg(&config)
        .arg("--catalog")
        .arg(&catalog)
        .args(["--quotes", "/nonexistent/quotes.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("replay of /nonexistent/quotes.jsonl failed"));
}

#[test]
fn replay_rejects_negative_threshold_override() {
    let ws = Workspace::new();
    let catalog = ws.catalog(&[binary("m")]);
    let quotes = ws.quotes(&[quote(&yes("m"), dec!(0.40), 10, dec!(0.45), 10, 1)]);
    let config = ws.config("");

    rangearb()
        .args(["replay", "--min-profit-bps=-5", "--config"])
        .arg(&config)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--quotes")
        .arg(&quotes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_profit_bps"));
}

mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let csv_path = dir.path().join("references.csv");
    common::write_references_csv(&csv_path, &["TXN001", "TXN002", "TXN003"])?;

    let mut cmd = Command::new(cargo_bin!("payflow"));
    cmd.arg(&csv_path)
        .arg("--service")
        .arg("service1")
        .arg("--method")
        .arg("card")
        .arg("--validation-delay-ms")
        .arg("0");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "reference_id,customer_name,application_fee,charges,sub_total",
        ))
        .stdout(predicate::str::contains("TXN001"))
        .stdout(predicate::str::contains("TXN002"))
        .stdout(predicate::str::contains("TXN003"))
        .stdout(predicate::str::contains("Processing payment of"));

    Ok(())
}

#[test]
fn test_cli_skips_rejected_references() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let csv_path = dir.path().join("references.csv");
    // "AB" fails verification, the duplicate is rejected outright
    common::write_references_csv(&csv_path, &["TXN001", "AB", "TXN001"])?;

    let mut cmd = Command::new(cargo_bin!("payflow"));
    cmd.arg(&csv_path).arg("--validation-delay-ms").arg("0");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("TXN001"))
        .stdout(predicate::str::contains("AB,").not())
        .stderr(predicate::str::contains("failed verification"))
        .stderr(predicate::str::contains("rejected"));

    Ok(())
}

#[test]
fn test_cli_fails_without_verifiable_references() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let csv_path = dir.path().join("references.csv");
    common::write_references_csv(&csv_path, &["AB"])?;

    let mut cmd = Command::new(cargo_bin!("payflow"));
    cmd.arg(&csv_path).arg("--validation-delay-ms").arg("0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("verified reference"));

    Ok(())
}

#[test]
fn test_cli_rejects_unknown_service() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let csv_path = dir.path().join("references.csv");
    common::write_references_csv(&csv_path, &["TXN001"])?;

    let mut cmd = Command::new(cargo_bin!("payflow"));
    cmd.arg(&csv_path)
        .arg("--service")
        .arg("service99")
        .arg("--validation-delay-ms")
        .arg("0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown service"));

    Ok(())
}

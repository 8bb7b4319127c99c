use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("finance_core_cli").expect("binary exists");
    cmd.env("FINANCE_CORE_HOME", home.path())
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn version_prints_crate_version() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "finance_core {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn unknown_command_fails_with_usage() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: finance_core_cli"));
}

#[test]
fn installments_appear_in_month_dashboard() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add-expense", "Notebook", "1.200,00", "2025-01-31", "--installments", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 3 installments"));

    cli(&home)
        .args(["dashboard", "month", "2025-02-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Notebook (2/3)"))
        .stdout(predicate::str::contains("28/02/2025"))
        .stdout(predicate::str::contains("1.200,00"));
}

#[test]
fn day_dashboard_masks_balance_until_toggled() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add-income", "Salário", "3000", "2025-03-01"])
        .assert()
        .success();

    cli(&home)
        .args(["dashboard", "day", "2025-03-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("month to date ******"));

    cli(&home)
        .arg("toggle-balance")
        .assert()
        .success()
        .stdout(predicate::str::contains("Balance shown"));

    cli(&home)
        .args(["dashboard", "day", "2025-03-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3.000,00"));
}

#[test]
fn search_narrows_the_listing() {
    let home = TempDir::new().unwrap();
    for (description, amount) in [("Café", "8,50"), ("Mercado", "210,30")] {
        cli(&home)
            .args(["add-expense", description, amount, "2025-03-15"])
            .assert()
            .success();
    }
    cli(&home)
        .args(["dashboard", "day", "2025-03-15", "cafe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Café"))
        .stdout(predicate::str::contains("Mercado").not());
}

#[test]
fn tags_can_be_created_and_listed() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add-tag", "Lazer", "f1c40f"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tag created"));
    cli(&home)
        .arg("tags")
        .assert()
        .success()
        .stdout(predicate::str::contains("#f1c40f  Lazer"));
}

#[test]
fn invalid_amount_is_reported() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add-expense", "Pão", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn zero_installments_are_rejected() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add-expense", "Sofá", "900", "--installments", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--installments must be between 1 and 48"));
}

#[test]
fn per_installment_amounts_are_saved() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add-expense", "Curso", "100", "2025-01-10", "--installments", "3"])
        .args(["--amounts", "100 120,50 130"])
        .assert()
        .success();

    cli(&home)
        .args(["dashboard", "month", "2025-02-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Curso (2/3)"))
        .stdout(predicate::str::contains("120,50"));
}

#[test]
fn edit_changes_one_record() {
    let home = TempDir::new().unwrap();
    let output = cli(&home)
        .args(["add-expense", "Pão", "5", "2025-03-15"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let id = stdout
        .split_whitespace()
        .last()
        .expect("record id printed")
        .to_string();

    cli(&home)
        .args(["edit", "expense", id.as_str(), "--amount", "7,25", "--description", "Pão francês"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated Expense \"Pão francês\""));

    cli(&home)
        .args(["dashboard", "day", "2025-03-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pão francês"))
        .stdout(predicate::str::contains("7,25"))
        .stdout(predicate::str::contains("5,00").not());
}

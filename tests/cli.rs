//! E2E tests for the stampc command line

use std::process::{Command, Output};

fn stampc(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Standard duty only, rendered as a table
#[test]
fn calc_standard_duty() {
    let output = stampc(&["calc", "600000"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("STAMP DUTY (Victoria 2025)"));
    assert!(stdout.contains("$31,070.00"));
    assert!(stdout.contains("$1,505.50"));
    assert!(stdout.contains("$32,575.50"));
    assert!(!stdout.contains("APPLIED"));
}

/// First home buyer exemption shows the program and savings
#[test]
fn calc_first_home_buyer_exemption() {
    let output = stampc(&["calc", "600000", "--first-home-buyer"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("EXEMPTION APPLIED"));
    assert!(stdout.contains("Savings: $31,070.00"));
}

/// JSON output of a concession
#[test]
fn calc_json_concession() {
    let output = stampc(&["calc", "$700,000", "-f", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("\"applied_program\": \"Concession\""));
    assert!(stdout.contains("\"duty_payable\": \"24713.33\""));
    assert!(stdout.contains("\"registration_fee\": \"1739.50\""));
    assert!(stdout.contains("\"total\": \"26452.83\""));
}

/// Residence discount via the short flag
#[test]
fn calc_residence_discount() {
    let output = stampc(&["calc", "500000", "-r", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("\"applied_program\": \"ResidenceDiscount\""));
    assert!(stdout.contains("\"savings\": \"3100.00\""));
}

/// Zero and negative values are rejected with a user-facing message
#[test]
fn calc_rejects_invalid_values() {
    for value in ["0", "-250000", "abc"] {
        let output = stampc(&["calc", value]);
        let stderr = String::from_utf8_lossy(&output.stderr);

        assert!(!output.status.success(), "{value} should fail");
        assert!(stderr.contains("Please enter a valid property value"));
    }
}

/// Batch CSV output has one row per purchase
#[test]
fn batch_csv_output() {
    let output = stampc(&["batch", "-i", "tests/data/purchases.csv"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("property_value,first_home_buyer,principal_residence,stamp_duty"));
    assert!(lines[1].contains("31070.00"));
    assert!(lines[2].contains("Exemption"));
    assert!(lines[3].contains("Concession"));
    assert!(lines[4].contains("43070.00"));
    assert!(lines[5].contains("ResidenceDiscount"));
}

/// A single bad row fails the whole batch
#[test]
fn batch_invalid_row_fails() {
    let output = stampc(&["batch", "-i", "tests/data/invalid_value.csv"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("record 2"));
}

/// A custom rate schedule replaces the built-in rates
#[test]
fn custom_rate_schedule() {
    let output = stampc(&[
        "calc",
        "120000",
        "--residence",
        "--json",
        "--rates",
        "tests/data/testland.json",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("\"duty_payable\": \"600.01\""));
    assert!(stdout.contains("\"registration_fee\": \"170.00\""));
    assert!(stdout.contains("Half rate for homes."));
}

/// A schedule with a gap between brackets is refused at startup
#[test]
fn gapped_rate_schedule_is_rejected() {
    let output = stampc(&["calc", "120000", "--rates", "tests/data/gapped.json"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("rate configuration integrity error"));
}

/// SMS text with character accounting on stderr
#[test]
fn share_sms() {
    let output = stampc(&["share", "sms", "700000", "-f", "--to", "0400000000"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("Stamp Duty: $24,713"));
    assert!(stdout.contains("Savings: $12,357"));
    assert!(stderr.contains("/160"));
}

/// E-mail deep link is URL encoded
#[test]
fn share_email_link() {
    let output = stampc(&[
        "share",
        "email",
        "600000",
        "--to",
        "buyer@example.com",
        "--link",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.starts_with("mailto:buyer@example.com?subject=Stamp%20Duty%20Calculation%20Results&body="));
    assert!(stdout.contains("Total%20Fees%3A%20%2432%2C575.50"));
}

/// `calc --json` prints exactly the fields the result schema describes
#[test]
fn calc_json_matches_result_schema() {
    let output = stampc(&["schema", "result-schema"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let mut schema_keys: Vec<_> = schema["properties"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    schema_keys.sort();

    let output = stampc(&["calc", "700000", "-f", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let mut result_keys: Vec<_> = result.as_object().unwrap().keys().cloned().collect();
    result_keys.sort();

    assert_eq!(result_keys, schema_keys);
    assert_eq!(result["standard_duty"], "37070.00");
    assert_eq!(result["savings"], "12356.67");
    assert_eq!(schema["properties"]["duty_payable"]["type"], "string");
}

/// Rate table listing and schedule export
#[test]
fn rates_listing() {
    let output = stampc(&["rates"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("RATE SCHEDULE (Victoria 2025)"));
    assert!(stdout.contains("entire value"));
    assert!(stdout.contains("and above"));

    let output = stampc(&["rates", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("\"residence_ceiling\""));
    assert!(stdout.contains("\"FlatRate\""));
}

/// Schema formats
#[test]
fn schema_formats() {
    let output = stampc(&["schema", "csv-header"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(stdout.trim(), "value,first_home_buyer,principal_residence");

    let output = stampc(&["schema", "rates-schema"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("\"RateSchedule\""));
    assert!(stdout.contains("\"BracketMode\""));
}

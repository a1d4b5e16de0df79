use std::fs;

use atrius_indicator_expr::MetadataSnapshot;
use atrius_indicator_expr::cli::{Args, run_cli};
use atrius_indicator_support::MissingValuePolicy;
use serde_json::{Value, json};

fn write_snapshot(dir: &std::path::Path) -> std::path::PathBuf {
    let snapshot = MetadataSnapshot::new()
        .with_data_element("anc1", "ANC first visit", ["fixed", "outreach"])
        .with_category_option_combo("fixed", "Fixed")
        .with_category_option_combo("outreach", "Outreach")
        .with_constant("factor", "Reporting factor", 1.5);
    let path = dir.join("metadata.json");
    fs::write(&path, serde_json::to_string_pretty(&snapshot).unwrap()).unwrap();
    path
}

fn base_args(expression: &str, metadata: std::path::PathBuf) -> Args {
    Args {
        expression: expression.to_string(),
        metadata,
        values: None,
        policy: MissingValuePolicy::NeverSkip,
        days: None,
        validate: false,
        describe: false,
        explode: false,
        output: None,
    }
}

#[test]
fn validates_a_formula_and_writes_the_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let metadata = write_snapshot(dir.path());
    let output = dir.path().join("out.json");

    let mut args = base_args("#{anc1.fixed}*C{factor}", metadata);
    args.validate = true;
    args.output = Some(output.clone());
    run_cli(args).unwrap();

    let body: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(body["status"], "VALID");
    assert_eq!(body["description"], "ANC first visit:Fixed*Reporting factor");
}

#[test]
fn reports_violations_as_data_not_errors() {
    let dir = tempfile::tempdir().unwrap();
    let metadata = write_snapshot(dir.path());
    let output = dir.path().join("out.json");

    let mut args = base_args("#{deX.fixed}", metadata);
    args.validate = true;
    args.output = Some(output.clone());
    run_cli(args).unwrap();

    let body: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(body["status"], "ERROR");
    assert_eq!(body["code"], "data_element_not_found");
}

#[test]
fn explodes_totals_to_the_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let metadata = write_snapshot(dir.path());
    let output = dir.path().join("out.json");

    let mut args = base_args("#{anc1}", metadata);
    args.explode = true;
    args.output = Some(output.clone());
    run_cli(args).unwrap();

    let body: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(body["exploded"], "(#{anc1.fixed}+#{anc1.outreach})");
}

#[test]
fn evaluates_against_a_context_file() {
    let dir = tempfile::tempdir().unwrap();
    let metadata = write_snapshot(dir.path());
    let context_path = dir.path().join("context.json");
    fs::write(
        &context_path,
        json!({
            "values": [
                {"dataElement": "anc1", "categoryOptionCombo": "fixed", "value": 30.0},
                {"dataElement": "anc1", "categoryOptionCombo": "outreach", "value": 20.0}
            ],
            "days": 31
        })
        .to_string(),
    )
    .unwrap();
    let output = dir.path().join("out.json");

    let mut args = base_args("#{anc1}/[days]", metadata);
    args.values = Some(context_path);
    args.output = Some(output.clone());
    run_cli(args).unwrap();

    let body: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(body["skipped"], false);
    assert_eq!(body["generated"], "(30.0+20.0)/31");
    assert!((body["value"].as_f64().unwrap() - 50.0 / 31.0).abs() < 1e-12);
}

#[test]
fn days_flag_overrides_the_context_file() {
    let dir = tempfile::tempdir().unwrap();
    let metadata = write_snapshot(dir.path());
    let output = dir.path().join("out.json");

    let mut args = base_args("[days]*2", metadata);
    args.days = Some(30);
    args.output = Some(output.clone());
    run_cli(args).unwrap();

    let body: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(body["value"], 60.0);
}

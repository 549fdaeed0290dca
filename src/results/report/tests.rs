//! Tests for the reports.

use super::{write_json, TextReport};
use crate::{
    error::{Stage, Warning},
    extraction::InventoryEntry,
    heuristics::{assess, Policy},
    results::Results,
    static_analysis::{
        code::{CategoryMatch, CodeSignals},
        manifest::ManifestSignals,
    },
    test_utils::write_file,
    Config,
};
use std::fs;
use tempfile::TempDir;

fn results(temp: &TempDir) -> Results {
    let package = temp.path().join("locker.apk");
    write_file(&package, b"PK fake package");
    let mut results = Results::init(&package).unwrap();

    let manifest = ManifestSignals::new(
        vec!["android.permission.SYSTEM_ALERT_WINDOW".to_owned()],
        vec![".MainActivity".to_owned()],
        Vec::new(),
    );
    let code = CodeSignals::new(
        vec![CategoryMatch::new("Lock/screen-lock behavior", "Helper.txt")],
        vec![
            "http://lockvirus.example.com/a".to_owned(),
            "http://lockvirus.example.com/a".to_owned(),
        ],
    );
    results.set_risk(assess(&manifest, &code, &Policy::default()));
    results.set_manifest(manifest);
    results.set_code(code);
    results.set_inventory(vec![
        InventoryEntry::new("AndroidManifest.xml", 120),
        InventoryEntry::new("Helper.txt", 30),
    ]);
    results.add_warnings(vec![Warning::new(
        Stage::Code,
        "broken.bin",
        "could not read",
    )]);
    results
}

#[test]
fn it_overview_report() {
    let temp = tempfile::tempdir().unwrap();
    let results = results(&temp);
    let report = TextReport::new().unwrap().render(&results).unwrap();

    let overview = report.overview();
    assert!(overview.contains("Package:  locker"));
    assert!(overview.contains(results.fingerprint().sha256()));
    assert!(overview.contains("Permissions: 1"));
    assert!(overview.contains("Activities:  1"));
    assert!(overview.contains("  - Dangerous permission: android.permission.SYSTEM_ALERT_WINDOW"));
    assert!(overview.contains("  - Lock/screen-lock behavior: Helper.txt"));
    assert_eq!(
        overview
            .matches("Suspicious URL: http://lockvirus.example.com/a")
            .count(),
        2
    );
    assert!(overview.contains("Risk tier: HIGH"));
    assert!(!overview.contains("No suspicious behavior"));
    assert!(!overview.contains("Extracted images"));
}

#[test]
fn it_overview_without_findings() {
    let temp = tempfile::tempdir().unwrap();
    let package = temp.path().join("clean.apk");
    write_file(&package, b"PK");
    let results = Results::init(&package).unwrap();

    let report = TextReport::new().unwrap().render(&results).unwrap();

    assert!(report
        .overview()
        .contains("No suspicious behavior was found."));
    assert!(report.overview().contains("Risk tier: NONE"));
    assert_eq!(report.inventory(), "");
}

#[test]
fn it_details_report() {
    let temp = tempfile::tempdir().unwrap();
    let report = TextReport::new().unwrap().render(&results(&temp)).unwrap();

    let details = report.details();
    assert!(details.contains("  - android.permission.SYSTEM_ALERT_WINDOW"));
    assert!(details.contains("  - .MainActivity"));
    assert_eq!(
        details.matches("http://lockvirus.example.com/a").count(),
        1
    );
    assert!(details.contains("[code scan] broken.bin: could not read"));
    assert!(details.contains("(none)"));
    assert!(!details.contains("Manifest error"));
}

#[test]
fn it_inventory_report() {
    let temp = tempfile::tempdir().unwrap();
    let report = TextReport::new().unwrap().render(&results(&temp)).unwrap();

    assert_eq!(
        report.inventory(),
        "AndroidManifest.xml (120 bytes)\nHelper.txt (30 bytes)"
    );
}

#[test]
fn it_json_report() {
    let temp = tempfile::tempdir().unwrap();
    let results = results(&temp);
    let mut config = Config::default();
    config.set_results_folder(temp.path().join("results"));

    let path = write_json(&config, &results).unwrap();

    assert_eq!(
        path,
        temp.path().join("results").join("locker").join("results.json")
    );
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(value["package_name"], "locker");
    assert_eq!(value["tier"], "HIGH");
    assert_eq!(value["findings"][0]["origin"], "dangerous_permission");
    assert_eq!(value["findings"].as_array().unwrap().len(), 4);
    assert_eq!(value["bundle"], serde_json::Value::Null);
}

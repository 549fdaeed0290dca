//! Tests for the code analysis.

use super::{analysis, analyze_file, load_rules, scan_text, Rule};
use crate::{
    cancellation::Cancellation,
    config::Config,
    error::{ErrorKind, Stage},
    test_utils::write_file,
};
use std::path::{Path, PathBuf};

fn default_rules() -> Vec<Rule> {
    load_rules(&Config::default()).unwrap()
}

fn categories(text: &str) -> Vec<String> {
    scan_text(text, Path::new("file.txt"), &default_rules())
        .category_matches()
        .iter()
        .map(|m| m.category().to_owned())
        .collect()
}

#[test]
fn it_category_at_most_once_per_file() {
    assert_eq!(categories("lock lock LOCK Lock lock"), ["Lock/screen-lock behavior"]);
}

#[test]
fn it_categories_in_rule_order() {
    assert_eq!(
        categories("System.exit after a killProcess call"),
        ["Process manipulation", "System-level exit/restart"]
    );
    assert_eq!(categories("open the WeChat login"), ["Social-app targeting"]);
    assert_eq!(categories("开启无障碍服务"), ["Accessibility-service use"]);
    assert!(categories("nothing to see here").is_empty());
}

#[test]
fn it_harvests_urls_with_duplicates() {
    let signals = scan_text(
        "see http://example.com/x and www.test.org then http://example.com/x",
        Path::new("a.txt"),
        &[],
    );

    assert!(signals.category_matches().is_empty());
    assert_eq!(
        signals.urls(),
        &["http://example.com/x", "www.test.org", "http://example.com/x"]
    );
    assert_eq!(signals.unique_urls(), ["http://example.com/x", "www.test.org"]);
}

#[test]
fn it_file_regex_selects_files() {
    let rules: Vec<Rule> = serde_json::from_str(
        r#"[{"label": "Hidden", "regex": "hidden", "exclude_file_regex": "\\.so$"}]"#,
    )
    .unwrap();

    assert!(scan_text("hidden", Path::new("lib/libx.so"), &rules)
        .category_matches()
        .is_empty());
    assert_eq!(
        scan_text("hidden", Path::new("assets/a.js"), &rules)
            .category_matches()
            .len(),
        1
    );
}

#[test]
fn it_scans_binary_files() {
    let temp = tempfile::tempdir().unwrap();
    let mut bytes = vec![0x64, 0x65, 0x78, 0x0a, 0x00, 0xff, 0xfe];
    bytes.extend_from_slice(b"accessibility");
    write_file(temp.path().join("classes.dex"), &bytes);

    let (signals, warnings) =
        analysis(temp.path(), default_rules(), 2, &Cancellation::new()).unwrap();

    assert!(warnings.is_empty());
    assert_eq!(signals.category_matches().len(), 1);
    assert_eq!(
        signals.category_matches()[0].category(),
        "Accessibility-service use"
    );
    assert_eq!(
        signals.category_matches()[0].file(),
        Path::new("classes.dex")
    );
}

#[test]
fn it_merges_results_in_walk_order() {
    let temp = tempfile::tempdir().unwrap();
    for i in 0..20 {
        write_file(
            temp.path().join(format!("f{:02}.txt", i)),
            b"lock the screen",
        );
    }
    write_file(temp.path().join("nested").join("g.txt"), b"http://a.example/1");

    let (signals, warnings) =
        analysis(temp.path(), default_rules(), 4, &Cancellation::new()).unwrap();

    assert!(warnings.is_empty());
    let files: Vec<PathBuf> = signals
        .category_matches()
        .iter()
        .map(|m| m.file().to_path_buf())
        .collect();
    let expected: Vec<PathBuf> = (0..20)
        .map(|i| PathBuf::from(format!("f{:02}.txt", i)))
        .collect();
    assert_eq!(files, expected);
    assert_eq!(signals.urls(), &["http://a.example/1"]);
}

#[test]
fn it_unreadable_file_is_a_warning() {
    let temp = tempfile::tempdir().unwrap();
    let warning = analyze_file(&temp.path().join("gone.txt"), temp.path(), &[]).unwrap_err();

    assert_eq!(warning.stage(), Stage::Code);
    assert_eq!(warning.path(), Path::new("gone.txt"));
    assert!(warning.message().starts_with("could not read"));
}

#[test]
fn it_cancelled_analysis() {
    let temp = tempfile::tempdir().unwrap();
    write_file(temp.path().join("a.txt"), b"lock");
    let cancellation = Cancellation::new();
    cancellation.cancel();

    let error = analysis(temp.path(), default_rules(), 2, &cancellation).unwrap_err();

    match error.downcast_ref::<ErrorKind>() {
        Some(ErrorKind::Cancelled { stage }) => assert_eq!(*stage, Stage::Code),
        other => panic!("unexpected error: {:?}", other),
    }
}

//! Integration tests for `wikicite::scan_fs`.

use std::fs;
use std::path::PathBuf;

use wikicite::{CitationScanner, FsSourceConfig, ScanConfig, ScanErrorKind, scan_fs};
use tempfile::TempDir;

fn scanner() -> CitationScanner {
    CitationScanner::new(ScanConfig::default()).unwrap()
}

fn fs_config(paths: Vec<PathBuf>) -> FsSourceConfig {
    let mut cfg = FsSourceConfig::default();
    cfg.paths = paths;
    cfg
}

#[test]
fn test_scan_fs_empty_paths_errors() {
    let result = scan_fs(&fs_config(vec![]), &scanner());
    let msg = result.unwrap_err().to_string();
    assert!(msg.contains("No paths provided"), "got: {msg}");
}

#[test]
fn test_scan_fs_nonexistent_path_errors() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("does_not_exist");
    let result = scan_fs(&fs_config(vec![missing]), &scanner());
    let msg = result.unwrap_err().to_string();
    assert!(msg.contains("does not exist"), "got: {msg}");
}

#[test]
fn test_scan_fs_reports_each_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("Good_Page.wiki"),
        "Intro.<ref>{{Cite web|title=A|url=http://a}}</ref>\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("Bad_Page.wiki"),
        "Claim.<ref>{{cite web |title=B}}</ref> Other.<ref>{{Cite web|url=http://c}}</ref>\n",
    )
    .unwrap();
    fs::write(tmp.path().join("notes.md"), "{{Cite web|title=ignored}}").unwrap();

    let report = scan_fs(&fs_config(vec![tmp.path().to_path_buf()]), &scanner()).unwrap();

    assert_eq!(report.scanned_files, 2);
    assert_eq!(report.failed_files, 0);
    assert!(!report.ok());

    let bad = report
        .articles
        .iter()
        .find(|a| a.title == "Bad Page")
        .unwrap();
    assert_eq!(bad.analysis.total_citations, 2);
    assert_eq!(bad.analysis.incomplete_count(), 2);

    let good = report
        .articles
        .iter()
        .find(|a| a.title == "Good Page")
        .unwrap();
    assert!(good.analysis.is_complete());
}

#[test]
fn test_scan_fs_all_complete_is_ok() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "{{Cite web|title=A|url=u}}").unwrap();
    let report = scan_fs(&fs_config(vec![tmp.path().to_path_buf()]), &scanner()).unwrap();
    assert_eq!(report.scanned_files, 1);
    assert!(report.ok());
}

#[test]
fn test_scan_fs_oversized_file_is_scan_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("big.wiki"), "x".repeat(64)).unwrap();
    let mut cfg = fs_config(vec![tmp.path().to_path_buf()]);
    cfg.max_file_size = 16;

    let report = scan_fs(&cfg, &scanner()).unwrap();
    assert_eq!(report.scanned_files, 0);
    assert_eq!(report.failed_files, 1);
    assert_eq!(report.scan_errors[0].kind, ScanErrorKind::TooLarge);
    assert!(!report.ok());
}

//! Command-line behaviour of the `medcap` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MEDICLOUD_PAGE: &str = r#"<html>
<head><title>健保醫療資訊雲端查詢系統</title></head>
<body>
  <span class="idno">A12***789</span>
  <span class="name">王小明</span>
  <div class="dataTables_wrapper">
    <div class="dataTables_scrollHead"><table><thead><tr><th>就醫日期</th><th>來源</th></tr></thead></table></div>
    <div class="dataTables_scrollBody"><table><tbody>
      <tr><td>114/05/31</td><td>臺大醫院<br>門診<br>0401180014</td></tr>
    </tbody></table></div>
  </div>
</body>
</html>"#;

const PLAIN_PAGE: &str =
    "<html><head><title>Export</title></head><body><table><tr><th>H1</th><th>H2</th></tr><tr><td>1</td><td>2</td></tr></table></body></html>";

const EMPTY_PAGE: &str = "<html><head><title>Welcome</title></head><body><p>Hello</p></body></html>";

/// Temp dir with an empty config file, so runs never read the user's config.
fn workspace() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();
    (dir, config)
}

fn write_page(dir: &Path, name: &str, html: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, html).unwrap();
    path
}

fn medcap(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("medcap").unwrap();
    cmd.arg("-c").arg(config);
    cmd
}

#[test]
fn test_extract_json() {
    let (dir, config) = workspace();
    let page = write_page(dir.path(), "page.html", MEDICLOUD_PAGE);

    let output = medcap(&config).arg("extract").arg(&page).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["records"][0]["就醫日期"], "2025/05/31");
    assert_eq!(json["records"][0]["機構代碼"], "0401180014");
    assert_eq!(json["identity"]["name"], "王小明");
}

#[test]
fn test_extract_csv() {
    let (dir, config) = workspace();
    let page = write_page(dir.path(), "plain.html", PLAIN_PAGE);

    medcap(&config)
        .args(["extract", "--format", "csv"])
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains("H1,H2\n\"1\",\"2\""));
}

#[test]
fn test_extract_text_to_file() {
    let (dir, config) = workspace();
    let page = write_page(dir.path(), "plain.html", PLAIN_PAGE);
    let out = dir.path().join("out.txt");

    medcap(&config)
        .args(["extract", "-f", "text", "-o"])
        .arg(&out)
        .arg(&page)
        .assert()
        .success();

    let text = fs::read_to_string(out).unwrap();
    assert!(text.starts_with("Status: extracted 1 records"));
}

#[test]
fn test_extract_without_table_fails() {
    let (dir, config) = workspace();
    let page = write_page(dir.path(), "empty.html", EMPTY_PAGE);

    medcap(&config)
        .arg("extract")
        .arg(&page)
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"))
        .stderr(predicate::str::contains("no table data found"));
}

#[test]
fn test_extract_missing_input() {
    let (dir, config) = workspace();

    medcap(&config)
        .arg("extract")
        .arg(dir.path().join("missing.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_extract_exports_folder() {
    let (dir, config) = workspace();
    let page = write_page(dir.path(), "page.html", MEDICLOUD_PAGE);
    let out = dir.path().join("exports");

    medcap(&config)
        .arg("extract")
        .arg(&page)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success();

    let folders: Vec<PathBuf> = fs::read_dir(&out).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(folders.len(), 1);
    let folder = &folders[0];
    assert!(folder.file_name().unwrap().to_str().unwrap().ends_with("_王小明"));
    assert!(folder.join("personal-info.json").exists());

    let csv_files: Vec<_> = fs::read_dir(folder)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .filter(|name| name.starts_with("medical-data-") && name.ends_with(".csv"))
        .collect();
    assert_eq!(csv_files.len(), 1);
    let csv = fs::read_to_string(folder.join(&csv_files[0])).unwrap();
    assert!(csv.contains("\"臺大醫院 | 門診 | 0401180014\""));
}

#[test]
fn test_batch_with_summary() {
    let (dir, config) = workspace();
    let pages = dir.path().join("pages");
    fs::create_dir(&pages).unwrap();
    write_page(&pages, "a.html", MEDICLOUD_PAGE);
    write_page(&pages, "b.htm", PLAIN_PAGE);
    write_page(&pages, "c.html", EMPTY_PAGE);
    write_page(&pages, "notes.txt", "ignored");
    let out = dir.path().join("out");

    medcap(&config)
        .arg("batch")
        .arg(format!("{}/*", pages.display()))
        .arg("--output-dir")
        .arg(&out)
        .args(["--summary", "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful, 1 failed"));

    assert!(out.join("a.html").is_dir());
    assert!(out.join("b.htm").is_dir());
    assert!(!out.join("c.html").exists());

    let mut reader = csv::Reader::from_path(out.join("summary.csv")).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    let status: Vec<&str> = rows.iter().map(|r| &r[1]).collect();
    assert!(status.contains(&"error"));
    assert_eq!(status.iter().filter(|s| **s == "success").count(), 2);
}

#[test]
fn test_batch_keeps_same_named_pages_apart() {
    let (dir, config) = workspace();
    for sub in ["x", "y"] {
        let pages = dir.path().join(sub);
        fs::create_dir(&pages).unwrap();
        write_page(&pages, "page.html", PLAIN_PAGE);
    }
    let out = dir.path().join("out");

    medcap(&config)
        .arg("batch")
        .arg(format!("{}/*/page.html", dir.path().display()))
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful, 0 failed"));

    assert!(out.join("page.html").is_dir());
    assert!(out.join("page.html-2").is_dir());
}

#[test]
fn test_batch_stops_on_first_failure() {
    let (dir, config) = workspace();
    write_page(dir.path(), "empty.html", EMPTY_PAGE);

    medcap(&config)
        .arg("batch")
        .arg(format!("{}/*.html", dir.path().display()))
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn test_batch_no_matches() {
    let (dir, config) = workspace();

    medcap(&config)
        .arg("batch")
        .arg(format!("{}/*.html", dir.path().display()))
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn test_config_set_and_get() {
    let (_dir, config) = workspace();

    medcap(&config)
        .args(["config", "set", "export.line_separator", " / "])
        .assert()
        .success();

    medcap(&config)
        .args(["config", "get", "export.line_separator"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\" / \""));

    medcap(&config)
        .args(["config", "get", "export.missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let (_dir, config) = workspace();

    medcap(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    medcap(&config)
        .args(["config", "init", "--force"])
        .assert()
        .success();

    let written = fs::read_to_string(&config).unwrap();
    assert!(written.contains("domain_keywords"));
}

#[test]
fn test_config_separator_reaches_csv() {
    let (dir, config) = workspace();
    fs::write(&config, r#"{"export": {"line_separator": " ; "}}"#).unwrap();
    let page = write_page(dir.path(), "page.html", MEDICLOUD_PAGE);

    medcap(&config)
        .args(["extract", "--format", "csv"])
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"臺大醫院 ; 門診 ; 0401180014\""));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (dir, config) = workspace();
    fs::write(&config, r#"{"classifier": {"system_names": []}}"#).unwrap();
    let page = write_page(dir.path(), "page.html", PLAIN_PAGE);

    medcap(&config)
        .arg("extract")
        .arg(&page)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

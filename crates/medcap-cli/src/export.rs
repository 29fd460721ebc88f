//! Writes extraction results to disk as a dated export folder.
//!
//! Layout, one folder per capture:
//!
//! ```text
//! <root>/2025-05-31_14-03-09_王小明/
//!     medical-data-2025-05-31T06-03-09-120Z.csv
//!     medical-data-2025-05-31T06-03-09-120Z.json
//!     personal-info.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat, Utc};
use tracing::{debug, info};

use medcap_core::export::{identity_to_json, records_to_json, to_csv_with};
use medcap_core::models::ExportConfig;
use medcap_core::ExtractionResult;

/// Files produced by one export.
#[derive(Debug, Default)]
pub struct ExportedFiles {
    pub folder: PathBuf,
    pub csv: Option<PathBuf>,
    pub records_json: Option<PathBuf>,
    pub identity_json: Option<PathBuf>,
}

/// Export sink rooted at an output directory.
pub struct ExportSink {
    root: PathBuf,
    config: ExportConfig,
}

impl ExportSink {
    pub fn new(root: impl Into<PathBuf>, config: ExportConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Export `result`, or return `None` when it holds nothing to write.
    pub fn write(&self, result: &ExtractionResult) -> anyhow::Result<Option<ExportedFiles>> {
        self.write_at(result, Local::now())
    }

    pub fn write_at(
        &self,
        result: &ExtractionResult,
        now: DateTime<Local>,
    ) -> anyhow::Result<Option<ExportedFiles>> {
        let records = result.records.as_ref().filter(|records| !records.is_empty());
        if records.is_none() && result.identity.is_none() {
            debug!("Nothing to export");
            return Ok(None);
        }

        let name = result
            .identity
            .as_ref()
            .and_then(|identity| identity.name.as_deref());
        let folder = self
            .root
            .join(folder_name(&now, name, &self.config.default_name));
        fs::create_dir_all(&folder)?;

        let mut files = ExportedFiles {
            folder: folder.clone(),
            ..Default::default()
        };

        if let Some(records) = records {
            let stem = data_file_stem(&now.with_timezone(&Utc));

            let csv_path = folder.join(format!("{stem}.csv"));
            write_file(&csv_path, &to_csv_with(records, &self.config))?;
            files.csv = Some(csv_path);

            let json_path = folder.join(format!("{stem}.json"));
            write_file(&json_path, &records_to_json(records)?)?;
            files.records_json = Some(json_path);
        }

        if let Some(identity) = &result.identity {
            let path = folder.join("personal-info.json");
            write_file(&path, &identity_to_json(identity)?)?;
            files.identity_json = Some(path);
        }

        info!("Exported to {}", folder.display());
        Ok(Some(files))
    }
}

/// `{yyyy-mm-dd}_{hh-mm-ss}_{name}` in local time.
pub fn folder_name(now: &DateTime<Local>, name: Option<&str>, default_name: &str) -> String {
    let name = name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(default_name);
    format!("{}_{}", now.format("%Y-%m-%d_%H-%M-%S"), sanitize(name))
}

/// `medical-data-{iso timestamp}` with `:` and `.` replaced so the name is
/// valid on every filesystem.
pub fn data_file_stem(now: &DateTime<Utc>) -> String {
    let timestamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("medical-data-{timestamp}")
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use medcap_core::models::{IdentityInfo, Record};
    use medcap_core::Mode;

    fn local() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 5, 31, 14, 3, 9).unwrap()
    }

    fn identity(name: Option<&str>) -> IdentityInfo {
        IdentityInfo {
            id_number: Some("A12***789".into()),
            name: name.map(String::from),
            birth_date: None,
            birth_date_ad: None,
            gender: None,
            extracted_at: Utc.with_ymd_and_hms(2025, 5, 31, 6, 3, 9).unwrap(),
            source: "健保醫療資訊雲端查詢系統".into(),
        }
    }

    #[test]
    fn test_folder_name() {
        assert_eq!(folder_name(&local(), Some("王小明"), "醫療資料"), "2025-05-31_14-03-09_王小明");
        assert_eq!(folder_name(&local(), None, "醫療資料"), "2025-05-31_14-03-09_醫療資料");
        assert_eq!(folder_name(&local(), Some("  "), "醫療資料"), "2025-05-31_14-03-09_醫療資料");
        assert_eq!(folder_name(&local(), Some("a/b"), "x"), "2025-05-31_14-03-09_a_b");
    }

    #[test]
    fn test_data_file_stem() {
        let now = Utc.with_ymd_and_hms(2025, 5, 31, 6, 3, 9).unwrap();
        assert_eq!(data_file_stem(&now), "medical-data-2025-05-31T06-03-09-000Z");
    }

    #[test]
    fn test_write_records_and_identity() {
        let dir = tempfile::tempdir().unwrap();
        let record: Record = [("就醫日期", "2025/05/31")].into_iter().collect();
        let result = ExtractionResult::completed(
            Mode::Generic,
            Some(vec![record].into()),
            Some(identity(Some("王小明"))),
        );

        let files = ExportSink::new(dir.path(), ExportConfig::default())
            .write_at(&result, local())
            .unwrap()
            .unwrap();

        assert_eq!(files.folder, dir.path().join("2025-05-31_14-03-09_王小明"));
        let csv = fs::read_to_string(files.csv.unwrap()).unwrap();
        assert_eq!(csv, "就醫日期\n\"2025/05/31\"");
        assert!(files.records_json.unwrap().exists());
        let personal = fs::read_to_string(files.identity_json.unwrap()).unwrap();
        assert!(personal.contains("\"idNumber\": \"A12***789\""));
    }

    #[test]
    fn test_identity_only() {
        let dir = tempfile::tempdir().unwrap();
        let result = ExtractionResult::completed(Mode::Generic, None, Some(identity(None)));

        let files = ExportSink::new(dir.path(), ExportConfig::default())
            .write_at(&result, local())
            .unwrap()
            .unwrap();

        assert!(files.csv.is_none());
        assert!(files.folder.ends_with("2025-05-31_14-03-09_醫療資料"));
        assert!(files.identity_json.unwrap().exists());
    }

    #[test]
    fn test_nothing_to_write() {
        let dir = tempfile::tempdir().unwrap();
        let result = ExtractionResult::completed(Mode::Generic, Some(Default::default()), None);
        let files = ExportSink::new(dir.path(), ExportConfig::default())
            .write_at(&result, local())
            .unwrap();
        assert!(files.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

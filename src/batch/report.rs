use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Converted { exports: usize, written: bool },
    NoExports,
    NotFound,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub object_name: String,
    #[serde(flatten)]
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub dry_run: bool,
    pub strategy: String,
    pub files: Vec<FileReport>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub converted: usize,
    pub no_exports: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.files.len(),
            ..BatchSummary::default()
        };

        for file in &self.files {
            match file.status {
                FileStatus::Converted { .. } => summary.converted += 1,
                FileStatus::NoExports => summary.no_exports += 1,
                FileStatus::NotFound => summary.not_found += 1,
                FileStatus::Failed { .. } => summary.failed += 1,
            }
        }

        summary
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Failed { .. } | FileStatus::NotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: FileStatus) -> FileReport {
        FileReport {
            path: "services/a.js".to_string(),
            object_name: "aService".to_string(),
            status,
            methods: Vec::new(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let batch = BatchReport {
            started_at: Utc::now(),
            duration: Duration::from_millis(3),
            dry_run: false,
            strategy: "heuristic".to_string(),
            files: vec![
                report(FileStatus::Converted { exports: 3, written: true }),
                report(FileStatus::NoExports),
                report(FileStatus::NotFound),
                report(FileStatus::Failed { message: "denied".to_string() }),
                report(FileStatus::Converted { exports: 1, written: true }),
            ],
        };

        let summary = batch.summary();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.converted, 2);
        assert_eq!(summary.no_exports, 1);
        assert_eq!(summary.not_found, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(batch.failures().count(), 2);
    }

    #[test]
    fn test_file_report_json_shape() {
        let mut file = report(FileStatus::Converted { exports: 2, written: false });
        file.methods = vec!["list".to_string(), "get".to_string()];

        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["status"], "converted");
        assert_eq!(json["exports"], 2);
        assert_eq!(json["written"], false);
        assert_eq!(json["methods"][1], "get");

        let json = serde_json::to_value(report(FileStatus::NotFound)).unwrap();
        assert_eq!(json["status"], "not_found");
        assert!(json.get("methods").is_none());
    }
}

//! Downloadable text report

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};

pub const REPORT_MIME_TYPE: &str = "text/plain";

/// `normcontrol_report_<YYYY-MM-DD>.txt`
pub fn report_filename(date: NaiveDate) -> String {
    format!("normcontrol_report_{}.txt", date.format("%Y-%m-%d"))
}

/// Current UTC date, the same day an ISO timestamp would carry
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Report text packaged for saving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub filename: String,
    pub contents: String,
}

impl ReportFile {
    pub fn new(date: NaiveDate, contents: String) -> Self {
        Self {
            filename: report_filename(date),
            contents,
        }
    }

    /// Write the report into `dir`, returning the full path
    pub fn save_to_dir(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, self.contents.as_bytes())?;
        Ok(path)
    }
}

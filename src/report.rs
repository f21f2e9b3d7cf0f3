//! Collects status lines into labeled sections and writes report files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::Error;

const INDENT: &str = "  ";

/// How many formatted frequency-list lines the statistics sections carry.
const FREQUENCY_LIST_LENGTH: usize = 10;

/// Accumulates report text in five sections: arguments, errors, misc, file
/// statistics and display statistics. The display section is rebuilt on
/// every layout pass; the others only grow.
#[derive(Debug, Default)]
pub struct ReportMaker {
    args: Vec<String>,
    errors: Vec<String>,
    misc: Vec<String>,
    file_stats: Vec<String>,
    display_stats: Vec<String>,
}

impl ReportMaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_args(&mut self, line: impl Into<String>) {
        self.args.push(line.into());
    }

    pub fn push_error(&mut self, line: impl Into<String>) {
        self.errors.push(line.into());
    }

    pub fn push_misc(&mut self, line: impl Into<String>) {
        self.misc.push(line.into());
    }

    pub fn push_file_stats(&mut self, line: impl Into<String>) {
        self.file_stats.push(line.into());
    }

    pub fn push_display_stats(&mut self, line: impl Into<String>) {
        self.display_stats.push(line.into());
    }

    pub fn clear_display_stats(&mut self) {
        self.display_stats.clear();
    }

    pub fn frequency_list_length(&self) -> usize {
        FREQUENCY_LIST_LENGTH
    }

    /// Full report body: every section, lines indented.
    pub fn text(&self) -> String {
        let sections = [
            &self.args,
            &self.errors,
            &self.misc,
            &self.file_stats,
            &self.display_stats,
        ];

        let mut out = String::new();
        for section in sections {
            for line in section.iter() {
                out.push_str(INDENT);
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    /// Just the error section, empty string when there were no errors.
    pub fn error_text(&self) -> String {
        let mut out = String::new();
        for line in &self.errors {
            out.push_str(INDENT);
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Writes the report to `report.txt` inside `dir`, falling back to
    /// `report-1.txt`, `report-2.txt`, ... when earlier names are taken.
    /// Returns the path written.
    pub fn make(&self, dir: &Path) -> Result<PathBuf, Error> {
        let path = next_available_path(dir, "report", "txt");
        fs::write(&path, self.text()).map_err(|e| Error::io(&path, e))?;
        Ok(path)
    }
}

/// First of `base.ext`, `base-1.ext`, `base-2.ext`, ... that does not exist
/// in `dir` yet.
pub fn next_available_path(dir: &Path, base: &str, ext: &str) -> PathBuf {
    let mut path = dir.join(format!("{base}.{ext}"));
    let mut number = 0u64;
    while path.exists() {
        number += 1;
        path = dir.join(format!("{base}-{number}.{ext}"));
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_appear_in_order() {
        let mut report = ReportMaker::new();
        report.push_args("arg line");
        report.push_misc("misc line");
        report.push_file_stats("file line");
        report.push_display_stats("display line");

        let text = report.text();
        let arg_pos = text.find("arg line").unwrap();
        let misc_pos = text.find("misc line").unwrap();
        let file_pos = text.find("file line").unwrap();
        let display_pos = text.find("display line").unwrap();

        assert!(arg_pos < misc_pos);
        assert!(misc_pos < file_pos);
        assert!(file_pos < display_pos);
    }

    #[test]
    fn lines_are_indented() {
        let mut report = ReportMaker::new();
        report.push_misc("hello");
        assert!(report.text().contains("  hello\n"));
    }

    #[test]
    fn display_stats_can_be_rebuilt() {
        let mut report = ReportMaker::new();
        report.push_display_stats("old pass");
        report.clear_display_stats();
        report.push_display_stats("new pass");

        let text = report.text();
        assert!(!text.contains("old pass"));
        assert!(text.contains("new pass"));
    }

    #[test]
    fn error_text_is_empty_without_errors() {
        let report = ReportMaker::new();
        assert!(report.error_text().is_empty());
    }

    #[test]
    fn report_files_are_numbered_when_taken() {
        let dir = tempfile::tempdir().unwrap();
        let report = ReportMaker::new();

        let first = report.make(dir.path()).unwrap();
        let second = report.make(dir.path()).unwrap();
        let third = report.make(dir.path()).unwrap();

        assert_eq!(first.file_name().unwrap(), "report.txt");
        assert_eq!(second.file_name().unwrap(), "report-1.txt");
        assert_eq!(third.file_name().unwrap(), "report-2.txt");
    }
}

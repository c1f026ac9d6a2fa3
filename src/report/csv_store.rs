// CSV result files for bulk runs

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::crawl::SiteReport;
use crate::errors::{HarvestError, Result};

pub const CSV_HEADER: [&str; 5] = ["URL", "Contact Page", "Emails", "Phones", "Error"];

/// Separator for multi-valued cells
const LIST_SEPARATOR: &str = ", ";

/// Directory of downloadable result files
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write reports to a new `results_<timestamp>.csv` and return its file name.
    pub fn write(&self, reports: &[SiteReport]) -> Result<String> {
        fs::create_dir_all(&self.dir)?;

        let stem = format!("results_{}", Local::now().format("%Y%m%d_%H%M%S"));
        let (filename, file) = self.create_unique(&stem)?;

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(CSV_HEADER)?;
        for report in reports {
            let emails = report.emails.join(LIST_SEPARATOR);
            let phones = report.phones.join(LIST_SEPARATOR);
            writer.write_record([
                report.url.as_str(),
                report.contact_page.as_deref().unwrap_or(""),
                emails.as_str(),
                phones.as_str(),
                report.error.as_deref().unwrap_or(""),
            ])?;
        }
        writer.flush()?;

        tracing::info!(file = %filename, rows = reports.len(), "Wrote results");
        Ok(filename)
    }

    /// `stem.csv`, or `stem_N.csv` when runs land in the same second.
    fn create_unique(&self, stem: &str) -> Result<(String, File)> {
        for attempt in 0..1000u32 {
            let filename = if attempt == 0 {
                format!("{stem}.csv")
            } else {
                format!("{stem}_{attempt}.csv")
            };
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.dir.join(&filename))
            {
                Ok(file) => return Ok((filename, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(HarvestError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free result file name for {stem}"),
        )))
    }

    /// Path of a stored result file. `None` for names that could escape
    /// the results directory or that do not exist.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return None;
        }
        let path = self.dir.join(filename);
        path.is_file().then_some(path)
    }
}

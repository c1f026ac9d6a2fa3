// Uploaded URL lists

use crate::errors::{HarvestError, Result};

/// Only files named `*.csv` are accepted.
pub fn check_upload_name(filename: Option<&str>) -> Result<()> {
    match filename {
        Some(name) if name.to_ascii_lowercase().ends_with(".csv") => Ok(()),
        _ => Err(HarvestError::UnsupportedUpload(
            "Only CSV files supported.".to_string(),
        )),
    }
}

/// URLs from the first column of a header-less CSV. Rows may differ in
/// width; blank cells are skipped.
pub fn read_url_column(bytes: &[u8]) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(first) = record.get(0) {
            if !first.is_empty() {
                urls.push(first.to_string());
            }
        }
    }

    if urls.is_empty() {
        return Err(HarvestError::Upload("No URLs found in the first column".to_string()));
    }
    Ok(urls)
}

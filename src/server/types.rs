// Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};

/// Query string for GET /extract
#[derive(Debug, Deserialize)]
pub struct ExtractQuery {
    pub url: String,
}

/// Body for POST /extract/bulk
#[derive(Debug, Serialize, Deserialize)]
pub struct BulkRequest {
    pub urls: Vec<String>,
}

/// Where to download the CSV produced by a bulk run
#[derive(Debug, Serialize, Deserialize)]
pub struct BulkResponse {
    pub csv_url: String,
}

impl BulkResponse {
    pub fn for_file(filename: &str) -> Self {
        Self {
            csv_url: format!("/download/{filename}"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// Bulk result files and uploaded URL lists

mod csv_store;
mod upload;

pub use csv_store::{ResultStore, CSV_HEADER};
pub use upload::{check_upload_name, read_url_column};

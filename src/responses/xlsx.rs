// responses/xlsx.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Serves a finished workbook as a download named `filename`.
pub fn xlsx_download(workbook: Vec<u8>, filename: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", XLSX_MIME)
        .header("Content-Length", workbook.len())
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        )
        // selections change between requests
        .header("Cache-Control", "no-store")
        .body(Body::from(workbook))
        .map_err(|_| ServerError::InternalError)
}

use crate::domain::ComparisonSeries;
use crate::errors::ServerError;
use crate::responses::xlsx_download;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Chart, ChartType, Workbook};

const SHEET_NAME: &str = "Comparacion";

pub fn export_comparison_xlsx(series: &ComparisonSeries, city: &str) -> ResultResp {
    let buffer = comparison_workbook(series)?;
    xlsx_download(buffer, &export_filename(city))
}

/// Two columns (label, price) plus a column chart when there is data.
pub fn comparison_workbook(series: &ComparisonSeries) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| ServerError::XlsxError(format!("Failed to name worksheet: {}", e)))?;

    // Headers
    for (col, header) in ["Propiedad", "Precio"].iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    // Rows
    for (i, point) in series.points().iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_string(r, 0, &point.label)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write label: {}", e)))?;

        worksheet
            .write_number(r, 1, point.value)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write price: {}", e)))?;
    }

    if !series.is_empty() {
        let last = series.len() as u32;
        let mut chart = Chart::new(ChartType::Column);
        chart
            .add_series()
            .set_categories((SHEET_NAME, 1, 0, last, 0))
            .set_values((SHEET_NAME, 1, 1, last, 1));
        chart.title().set_name("Comparación de Precios de Propiedades");

        worksheet
            .insert_chart(1, 3, &chart)
            .map_err(|e| ServerError::XlsxError(format!("Failed to insert chart: {}", e)))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}

/// "Ciudad de Guatemala" -> "comparacion_ciudad_de_guatemala.xlsx"
pub fn export_filename(city: &str) -> String {
    let slug: String = city
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let slug = slug.trim_matches('_');

    if slug.is_empty() {
        "comparacion.xlsx".to_string()
    } else {
        format!("comparacion_{slug}.xlsx")
    }
}

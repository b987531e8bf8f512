use crate::domain::{ResultSet, Schema, TIMESTAMP_FORMAT};
use crate::spreadsheets::ExportError;
use rust_xlsxwriter::Workbook;
use std::path::Path;

pub fn write_listings_xlsx(results: &ResultSet, path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in results.schema.headers().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write header '{}': {}", header, e)))?;
    }

    for (i, record) in results.records.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_string(r, 0, &record.title)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write title: {}", e)))?;

        worksheet
            .write_number(r, 1, record.price)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write price: {}", e)))?;

        worksheet
            .write_string(r, 2, &record.link)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write link: {}", e)))?;

        if results.schema == Schema::Timestamped {
            let stamp = record
                .queried_at
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default();
            worksheet
                .write_string(r, 3, &stamp)
                .map_err(|e| ExportError::Xlsx(format!("Failed to write fecha_consulta: {}", e)))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| ExportError::Xlsx(format!("Failed to save workbook: {}", e)))?;

    Ok(())
}

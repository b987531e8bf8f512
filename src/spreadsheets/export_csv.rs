use crate::domain::{ListingRecord, ResultSet, Schema, TIMESTAMP_FORMAT, TIMESTAMP_PARSE_FORMAT};
use crate::spreadsheets::ExportError;
use chrono::NaiveDateTime;
use std::path::Path;

pub fn write_listings_csv(results: &ResultSet, path: &Path) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(results.schema.headers())?;

    for record in &results.records {
        let price = format_price(record.price);
        let stamp = match results.schema {
            Schema::Basic => None,
            Schema::Timestamped => Some(
                record
                    .queried_at
                    .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                    .unwrap_or_default(),
            ),
        };

        let mut row = vec![record.title.as_str(), price.as_str(), record.link.as_str()];
        if let Some(stamp) = &stamp {
            row.push(stamp.as_str());
        }

        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn read_listings_csv(path: &Path) -> Result<ResultSet, ExportError> {
    let mut rdr = csv::Reader::from_path(path)?;

    let headers = rdr.headers()?.clone();
    let header_names: Vec<&str> = headers.iter().collect();
    let schema = Schema::from_headers(&header_names)
        .ok_or_else(|| ExportError::Schema(header_names.join(",")))?;

    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        let line = i + 2;

        let price = row[1]
            .parse::<f64>()
            .map_err(|e| ExportError::Row { line, reason: format!("price `{}`: {e}", &row[1]) })?;

        let queried_at = match schema {
            Schema::Basic => None,
            Schema::Timestamped => Some(
                NaiveDateTime::parse_from_str(&row[3], TIMESTAMP_PARSE_FORMAT).map_err(|e| {
                    ExportError::Row { line, reason: format!("fecha_consulta `{}`: {e}", &row[3]) }
                })?,
            ),
        };

        records.push(ListingRecord {
            title: row[0].to_string(),
            price,
            link: row[2].to_string(),
            queried_at,
        });
    }

    Ok(ResultSet { schema, records })
}

/// Whole prices keep one decimal (`1234.0`) so the column always reads as a float.
fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.1}")
    } else {
        price.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::format_price;

    #[test]
    fn prices_always_read_as_floats() {
        assert_eq!(format_price(1234.0), "1234.0");
        assert_eq!(format_price(999.5), "999.5");
    }
}

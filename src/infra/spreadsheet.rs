//! Xlsx codec for the plant collection.
//!
//! Reading produces positional [`SourceRow`]s for the import engine; cell
//! typing is resolved here so the engine never sees calamine types. Writing
//! renders the collection in the fixed ID / Name / Location / Humidity
//! layout the import reads back.

use std::io::Cursor;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;

use crate::domain::plant::Plant;
use crate::domain::sync::{Cell, SourceRow};

pub const SHEET_NAME: &str = "GardenData";
pub const HEADERS: [&str; 4] = ["ID", "Name", "Location", "Humidity"];

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        // Error cells, datetimes, durations: nothing the plant schema wants.
        _ => Cell::Empty,
    }
}

/// Reads the first sheet of an xlsx file, skipping the header row.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<SourceRow>> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).context("failed to open xlsx workbook")?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("workbook has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet: {}", sheet_name))?;

    let rows = range
        .rows()
        .skip(1)
        .map(|row| SourceRow {
            id: row.first().map(to_cell).unwrap_or_default(),
            name: row.get(1).map(to_cell).unwrap_or_default(),
            location: row.get(2).map(to_cell).unwrap_or_default(),
            humidity: row.get(3).map(to_cell).unwrap_or_default(),
        })
        .collect();

    Ok(rows)
}

/// Renders the collection as an xlsx workbook, returned as raw bytes.
pub fn write_workbook(plants: &[Plant]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write(0, col as u16, *header)?;
    }

    for (i, plant) in plants.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write(row, 0, plant.id)?;
        worksheet.write(row, 1, plant.name.as_str())?;
        worksheet.write(row, 2, plant.location.as_str())?;
        worksheet.write(row, 3, plant.required_humidity)?;
    }

    let bytes = workbook.save_to_buffer()?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn exported_workbook_reads_back_as_rows() {
        let plants = vec![Plant {
            id: 1,
            name: "Rose".to_string(),
            location: "Yard".to_string(),
            required_humidity: 40,
            last_watered: Utc::now(),
        }];

        let bytes = write_workbook(&plants).unwrap();
        let rows = read_rows(&bytes).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id.as_int(), Some(1));
        assert_eq!(rows[0].name.as_text().as_deref(), Some("Rose"));
        assert_eq!(rows[0].location.as_text().as_deref(), Some("Yard"));
        assert_eq!(rows[0].humidity.as_int(), Some(40));
    }

    #[test]
    fn header_only_workbook_yields_no_rows() {
        let bytes = write_workbook(&[]).unwrap();
        let rows = read_rows(&bytes).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn garbage_bytes_are_an_error_not_a_panic() {
        assert!(read_rows(b"definitely not a zip archive").is_err());
    }
}

//! Single-sheet `.xlsx` export, one row per image.

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{AdminLevel, EnrichedRecord};

const EXTENSION: &str = "xlsx";
const SHEET_NAME: &str = "bilder";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

/// Header plus rows. `None` cells are left empty in the sheet.
#[derive(Debug, Clone, Default)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<Cell>>>,
}

impl SheetTable {
    /// Columns: thumbnail, title, the three fixed admin levels, as many
    /// `locality_N` columns as the widest record needs, `place_N` columns for
    /// token-set records (no positional slots), then north/east.
    pub fn from_records(records: &[EnrichedRecord]) -> Self {
        let locality_columns = records
            .iter()
            .map(|r| r.geography.localities.len())
            .max()
            .unwrap_or(0);
        let place_columns = records
            .iter()
            .filter(|r| !r.geography.has_positional())
            .map(|r| r.geography.tokens.len())
            .max()
            .unwrap_or(0);

        let mut headers = vec!["thumbnail_url".to_string(), "title".to_string()];
        headers.extend(AdminLevel::fixed().iter().map(|l| l.field_name().to_string()));
        headers.extend((1..=locality_columns).map(|n| format!("locality_{}", n)));
        headers.extend((1..=place_columns).map(|n| format!("place_{}", n)));
        headers.push("north".to_string());
        headers.push("east".to_string());

        let rows = records
            .iter()
            .map(|record| {
                let text = |value: Option<&str>| value.map(|v| Cell::Text(v.to_string()));

                let mut row = vec![
                    text(record.image.thumbnail_url.as_deref()),
                    text(record.image.title.as_deref()),
                ];
                row.extend(
                    AdminLevel::fixed()
                        .iter()
                        .map(|l| text(record.geography.get(*l))),
                );
                row.extend((1..=locality_columns).map(|n| text(record.geography.locality(n))));

                let places: &[String] = if record.geography.has_positional() {
                    &[]
                } else {
                    &record.geography.tokens
                };
                row.extend((0..place_columns).map(|i| text(places.get(i).map(String::as_str))));
                row.push(record.coordinate.north().map(Cell::Number));
                row.push(record.coordinate.east().map(Cell::Number));
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column(column)?;
        self.rows.get(row)?.get(col)?.as_ref()
    }
}

/// Append `.xlsx` unless the path already ends with it.
pub fn normalize_spreadsheet_path(path: &Path) -> PathBuf {
    let has_extension = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(EXTENSION));
    if has_extension {
        return path.to_path_buf();
    }

    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

/// Write `records` to a spreadsheet and return the path actually written.
pub fn write_spreadsheet(records: &[EnrichedRecord], path: &Path) -> Result<PathBuf> {
    let path = normalize_spreadsheet_path(path);
    let table = SheetTable::from_records(records);

    write_table(&table, &path).map_err(|source| Error::Spreadsheet {
        path: path.clone(),
        source,
    })?;

    info!("Wrote {} row(s) to {}", table.rows.len(), path.display());
    Ok(path)
}

fn write_table(table: &SheetTable, path: &Path) -> std::result::Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, header) in table.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
        }

        for (i, row) in table.rows.iter().enumerate() {
            let r = (i + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Some(Cell::Text(value)) => {
                        worksheet.write_string(r, col as u16, value)?;
                    }
                    Some(Cell::Number(value)) => {
                        worksheet.write_number(r, col as u16, *value)?;
                    }
                    None => {}
                }
            }
        }

        worksheet.autofit();
    }

    workbook.save(path)
}

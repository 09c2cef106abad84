//! Writers for the enriched record set.

mod geodatabase;
mod sanitize;
mod spreadsheet;

pub use geodatabase::{
    write_geodatabase, GeodatabaseLayout, GeodatabaseOptions, MainRow, PointRow, PointTable,
    COUNTRY_CATEGORY,
};
pub use sanitize::sanitize_name;
pub use spreadsheet::{normalize_spreadsheet_path, write_spreadsheet, Cell, SheetTable};

//! Geodatabase-style export: a main attribute table plus one point table per
//! place-name category, written as CSV files into one directory.
//!
//! Point tables carry the geometry as `x`/`y` in EPSG:25833 and as WKT so they
//! can be loaded as point layers by GIS tools.

use geo_types::Point;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::GeodatabaseConfig;
use crate::error::{Error, Result};
use crate::models::{record::EPSG, CategoryRegistry, EnrichedRecord};

use super::sanitize_name;

/// Category that receives the fallback point when a record has none
pub use crate::models::record::COUNTRY_CATEGORY;

const MAIN_COLUMNS: &[&str] = &["id", "title", "thumbnail"];
const POINT_COLUMNS: &[&str] = &["id", "x", "y", "srid", "wkt"];

#[derive(Debug, Clone)]
pub struct GeodatabaseOptions {
    pub main_table: String,
    pub point_table_prefix: String,
    pub fallback_country_point: Point<f64>,
}

impl From<&GeodatabaseConfig> for GeodatabaseOptions {
    fn from(config: &GeodatabaseConfig) -> Self {
        let [east, north] = config.fallback_country_point;
        Self {
            main_table: config.main_table.clone(),
            point_table_prefix: config.point_table_prefix.clone(),
            fallback_country_point: Point::new(east, north),
        }
    }
}

impl Default for GeodatabaseOptions {
    fn default() -> Self {
        Self::from(&GeodatabaseConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainRow {
    pub id: usize,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointRow {
    pub id: usize,
    pub point: Point<f64>,
}

#[derive(Debug, Clone)]
pub struct PointTable {
    /// Sanitized table name
    pub name: String,
    pub category: String,
    pub rows: Vec<PointRow>,
}

/// Every table to be written, before touching the filesystem
#[derive(Debug, Clone)]
pub struct GeodatabaseLayout {
    pub main_name: String,
    pub main_rows: Vec<MainRow>,
    pub point_tables: Vec<PointTable>,
}

#[derive(Serialize)]
struct PointCsvRow {
    id: usize,
    x: f64,
    y: f64,
    srid: u32,
    wkt: String,
}

impl GeodatabaseLayout {
    /// One point table per registered category, in registry order.
    pub fn build(
        records: &[EnrichedRecord],
        categories: &CategoryRegistry,
        options: &GeodatabaseOptions,
    ) -> Self {
        let mut used = HashSet::new();
        let main_name = unique_name(sanitize_name(&options.main_table), &mut used);

        let main_rows = records
            .iter()
            .map(|r| MainRow {
                id: r.id,
                title: r.image.title.clone(),
                thumbnail: r.image.thumbnail_url.clone(),
            })
            .collect();

        let point_tables = categories
            .iter()
            .map(|category| {
                let name = unique_name(
                    sanitize_name(&format!("{}_{}", options.point_table_prefix, category)),
                    &mut used,
                );
                let rows = records
                    .iter()
                    .filter_map(|r| {
                        let point = r.category_points.get(category).or_else(|| {
                            (category == COUNTRY_CATEGORY).then_some(options.fallback_country_point)
                        })?;
                        Some(PointRow { id: r.id, point })
                    })
                    .collect();

                PointTable {
                    name,
                    category: category.to_string(),
                    rows,
                }
            })
            .collect();

        Self {
            main_name,
            main_rows,
            point_tables,
        }
    }

    pub fn point_table(&self, category: &str) -> Option<&PointTable> {
        self.point_tables.iter().find(|t| t.category == category)
    }

    /// Write every table into `dir`, creating it if needed. Returns the files written.
    pub fn write(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir).map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(1 + self.point_tables.len());

        let main_path = dir.join(format!("{}.csv", self.main_name));
        write_rows(&main_path, MAIN_COLUMNS, &self.main_rows)?;
        written.push(main_path);

        for table in &self.point_tables {
            let path = dir.join(format!("{}.csv", table.name));
            let rows: Vec<PointCsvRow> = table
                .rows
                .iter()
                .map(|r| PointCsvRow {
                    id: r.id,
                    x: r.point.x(),
                    y: r.point.y(),
                    srid: EPSG,
                    wkt: format!("POINT ({} {})", r.point.x(), r.point.y()),
                })
                .collect();
            write_rows(&path, POINT_COLUMNS, &rows)?;
            debug!(
                "Point table {} ({}): {} row(s)",
                table.name,
                table.category,
                rows.len()
            );
            written.push(path);
        }

        Ok(written)
    }
}

fn unique_name(name: String, used: &mut HashSet<String>) -> String {
    let mut candidate = name.clone();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}_{}", name, n);
        n += 1;
    }
    candidate
}

/// Header is written explicitly so empty tables still carry their schema.
fn write_rows<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<()> {
    let csv_err = |source: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;
    writer.write_record(headers).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Build and write the geodatabase tables for a run.
pub fn write_geodatabase(
    records: &[EnrichedRecord],
    categories: &CategoryRegistry,
    dir: &Path,
    options: &GeodatabaseOptions,
) -> Result<Vec<PathBuf>> {
    let layout = GeodatabaseLayout::build(records, categories, options);
    let written = layout.write(dir)?;

    info!(
        "Wrote main table '{}' ({} rows) and {} point table(s) to {}",
        layout.main_name,
        layout.main_rows.len(),
        layout.point_tables.len(),
        dir.display()
    );
    Ok(written)
}

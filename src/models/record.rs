//! Resolution results and the enriched per-image record.

use geo_types::Point;
use std::collections::HashMap;

use super::{GeographicFields, ImageRecord};

/// Coordinate reference system of every point in this crate (ETRS89 / UTM 33N)
pub const EPSG: u32 = 25833;

/// Column names owned by the image/geography stages. Resolved categories
/// with one of these names are never written over them.
pub const BASE_FIELDS: &[&str] = &[
    "id",
    "title",
    "thumbnail",
    "thumbnail_url",
    "country",
    "county",
    "municipality",
    "north",
    "east",
];

/// Place-name category of the nation itself
pub const COUNTRY_CATEGORY: &str = "Nasjon";

/// True when `name` matches a base field, ignoring ASCII case.
pub fn is_base_field(name: &str) -> bool {
    BASE_FIELDS.iter().any(|f| f.eq_ignore_ascii_case(name))
}

/// Outcome of single-result resolution. `north`/`east` are both present or both absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolvedCoordinate {
    point: Option<Point<f64>>,
}

impl ResolvedCoordinate {
    pub fn found(east: f64, north: f64) -> Self {
        Self {
            point: Some(Point::new(east, north)),
        }
    }

    pub fn miss() -> Self {
        Self { point: None }
    }

    pub fn point(&self) -> Option<Point<f64>> {
        self.point
    }

    pub fn north(&self) -> Option<f64> {
        self.point.map(|p| p.y())
    }

    pub fn east(&self) -> Option<f64> {
        self.point.map(|p| p.x())
    }

    pub fn is_resolved(&self) -> bool {
        self.point.is_some()
    }
}

impl From<Point<f64>> for ResolvedCoordinate {
    fn from(point: Point<f64>) -> Self {
        Self { point: Some(point) }
    }
}

/// Representative points keyed by place-name category (`navneobjekttype`).
///
/// Keeps first-insertion order; writing an existing category replaces its point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPoints {
    entries: Vec<(String, Point<f64>)>,
}

impl CategoryPoints {
    pub fn insert(&mut self, category: impl Into<String>, point: Point<f64>) {
        let category = category.into();
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some(entry) => entry.1 = point,
            None => self.entries.push((category, point)),
        }
    }

    pub fn get(&self, category: &str) -> Option<Point<f64>> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, p)| *p)
    }

    pub fn remove(&mut self, category: &str) -> Option<Point<f64>> {
        let idx = self.entries.iter().position(|(c, _)| c == category)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point<f64>)> {
        self.entries.iter().map(|(c, p)| (c.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What the resolver produced for one record
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// First-hit lookup over the candidate chain
    Single(ResolvedCoordinate),
    /// One lookup per distinct token, grouped by category
    PerCategory(CategoryPoints),
}

/// Place-name categories seen during a run, in first-seen order.
///
/// Each entry becomes a point table on geodatabase export.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    order: Vec<String>,
    index: HashMap<String, usize>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category. Returns `true` the first time it is seen.
    pub fn observe(&mut self, category: &str) -> bool {
        if self.index.contains_key(category) {
            return false;
        }
        self.index.insert(category.to_string(), self.order.len());
        self.order.push(category.to_string());
        true
    }

    pub fn contains(&self, category: &str) -> bool {
        self.index.contains_key(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// One row of output: the image, its parsed geography, and what was resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    /// Position in the run, used as surrogate key across exported tables
    pub id: usize,
    pub image: ImageRecord,
    pub geography: GeographicFields,
    pub coordinate: ResolvedCoordinate,
    pub category_points: CategoryPoints,
}

//! Response shapes of `GET /stedsnavn/v1/sted`.

use geo_types::Point;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceNameResponse {
    #[serde(default)]
    pub metadata: ResponseMetadata,

    #[serde(default)]
    pub navn: Vec<PlaceName>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(rename = "totaltAntallTreff", default)]
    pub total_hits: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceName {
    /// Administrative category, e.g. "Kommune", "Fylke", "Nasjon"
    #[serde(rename = "navneobjekttype")]
    pub object_type: Option<String>,

    #[serde(rename = "stedsnavn", default)]
    pub names: Vec<NameSpelling>,

    #[serde(rename = "representasjonspunkt")]
    pub point: Option<RepresentativePoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameSpelling {
    #[serde(rename = "skrivemåte")]
    pub spelling: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RepresentativePoint {
    #[serde(rename = "nord")]
    pub north: Option<f64>,

    #[serde(rename = "øst")]
    pub east: Option<f64>,

    #[serde(rename = "koordsys")]
    pub epsg: Option<u32>,
}

/// A usable lookup result: a category and a complete point
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceHit {
    pub category: Option<String>,
    pub name: Option<String>,
    pub point: Point<f64>,
}

impl PlaceName {
    /// `None` unless both north and east are present
    pub fn hit(&self) -> Option<PlaceHit> {
        let point = self.point?;
        Some(PlaceHit {
            category: self.object_type.clone(),
            name: self.names.first().map(|n| n.spelling.clone()),
            point: Point::new(point.east?, point.north?),
        })
    }
}

impl PlaceNameResponse {
    /// Usable hits in response order. Empty when the service reports zero hits.
    pub fn hits(&self) -> Vec<PlaceHit> {
        if self.metadata.total_hits == 0 {
            return Vec::new();
        }
        self.navn.iter().filter_map(PlaceName::hit).collect()
    }
}

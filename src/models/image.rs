//! A single image as returned by the catalog.

use serde::{Deserialize, Serialize};

/// One digitized photograph with the metadata the pipeline cares about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Free-text place hierarchy, e.g. "Norge;Trøndelag;Steinkjer"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_geographic: Option<String>,
}

impl ImageRecord {
    pub fn new(
        thumbnail_url: Option<String>,
        title: Option<String>,
        raw_geographic: Option<String>,
    ) -> Self {
        Self {
            thumbnail_url,
            title,
            raw_geographic,
        }
    }
}

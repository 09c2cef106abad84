//! Response shapes of `GET /catalog/v1/items`.
//!
//! Only the fields the pipeline reads are modelled; everything is optional
//! because the catalog omits empty sections rather than sending nulls.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogPage {
    #[serde(rename = "_embedded", default)]
    pub embedded: Embedded,

    #[serde(default)]
    pub page: PageInfo,
}

impl CatalogPage {
    pub fn items(&self) -> &[CatalogItem] {
        &self.embedded.items
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Embedded {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "totalPages", default)]
    pub total_pages: usize,

    #[serde(rename = "totalElements", default)]
    pub total_elements: u64,

    #[serde(default)]
    pub number: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "_links", default)]
    pub links: ItemLinks,

    #[serde(default)]
    pub metadata: ItemMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemLinks {
    pub thumbnail_medium: Option<Link>,

    /// Templated URL with a `{width},{height}` size placeholder
    pub thumbnail_custom: Option<Link>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemMetadata {
    pub title: Option<String>,
    pub geographic: Option<Geographic>,
    pub subject: Option<Subject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Geographic {
    #[serde(rename = "placeString")]
    pub place_string: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Subject {
    #[serde(default)]
    pub geographics: Vec<String>,
}

impl CatalogItem {
    pub fn title(&self) -> Option<&str> {
        self.metadata.title.as_deref()
    }

    pub fn place_string(&self) -> Option<&str> {
        self.metadata
            .geographic
            .as_ref()
            .and_then(|g| g.place_string.as_deref())
    }

    pub fn subject_geographics(&self) -> &[String] {
        self.metadata
            .subject
            .as_ref()
            .map(|s| s.geographics.as_slice())
            .unwrap_or_default()
    }
}

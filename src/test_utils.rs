//! In-memory stand-ins for the catalog and place-name APIs.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::catalog::{
    CatalogApi, CatalogItem, CatalogPage, CatalogQuery, Embedded, Geographic, ItemLinks,
    ItemMetadata, Link, PageInfo, Subject,
};
use crate::error::{Error, Result};
use crate::placenames::{
    PlaceName, PlaceNameApi, PlaceNameResponse, RepresentativePoint, ResponseMetadata,
};

pub fn catalog_item(title: &str, subjects: &[&str], place_string: Option<&str>) -> CatalogItem {
    let id = title.replace(' ', "_");
    CatalogItem {
        links: ItemLinks {
            thumbnail_custom: Some(Link {
                href: format!(
                    "https://www.nb.no/services/image/resolver/URN:NBN:no-nb_digifoto_{}/full/{{width}},{{height}}/0/default.jpg",
                    id
                ),
            }),
            thumbnail_medium: Some(Link {
                href: format!(
                    "https://www.nb.no/services/image/resolver/URN:NBN:no-nb_digifoto_{}/full/0,400/0/default.jpg",
                    id
                ),
            }),
        },
        metadata: ItemMetadata {
            title: Some(title.to_string()),
            geographic: place_string.map(|p| Geographic {
                place_string: Some(p.to_string()),
            }),
            subject: Some(Subject {
                geographics: subjects.iter().map(|s| s.to_string()).collect(),
            }),
        },
    }
}

/// Catalog with `total_pages` generated pages. Every item is located in Steinkjer.
pub struct FakeCatalog {
    total_pages: usize,
    items_per_page: usize,
    honour_size: bool,
    failures: HashMap<usize, u16>,
    custom: HashMap<usize, CatalogPage>,
    calls: RefCell<Vec<(usize, usize)>>,
}

impl FakeCatalog {
    pub fn new(total_pages: usize, items_per_page: usize) -> Self {
        Self {
            total_pages,
            items_per_page,
            honour_size: true,
            failures: HashMap::new(),
            custom: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn fail_on(mut self, page: usize, status: u16) -> Self {
        self.failures.insert(page, status);
        self
    }

    pub fn ignore_size(mut self) -> Self {
        self.honour_size = false;
        self
    }

    pub fn with_page(mut self, page: usize, items: Vec<CatalogItem>) -> Self {
        self.custom.insert(
            page,
            CatalogPage {
                embedded: Embedded { items },
                page: PageInfo {
                    total_pages: self.total_pages,
                    total_elements: 0,
                    number: page,
                },
            },
        );
        self
    }

    pub fn requested_pages(&self) -> Vec<usize> {
        self.calls.borrow().iter().map(|(p, _)| *p).collect()
    }

    pub fn requested_sizes(&self) -> Vec<usize> {
        self.calls.borrow().iter().map(|(_, s)| *s).collect()
    }
}

impl CatalogApi for FakeCatalog {
    async fn search(&self, query: &CatalogQuery<'_>) -> Result<CatalogPage> {
        self.calls.borrow_mut().push((query.page, query.size));

        if let Some(status) = self.failures.get(&query.page) {
            return Err(Error::Status {
                url: format!("fake://catalog?page={}", query.page),
                status: *status,
            });
        }
        if let Some(page) = self.custom.get(&query.page) {
            return Ok(page.clone());
        }

        let count = if self.honour_size {
            query.size.min(self.items_per_page)
        } else {
            self.items_per_page
        };
        let items = (0..count)
            .map(|i| {
                catalog_item(
                    &format!("Bilde {}-{}", query.page, i),
                    &["Norge;Trøndelag;Steinkjer"],
                    Some("Steinkjer"),
                )
            })
            .collect();

        Ok(CatalogPage {
            embedded: Embedded { items },
            page: PageInfo {
                total_pages: self.total_pages,
                total_elements: (self.total_pages * self.items_per_page) as u64,
                number: query.page,
            },
        })
    }
}

pub fn place_name(category: &str, east: Option<f64>, north: Option<f64>) -> PlaceName {
    PlaceName {
        object_type: Some(category.to_string()),
        names: Vec::new(),
        point: Some(RepresentativePoint {
            north,
            east,
            epsg: Some(25833),
        }),
    }
}

/// Place-name service answering from a fixed table, recording every query.
#[derive(Default)]
pub struct FakePlaceNames {
    answers: HashMap<String, Vec<PlaceName>>,
    failures: HashMap<String, u16>,
    calls: RefCell<Vec<String>>,
}

impl FakePlaceNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `token` with one hit of `category` at (`east`, `north`)
    pub fn with_hit(self, token: &str, category: &str, east: f64, north: f64) -> Self {
        self.with_names(token, vec![place_name(category, Some(east), Some(north))])
    }

    pub fn with_names(mut self, token: &str, names: Vec<PlaceName>) -> Self {
        self.answers.insert(token.to_string(), names);
        self
    }

    pub fn fail_on(mut self, token: &str, status: u16) -> Self {
        self.failures.insert(token.to_string(), status);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl PlaceNameApi for FakePlaceNames {
    async fn search(&self, text: &str) -> Result<PlaceNameResponse> {
        self.calls.borrow_mut().push(text.to_string());

        if let Some(status) = self.failures.get(text) {
            return Err(Error::Status {
                url: format!("fake://stedsnavn?sok={}", text),
                status: *status,
            });
        }

        let navn = self.answers.get(text).cloned().unwrap_or_default();
        Ok(PlaceNameResponse {
            metadata: ResponseMetadata {
                total_hits: navn.len() as u64,
            },
            navn,
        })
    }
}

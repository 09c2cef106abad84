//! National Library image catalog: API client and paginated fetcher.

mod client;
mod fetcher;
mod types;

pub use client::{CatalogApi, CatalogQuery, NbCatalogClient};
pub use fetcher::{CatalogFetcher, CatalogPager, FetchLimit, FetchReport, GeoSource, ThumbnailKind};
pub use types::{CatalogItem, CatalogPage, Embedded, Geographic, ItemLinks, ItemMetadata, Link, PageInfo, Subject};

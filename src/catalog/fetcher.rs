//! Paginated image fetching with result/page caps and partial-result semantics.

use tracing::{debug, info, warn};

use crate::config::CatalogConfig;
use crate::error::Error;
use crate::models::ImageRecord;

use super::{CatalogApi, CatalogItem, CatalogQuery};

const SIZE_PLACEHOLDER: &str = "{width},{height}";

/// How far to page through a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchLimit {
    /// Stop once this many images with geography have been collected
    MaxResults(usize),
    /// Request at most this many pages
    MaxPages(usize),
    Unbounded,
}

/// Which metadata field becomes the raw geographic string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoSource {
    /// First entry of `subject.geographics`
    SubjectFirst,
    /// `geographic.placeString` followed by every `subject.geographics` entry, `;`-joined
    Merged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailKind {
    /// `thumbnail_custom`, size placeholder replaced with `full`
    Custom,
    Medium,
}

/// Everything a search produced. `error` is set when pagination was cut short.
#[derive(Debug)]
pub struct FetchReport {
    pub records: Vec<ImageRecord>,
    pub pages_fetched: usize,
    pub total_pages: Option<usize>,
    pub error: Option<Error>,
}

impl FetchReport {
    pub fn is_truncated(&self) -> bool {
        self.error.is_some()
    }
}

pub struct CatalogFetcher<C> {
    api: C,
    page_size: usize,
    first_page: usize,
    source: GeoSource,
    thumbnail: ThumbnailKind,
}

impl<C: CatalogApi> CatalogFetcher<C> {
    pub fn new(api: C, config: &CatalogConfig, source: GeoSource, thumbnail: ThumbnailKind) -> Self {
        Self {
            api,
            page_size: config.page_size.max(1),
            first_page: config.first_page,
            source,
            thumbnail,
        }
    }

    pub fn api(&self) -> &C {
        &self.api
    }

    /// Lazily page through `query`, one request per [`CatalogPager::next_page`] call.
    pub fn pages<'a>(&'a self, query: &'a str, limit: FetchLimit) -> CatalogPager<'a, C> {
        CatalogPager {
            fetcher: self,
            query,
            limit,
            page: self.first_page,
            pages_fetched: 0,
            collected: 0,
            total_pages: None,
            error: None,
            done: false,
        }
    }

    /// Collect every page for `query`. A failed page ends pagination but keeps
    /// what was fetched before it.
    pub async fn fetch_images(&self, query: &str, limit: FetchLimit) -> FetchReport {
        let mut pager = self.pages(query, limit);
        let mut records = Vec::new();

        while let Some(batch) = pager.next_page().await {
            records.extend(batch);
        }

        info!(
            "Fetched {} images with geographic metadata from {} page(s)",
            records.len(),
            pager.pages_fetched
        );

        FetchReport {
            records,
            pages_fetched: pager.pages_fetched,
            total_pages: pager.total_pages,
            error: pager.error,
        }
    }

    /// Turn a catalog item into a record, or `None` when it has no geography.
    pub fn extract(&self, item: &CatalogItem) -> Option<ImageRecord> {
        let raw_geographic = match self.source {
            GeoSource::SubjectFirst => item.subject_geographics().first().cloned(),
            GeoSource::Merged => merge_geographics(item),
        }
        .filter(|g| !g.trim().is_empty())?;

        let thumbnail_url = match self.thumbnail {
            ThumbnailKind::Custom => item
                .links
                .thumbnail_custom
                .as_ref()
                .map(|l| l.href.replace(SIZE_PLACEHOLDER, "full")),
            ThumbnailKind::Medium => item.links.thumbnail_medium.as_ref().map(|l| l.href.clone()),
        };

        Some(ImageRecord::new(
            thumbnail_url,
            item.title().map(str::to_string),
            Some(raw_geographic),
        ))
    }
}

fn merge_geographics(item: &CatalogItem) -> Option<String> {
    let parts: Vec<&str> = item
        .place_string()
        .into_iter()
        .chain(item.subject_geographics().iter().map(String::as_str))
        .filter(|p| !p.trim().is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(";"))
    }
}

/// Page cursor over one search. Yields `None` once exhausted or after a failure.
pub struct CatalogPager<'a, C> {
    fetcher: &'a CatalogFetcher<C>,
    query: &'a str,
    limit: FetchLimit,
    page: usize,
    pages_fetched: usize,
    collected: usize,
    total_pages: Option<usize>,
    error: Option<Error>,
    done: bool,
}

impl<C: CatalogApi> CatalogPager<'_, C> {
    pub async fn next_page(&mut self) -> Option<Vec<ImageRecord>> {
        if self.done {
            return None;
        }

        let size = match self.limit {
            FetchLimit::MaxResults(max) => {
                let remaining = max.saturating_sub(self.collected);
                if remaining == 0 {
                    self.done = true;
                    return None;
                }
                self.fetcher.page_size.min(remaining)
            }
            FetchLimit::MaxPages(max) => {
                if self.pages_fetched >= max {
                    self.done = true;
                    return None;
                }
                self.fetcher.page_size
            }
            FetchLimit::Unbounded => self.fetcher.page_size,
        };

        let query = CatalogQuery {
            text: self.query,
            page: self.page,
            size,
        };

        let page = match self.fetcher.api.search(&query).await {
            Ok(page) => page,
            Err(e) => {
                warn!(
                    "Catalog page {} failed, keeping {} image(s) fetched so far: {}",
                    self.page, self.collected, e
                );
                self.error = Some(e);
                self.done = true;
                return None;
            }
        };

        self.pages_fetched += 1;
        self.total_pages = Some(page.page.total_pages);

        let mut records = Vec::new();
        for item in page.items() {
            if let FetchLimit::MaxResults(max) = self.limit {
                if self.collected >= max {
                    break;
                }
            }
            if let Some(record) = self.fetcher.extract(item) {
                records.push(record);
                self.collected += 1;
            }
        }

        debug!(
            "Catalog page {}/{}: {} item(s), {} with geography",
            self.page + 1,
            page.page.total_pages,
            page.items().len(),
            records.len()
        );

        if page.items().is_empty() || self.page + 1 >= page.page.total_pages {
            self.done = true;
        } else {
            self.page += 1;
        }

        Some(records)
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// The failure that ended pagination, if any
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }
}

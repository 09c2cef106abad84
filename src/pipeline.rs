//! Programmatic entry point: fetch → parse → resolve → assemble.
//!
//! Stages run strictly one after another and every request is awaited before
//! the next is issued.

use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::assemble::assemble;
use crate::catalog::{CatalogApi, CatalogFetcher, FetchLimit, GeoSource, NbCatalogClient, ThumbnailKind};
use crate::config::{Config, ParserConfig};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::models::record::COUNTRY_CATEGORY;
use crate::models::{CategoryRegistry, EnrichedRecord, Resolution};
use crate::parser::{GeographicParser, ParsePolicy};
use crate::placenames::{GeonorgeClient, PlaceNameApi, PlaceResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// One coordinate per record from the first candidate with a hit
    FirstHit,
    /// One lookup per distinct token, points keyed by category
    PerToken,
}

/// How each stage interprets the catalog data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub source: GeoSource,
    pub thumbnail: ThumbnailKind,
    pub policy: ParsePolicy,
    pub split_on_whitespace: bool,
    pub drop_placeholders: bool,
    pub resolve_mode: ResolveMode,
    /// Register the nation category up front so its fallback point is always exported
    pub country_fallback: bool,
}

impl PipelineOptions {
    /// Flat table: first subject geography, positional parse, one coordinate per image.
    pub fn spreadsheet() -> Self {
        Self {
            source: GeoSource::SubjectFirst,
            thumbnail: ThumbnailKind::Custom,
            policy: ParsePolicy::Positional,
            split_on_whitespace: true,
            drop_placeholders: false,
            resolve_mode: ResolveMode::FirstHit,
            country_fallback: false,
        }
    }

    /// Point tables: merged geography, token set without placeholders, every token resolved.
    pub fn geodatabase() -> Self {
        Self {
            source: GeoSource::Merged,
            thumbnail: ThumbnailKind::Medium,
            policy: ParsePolicy::TokenSet,
            split_on_whitespace: true,
            drop_placeholders: true,
            resolve_mode: ResolveMode::PerToken,
            country_fallback: true,
        }
    }

    /// Override the preset with whatever the parser config sets explicitly.
    pub fn with_parser_config(mut self, config: &ParserConfig) -> Self {
        if let Some(policy) = config.policy {
            self.policy = policy;
        }
        if let Some(drop) = config.drop_placeholders {
            self.drop_placeholders = drop;
        }
        self.split_on_whitespace = config.split_on_whitespace;
        self
    }

    pub fn parser(&self) -> GeographicParser {
        GeographicParser::new(self.policy)
            .split_on_whitespace(self.split_on_whitespace)
            .drop_placeholders(self.drop_placeholders)
    }
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub limit: FetchLimit,
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub records: Vec<EnrichedRecord>,
    /// Categories seen during per-token resolution, in first-seen order
    pub categories: CategoryRegistry,
    pub pages_fetched: usize,
    /// Set when catalog pagination stopped on an error
    pub fetch_error: Option<Error>,
}

impl PipelineOutput {
    pub fn resolved_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.coordinate.is_resolved() || !r.category_points.is_empty())
            .count()
    }
}

pub struct Pipeline<C, P> {
    fetcher: CatalogFetcher<C>,
    parser: GeographicParser,
    resolver: PlaceResolver<P>,
    resolve_mode: ResolveMode,
    country_fallback: bool,
}

impl Pipeline<NbCatalogClient, GeonorgeClient> {
    /// Pipeline against the live catalog and place-name services.
    pub fn from_config(config: &Config, options: &PipelineOptions) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::new(&config.http)?;
        let catalog = NbCatalogClient::new(http.clone(), &config.catalog);
        let placenames = GeonorgeClient::new(http, &config.placenames);
        Ok(Self::new(catalog, placenames, config, options))
    }
}

impl<C: CatalogApi, P: PlaceNameApi> Pipeline<C, P> {
    pub fn new(catalog: C, placenames: P, config: &Config, options: &PipelineOptions) -> Self {
        Self {
            fetcher: CatalogFetcher::new(catalog, &config.catalog, options.source, options.thumbnail),
            parser: options.parser(),
            resolver: PlaceResolver::new(placenames),
            resolve_mode: options.resolve_mode,
            country_fallback: options.country_fallback,
        }
    }

    pub fn catalog(&self) -> &C {
        self.fetcher.api()
    }

    pub fn placenames(&self) -> &P {
        self.resolver.api()
    }

    pub async fn run(&self, request: &SearchRequest, progress: &ProgressBar) -> PipelineOutput {
        info!("Searching catalog for '{}' ({:?})", request.query, request.limit);
        let report = self.fetcher.fetch_images(&request.query, request.limit).await;
        if let Some(e) = &report.error {
            warn!(
                "Catalog search ended early after {} page(s): {}",
                report.pages_fetched, e
            );
        }

        progress.set_length(report.records.len() as u64);

        let mut categories = CategoryRegistry::new();
        if self.country_fallback && self.resolve_mode == ResolveMode::PerToken {
            categories.observe(COUNTRY_CATEGORY);
        }
        let mut records = Vec::with_capacity(report.records.len());

        for (id, image) in report.records.into_iter().enumerate() {
            let geography = image
                .raw_geographic
                .as_deref()
                .map(|raw| self.parser.parse(raw))
                .unwrap_or_default();

            let resolution = match self.resolve_mode {
                ResolveMode::FirstHit => {
                    Resolution::Single(self.resolver.resolve(&geography.candidates()).await)
                }
                ResolveMode::PerToken => Resolution::PerCategory(
                    self.resolver
                        .resolve_all(&geography.tokens, &mut categories)
                        .await,
                ),
            };

            records.push(assemble(id, image, geography, resolution));
            progress.inc(1);
        }

        let output = PipelineOutput {
            records,
            categories,
            pages_fetched: report.pages_fetched,
            fetch_error: report.error,
        };

        info!(
            "Resolved places for {}/{} image(s), {} categor{}",
            output.resolved_count(),
            output.records.len(),
            output.categories.len(),
            if output.categories.len() == 1 { "y" } else { "ies" }
        );
        output
    }
}

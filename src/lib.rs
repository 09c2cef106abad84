//! Bildested - geographic enrichment of National Library image search results
//!
//! Searches the NB image catalog, parses each image's free-text geography,
//! resolves it to EPSG:25833 points through the Geonorge place-name service
//! and exports the result as a spreadsheet or as geodatabase-style point tables.

pub mod assemble;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod http;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod placenames;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{EnrichedRecord, GeographicFields, ImageRecord, ResolvedCoordinate};
pub use parser::{GeographicParser, ParsePolicy};
pub use pipeline::{Pipeline, PipelineOptions, PipelineOutput, ResolveMode, SearchRequest};

//! Core data models for the image enrichment pipeline.

pub mod admin;
pub mod image;
pub mod record;

pub use admin::{AdminLevel, GeographicFields};
pub use image::ImageRecord;
pub use record::{CategoryPoints, CategoryRegistry, EnrichedRecord, Resolution, ResolvedCoordinate};

//! Geonorge place-name lookup (stedsnavn API) and coordinate resolution.

mod client;
mod resolver;
mod types;

pub use client::{GeonorgeClient, PlaceNameApi};
pub use resolver::{valid_token, PlaceResolver, MAX_TOKEN_LEN};
pub use types::{NameSpelling, PlaceHit, PlaceName, PlaceNameResponse, RepresentativePoint, ResponseMetadata};

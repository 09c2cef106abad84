//! Turns place-name tokens into representative points.
//!
//! Lookups are never cached: the same token appearing on two records is
//! queried twice. Every failure is logged and treated as a miss.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::models::record::is_base_field;
use crate::models::{CategoryPoints, CategoryRegistry, ResolvedCoordinate};

use super::{PlaceHit, PlaceNameApi};

/// Longest search text the place-name service accepts
pub const MAX_TOKEN_LEN: usize = 100;

/// Trim `token` and return it when its length is within 1..=100 characters.
pub fn valid_token(token: &str) -> Option<&str> {
    let trimmed = token.trim();
    let len = trimmed.chars().count();
    (1..=MAX_TOKEN_LEN).contains(&len).then_some(trimmed)
}

pub struct PlaceResolver<A> {
    api: A,
}

impl<A: PlaceNameApi> PlaceResolver<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    async fn lookup(&self, token: &str) -> Vec<PlaceHit> {
        match self.api.search(token).await {
            Ok(response) => response.hits(),
            Err(e) => {
                warn!("Place-name lookup for '{}' failed: {}", token, e);
                Vec::new()
            }
        }
    }

    /// Try `candidates` in order and return the first point found.
    ///
    /// Invalid tokens are skipped without a request; lookup stops at the first hit.
    pub async fn resolve<S: AsRef<str>>(&self, candidates: &[S]) -> ResolvedCoordinate {
        for (i, candidate) in candidates.iter().enumerate() {
            let Some(token) = valid_token(candidate.as_ref()) else {
                debug!("Skipping invalid place-name token {:?}", candidate.as_ref());
                continue;
            };

            if let Some(hit) = self.lookup(token).await.into_iter().next() {
                debug!(
                    "Resolved '{}' (candidate {}/{}) as {} at ({}, {})",
                    token,
                    i + 1,
                    candidates.len(),
                    hit.category.as_deref().unwrap_or("unknown category"),
                    hit.point.x(),
                    hit.point.y()
                );
                return hit.point.into();
            }
        }

        debug!("No place-name hit among {} candidate(s)", candidates.len());
        ResolvedCoordinate::miss()
    }

    /// Look up every distinct valid token and key the hits by category.
    ///
    /// New categories are added to `registry`. When two tokens resolve to the
    /// same category on one record the later one wins.
    pub async fn resolve_all<S: AsRef<str>>(
        &self,
        tokens: &[S],
        registry: &mut CategoryRegistry,
    ) -> CategoryPoints {
        let mut points = CategoryPoints::default();
        let mut seen = HashSet::new();

        for token in tokens {
            let Some(token) = valid_token(token.as_ref()) else {
                debug!("Skipping invalid place-name token {:?}", token.as_ref());
                continue;
            };
            if !seen.insert(token) {
                continue;
            }

            for hit in self.lookup(token).await {
                let Some(category) = hit.category else {
                    warn!("Hit for '{}' has no category, ignoring", token);
                    continue;
                };
                if is_base_field(&category) {
                    debug!("Ignoring '{}' hit: category '{}' is reserved", token, category);
                    continue;
                }

                if registry.observe(&category) {
                    info!("New place-name category '{}' (from '{}')", category, token);
                }
                if let Some(previous) = points.get(&category) {
                    debug!(
                        "'{}' replaces earlier {} point ({}, {})",
                        token,
                        category,
                        previous.x(),
                        previous.y()
                    );
                }
                points.insert(category, hit.point);
            }
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{place_name, FakePlaceNames};
    use geo_types::Point;

    fn steinkjer() -> FakePlaceNames {
        FakePlaceNames::new()
            .with_hit("Steinkjer", "Kommune", 368304.0, 7098745.0)
            .with_hit("Trøndelag", "Fylke", 300000.0, 7000000.0)
            .with_hit("Norge", "Nasjon", 368304.0, 7098745.0)
    }

    #[test]
    fn test_valid_token_bounds() {
        assert_eq!(valid_token("  Steinkjer "), Some("Steinkjer"));
        assert_eq!(valid_token(""), None);
        assert_eq!(valid_token("   "), None);
        assert_eq!(valid_token("a"), Some("a"));

        let max = "ø".repeat(MAX_TOKEN_LEN);
        assert_eq!(valid_token(&max), Some(max.as_str()));
        let too_long = "ø".repeat(MAX_TOKEN_LEN + 1);
        assert_eq!(valid_token(&too_long), None);
    }

    #[tokio::test]
    async fn test_first_hit_stops_lookup() {
        let resolver = PlaceResolver::new(steinkjer());
        let coordinate = resolver.resolve(&["Steinkjer", "Trøndelag", "Norge"]).await;

        assert_eq!(coordinate.east(), Some(368304.0));
        assert_eq!(coordinate.north(), Some(7098745.0));
        assert_eq!(resolver.api().calls(), vec!["Steinkjer"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_broader_candidate() {
        let resolver = PlaceResolver::new(steinkjer());
        let coordinate = resolver
            .resolve(&["Vakkerlifjellet", "Trøndelag", "Norge"])
            .await;

        assert_eq!(coordinate.point(), Some(Point::new(300000.0, 7000000.0)));
        assert_eq!(resolver.api().calls(), vec!["Vakkerlifjellet", "Trøndelag"]);
    }

    #[tokio::test]
    async fn test_invalid_tokens_issue_no_requests() {
        let resolver = PlaceResolver::new(steinkjer());
        let too_long = "x".repeat(101);
        let coordinate = resolver.resolve(&["", "   ", too_long.as_str()]).await;

        assert!(!coordinate.is_resolved());
        assert!(resolver.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_candidates_is_a_miss() {
        let resolver = PlaceResolver::new(steinkjer());
        let none: [&str; 0] = [];
        assert_eq!(resolver.resolve(&none).await, ResolvedCoordinate::miss());
    }

    #[tokio::test]
    async fn test_lookup_error_moves_to_next_candidate() {
        let api = steinkjer().fail_on("Steinkjer", 500);
        let resolver = PlaceResolver::new(api);
        let coordinate = resolver.resolve(&["Steinkjer", "Trøndelag"]).await;

        assert_eq!(coordinate.point(), Some(Point::new(300000.0, 7000000.0)));
        assert_eq!(resolver.api().calls(), vec!["Steinkjer", "Trøndelag"]);
    }

    #[tokio::test]
    async fn test_incomplete_point_is_skipped() {
        let api = FakePlaceNames::new()
            .with_names("Gaulstad", vec![place_name("Gard", Some(1.0), None)])
            .with_hit("Verdal", "Kommune", 2.0, 3.0);
        let resolver = PlaceResolver::new(api);
        let coordinate = resolver.resolve(&["Gaulstad", "Verdal"]).await;

        assert_eq!(coordinate.point(), Some(Point::new(2.0, 3.0)));
    }

    #[tokio::test]
    async fn test_repeated_resolution_is_stable_and_uncached() {
        let resolver = PlaceResolver::new(steinkjer());
        let first = resolver.resolve(&["Steinkjer"]).await;
        let second = resolver.resolve(&["Steinkjer"]).await;

        assert_eq!(first, second);
        assert_eq!(resolver.api().calls(), vec!["Steinkjer", "Steinkjer"]);
    }

    #[tokio::test]
    async fn test_resolve_all_groups_by_category() {
        let resolver = PlaceResolver::new(steinkjer());
        let mut registry = CategoryRegistry::new();
        let points = resolver
            .resolve_all(&["Norge", "Trøndelag", "Steinkjer", "Ukjentsted"], &mut registry)
            .await;

        assert_eq!(points.len(), 3);
        assert_eq!(points.get("Kommune"), Some(Point::new(368304.0, 7098745.0)));
        assert_eq!(points.get("Fylke"), Some(Point::new(300000.0, 7000000.0)));
        assert_eq!(
            registry.iter().collect::<Vec<_>>(),
            vec!["Nasjon", "Fylke", "Kommune"]
        );
        assert_eq!(resolver.api().calls().len(), 4);
    }

    #[tokio::test]
    async fn test_resolve_all_last_write_wins() {
        let api = FakePlaceNames::new()
            .with_hit("Steinkjer", "Kommune", 1.0, 1.0)
            .with_hit("Snåsa", "Kommune", 2.0, 2.0);
        let resolver = PlaceResolver::new(api);
        let mut registry = CategoryRegistry::new();
        let points = resolver
            .resolve_all(&["Steinkjer", "Snåsa"], &mut registry)
            .await;

        assert_eq!(points.len(), 1);
        assert_eq!(points.get("Kommune"), Some(Point::new(2.0, 2.0)));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_all_never_registers_reserved_categories() {
        let api = FakePlaceNames::new()
            .with_hit("Steinkjer", "Kommune", 1.0, 1.0)
            .with_hit("Idrettsplass", "Id", 2.0, 2.0);
        let resolver = PlaceResolver::new(api);
        let mut registry = CategoryRegistry::new();
        let points = resolver
            .resolve_all(&["Steinkjer", "Idrettsplass"], &mut registry)
            .await;

        assert_eq!(points.len(), 1);
        assert!(points.get("Id").is_none());
        assert!(!registry.contains("Id"));
        assert_eq!(registry.iter().collect::<Vec<_>>(), vec!["Kommune"]);
    }

    #[tokio::test]
    async fn test_resolve_all_queries_each_token_once_and_survives_errors() {
        let api = steinkjer().fail_on("Trøndelag", 503);
        let resolver = PlaceResolver::new(api);
        let mut registry = CategoryRegistry::new();
        let points = resolver
            .resolve_all(&["Steinkjer", " Steinkjer ", "Trøndelag", ""], &mut registry)
            .await;

        assert_eq!(points.len(), 1);
        assert!(points.get("Kommune").is_some());
        assert_eq!(resolver.api().calls(), vec!["Steinkjer", "Trøndelag"]);
    }
}

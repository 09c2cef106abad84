//! Merges the per-stage results into one [`EnrichedRecord`].

use tracing::debug;

use crate::models::{
    record::is_base_field, CategoryPoints, EnrichedRecord, GeographicFields, ImageRecord,
    Resolution, ResolvedCoordinate,
};

/// Build the output row for one image. Pure: no I/O.
///
/// Category points named like a base field are dropped so they never shadow
/// the image or geography columns.
pub fn assemble(
    id: usize,
    image: ImageRecord,
    geography: GeographicFields,
    resolution: Resolution,
) -> EnrichedRecord {
    let (coordinate, category_points) = match resolution {
        Resolution::Single(coordinate) => (coordinate, CategoryPoints::default()),
        Resolution::PerCategory(points) => (ResolvedCoordinate::miss(), without_base_fields(points)),
    };

    EnrichedRecord {
        id,
        image,
        geography,
        coordinate,
        category_points,
    }
}

fn without_base_fields(mut points: CategoryPoints) -> CategoryPoints {
    let colliding: Vec<String> = points
        .iter()
        .map(|(category, _)| category)
        .filter(|category| is_base_field(category))
        .map(str::to_string)
        .collect();

    for category in colliding {
        debug!("Dropping category '{}': name is reserved", category);
        points.remove(&category);
    }
    points
}

//! Expanding square spiral over the thousandth-of-minute grid around a center

use geocheck_types::Point;
use tracing::debug;

type Step = fn(&Point) -> Point;

/// The order of the sides of every ring
const SWEEP: [(Step, bool); 4] = [
    (Point::neighbor_north, false),
    // widen after every second side
    (Point::neighbor_east, true),
    (Point::neighbor_south, false),
    (Point::neighbor_west, true),
];

/// All the grid points closer than `max_distance` meters to the `center`,
/// each with its distance, nearest first.
///
/// The walk starts at the center and goes in a square spiral
/// (north, east, south, west, with the side growing by one step
/// after east and after west) until a whole ring adds no point within the distance.
/// The center itself is always the first element.
///
/// Equal distances keep the order in which the spiral visited the points.
pub fn search_with_distances(center: &Point, max_distance: f64) -> Vec<(Point, f64)> {
    let mut found = vec![(*center, 0.0)];
    if !(max_distance.is_finite() && max_distance > 0.0) {
        return found;
    }

    let mut current = *center;
    let mut steps = 1_usize;
    let mut ring_has_points = true;

    while ring_has_points {
        ring_has_points = false;
        for (step, widen) in SWEEP {
            for _ in 0..steps {
                current = step(&current);
                let distance = current.distance_to(center);
                if distance < max_distance {
                    found.push((current, distance));
                    ring_has_points = true;
                }
            }

            if widen {
                steps += 1;
            }
        }
    }

    // stable, so the ties stay in the spiral order
    found.sort_by(|(_, a), (_, b)| a.total_cmp(b));
    debug!(
        center = %center,
        max_distance,
        candidates = found.len(),
        "Spiral search finished"
    );
    found
}

/// The candidate points around the `center` ordered by the distance,
/// see [`search_with_distances`].
pub fn search(center: &Point, max_distance: f64) -> Vec<Point> {
    search_with_distances(center, max_distance)
        .into_iter()
        .map(|(point, _)| point)
        .collect()
}

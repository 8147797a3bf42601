//! Fan triangulation of convex polygons.

use scene_core::{LoadError, LoadResult};

/// Expand an N-gon into N-2 triangles anchored at its first vertex.
///
/// Triangle `i` is `(polygon[0], polygon[i + 1], polygon[i + 2])`, so the output
/// always holds `3 * (N - 2)` entries. Concave or non-planar polygons are
/// triangulated the same way.
pub fn triangulate<T: Copy>(polygon: &[T], line: usize) -> LoadResult<Vec<T>> {
    if polygon.len() < 3 {
        return Err(LoadError::DegenerateFace {
            line,
            count: polygon.len(),
        });
    }
    if polygon.len() == 3 {
        return Ok(polygon.to_vec());
    }

    let mut triangles = Vec::with_capacity(3 * (polygon.len() - 2));
    for pair in polygon[1..].windows(2) {
        triangles.extend_from_slice(&[polygon[0], pair[0], pair[1]]);
    }
    Ok(triangles)
}

use tracing::{debug, trace};

use crate::math::Point3;

/// Result of a nearest-vertex query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestVertex {
    /// Position of the vertex in index order.
    pub index: usize,
    /// The snapped vertex position.
    pub point: Point3,
    /// Euclidean distance from the query point to the vertex.
    pub distance: f64,
}

/// Flat list of world-space vertex positions of a loaded mesh, answering
/// nearest-vertex queries.
///
/// The index is rebuilt wholesale on every mesh load; it never holds
/// vertices from more than one mesh.
#[derive(Debug, Clone, Default)]
pub struct VertexSnapIndex {
    vertices: Vec<Point3>,
}

impl VertexSnapIndex {
    /// Creates a new, empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the indexed vertices.
    ///
    /// Vertices must already be in world space. An empty sequence leaves the
    /// index empty, so every later query answers `None`.
    pub fn build<I>(&mut self, vertices: I)
    where
        I: IntoIterator<Item = Point3>,
    {
        self.vertices.clear();
        self.vertices.extend(vertices);
        debug!(vertices = self.vertices.len(), "rebuilt vertex snap index");
    }

    /// Removes all vertices.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Number of indexed vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if no vertices are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The indexed vertices in index order.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Returns the indexed vertex closest to `point`, or `None` if the index
    /// is empty.
    #[must_use]
    pub fn nearest(&self, point: &Point3) -> Option<Point3> {
        self.nearest_with_distance(point).map(|n| n.point)
    }

    /// Like [`nearest`](Self::nearest) but also reports the vertex position in
    /// index order and its distance to the query point.
    ///
    /// Linear scan over squared distances. On ties the vertex encountered
    /// first wins.
    #[must_use]
    pub fn nearest_with_distance(&self, point: &Point3) -> Option<NearestVertex> {
        let mut best_index = None;
        let mut best_d2 = f64::INFINITY;
        for (i, v) in self.vertices.iter().enumerate() {
            // Strict comparison keeps the earlier vertex on ties. The first
            // vertex is always a candidate so overflowed distances still snap,
            // and a NaN candidate yields to any comparable one.
            let d2 = nalgebra::distance_squared(point, v);
            if best_index.is_none() || d2 < best_d2 || (best_d2.is_nan() && !d2.is_nan()) {
                best_d2 = d2;
                best_index = Some(i);
            }
        }

        let index = best_index?;
        let nearest = NearestVertex {
            index,
            point: self.vertices[index],
            distance: best_d2.sqrt(),
        };
        trace!(index, distance = nearest.distance, "snapped to vertex");
        Some(nearest)
    }
}

impl FromIterator<Point3> for VertexSnapIndex {
    fn from_iter<I: IntoIterator<Item = Point3>>(iter: I) -> Self {
        let mut index = Self::new();
        index.build(iter);
        index
    }
}

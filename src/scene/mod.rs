pub mod bounds;
pub mod part;

pub use bounds::Aabb;
pub use part::{MeshPart, PartId};

use slotmap::SlotMap;
use tracing::debug;

use crate::error::SceneError;
use crate::math::{self, Matrix4, Point3, Vector3};

/// A loaded model: the mesh parts produced by the loader plus a root
/// transform that places the whole model in world space.
///
/// Parts are stored in an arena keyed by [`PartId`]; iteration follows slot
/// order, so flattening is deterministic for a given sequence of inserts.
#[derive(Debug)]
pub struct Model {
    parts: SlotMap<PartId, MeshPart>,
    root: Matrix4,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Creates a new, empty model with an identity root transform.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parts: SlotMap::with_key(),
            root: Matrix4::identity(),
        }
    }

    /// Inserts a part and returns its ID.
    pub fn add_part(&mut self, part: MeshPart) -> PartId {
        self.parts.insert(part)
    }

    /// Returns a reference to the part, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the part is not in the model.
    pub fn part(&self, id: PartId) -> Result<&MeshPart, SceneError> {
        self.parts
            .get(id)
            .ok_or_else(|| SceneError::PartNotFound(format!("{id:?}")))
    }

    /// Returns a mutable reference to the part, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the part is not in the model.
    pub fn part_mut(&mut self, id: PartId) -> Result<&mut MeshPart, SceneError> {
        self.parts
            .get_mut(id)
            .ok_or_else(|| SceneError::PartNotFound(format!("{id:?}")))
    }

    /// Removes a part and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the part is not in the model.
    pub fn remove_part(&mut self, id: PartId) -> Result<MeshPart, SceneError> {
        self.parts
            .remove(id)
            .ok_or_else(|| SceneError::PartNotFound(format!("{id:?}")))
    }

    /// Iterates over all parts in slot order.
    pub fn parts(&self) -> impl Iterator<Item = (PartId, &MeshPart)> {
        self.parts.iter()
    }

    /// Number of parts.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Total vertex count over all parts.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.parts.values().map(MeshPart::vertex_count).sum()
    }

    /// The model-to-world transform.
    #[must_use]
    pub fn root_transform(&self) -> &Matrix4 {
        &self.root
    }

    /// Replaces the model-to-world transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is non-finite or singular.
    pub fn set_root_transform(&mut self, root: Matrix4) -> Result<(), SceneError> {
        part::validate_transform(&root)?;
        self.root = root;
        Ok(())
    }

    /// All vertex positions in world space, flattened in part order then
    /// vertex order.
    #[must_use]
    pub fn world_vertices(&self) -> Vec<Point3> {
        self.transformed_vertices(&self.root)
    }

    /// World-space bounding box, or `None` if the model has no vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.world_vertices())
    }

    /// Scales and centers the model so its largest bounding box side equals
    /// `extent` and its bounds are centered on the world origin.
    ///
    /// Bounds are taken with part transforms applied but the current root
    /// transform ignored, so fitting twice gives the same result. A model
    /// with zero size is only centered.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidExtent`] if `extent` is not positive and
    /// finite.
    pub fn fit_to_extent(&mut self, extent: f64) -> Result<(), SceneError> {
        if !(extent.is_finite() && extent > 0.0) {
            return Err(SceneError::InvalidExtent(extent));
        }

        let local = self.transformed_vertices(&Matrix4::identity());
        let Some(aabb) = Aabb::from_points(&local) else {
            self.root = Matrix4::identity();
            return Ok(());
        };

        let max_dim = aabb.max_dimension();
        let scale = if max_dim > math::TOLERANCE {
            extent / max_dim
        } else {
            1.0
        };
        let offset: Vector3 = -aabb.center().coords * scale;
        self.root = Matrix4::new_translation(&offset) * Matrix4::new_scaling(scale);

        debug!(
            parts = self.parts.len(),
            vertices = local.len(),
            max_dim,
            scale,
            "fitted model to extent"
        );
        Ok(())
    }

    fn transformed_vertices(&self, root: &Matrix4) -> Vec<Point3> {
        let mut out = Vec::with_capacity(self.vertex_count());
        for part in self.parts.values() {
            let world = root * part.transform();
            out.extend(
                part.positions()
                    .iter()
                    .map(|p| math::transform_point(&world, p)),
            );
        }
        out
    }
}

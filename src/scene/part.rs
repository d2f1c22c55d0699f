use crate::error::SceneError;
use crate::math::{self, Matrix4, Point3};

slotmap::new_key_type! {
    /// Unique identifier for a mesh part in a [`Model`](super::Model).
    pub struct PartId;
}

/// One mesh object produced by the loader: object-space positions plus the
/// object's local transform.
///
/// Positions are always finite and the transform is always an invertible
/// affine matrix.
#[derive(Debug, Clone)]
pub struct MeshPart {
    name: Option<String>,
    positions: Vec<Point3>,
    transform: Matrix4,
}

impl MeshPart {
    /// Creates a part with an identity transform.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NonFinitePosition`] if any coordinate is NaN or
    /// infinite.
    pub fn new(positions: Vec<Point3>) -> Result<Self, SceneError> {
        if let Some(index) = positions.iter().position(|p| !math::is_finite(p)) {
            return Err(SceneError::NonFinitePosition { index });
        }
        Ok(Self {
            name: None,
            positions,
            transform: Matrix4::identity(),
        })
    }

    /// Sets the part name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the object-to-model transform.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidTransform`] if the matrix has non-finite
    /// entries, is projective, or is not invertible.
    pub fn with_transform(mut self, transform: Matrix4) -> Result<Self, SceneError> {
        self.set_transform(transform)?;
        Ok(self)
    }

    /// Renames the part.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Replaces the object-to-model transform, keeping the old one on error.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidTransform`] if the matrix has non-finite
    /// entries, is projective, or is not invertible.
    pub fn set_transform(&mut self, transform: Matrix4) -> Result<(), SceneError> {
        validate_transform(&transform)?;
        self.transform = transform;
        Ok(())
    }

    /// Optional group or object name from the source file.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Vertex positions in object space.
    #[must_use]
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Object-to-model transform.
    #[must_use]
    pub fn transform(&self) -> &Matrix4 {
        &self.transform
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Checks that a transform is finite, affine and invertible.
pub(crate) fn validate_transform(transform: &Matrix4) -> Result<(), SceneError> {
    if transform.iter().any(|v| !v.is_finite()) {
        return Err(SceneError::InvalidTransform(
            "matrix has non-finite entries".into(),
        ));
    }
    let bottom = transform.fixed_view::<1, 4>(3, 0);
    let affine_row = nalgebra::RowVector4::new(0.0, 0.0, 0.0, 1.0);
    if (bottom - affine_row).abs().max() > math::TOLERANCE {
        return Err(SceneError::InvalidTransform(
            "matrix is projective, bottom row must be [0, 0, 0, 1]".into(),
        ));
    }
    if transform.determinant().abs() < math::TOLERANCE {
        return Err(SceneError::InvalidTransform("matrix is singular".into()));
    }
    Ok(())
}

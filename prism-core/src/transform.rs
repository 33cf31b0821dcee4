//! Matrix helpers shared by the renderers.

use nalgebra::Matrix4;

/// Namespace for matrix helpers derived from the view matrix.
pub struct Transform;

impl Transform {
    /// Inverse-transpose of the model-view matrix, for transforming normals.
    ///
    /// A singular model-view has no inverse; the matrix itself is used then,
    /// which is exact for the pure rotations the rotator produces.
    pub fn normal_matrix(model_view: &Matrix4<f32>) -> Matrix4<f32> {
        match model_view.try_inverse() {
            Some(inverse) => inverse.transpose(),
            None => {
                log::warn!("model-view matrix is singular; using it for normals");
                *model_view
            }
        }
    }
}

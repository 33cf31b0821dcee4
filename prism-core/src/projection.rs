//! Perspective projection and screen mapping.

use nalgebra::{Matrix4, Point3};

/// Perspective projection parameters for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            fov_y: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: aspect_ratio(width as f32, height as f32),
            near: 0.1,
            far: 100.0,
        }
    }

    /// Same frustum with the aspect ratio of a new viewport
    pub fn with_viewport(self, width: f32, height: f32) -> Self {
        Self {
            aspect: aspect_ratio(width, height),
            ..self
        }
    }

    /// OpenGL-style perspective matrix (clip z in [-1, 1])
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov_y, self.near, self.far)
    }

    /// Project a 3D point to 2D screen space with a top-left origin.
    ///
    /// Returns `(x, y, depth)` with depth in normalized device coordinates,
    /// or `None` when the point falls outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_view: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let eye = model_view.transform_point(point);

        // Behind the near plane the perspective divide flips the point
        if -eye.z < self.near {
            return None;
        }

        let ndc = self.matrix().transform_point(&eye);

        if ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

fn aspect_ratio(width: f32, height: f32) -> f32 {
    if height > 0.0 {
        width / height
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_creation() {
        let projection = Projection::new(800, 600);
        assert!((projection.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert!((projection.fov_y.to_degrees() - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_height_viewport() {
        let projection = Projection::default().with_viewport(640.0, 0.0);
        assert_eq!(projection.aspect, 1.0);
    }

    #[test]
    fn test_center_projects_to_middle() {
        let projection = Projection::new(100, 100);
        let view = Matrix4::new_translation(&nalgebra::Vector3::new(0.0, 0.0, -8.0));
        let (x, y, depth) = projection
            .project_to_screen(&Point3::origin(), &view, 100, 100)
            .unwrap();
        assert!((x - 50.0).abs() < 1e-4);
        assert!((y - 50.0).abs() < 1e-4);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_up_is_top_of_screen() {
        let projection = Projection::new(100, 100);
        let view = Matrix4::new_translation(&nalgebra::Vector3::new(0.0, 0.0, -8.0));
        let (_, y, _) = projection
            .project_to_screen(&Point3::new(0.0, 1.0, 0.0), &view, 100, 100)
            .unwrap();
        assert!(y < 50.0);
    }

    #[test]
    fn test_point_behind_camera_is_clipped() {
        let projection = Projection::default();
        let view = Matrix4::new_translation(&nalgebra::Vector3::new(0.0, 0.0, -8.0));
        assert!(projection
            .project_to_screen(&Point3::new(0.0, 0.0, 9.0), &view, 80, 24)
            .is_none());
    }
}

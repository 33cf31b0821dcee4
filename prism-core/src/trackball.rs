//! Virtual trackball that maps surface points onto rays in world space.

use nalgebra::Vector3;

use crate::frame::Frame;

/// Circular control region centred on the interactive surface.
///
/// Input coordinates use a top-left origin with Y growing downwards, which
/// is what both DOM pointer events and terminal cell positions report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRegion {
    center_x: f64,
    center_y: f64,
    radius: f64,
}

impl ControlRegion {
    /// Region for a surface of the given client size. The radius is the
    /// smaller half-extent so the sphere fits inside the surface.
    pub fn from_size(width: f64, height: f64) -> Self {
        let center_x = width / 2.0;
        let center_y = height / 2.0;
        Self {
            center_x,
            center_y,
            radius: center_x.min(center_y),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Unproject a surface point to a world-space ray through the trackball.
    ///
    /// Inside the disk the point is lifted onto the sphere along `forward`.
    /// Outside it stays on the tangent plane (zero height) instead of being
    /// clamped to the boundary, so drags far off the disk still rotate.
    pub fn to_ray(&self, frame: &Frame, x: f64, y: f64) -> Vector3<f64> {
        let dx = x - self.center_x;
        let dy = self.center_y - y;
        let planar = frame.right() * dx + frame.up() * dy;

        let radius2 = self.radius * self.radius;
        let dist2 = planar.norm_squared();
        if dist2 > radius2 {
            planar
        } else {
            planar + frame.forward() * (radius2 - dist2).sqrt()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_size() {
        let region = ControlRegion::from_size(800.0, 600.0);
        assert_eq!(region.center(), (400.0, 300.0));
        assert_eq!(region.radius(), 300.0);
    }

    #[test]
    fn test_center_maps_to_forward() {
        let region = ControlRegion::from_size(200.0, 200.0);
        let ray = region.to_ray(&Frame::identity(), 100.0, 100.0);
        assert!((ray - Vector3::new(0.0, 0.0, 100.0)).norm() < 1e-9);
    }

    #[test]
    fn test_y_axis_is_flipped() {
        let region = ControlRegion::from_size(200.0, 200.0);
        // Above the centre on screen is +up in the frame.
        let ray = region.to_ray(&Frame::identity(), 100.0, 40.0);
        assert!((ray.y - 60.0).abs() < 1e-9);
        assert!(ray.x.abs() < 1e-9);
        assert!((ray.z - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_inside_lies_on_sphere() {
        let region = ControlRegion::from_size(400.0, 300.0);
        let frame = Frame::look_from(&Vector3::new(2.0, 2.0, 5.0), &Vector3::y()).unwrap();
        let ray = region.to_ray(&frame, 250.0, 100.0);
        assert!((ray.norm() - region.radius()).abs() < 1e-9);
    }

    #[test]
    fn test_point_outside_stays_on_tangent_plane() {
        let region = ControlRegion::from_size(200.0, 200.0);
        let ray = region.to_ray(&Frame::identity(), 500.0, 100.0);
        assert!((ray - Vector3::new(400.0, 0.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_boundary_point_has_zero_height() {
        let region = ControlRegion::from_size(200.0, 200.0);
        let ray = region.to_ray(&Frame::identity(), 200.0, 100.0);
        assert!((ray - Vector3::new(100.0, 0.0, 0.0)).norm() < 1e-9);
    }
}

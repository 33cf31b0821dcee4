//! Trackball rotation controller.
//!
//! The [`Rotator`] owns the camera frame and view distance, turns pointer
//! drags into transvections of that frame and hands out view matrices.
//! Front ends forward pointer events to it and attach their move/up
//! listeners only while [`Rotator::is_dragging`] is true.

use std::fmt;

use nalgebra::{Matrix4, Vector3};

use crate::error::ViewError;
use crate::frame::Frame;
use crate::renderer::Surface;
use crate::trackball::ControlRegion;

/// Observer invoked synchronously with the new view matrix after every
/// orientation change.
pub type RepaintCallback = Box<dyn FnMut(&Matrix4<f32>)>;

/// Initial view: look at the origin from `direction` with `up` pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub direction: Vector3<f64>,
    pub up: Vector3<f64>,
    /// Explicit camera distance; the length of `direction` when `None` or
    /// not positive.
    pub distance: Option<f64>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            direction: Vector3::new(0.0, 0.0, 10.0),
            up: Vector3::y(),
            distance: None,
        }
    }
}

/// An in-progress drag: the last pointer position seen.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    previous: (f64, f64),
}

pub struct Rotator {
    frame: Frame,
    distance: f64,
    region: ControlRegion,
    drag: Option<DragSession>,
    repaint: Option<RepaintCallback>,
}

impl Rotator {
    /// Create a rotator over `surface`.
    ///
    /// The surface size is read once here; later resizes do not change the
    /// trackball radius unless [`Rotator::resize_control_region`] is called.
    pub fn new(surface: &impl Surface, options: ViewOptions) -> Result<Self, ViewError> {
        let (width, height) = surface.client_size();
        let mut rotator = Self {
            frame: Frame::identity(),
            distance: 0.0,
            region: ControlRegion::from_size(width, height),
            drag: None,
            repaint: None,
        };
        rotator.set_view(options.direction, options.up, options.distance)?;
        Ok(rotator)
    }

    /// Attach the repaint observer.
    pub fn with_repaint(mut self, repaint: impl FnMut(&Matrix4<f32>) + 'static) -> Self {
        self.set_repaint(repaint);
        self
    }

    pub fn set_repaint(&mut self, repaint: impl FnMut(&Matrix4<f32>) + 'static) {
        self.repaint = Some(Box::new(repaint));
    }

    pub fn clear_repaint(&mut self) {
        self.repaint = None;
    }

    /// Reset the orientation to look at the origin from `direction`.
    ///
    /// `up` is projected onto the plane orthogonal to `direction`. Zero
    /// vectors or an `up` parallel to `direction` are rejected and leave the
    /// current view untouched. Does not notify the repaint observer.
    pub fn set_view(
        &mut self,
        direction: Vector3<f64>,
        up: Vector3<f64>,
        distance: Option<f64>,
    ) -> Result<(), ViewError> {
        let frame = Frame::look_from(&direction, &up)?;
        self.frame = frame;
        self.distance = match distance {
            Some(d) if d > 0.0 => d,
            _ => direction.norm(),
        };
        log::debug!("view set: distance {:.3}", self.distance);
        Ok(())
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn control_region(&self) -> &ControlRegion {
        &self.region
    }

    /// Rebuild the trackball from a new surface size.
    pub fn resize_control_region(&mut self, surface: &impl Surface) {
        let (width, height) = surface.client_size();
        self.region = ControlRegion::from_size(width, height);
    }

    pub fn view_distance(&self) -> f64 {
        self.distance
    }

    /// Set the camera distance as given. Bounds are the caller's concern.
    pub fn set_view_distance(&mut self, distance: f64) {
        self.distance = distance;
    }

    /// World-to-camera matrix: rotation rows `right`, `up`, `forward` and a
    /// translation of `-distance` along the camera Z axis.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let r = self.frame.right();
        let u = self.frame.up();
        let f = self.frame.forward();
        #[rustfmt::skip]
        let view = Matrix4::new(
            r.x as f32, r.y as f32, r.z as f32, 0.0,
            u.x as f32, u.y as f32, u.z as f32, 0.0,
            f.x as f32, f.y as f32, f.z as f32, -self.distance as f32,
            0.0,        0.0,        0.0,        1.0,
        );
        view
    }

    /// The view matrix as 16 floats in column-major order.
    pub fn view_matrix_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.view_matrix().as_slice());
        out
    }

    pub fn view_matrix_vec(&self) -> Vec<f32> {
        self.view_matrix().as_slice().to_vec()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Start a drag session at `(x, y)`.
    ///
    /// Returns `false` without touching the active session when a drag is
    /// already in progress.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        if self.drag.is_some() {
            return false;
        }
        log::debug!("drag started at ({x:.1}, {y:.1})");
        self.drag = Some(DragSession { previous: (x, y) });
        true
    }

    /// Rotate by the drag from the previous pointer position to `(x, y)`.
    ///
    /// Ignored outside a drag session. Returns whether the frame changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let Some(session) = self.drag.as_mut() else {
            return false;
        };

        let (prev_x, prev_y) = session.previous;
        session.previous = (x, y);

        let ray1 = self.region.to_ray(&self.frame, prev_x, prev_y);
        let ray2 = self.region.to_ray(&self.frame, x, y);
        if !self.frame.apply_transvection(&ray1, &ray2) {
            return false;
        }
        log::trace!("rotated by drag ({prev_x:.1}, {prev_y:.1}) -> ({x:.1}, {y:.1})");

        self.notify_repaint();
        true
    }

    /// End the drag session. Returns `false` when none was active.
    pub fn pointer_up(&mut self) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        log::debug!("drag ended");
        true
    }

    /// Invoke the repaint observer with the current view matrix.
    pub fn notify_repaint(&mut self) {
        let view = self.view_matrix();
        if let Some(repaint) = self.repaint.as_mut() {
            repaint(&view);
        }
    }
}

impl fmt::Debug for Rotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rotator")
            .field("frame", &self.frame)
            .field("distance", &self.distance)
            .field("region", &self.region)
            .field("drag", &self.drag)
            .field("repaint", &self.repaint.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const SURFACE: (f64, f64) = (400.0, 400.0);

    fn new_rotator() -> Rotator {
        Rotator::new(&SURFACE, ViewOptions::default()).unwrap()
    }

    // Drags that end exactly on the trackball rim lift by sqrt(r^2 - |v|^2),
    // which magnifies rounding in |v|; 1e-6 absorbs that.
    fn assert_vec_eq(a: &Vector3<f64>, b: &Vector3<f64>) {
        assert!((a - b).norm() < 1e-6, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_view() {
        let rotator = new_rotator();
        assert_eq!(rotator.view_distance(), 10.0);
        assert_eq!(*rotator.frame(), Frame::identity());
        assert!(!rotator.is_dragging());
    }

    #[test]
    fn test_set_view_round_trip() {
        let mut rotator = new_rotator();
        rotator
            .set_view(Vector3::new(0.0, 0.0, 10.0), Vector3::y(), Some(10.0))
            .unwrap();

        assert_vec_eq(rotator.frame().forward(), &Vector3::z());
        assert_vec_eq(rotator.frame().up(), &Vector3::y());
        assert_vec_eq(rotator.frame().right(), &Vector3::x());
        assert_eq!(rotator.view_distance(), 10.0);
    }

    #[test]
    fn test_set_view_distance_falls_back_to_direction_length() {
        let mut rotator = new_rotator();
        rotator.set_view(Vector3::new(3.0, 0.0, 4.0), Vector3::y(), None).unwrap();
        assert!((rotator.view_distance() - 5.0).abs() < 1e-12);

        rotator.set_view(Vector3::new(3.0, 0.0, 4.0), Vector3::y(), Some(-2.0)).unwrap();
        assert!((rotator.view_distance() - 5.0).abs() < 1e-12);

        rotator.set_view(Vector3::new(2.0, 2.0, 5.0), Vector3::y(), Some(8.0)).unwrap();
        assert_eq!(rotator.view_distance(), 8.0);
    }

    #[test]
    fn test_set_view_rejects_zero_vectors_and_keeps_state() {
        let mut rotator = new_rotator();
        let before = *rotator.frame();

        assert_eq!(
            rotator.set_view(Vector3::zeros(), Vector3::y(), Some(3.0)),
            Err(ViewError::ZeroDirection)
        );
        assert_eq!(
            rotator.set_view(Vector3::y(), Vector3::y() * 2.0, None),
            Err(ViewError::ParallelUp)
        );
        assert_eq!(*rotator.frame(), before);
        assert_eq!(rotator.view_distance(), 10.0);

        assert!(Rotator::new(
            &SURFACE,
            ViewOptions {
                direction: Vector3::zeros(),
                ..ViewOptions::default()
            }
        )
        .is_err());
    }

    #[test]
    fn test_view_matrix_shape() {
        let mut rotator = new_rotator();
        rotator.set_view(Vector3::new(2.0, 2.0, 5.0), Vector3::y(), Some(8.0)).unwrap();
        rotator.pointer_down(200.0, 200.0);
        rotator.pointer_move(260.0, 170.0);

        let m = rotator.view_matrix_array();
        assert_eq!(m.len(), 16);
        assert!(m.iter().all(|v| v.is_finite()));
        // Last row in column-major order.
        assert_eq!([m[3], m[7], m[11], m[15]], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(m[14], -8.0);
        assert_eq!(rotator.view_matrix_vec(), m.to_vec());
    }

    #[test]
    fn test_view_matrix_maps_world_into_camera_space() {
        let mut rotator = new_rotator();
        rotator.set_view(Vector3::new(0.0, 0.0, 10.0), Vector3::y(), None).unwrap();

        let view = rotator.view_matrix();
        let origin = view.transform_point(&nalgebra::Point3::origin());
        assert!((origin.z + 10.0).abs() < 1e-6);

        let array = rotator.view_matrix_array();
        // Upper-left block is the identity for this view.
        assert_eq!([array[0], array[5], array[10]], [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_view_distance_is_not_clamped() {
        let mut rotator = new_rotator();
        let before = *rotator.frame();

        rotator.set_view_distance(-5.0);

        assert_eq!(rotator.view_distance(), -5.0);
        assert_eq!(*rotator.frame(), before);
        assert_eq!(rotator.view_matrix_array()[14], 5.0);
    }

    #[test]
    fn test_reentrant_pointer_down_is_ignored() {
        let mut rotator = new_rotator();
        assert!(rotator.pointer_down(200.0, 200.0));
        assert!(!rotator.pointer_down(10.0, 10.0));
        assert!(rotator.is_dragging());

        // The rotation starts from the first press, not the ignored one.
        let mut expected = new_rotator();
        expected.pointer_down(200.0, 200.0);
        expected.pointer_move(250.0, 180.0);
        rotator.pointer_move(250.0, 180.0);
        assert_eq!(rotator.frame(), expected.frame());

        assert!(rotator.pointer_up());
        assert!(!rotator.pointer_up());
        assert!(!rotator.is_dragging());
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut rotator = new_rotator();
        assert!(!rotator.pointer_move(300.0, 100.0));
        assert_eq!(*rotator.frame(), Frame::identity());
    }

    #[test]
    fn test_identity_drag_keeps_frame() {
        let mut rotator = new_rotator();
        rotator.pointer_down(120.0, 80.0);
        rotator.pointer_move(120.0, 80.0);
        let frame = rotator.frame();
        assert_vec_eq(frame.forward(), &Vector3::z());
        assert_vec_eq(frame.right(), &Vector3::x());
        assert_vec_eq(frame.up(), &Vector3::y());
    }

    #[test]
    fn test_center_to_edge_is_quarter_turn() {
        let mut rotator = new_rotator();
        rotator.pointer_down(200.0, 200.0);
        rotator.pointer_move(400.0, 200.0);

        let frame = rotator.frame();
        assert_vec_eq(frame.up(), &Vector3::y());
        assert_vec_eq(frame.forward(), &-Vector3::x());
        assert_vec_eq(frame.right(), &Vector3::z());
    }

    #[test]
    fn test_edge_through_center_to_opposite_edge_is_half_turn() {
        let mut rotator = new_rotator();
        rotator.pointer_down(0.0, 200.0);
        rotator.pointer_move(200.0, 200.0);
        rotator.pointer_move(400.0, 200.0);

        // 180 degrees about up, the axis orthogonal to every ray of the drag.
        let frame = rotator.frame();
        assert_vec_eq(frame.up(), &Vector3::y());
        assert_vec_eq(frame.forward(), &-Vector3::z());
        assert_vec_eq(frame.right(), &-Vector3::x());
    }

    #[test]
    fn test_front_point_follows_pointer() {
        let mut rotator = new_rotator();
        rotator.pointer_down(200.0, 200.0);
        rotator.pointer_move(400.0, 200.0);

        // The world point that faced the viewer is now at the right edge.
        let view = rotator.view_matrix();
        let p = view.transform_vector(&nalgebra::Vector3::new(0.0, 0.0, 1.0_f32));
        assert!((p - nalgebra::Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_long_drag_keeps_frame_orthonormal() {
        let mut rotator = new_rotator();
        rotator.pointer_down(200.0, 200.0);
        for i in 0..10_000 {
            let t = i as f64 * 0.05;
            rotator.pointer_move(200.0 + 260.0 * t.cos(), 200.0 + 180.0 * (1.3 * t).sin());
        }
        assert!(rotator.frame().orthonormality_error() < 1e-5);
    }

    #[test]
    fn test_repaint_called_after_each_rotation() {
        let calls = Rc::new(Cell::new(0));
        let last_z = Rc::new(Cell::new(0.0_f32));
        let (calls_in, last_z_in) = (calls.clone(), last_z.clone());

        let mut rotator = new_rotator().with_repaint(move |view: &Matrix4<f32>| {
            calls_in.set(calls_in.get() + 1);
            last_z_in.set(view[(2, 3)]);
        });

        rotator.pointer_move(250.0, 200.0);
        assert_eq!(calls.get(), 0);

        rotator.pointer_down(200.0, 200.0);
        rotator.pointer_move(250.0, 200.0);
        rotator.pointer_move(250.0, 240.0);
        rotator.pointer_up();
        rotator.pointer_move(300.0, 300.0);

        assert_eq!(calls.get(), 2);
        assert_eq!(last_z.get(), -10.0);

        rotator.clear_repaint();
        rotator.pointer_down(0.0, 0.0);
        rotator.pointer_move(10.0, 10.0);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_control_region_is_fixed_until_resized() {
        let mut rotator = Rotator::new(&(800.0, 600.0), ViewOptions::default()).unwrap();
        assert_eq!(rotator.control_region().radius(), 300.0);

        rotator.resize_control_region(&(200.0, 500.0));
        assert_eq!(rotator.control_region().radius(), 100.0);
        assert_eq!(rotator.control_region().center(), (100.0, 250.0));
    }
}

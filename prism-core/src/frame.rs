//! Camera-relative orthonormal frame and the transvection update that rotates it.

use nalgebra::{Matrix3, Vector3};

use crate::error::ViewError;

/// Squared-length threshold below which a trackball ray is treated as zero.
const DEGENERATE_EPSILON: f64 = 1e-12;

/// Smallest component of a unit up hint orthogonal to the view direction.
const PARALLEL_EPSILON: f64 = 1e-6;

/// Three mutually orthogonal unit vectors describing the camera orientation
/// in world space.
///
/// `forward` points from the origin towards the viewer, `up` is the screen
/// up direction and `right = up × forward`. The fields stay private so the
/// only ways to change the frame are [`Frame::look_from`] and
/// [`Frame::apply_transvection`], both of which keep it orthonormal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    right: Vector3<f64>,
    up: Vector3<f64>,
    forward: Vector3<f64>,
}

impl Frame {
    /// Frame looking down the negative Z axis with Y up.
    pub fn identity() -> Self {
        Self {
            right: Vector3::x(),
            up: Vector3::y(),
            forward: Vector3::z(),
        }
    }

    /// Build a frame that views the origin from `direction` with `up_hint`
    /// projected onto the view plane (Gram-Schmidt).
    ///
    /// Both inputs are normalized first, so only their directions matter:
    /// any nonzero finite magnitude is accepted. Zero vectors and an
    /// `up_hint` parallel to `direction` have no defined orientation and are
    /// rejected rather than patched up.
    pub fn look_from(direction: &Vector3<f64>, up_hint: &Vector3<f64>) -> Result<Self, ViewError> {
        let forward = unit(direction, ViewError::ZeroDirection)?;
        let hint = unit(up_hint, ViewError::ZeroUp)?;

        let up = (hint - forward * forward.dot(&hint))
            .try_normalize(PARALLEL_EPSILON)
            .ok_or(ViewError::ParallelUp)?;
        let right = up.cross(&forward);

        Ok(Self { right, up, forward })
    }

    pub fn right(&self) -> &Vector3<f64> {
        &self.right
    }

    pub fn up(&self) -> &Vector3<f64> {
        &self.up
    }

    pub fn forward(&self) -> &Vector3<f64> {
        &self.forward
    }

    /// World-to-camera rotation: rows are `right`, `up`, `forward`.
    pub fn rotation(&self) -> Matrix3<f64> {
        Matrix3::from_rows(&[
            self.right.transpose(),
            self.up.transpose(),
            self.forward.transpose(),
        ])
    }

    /// Rotate the frame by the double reflection defined by two trackball rays.
    ///
    /// Each axis is reflected through the bisector `e = normalize(e1 + e2)` and
    /// then through `e1`. The composition is the rotation about `e1 × e2` by the
    /// angle between the rays; as a product of isometries it keeps the frame
    /// orthonormal without renormalizing.
    ///
    /// Returns `false` and leaves the frame untouched when either ray is zero
    /// or the rays are antiparallel, since the bisector is undefined there.
    pub fn apply_transvection(&mut self, e1: &Vector3<f64>, e2: &Vector3<f64>) -> bool {
        if e1.norm_squared() <= DEGENERATE_EPSILON || e2.norm_squared() <= DEGENERATE_EPSILON {
            log::debug!("skipping transvection with a zero-length ray");
            return false;
        }

        let e1 = e1.normalize();
        let e2 = e2.normalize();
        let bisector = e1 + e2;
        if bisector.norm_squared() <= DEGENERATE_EPSILON {
            log::debug!("skipping transvection between antiparallel rays");
            return false;
        }
        let e = bisector.normalize();

        self.forward = reflect(&e1, &reflect(&e, &self.forward));
        self.right = reflect(&e1, &reflect(&e, &self.right));
        self.up = reflect(&e1, &reflect(&e, &self.up));

        true
    }

    /// Largest deviation from orthonormality across the three axes.
    pub fn orthonormality_error(&self) -> f64 {
        let lengths = [
            (self.right.norm() - 1.0).abs(),
            (self.up.norm() - 1.0).abs(),
            (self.forward.norm() - 1.0).abs(),
        ];
        let dots = [
            self.right.dot(&self.up).abs(),
            self.up.dot(&self.forward).abs(),
            self.forward.dot(&self.right).abs(),
        ];
        lengths.iter().chain(dots.iter()).fold(0.0, |acc, v| acc.max(*v))
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::identity()
    }
}

/// Unit vector along `v`, scaled by its largest component first so tiny and
/// huge magnitudes normalize without underflow or overflow.
/// A zero `v` fails with `zero`.
fn unit(v: &Vector3<f64>, zero: ViewError) -> Result<Vector3<f64>, ViewError> {
    if v.iter().any(|c| !c.is_finite()) {
        return Err(ViewError::NonFinite);
    }
    let scale = v.amax();
    if scale == 0.0 {
        return Err(zero);
    }
    (v / scale).try_normalize(f64::MIN_POSITIVE).ok_or(zero)
}

/// Reflect `source` through the line spanned by the unit vector `axis`:
/// `2 (axis · source) axis - source`.
pub fn reflect(axis: &Vector3<f64>, source: &Vector3<f64>) -> Vector3<f64> {
    axis * (2.0 * axis.dot(source)) - source
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_vec_eq(a: &Vector3<f64>, b: &Vector3<f64>) {
        assert!((a - b).norm() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_look_from_axis_aligned() {
        let frame = Frame::look_from(&Vector3::new(0.0, 0.0, 10.0), &Vector3::y()).unwrap();
        assert_vec_eq(frame.forward(), &Vector3::z());
        assert_vec_eq(frame.up(), &Vector3::y());
        assert_vec_eq(frame.right(), &Vector3::x());
    }

    #[test]
    fn test_look_from_projects_up_hint() {
        let frame = Frame::look_from(&Vector3::new(2.0, 2.0, 5.0), &Vector3::y()).unwrap();
        assert!(frame.orthonormality_error() < 1e-12);
        // The hint keeps its sign after projection.
        assert!(frame.up().y > 0.0);
        assert_vec_eq(frame.right(), &frame.up().cross(frame.forward()));
    }

    #[test]
    fn test_look_from_rejects_degenerate_input() {
        assert_eq!(
            Frame::look_from(&Vector3::zeros(), &Vector3::y()),
            Err(ViewError::ZeroDirection)
        );
        assert_eq!(
            Frame::look_from(&Vector3::z(), &Vector3::zeros()),
            Err(ViewError::ZeroUp)
        );
        assert_eq!(
            Frame::look_from(&Vector3::new(0.0, 3.0, 0.0), &Vector3::new(0.0, -1.0, 0.0)),
            Err(ViewError::ParallelUp)
        );
    }

    #[test]
    fn test_look_from_accepts_any_finite_magnitude() {
        let frame = Frame::look_from(&Vector3::new(1e-7, 0.0, 0.0), &Vector3::y()).unwrap();
        assert_vec_eq(frame.forward(), &Vector3::x());

        let frame = Frame::look_from(&Vector3::z(), &Vector3::new(0.0, 1e-7, 0.0)).unwrap();
        assert_vec_eq(frame.up(), &Vector3::y());

        let frame = Frame::look_from(&Vector3::new(1e200, 1e200, 1e200), &Vector3::y()).unwrap();
        assert!(frame.orthonormality_error() < 1e-12);
        assert_vec_eq(frame.forward(), &(Vector3::new(1.0, 1.0, 1.0) / 3.0_f64.sqrt()));
    }

    #[test]
    fn test_look_from_rejects_non_finite_input() {
        assert_eq!(
            Frame::look_from(&Vector3::new(f64::INFINITY, 0.0, 0.0), &Vector3::y()),
            Err(ViewError::NonFinite)
        );
        assert_eq!(
            Frame::look_from(&Vector3::z(), &Vector3::new(0.0, f64::NAN, 0.0)),
            Err(ViewError::NonFinite)
        );
    }

    #[test]
    fn test_reflect_keeps_axis_and_negates_orthogonal() {
        let axis = Vector3::x();
        assert_vec_eq(&reflect(&axis, &Vector3::x()), &Vector3::x());
        assert_vec_eq(&reflect(&axis, &Vector3::y()), &-Vector3::y());
        assert_vec_eq(&reflect(&axis, &Vector3::new(1.0, 2.0, 3.0)), &Vector3::new(1.0, -2.0, -3.0));
    }

    #[test]
    fn test_identity_drag_leaves_frame_unchanged() {
        let mut frame = Frame::look_from(&Vector3::new(2.0, 2.0, 5.0), &Vector3::y()).unwrap();
        let before = frame;
        let ray = Vector3::new(0.3, -0.2, 0.9);

        assert!(frame.apply_transvection(&ray, &ray));

        assert_vec_eq(frame.right(), before.right());
        assert_vec_eq(frame.up(), before.up());
        assert_vec_eq(frame.forward(), before.forward());
    }

    #[test]
    fn test_quarter_turn_fixes_rotation_axis() {
        let mut frame = Frame::identity();

        assert!(frame.apply_transvection(&Vector3::z(), &Vector3::x()));

        // Rotation about +/-Y: up is fixed, forward and right swap roles.
        assert_vec_eq(frame.up(), &Vector3::y());
        assert_vec_eq(frame.forward(), &-Vector3::x());
        assert_vec_eq(frame.right(), &Vector3::z());
    }

    #[test]
    fn test_degenerate_rays_are_skipped() {
        let mut frame = Frame::identity();
        assert!(!frame.apply_transvection(&Vector3::x(), &-Vector3::x()));
        assert!(!frame.apply_transvection(&Vector3::zeros(), &Vector3::x()));
        assert_eq!(frame, Frame::identity());
    }

    #[test]
    fn test_orthonormality_survives_long_drags() {
        let mut rng = StdRng::seed_from_u64(0x7472_6163);
        let mut frame = Frame::look_from(&Vector3::new(2.0, 2.0, 5.0), &Vector3::y()).unwrap();

        let mut random_ray = || {
            Vector3::new(
                rng.random_range(-1.0..1.0_f64),
                rng.random_range(-1.0..1.0_f64),
                rng.random_range(-1.0..1.0_f64),
            )
        };

        for _ in 0..10_000 {
            let e1 = random_ray();
            let e2 = random_ray();
            frame.apply_transvection(&e1, &e2);
        }

        assert!(frame.orthonormality_error() < 1e-5, "error {}", frame.orthonormality_error());
        // Still right-handed.
        assert!((frame.up().cross(frame.forward()) - frame.right()).norm() < 1e-5);
    }

    #[test]
    fn test_rotation_rows() {
        let frame = Frame::identity();
        assert!((frame.rotation() - Matrix3::identity()).norm() < 1e-12);
    }
}

//! Wheel zoom policy. Bounds live here, not in the rotator.

/// Maps wheel deltas onto a clamped view distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomPolicy {
    pub min: f64,
    pub max: f64,
    /// Distance change per unit of wheel delta.
    pub speed: f64,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self {
            min: 5.0,
            max: 30.0,
            speed: 0.01,
        }
    }
}

impl ZoomPolicy {
    pub fn clamp(&self, distance: f64) -> f64 {
        distance.max(self.min).min(self.max)
    }

    /// New distance after a wheel event with vertical delta `delta_y`.
    /// Positive deltas (scrolling down) move the camera away.
    pub fn apply(&self, current: f64, delta_y: f64) -> f64 {
        self.clamp(current + delta_y * self.speed)
    }
}

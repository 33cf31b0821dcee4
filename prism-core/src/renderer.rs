//! Seams between the rotator and the platform front ends.

use nalgebra::Matrix4;

use crate::projection::Projection;

/// Interactive surface the trackball is laid over.
pub trait Surface {
    /// Client size in the same units pointer positions are reported in.
    fn client_size(&self) -> (f64, f64);
}

impl Surface for (f64, f64) {
    fn client_size(&self) -> (f64, f64) {
        *self
    }
}

/// Something that can draw the scene for a given view matrix.
///
/// Renderers only ever read the matrix they are handed; orientation state
/// stays with the [`crate::Rotator`].
pub trait Renderer {
    type Error;

    /// Drawing buffer size in device pixels (or cells).
    fn viewport_size(&self) -> (u32, u32);

    /// Perspective used for the next frame.
    fn projection(&self) -> Projection;

    /// Draw one frame with the given world-to-camera matrix.
    fn draw(&mut self, view: &Matrix4<f32>) -> Result<(), Self::Error>;
}

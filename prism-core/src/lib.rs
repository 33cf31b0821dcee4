//! Prism Core Library - trackball rotation and shared scene logic
//!
//! This library provides the platform-independent half of the prism viewer:
//! the [`Rotator`] that turns pointer drags into a drift-free camera
//! orientation, plus the geometry, projection, lighting and configuration
//! that the web and terminal front ends render with.

pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod lighting;
pub mod projection;
pub mod renderer;
pub mod rotator;
pub mod trackball;
pub mod transform;
pub mod zoom;

// Re-export commonly used types
pub use config::SceneConfig;
pub use error::{ConfigError, ViewError};
pub use frame::Frame;
pub use geometry::{AxisLines, Mesh, Triangle, Vertex};
pub use lighting::DirectionalLight;
pub use projection::Projection;
pub use renderer::{Renderer, Surface};
pub use rotator::{RepaintCallback, Rotator, ViewOptions};
pub use trackball::ControlRegion;
pub use transform::Transform;
pub use zoom::ZoomPolicy;

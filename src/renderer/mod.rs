//! CPU rendering module
//!
//! Rasterizes the world into RGB frames. Read-only with respect to the
//! simulation; origin top-left, +Y down (same as the physics).

pub mod frame;
pub mod raster;
pub mod shapes;

pub use frame::Frame;
pub use raster::FrameRenderer;

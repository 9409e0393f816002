//! Software 3D rasterization pipeline
//!
//! Per frame: transform mesh vertices by the composed world matrix, cull
//! backfaces, light each face, perspective-project to screen space, sort
//! farthest-first, then rasterize into the color buffer. No z-buffer and
//! no frustum clipping; depth ordering is the painter's algorithm over
//! per-triangle average depth.

mod math;
mod types;
mod pipeline;
mod render;

pub use math::*;
pub use types::*;
pub use pipeline::*;
pub use render::*;

/// Default framebuffer dimensions
pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 600;

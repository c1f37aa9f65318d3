//! Rendering module
//!
//! Frames are built on the CPU as plain triangle lists and handed to a
//! [`RenderSurface`]: WebGPU in the browser, memory when headless.

pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod surface;
pub mod vertex;

pub use frame::{Frame, render};
pub use pipeline::GpuSurface;
pub use surface::{HeadlessSurface, RenderSurface};
pub use vertex::Vertex;

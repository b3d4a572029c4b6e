//! WebGPU rendering module
//!
//! The whole court (sky, hoops, ball, aim guide, particles) is drawn by one
//! fullscreen SDF fragment shader fed from two uniform buffers.

pub mod sdf_pipeline;

pub use sdf_pipeline::{MAX_PARTICLES, RenderInitError, SdfRenderState};

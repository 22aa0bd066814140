//! wgpu render backend for the scroll scene.
//!
//! Draws the environment cube map as a fullscreen background, then every
//! scene mesh as instanced primitives reflecting that environment.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Geometry is uploaded once; only instance transforms and uniforms change per frame.

mod camera;
mod gpu;
pub mod primitives;
mod shaders;

pub use camera::SceneCamera;
pub use gpu::WgpuRenderer;

//! # Turntable
//!
//! **A single mesh, spinning in front of a fixed camera.**
//!
//! Every frame the clock advances by one fixed step, the composer turns the
//! elapsed time into model, view, projection and normal matrices, and the
//! renderer uploads them as one uniform block and draws the mesh with a depth
//! test.
//!
//! ## Quick Start
//!
//! ```no_run
//! use turntable::{AppConfig, FrameComposer, Handedness, MeshSource};
//!
//! fn main() -> Result<(), turntable::AppError> {
//!     let composer = FrameComposer::new().with_handedness(Handedness::Left);
//!     turntable::run(
//!         AppConfig::new()
//!             .mesh(MeshSource::Cube)
//!             .frame_rate(60.0)
//!             .composer(composer),
//!     )
//! }
//! ```
//!
//! The pieces are usable without a window: [`math`] is plain `glam`
//! arithmetic and [`FrameComposer::compose`] is a pure function of elapsed
//! time and aspect ratio.

mod app;
mod composer;
mod geometry;
mod gpu;
pub mod math;
mod mesh;
mod renderer;
mod shading;
mod texture;
mod uniforms;

pub use app::{AppConfig, AppError, run};
pub use composer::{FrameClock, FrameComposer, FrameTransforms};
pub use geometry::{GeometryError, MeshSource, load_obj, load_stl, parse_obj, parse_stl};
pub use gpu::{GpuContext, RenderError};
pub use math::{Handedness, MathError};
pub use mesh::{Mesh, MeshData, Vertex};
pub use renderer::{FrameOutcome, Renderer};
pub use shading::{
    DefaultMaterial, Light, LightSource, MAX_LIGHTS, Material, MaterialSource, NoLights,
    NoTexture, Shading, TextureSource,
};
pub use texture::Texture;
pub use uniforms::FrameUniforms;

// Re-export the glam types that appear in the public API.
pub use glam::{Mat3, Mat4, Vec3, Vec4};

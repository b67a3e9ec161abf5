//! Rendering data module
//!
//! Buffer layouts and per-frame instance data for a wgpu backend. No device
//! or surface code lives here; the windowing layer owns those.

pub mod shapes;
pub mod vertex;

pub use shapes::{BoxMesh, SceneInstances};
pub use vertex::{Instance, colors};

//! GPU object creation seam.
//!
//! Everything above this module talks to the GPU through [`GpuBackend`]. The
//! production implementation is [`WgpuBackend`]; tests use a recording backend
//! that counts what would have been created.
//!
//! All methods take `&self`: creation happens on the render thread while the
//! backend's device is alive, and no method mutates shared state that another
//! caller could observe half-done.

mod error;
mod wgpu_backend;

#[cfg(test)]
pub(crate) mod testing;

pub use error::ResourceError;
pub use wgpu_backend::{WgpuBackend, WgpuProgram, WgpuTexture};

use crate::binding::BindingPlan;

/// Role of a geometry buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
}

/// Creates the GPU objects the engine needs.
///
/// Associated types are owned handles; dropping one releases the GPU object.
pub trait GpuBackend {
    type Buffer;
    type Program;
    type Binding;
    type Texture;

    /// Creates an immutable buffer initialised with `contents`.
    fn create_buffer(
        &self,
        kind: BufferKind,
        label: &str,
        contents: &[u8],
    ) -> Result<Self::Buffer, ResourceError>;

    /// Hands a program's source to the device.
    fn create_program(&self, name: &str, source: &str) -> Result<Self::Program, ResourceError>;

    /// Creates the vertex binding object for `program` described by `plan`.
    fn create_binding(
        &self,
        program: &Self::Program,
        plan: &BindingPlan,
    ) -> Result<Self::Binding, ResourceError>;

    /// Uploads a 2D RGBA8 texture.
    fn create_texture(
        &self,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<Self::Texture, ResourceError>;
}

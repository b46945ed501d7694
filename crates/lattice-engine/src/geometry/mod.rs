//! Geometry: shared GPU buffers and the submeshes that index into them.
//!
//! A [`Mesh`] owns exactly one [`GeometryBuffer`] (one vertex buffer, one index
//! buffer). Its submeshes are byte ranges inside those buffers, each with its
//! own attribute layout and its own binding cache.
//!
//! CPU-side input is [`MeshData`]; [`primitives`] builds the embedded shapes.

mod buffer;
mod error;
mod mesh;
pub mod primitives;

pub use buffer::GeometryBuffer;
pub use error::GeometryError;
pub use mesh::{Mesh, MeshData, MeshId, Submesh, SubmeshData};

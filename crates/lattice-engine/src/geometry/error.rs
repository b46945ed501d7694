use thiserror::Error;

use crate::backend::ResourceError;

/// Mesh data could not be turned into GPU geometry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("mesh '{mesh}' has no submeshes")]
    NoSubmeshes { mesh: String },

    #[error("submesh {submesh} has {floats} floats, not a whole number of {per_vertex}-float vertices")]
    PartialVertex {
        submesh: usize,
        floats: usize,
        per_vertex: u32,
    },

    #[error("submesh {submesh} has no indices")]
    NoIndices { submesh: usize },

    #[error("submesh {submesh} references vertex {index}, but only has {vertex_count}")]
    IndexOutOfRange {
        submesh: usize,
        index: u32,
        vertex_count: u32,
    },

    #[error("submesh {submesh} has {len} {what}, more than a u32 can count")]
    TooLarge {
        submesh: usize,
        what: &'static str,
        len: usize,
    },

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

use crate::backend::{BufferKind, GpuBackend, ResourceError};

/// One vertex buffer and one index buffer shared by all submeshes of a mesh.
///
/// Populated once and never written again. Knows sizes, not attribute meaning.
#[derive(Debug)]
pub struct GeometryBuffer<Buf> {
    vertices: Buf,
    indices: Buf,
    vertex_bytes: u64,
    index_bytes: u64,
}

impl<Buf> GeometryBuffer<Buf> {
    /// Uploads `vertices` and `indices`.
    ///
    /// Either both buffers are created or neither is kept: if the index buffer
    /// fails, the already-created vertex buffer is dropped before returning.
    pub fn new<B>(backend: &B, label: &str, vertices: &[f32], indices: &[u32]) -> Result<Self, ResourceError>
    where
        B: GpuBackend<Buffer = Buf>,
    {
        let vertex_label = format!("{label} vertices");
        let index_label = format!("{label} indices");

        let vbo = backend.create_buffer(BufferKind::Vertex, &vertex_label, bytemuck::cast_slice(vertices))?;
        let ibo = backend.create_buffer(BufferKind::Index, &index_label, bytemuck::cast_slice(indices))?;

        Ok(Self {
            vertices: vbo,
            indices: ibo,
            vertex_bytes: std::mem::size_of_val(vertices) as u64,
            index_bytes: std::mem::size_of_val(indices) as u64,
        })
    }

    #[inline]
    pub fn vertex_buffer(&self) -> &Buf {
        &self.vertices
    }

    #[inline]
    pub fn index_buffer(&self) -> &Buf {
        &self.indices
    }

    /// Size of the vertex buffer in bytes.
    #[inline]
    pub fn vertex_bytes(&self) -> u64 {
        self.vertex_bytes
    }

    /// Size of the index buffer in bytes.
    #[inline]
    pub fn index_bytes(&self) -> u64 {
        self.index_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::RecordingBackend;

    #[test]
    fn uploads_both_buffers() {
        let backend = RecordingBackend::new();
        let geometry = GeometryBuffer::new(&backend, "tri", &[0.0; 9], &[0, 1, 2]).unwrap();

        assert_eq!(geometry.vertex_bytes(), 36);
        assert_eq!(geometry.index_bytes(), 12);
        assert_eq!(geometry.vertex_buffer().kind, BufferKind::Vertex);
        assert_eq!(geometry.index_buffer().kind, BufferKind::Index);
        assert_eq!(geometry.index_buffer().contents.len(), 12);
        assert_eq!(backend.buffers_created.get(), 2);
    }

    #[test]
    fn index_failure_fails_the_whole_load() {
        let backend = RecordingBackend::new();
        backend.buffer_budget.set(Some(1));

        let result = GeometryBuffer::new(&backend, "tri", &[0.0; 9], &[0, 1, 2]);
        assert!(result.is_err());
        assert_eq!(backend.buffers_created.get(), 1);
    }

    #[test]
    fn empty_vertices_are_rejected() {
        let backend = RecordingBackend::new();
        let err = GeometryBuffer::new(&backend, "empty", &[], &[0]).unwrap_err();
        assert!(matches!(err, ResourceError::EmptyBuffer { kind: BufferKind::Vertex, .. }));
    }
}

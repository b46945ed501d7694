use std::ops::Range;

use crate::backend::GpuBackend;
use crate::binding::{BindingCache, BindingError};
use crate::layout::{VertexBufferLayout, COMPONENT_SIZE};
use crate::resources::Program;

use super::{GeometryBuffer, GeometryError};

const INDEX_SIZE: u64 = std::mem::size_of::<u32>() as u64;

/// Index of a mesh registered with the renderer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) u32);

/// CPU-side submesh: interleaved `f32` vertices described by `layout`, and
/// indices local to this submesh's vertices.
#[derive(Debug, Clone)]
pub struct SubmeshData {
    pub layout: VertexBufferLayout,
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl SubmeshData {
    pub fn new(layout: VertexBufferLayout, vertices: Vec<f32>, indices: Vec<u32>) -> Self {
        Self {
            layout,
            vertices,
            indices,
        }
    }

    /// Checks the submesh and returns its `(vertex_count, index_count)`.
    fn validate(&self, submesh: usize) -> Result<(u32, u32), GeometryError> {
        let per_vertex = self.layout.floats_per_vertex();
        if self.vertices.len() % per_vertex as usize != 0 {
            return Err(GeometryError::PartialVertex {
                submesh,
                floats: self.vertices.len(),
                per_vertex,
            });
        }
        if self.indices.is_empty() {
            return Err(GeometryError::NoIndices { submesh });
        }

        let vertex_count = count_u32(submesh, "vertices", self.vertices.len() / per_vertex as usize)?;
        let index_count = count_u32(submesh, "indices", self.indices.len())?;

        if let Some(&index) = self.indices.iter().find(|&&i| i >= vertex_count) {
            return Err(GeometryError::IndexOutOfRange {
                submesh,
                index,
                vertex_count,
            });
        }
        Ok((vertex_count, index_count))
    }
}

fn count_u32(submesh: usize, what: &'static str, len: usize) -> Result<u32, GeometryError> {
    u32::try_from(len).map_err(|_| GeometryError::TooLarge { submesh, what, len })
}

/// CPU-side mesh as produced by a loader or [`super::primitives`].
#[derive(Debug, Clone)]
pub struct MeshData {
    pub name: String,
    pub submeshes: Vec<SubmeshData>,
}

impl MeshData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            submeshes: Vec::new(),
        }
    }

    pub fn with_submesh(mut self, submesh: SubmeshData) -> Self {
        self.submeshes.push(submesh);
        self
    }
}

/// A drawable region of a mesh's geometry buffer.
///
/// Offsets are in bytes into the shared buffers. Indices are relative to the
/// submesh's first vertex.
#[derive(Debug)]
pub struct Submesh<H> {
    layout: VertexBufferLayout,
    vertex_offset: u64,
    vertex_count: u32,
    index_offset: u64,
    index_count: u32,
    bindings: BindingCache<H>,
}

impl<H> Submesh<H> {
    /// Returns the binding for drawing this submesh with `program`, creating
    /// it on first use.
    pub fn binding_for<B>(&mut self, backend: &B, program: &Program<B>) -> Result<&H, BindingError>
    where
        B: GpuBackend<Binding = H>,
    {
        self.bindings
            .get_or_create(backend, program, &self.layout, self.vertex_offset)
    }

    #[inline]
    pub fn layout(&self) -> &VertexBufferLayout {
        &self.layout
    }

    /// Byte offset of the first vertex in the geometry buffer.
    #[inline]
    pub fn vertex_offset(&self) -> u64 {
        self.vertex_offset
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Byte range of this submesh's vertices.
    pub fn vertex_range(&self) -> Range<u64> {
        let len = u64::from(self.vertex_count) * u64::from(self.layout.stride());
        self.vertex_offset..self.vertex_offset + len
    }

    /// Byte offset of the first index in the geometry buffer.
    #[inline]
    pub fn index_offset(&self) -> u64 {
        self.index_offset
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Byte range of this submesh's indices.
    pub fn index_range(&self) -> Range<u64> {
        self.index_offset..self.index_offset + u64::from(self.index_count) * INDEX_SIZE
    }

    #[inline]
    pub fn bindings(&self) -> &BindingCache<H> {
        &self.bindings
    }
}

/// Uploaded mesh: one geometry buffer, many submeshes.
pub struct Mesh<B: GpuBackend> {
    name: String,
    // Field order is drop order: bindings go before the buffers they read.
    submeshes: Vec<Submesh<B::Binding>>,
    geometry: GeometryBuffer<B::Buffer>,
}

impl<B: GpuBackend> Mesh<B> {
    /// Concatenates every submesh into one vertex and one index buffer and
    /// uploads them. Validation runs before any GPU work.
    pub fn upload(backend: &B, data: &MeshData) -> Result<Self, GeometryError> {
        if data.submeshes.is_empty() {
            return Err(GeometryError::NoSubmeshes {
                mesh: data.name.clone(),
            });
        }

        let mut vertices: Vec<f32> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();
        let mut submeshes = Vec::with_capacity(data.submeshes.len());

        for (i, sub) in data.submeshes.iter().enumerate() {
            let (vertex_count, index_count) = sub.validate(i)?;

            submeshes.push(Submesh {
                layout: sub.layout.clone(),
                vertex_offset: vertices.len() as u64 * u64::from(COMPONENT_SIZE),
                vertex_count,
                index_offset: indices.len() as u64 * INDEX_SIZE,
                index_count,
                bindings: BindingCache::new(),
            });

            vertices.extend_from_slice(&sub.vertices);
            indices.extend_from_slice(&sub.indices);
        }

        let geometry = GeometryBuffer::new(backend, &data.name, &vertices, &indices)?;

        log::debug!(
            "uploaded mesh '{}' ({} submeshes, {} vertex bytes, {} index bytes)",
            data.name,
            submeshes.len(),
            geometry.vertex_bytes(),
            geometry.index_bytes()
        );

        Ok(Self {
            name: data.name.clone(),
            submeshes,
            geometry,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn geometry(&self) -> &GeometryBuffer<B::Buffer> {
        &self.geometry
    }

    #[inline]
    pub fn submeshes(&self) -> &[Submesh<B::Binding>] {
        &self.submeshes
    }

    /// Shared geometry alongside mutable submeshes, for drawing.
    pub fn split_mut(&mut self) -> (&GeometryBuffer<B::Buffer>, &mut [Submesh<B::Binding>]) {
        (&self.geometry, &mut self.submeshes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BufferKind;
    use crate::backend::testing::{RecordingBackend, Released};
    use crate::layout::ShaderInputLayout;
    use crate::resources::ProgramStore;

    fn pos_uv_submesh(vertex_count: usize) -> SubmeshData {
        SubmeshData::new(
            VertexBufferLayout::packed(&[(0, 3), (1, 2)]).unwrap(),
            vec![0.0; vertex_count * 5],
            vec![0, 1, 2],
        )
    }

    fn pos_normal_uv_submesh() -> SubmeshData {
        SubmeshData::new(
            VertexBufferLayout::packed(&[(0, 3), (1, 3), (2, 2)]).unwrap(),
            vec![0.0; 4 * 8],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn submesh_offsets_accumulate() {
        let backend = RecordingBackend::new();
        let data = MeshData::new("two")
            .with_submesh(pos_uv_submesh(3))
            .with_submesh(pos_normal_uv_submesh());

        let mesh = Mesh::upload(&backend, &data).unwrap();
        let [a, b] = mesh.submeshes() else { panic!("expected two submeshes") };

        assert_eq!(a.vertex_offset(), 0);
        assert_eq!(a.vertex_range(), 0..60);
        assert_eq!(a.index_range(), 0..12);

        assert_eq!(b.vertex_offset(), 60);
        assert_eq!(b.vertex_count(), 4);
        assert_eq!(b.vertex_range(), 60..188);
        assert_eq!(b.index_offset(), 12);
        assert_eq!(b.index_count(), 6);

        assert_eq!(mesh.geometry().vertex_bytes(), 188);
        assert_eq!(mesh.geometry().index_bytes(), 36);
        // One vertex and one index buffer for the whole mesh.
        assert_eq!(backend.buffers_created.get(), 2);
    }

    #[test]
    fn indices_stay_local_to_each_submesh() {
        let backend = RecordingBackend::new();
        let data = MeshData::new("two")
            .with_submesh(pos_uv_submesh(3))
            .with_submesh(pos_uv_submesh(3));

        let mesh = Mesh::upload(&backend, &data).unwrap();
        let expected: &[u8] = bytemuck::cast_slice::<u32, u8>(&[0, 1, 2, 0, 1, 2]);
        assert_eq!(mesh.geometry().index_buffer().contents.as_slice(), expected);
    }

    #[test]
    fn validation_runs_before_upload() {
        let backend = RecordingBackend::new();

        let mut bad = pos_uv_submesh(3);
        bad.indices = vec![0, 1, 3];
        let data = MeshData::new("bad").with_submesh(pos_uv_submesh(3)).with_submesh(bad);

        let err = Mesh::upload(&backend, &data).err();
        assert_eq!(
            err,
            Some(GeometryError::IndexOutOfRange { submesh: 1, index: 3, vertex_count: 3 })
        );
        assert_eq!(backend.buffers_created.get(), 0);
    }

    #[test]
    fn partial_vertex_is_rejected() {
        let backend = RecordingBackend::new();
        let mut bad = pos_uv_submesh(3);
        bad.vertices.pop();

        let err = Mesh::upload(&backend, &MeshData::new("bad").with_submesh(bad)).err();
        assert_eq!(
            err,
            Some(GeometryError::PartialVertex { submesh: 0, floats: 14, per_vertex: 5 })
        );
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let backend = RecordingBackend::new();
        let err = Mesh::upload(&backend, &MeshData::new("nothing")).err();
        assert_eq!(err, Some(GeometryError::NoSubmeshes { mesh: "nothing".into() }));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn counts_beyond_u32_are_rejected() {
        assert_eq!(count_u32(0, "indices", u32::MAX as usize), Ok(u32::MAX));

        let too_many = u32::MAX as usize + 1;
        assert_eq!(
            count_u32(2, "vertices", too_many),
            Err(GeometryError::TooLarge { submesh: 2, what: "vertices", len: too_many })
        );
    }

    #[test]
    fn dropping_a_mesh_releases_bindings_before_buffers() {
        let backend = RecordingBackend::new();
        let mut programs = ProgramStore::<RecordingBackend>::new();
        let id = programs
            .load(&backend, "flat", "src", ShaderInputLayout::from_pairs(&[(0, 3)]).unwrap())
            .unwrap();
        let program = programs.get(id).unwrap();

        let data = MeshData::new("two")
            .with_submesh(pos_uv_submesh(3))
            .with_submesh(pos_normal_uv_submesh());
        let mut mesh = Mesh::upload(&backend, &data).unwrap();
        let (_, submeshes) = mesh.split_mut();
        for submesh in submeshes.iter_mut() {
            submesh.binding_for(&backend, program).unwrap();
        }
        assert!(backend.drops.entries().is_empty());

        drop(mesh);

        let released = backend.drops.entries();
        assert_eq!(released.len(), 4);
        let first_buffer = released
            .iter()
            .position(|r| matches!(r, Released::Buffer(..)))
            .unwrap();
        let last_binding = released
            .iter()
            .rposition(|r| matches!(r, Released::Binding(_)))
            .unwrap();
        assert!(last_binding < first_buffer, "release order: {released:?}");
        assert!(released.iter().any(|r| matches!(r, Released::Buffer(BufferKind::Vertex, _))));
        assert!(released.iter().any(|r| matches!(r, Released::Buffer(BufferKind::Index, _))));
    }

    #[test]
    fn submesh_bindings_use_their_own_vertex_offset() {
        let backend = RecordingBackend::new();
        let mut programs = ProgramStore::<RecordingBackend>::new();
        let id = programs
            .load(&backend, "albedo", "src", ShaderInputLayout::from_pairs(&[(0, 3), (2, 2)]).unwrap())
            .unwrap();
        let program = programs.get(id).unwrap();

        let data = MeshData::new("two")
            .with_submesh(pos_normal_uv_submesh())
            .with_submesh(pos_normal_uv_submesh());
        let mut mesh = Mesh::upload(&backend, &data).unwrap();
        let (_, submeshes) = mesh.split_mut();

        let second = submeshes[1].binding_for(&backend, program).unwrap();
        let offsets: Vec<u64> = second.plan.directives().iter().map(|d| d.offset).collect();
        assert_eq!(offsets, vec![128, 152]);

        assert!(submeshes[0].bindings().is_empty());
        assert_eq!(submeshes[1].bindings().len(), 1);
    }

    #[test]
    fn missing_attribute_on_one_submesh_does_not_affect_another() {
        let backend = RecordingBackend::new();
        let mut programs = ProgramStore::<RecordingBackend>::new();
        let id = programs
            .load(&backend, "albedo", "src", ShaderInputLayout::from_pairs(&[(0, 3), (2, 2)]).unwrap())
            .unwrap();
        let program = programs.get(id).unwrap();

        let data = MeshData::new("mixed")
            .with_submesh(pos_uv_submesh(3))
            .with_submesh(pos_normal_uv_submesh());
        let mut mesh = Mesh::upload(&backend, &data).unwrap();
        let (_, submeshes) = mesh.split_mut();

        assert_eq!(
            submeshes[0].binding_for(&backend, program).err(),
            Some(BindingError::MissingAttribute { location: 2 })
        );
        assert!(submeshes[1].binding_for(&backend, program).is_ok());
        assert_eq!(backend.bindings_created.get(), 1);
    }
}

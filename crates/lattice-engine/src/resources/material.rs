use crate::geometry::MeshId;

use super::TextureId;

/// Index of a material registered with the renderer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) u32);

/// Surface description for one submesh.
///
/// Only `albedo_texture` feeds the current programs; the remaining fields are
/// carried for programs that read them.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub albedo: [f32; 3],
    pub emissive: [f32; 3],
    pub smoothness: f32,
    pub albedo_texture: TextureId,
    pub emissive_texture: Option<TextureId>,
    pub normal_texture: Option<TextureId>,
}

impl Material {
    pub fn new(name: impl Into<String>, albedo_texture: TextureId) -> Self {
        Self {
            name: name.into(),
            albedo: [1.0; 3],
            emissive: [0.0; 3],
            smoothness: 0.0,
            albedo_texture,
            emissive_texture: None,
            normal_texture: None,
        }
    }
}

/// A mesh plus one material per submesh.
///
/// `materials[i]` applies to submesh `i`; submeshes past the end of the list
/// fall back to the renderer's default material.
#[derive(Debug, Clone)]
pub struct Model {
    pub mesh: MeshId,
    pub materials: Vec<MaterialId>,
}

impl Model {
    pub fn new(mesh: MeshId, materials: Vec<MaterialId>) -> Self {
        Self { mesh, materials }
    }

    pub fn material_for(&self, submesh: usize) -> Option<MaterialId> {
        self.materials.get(submesh).copied()
    }
}

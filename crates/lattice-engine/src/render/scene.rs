use std::collections::HashSet;
use std::ops::Range;

use anyhow::{Context, Result};

use crate::backend::GpuBackend;
use crate::geometry::{primitives, GeometryBuffer, Mesh, MeshData, MeshId};
use crate::layout::ShaderInputLayout;
use crate::resources::{
    BuiltinTextures, Material, MaterialId, Model, ProgramId, ProgramStore, TextureId, TextureStore,
};

use super::Mode;

const TEXTURED_GEOMETRY_SRC: &str = include_str!("shaders/textured_geometry.wgsl");
const ALBEDO_MODEL_SRC: &str = include_str!("shaders/albedo_model.wgsl");

/// One submesh to draw with one program and one texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DrawItem {
    pub mesh: MeshId,
    pub submesh: usize,
    pub program: ProgramId,
    pub texture: TextureId,
}

/// Everything a backend needs to issue one indexed draw.
pub struct DrawCall<'a, B: GpuBackend> {
    pub item: DrawItem,
    pub binding: &'a B::Binding,
    pub geometry: &'a GeometryBuffer<B::Buffer>,
    pub texture: &'a B::Texture,
    /// Byte range of the submesh's vertices; bind the vertex buffer from here.
    pub vertex_range: Range<u64>,
    /// Byte range of the submesh's indices.
    pub index_range: Range<u64>,
    pub index_count: u32,
}

/// Outcome of walking one frame's draw list.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub drawn: usize,
    pub skipped: usize,
}

/// Backend-agnostic render state: resources, meshes, models, and the two
/// programs the mode switch chooses between.
pub struct Scene<B: GpuBackend> {
    programs: ProgramStore<B>,
    textures: TextureStore<B>,
    builtins: BuiltinTextures,

    meshes: Vec<Mesh<B>>,
    materials: Vec<Material>,
    models: Vec<Model>,

    quad: MeshId,
    textured_geometry: ProgramId,
    albedo_model: ProgramId,
    default_material: MaterialId,

    // Draws that already failed once; further failures are not logged again.
    reported: HashSet<DrawItem>,
}

impl<B: GpuBackend> Scene<B> {
    /// Loads the built-in programs, textures and the embedded quad.
    pub fn new(backend: &B) -> Result<Self> {
        let mut programs = ProgramStore::new();
        let textured_geometry = programs.load(
            backend,
            "TEXTURED_GEOMETRY",
            TEXTURED_GEOMETRY_SRC,
            ShaderInputLayout::from_pairs(&[
                (primitives::POSITION, 3),
                (primitives::QUAD_TEXCOORD, 2),
            ])?,
        )?;
        let albedo_model = programs.load(
            backend,
            "ALBEDO_MODEL",
            ALBEDO_MODEL_SRC,
            ShaderInputLayout::from_pairs(&[
                (primitives::POSITION, 3),
                (primitives::MESH_TEXCOORD, 2),
            ])?,
        )?;

        let mut textures = TextureStore::new();
        let builtins = BuiltinTextures::load(&mut textures, backend)?;

        let mut scene = Self {
            programs,
            textures,
            builtins,
            meshes: Vec::new(),
            materials: Vec::new(),
            models: Vec::new(),
            quad: MeshId(0),
            textured_geometry,
            albedo_model,
            default_material: MaterialId(0),
            reported: HashSet::new(),
        };

        scene.quad = scene.add_mesh(backend, &primitives::quad()?)?;
        scene.default_material = scene.add_material(Material::new("default", builtins.white));

        Ok(scene)
    }

    pub fn add_mesh(&mut self, backend: &B, data: &MeshData) -> Result<MeshId> {
        let mesh = Mesh::upload(backend, data)
            .with_context(|| format!("failed to upload mesh '{}'", data.name))?;
        let id = MeshId(self.meshes.len() as u32);
        self.meshes.push(mesh);
        Ok(id)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);
        id
    }

    /// Registers a model. Its mesh must already be loaded.
    pub fn add_model(&mut self, model: Model) -> Result<usize> {
        anyhow::ensure!(
            (model.mesh.0 as usize) < self.meshes.len(),
            "model references unknown mesh {:?}",
            model.mesh
        );
        self.models.push(model);
        Ok(self.models.len() - 1)
    }

    pub fn upload_texture(
        &mut self,
        backend: &B,
        name: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<TextureId> {
        self.textures.upload_rgba8(backend, name, width, height, rgba)
    }

    #[inline]
    pub fn builtins(&self) -> &BuiltinTextures {
        &self.builtins
    }

    #[inline]
    pub fn programs(&self) -> &ProgramStore<B> {
        &self.programs
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh<B>> {
        self.meshes.get(id.0 as usize)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    #[inline]
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// What `mode` draws, in submission order.
    pub fn draw_list(&self, mode: Mode) -> Vec<DrawItem> {
        match mode {
            Mode::TexturedQuad => vec![DrawItem {
                mesh: self.quad,
                submesh: 0,
                program: self.textured_geometry,
                texture: self.builtins.checker,
            }],
            Mode::Mesh => {
                let mut items = Vec::new();
                for model in &self.models {
                    let Some(mesh) = self.mesh(model.mesh) else { continue };
                    for submesh in 0..mesh.submeshes().len() {
                        let material = model
                            .material_for(submesh)
                            .and_then(|m| self.material(m))
                            .or_else(|| self.material(self.default_material));
                        let texture = material.map_or(self.builtins.magenta, |m| m.albedo_texture);

                        items.push(DrawItem {
                            mesh: model.mesh,
                            submesh,
                            program: self.albedo_model,
                            texture,
                        });
                    }
                }
                items
            }
        }
    }

    /// Resolves a binding for every item of `mode`'s draw list and hands each
    /// ready draw to `draw`.
    ///
    /// Items whose binding cannot be produced are skipped; the error is logged
    /// the first time a given item fails. The rest of the frame still draws.
    pub fn visit_draws<F>(&mut self, backend: &B, mode: Mode, mut draw: F) -> DrawStats
    where
        F: FnMut(DrawCall<'_, B>),
    {
        let mut stats = DrawStats::default();

        for item in self.draw_list(mode) {
            let (Some(program), Some(texture), Some(mesh)) = (
                self.programs.get(item.program),
                self.textures.get(item.texture),
                self.meshes.get_mut(item.mesh.0 as usize),
            ) else {
                stats.skipped += 1;
                continue;
            };

            let (geometry, submeshes) = mesh.split_mut();
            let Some(submesh) = submeshes.get_mut(item.submesh) else {
                stats.skipped += 1;
                continue;
            };

            let vertex_range = submesh.vertex_range();
            let index_range = submesh.index_range();
            let index_count = submesh.index_count();

            let binding = match submesh.binding_for(backend, program) {
                Ok(binding) => binding,
                Err(err) => {
                    if self.reported.insert(item) {
                        log::error!(
                            "skipping draw of submesh {} of mesh {:?} with '{}': {err}",
                            item.submesh,
                            item.mesh,
                            program.name()
                        );
                    }
                    stats.skipped += 1;
                    continue;
                }
            };

            draw(DrawCall {
                item,
                binding,
                geometry,
                texture,
                vertex_range,
                index_range,
                index_count,
            });
            stats.drawn += 1;
        }

        stats
    }
}

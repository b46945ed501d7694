use anyhow::Result;

use crate::backend::WgpuBackend;
use crate::geometry::{MeshData, MeshId};
use crate::resources::{BuiltinTextures, Material, MaterialId, Model, TextureId};

use super::scene::{DrawStats, Scene};
use super::{Mode, RenderTarget};

/// Startup options for [`Renderer`].
#[derive(Debug, Clone, Copy)]
pub struct RendererConfig {
    pub mode: Mode,
    pub clear_color: wgpu::Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            clear_color: wgpu::Color {
                r: 0.08,
                g: 0.08,
                b: 0.10,
                a: 1.0,
            },
        }
    }
}

/// Draws either the embedded textured quad or every registered model,
/// depending on the current [`Mode`].
///
/// Binding objects are created lazily on the first frame that needs them and
/// reused afterwards. Switching modes only changes which cached bindings are
/// used.
pub struct Renderer {
    config: RendererConfig,
    // Scene before backend: GPU objects drop before the device handle.
    scene: Scene<WgpuBackend>,
    backend: WgpuBackend,
}

impl Renderer {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        config: RendererConfig,
    ) -> Result<Self> {
        let backend = WgpuBackend::new(device, queue, surface_format);
        let scene = Scene::new(&backend)?;

        log::info!(
            "renderer ready: format={:?}, mode={}",
            surface_format,
            config.mode
        );

        Ok(Self {
            config,
            scene,
            backend,
        })
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.config.mode != mode {
            log::info!("render mode: {} -> {}", self.config.mode, mode);
            self.config.mode = mode;
        }
    }

    #[inline]
    pub fn builtin_textures(&self) -> BuiltinTextures {
        *self.scene.builtins()
    }

    pub fn add_mesh(&mut self, data: &MeshData) -> Result<MeshId> {
        self.scene.add_mesh(&self.backend, data)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.scene.add_material(material)
    }

    pub fn add_model(&mut self, model: Model) -> Result<usize> {
        self.scene.add_model(model)
    }

    pub fn upload_texture(&mut self, name: &str, width: u32, height: u32, rgba: &[u8]) -> Result<TextureId> {
        self.scene.upload_texture(&self.backend, name, width, height, rgba)
    }

    /// Clears the target and records this frame's draws into one pass.
    pub fn render(&mut self, target: &mut RenderTarget<'_>) -> DrawStats {
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lattice scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.config.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if target.viewport.is_empty() {
            return DrawStats::default();
        }

        rpass.set_viewport(
            0.0,
            0.0,
            target.viewport.width as f32,
            target.viewport.height as f32,
            0.0,
            1.0,
        );

        self.scene
            .visit_draws(&self.backend, self.config.mode, |call| {
                // The pipeline has to be bound before anything it describes.
                rpass.set_pipeline(call.binding);
                rpass.set_bind_group(0, &call.texture.bind_group, &[]);
                rpass.set_vertex_buffer(0, call.geometry.vertex_buffer().slice(call.vertex_range));
                rpass.set_index_buffer(
                    call.geometry.index_buffer().slice(call.index_range),
                    wgpu::IndexFormat::Uint32,
                );
                rpass.draw_indexed(0..call.index_count, 0, 0..1);
            })
    }
}

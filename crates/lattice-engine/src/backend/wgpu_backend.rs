use wgpu::util::DeviceExt;

use crate::binding::{BindingDirective, BindingPlan, ComponentType};

use super::{BufferKind, GpuBackend, ResourceError};

/// Entry point names every program source must define.
pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Compiled program: shader module plus the pipeline layout shared by all of
/// its bindings.
pub struct WgpuProgram {
    label: String,
    module: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
}

/// Uploaded texture with a ready bind group (group 0: view + sampler).
pub struct WgpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
}

/// [`GpuBackend`] over a wgpu device.
///
/// A binding object is a `wgpu::RenderPipeline`: wgpu bakes the vertex
/// attribute layout into the pipeline, so one pipeline per `(submesh, program)`
/// pair plays the role of a vertex array object.
///
/// Attribute offsets inside a pipeline are relative to the bound buffer range.
/// Renderers bind the vertex buffer starting at the submesh's first vertex and
/// the backend rebases each directive by [`BindingPlan::base_offset`].
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    color_format: wgpu::TextureFormat,

    texture_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl WgpuBackend {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, color_format: wgpu::TextureFormat) -> Self {
        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lattice texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lattice linear sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            device,
            queue,
            color_format,
            texture_bgl,
            sampler,
        }
    }

    fn check_limit(what: &'static str, requested: u64, limit: u64) -> Result<(), ResourceError> {
        if requested > limit {
            return Err(ResourceError::LimitExceeded {
                what,
                requested,
                limit,
            });
        }
        Ok(())
    }

    /// Runs `create` inside out-of-memory and validation error scopes.
    ///
    /// A captured error becomes [`ResourceError::Rejected`] and the created
    /// object is dropped.
    fn scoped<T>(&self, label: &str, create: impl FnOnce() -> T) -> Result<T, ResourceError> {
        let oom = self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let validation = self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let value = create();

        // Scopes pop innermost first.
        let validation_error = pollster::block_on(validation.pop());
        let oom_error = pollster::block_on(oom.pop());

        captured(label, validation_error.or(oom_error))?;
        Ok(value)
    }

    fn upload_texture(&self, label: &str, size: wgpu::Extent3d, rgba: &[u8]) -> WgpuTexture {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size.width * 4),
                rows_per_image: Some(size.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.texture_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        WgpuTexture {
            texture,
            view,
            bind_group,
        }
    }
}

/// Maps an error captured by an error scope to [`ResourceError::Rejected`].
fn captured<E: std::fmt::Display>(label: &str, error: Option<E>) -> Result<(), ResourceError> {
    match error {
        Some(err) => Err(ResourceError::Rejected {
            label: label.to_string(),
            message: err.to_string(),
        }),
        None => Ok(()),
    }
}

impl GpuBackend for WgpuBackend {
    type Buffer = wgpu::Buffer;
    type Program = WgpuProgram;
    type Binding = wgpu::RenderPipeline;
    type Texture = WgpuTexture;

    fn create_buffer(
        &self,
        kind: BufferKind,
        label: &str,
        contents: &[u8],
    ) -> Result<wgpu::Buffer, ResourceError> {
        if contents.is_empty() {
            return Err(ResourceError::EmptyBuffer {
                kind,
                label: label.to_string(),
            });
        }

        let limits = self.device.limits();
        Self::check_limit("buffer size", contents.len() as u64, limits.max_buffer_size)?;

        let usage = match kind {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
            BufferKind::Index => wgpu::BufferUsages::INDEX,
        };

        log::debug!("creating {kind:?} buffer '{label}' ({} bytes)", contents.len());

        self.scoped(label, || {
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
        })
    }

    fn create_program(&self, name: &str, source: &str) -> Result<WgpuProgram, ResourceError> {
        for entry in [VERTEX_ENTRY, FRAGMENT_ENTRY] {
            if !source.contains(entry) {
                return Err(ResourceError::Rejected {
                    label: name.to_string(),
                    message: format!("source has no `{entry}` entry point"),
                });
            }
        }

        self.scoped(name, || {
            let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(name),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

            let pipeline_layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(name),
                bind_group_layouts: &[&self.texture_bgl],
                immediate_size: 0,
            });

            WgpuProgram {
                label: name.to_string(),
                module,
                pipeline_layout,
            }
        })
    }

    fn create_binding(
        &self,
        program: &WgpuProgram,
        plan: &BindingPlan,
    ) -> Result<wgpu::RenderPipeline, ResourceError> {
        let limits = self.device.limits();
        Self::check_limit(
            "vertex attribute count",
            plan.directives().len() as u64,
            u64::from(limits.max_vertex_attributes),
        )?;
        Self::check_limit(
            "vertex stride",
            u64::from(plan.stride()),
            u64::from(limits.max_vertex_buffer_array_stride),
        )?;

        let mut attributes = Vec::with_capacity(plan.directives().len());
        for d in plan.directives() {
            Self::check_limit(
                "shader location",
                u64::from(d.location) + 1,
                u64::from(limits.max_vertex_attributes),
            )?;
            attributes.push(wgpu::VertexAttribute {
                format: vertex_format(d),
                offset: plan.relative_offset(d),
                shader_location: d.location,
            });
        }

        let vertex_layouts = [wgpu::VertexBufferLayout {
            array_stride: u64::from(plan.stride()),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attributes,
        }];
        let targets = [Some(wgpu::ColorTargetState {
            format: self.color_format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        log::debug!(
            "creating binding for '{}' ({} attributes, stride {})",
            program.label,
            attributes.len(),
            plan.stride()
        );

        let descriptor = wgpu::RenderPipelineDescriptor {
            label: Some(program.label.as_str()),
            layout: Some(&program.pipeline_layout),

            vertex: wgpu::VertexState {
                module: &program.module,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &vertex_layouts,
            },

            fragment: Some(wgpu::FragmentState {
                module: &program.module,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &targets,
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        };

        self.scoped(&program.label, || self.device.create_render_pipeline(&descriptor))
    }

    fn create_texture(
        &self,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<WgpuTexture, ResourceError> {
        if width == 0 || height == 0 {
            return Err(ResourceError::Rejected {
                label: label.to_string(),
                message: format!("zero-sized texture ({width}x{height})"),
            });
        }

        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(ResourceError::TextureSize {
                label: label.to_string(),
                expected,
                actual: rgba.len(),
            });
        }

        let limits = self.device.limits();
        let max_dim = u64::from(limits.max_texture_dimension_2d);
        Self::check_limit("texture width", u64::from(width), max_dim)?;
        Self::check_limit("texture height", u64::from(height), max_dim)?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        self.scoped(label, || self.upload_texture(label, size, rgba))
    }
}

fn vertex_format(directive: &BindingDirective) -> wgpu::VertexFormat {
    match (directive.component_type, directive.component_count) {
        (ComponentType::Float32, 1) => wgpu::VertexFormat::Float32,
        (ComponentType::Float32, 2) => wgpu::VertexFormat::Float32x2,
        (ComponentType::Float32, 3) => wgpu::VertexFormat::Float32x3,
        // Layout validation caps component counts at 4.
        (ComponentType::Float32, _) => wgpu::VertexFormat::Float32x4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── error scopes ──

    #[test]
    fn captured_error_becomes_rejected() {
        let err = captured("tiles/lit", Some("vertex attribute 5 is not provided")).unwrap_err();
        assert_eq!(
            err,
            ResourceError::Rejected {
                label: "tiles/lit".into(),
                message: "vertex attribute 5 is not provided".into(),
            }
        );
    }

    #[test]
    fn empty_scope_is_ok() {
        assert_eq!(captured::<&str>("quad", None), Ok(()));
    }

    // ── vertex formats ──

    #[test]
    fn component_count_selects_format() {
        let directive = |count| BindingDirective {
            location: 0,
            component_count: count,
            component_type: ComponentType::Float32,
            normalized: false,
            stride: 16,
            offset: 0,
        };
        assert_eq!(vertex_format(&directive(1)), wgpu::VertexFormat::Float32);
        assert_eq!(vertex_format(&directive(2)), wgpu::VertexFormat::Float32x2);
        assert_eq!(vertex_format(&directive(3)), wgpu::VertexFormat::Float32x3);
        assert_eq!(vertex_format(&directive(4)), wgpu::VertexFormat::Float32x4);
    }
}

use anyhow::{Context, Result};

use crate::backend::GpuBackend;

/// Index of a texture inside a [`TextureStore`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(u32);

struct TextureEntry<T> {
    name: String,
    size: (u32, u32),
    raw: T,
}

/// Name-keyed texture store.
///
/// Uploading under a name that is already present returns the existing id and
/// performs no GPU work.
pub struct TextureStore<B: GpuBackend> {
    textures: Vec<TextureEntry<B::Texture>>,
}

impl<B: GpuBackend> Default for TextureStore<B> {
    fn default() -> Self {
        Self { textures: Vec::new() }
    }
}

impl<B: GpuBackend> TextureStore<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads tightly packed RGBA8 texels (`width * height * 4` bytes).
    pub fn upload_rgba8(
        &mut self,
        backend: &B,
        name: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<TextureId> {
        if let Some(id) = self.find(name) {
            return Ok(id);
        }

        let raw = backend
            .create_texture(name, width, height, rgba)
            .with_context(|| format!("failed to upload texture '{name}'"))?;

        let id = TextureId(self.textures.len() as u32);
        self.textures.push(TextureEntry {
            name: name.to_string(),
            size: (width, height),
            raw,
        });

        log::debug!("uploaded texture '{name}' ({width}x{height})");
        Ok(id)
    }

    pub fn find(&self, name: &str) -> Option<TextureId> {
        self.textures
            .iter()
            .position(|t| t.name == name)
            .map(|i| TextureId(i as u32))
    }

    pub fn get(&self, id: TextureId) -> Option<&B::Texture> {
        self.textures.get(id.0 as usize).map(|t| &t.raw)
    }

    pub fn size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.textures.get(id.0 as usize).map(|t| t.size)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Procedural fallback textures every renderer starts with.
#[derive(Debug, Copy, Clone)]
pub struct BuiltinTextures {
    pub white: TextureId,
    pub black: TextureId,
    pub magenta: TextureId,
    /// Flat tangent-space normal (0.5, 0.5, 1.0).
    pub normal: TextureId,
    pub checker: TextureId,
}

impl BuiltinTextures {
    const CHECKER_SIZE: u32 = 64;
    const CHECKER_CELL: u32 = 8;

    pub fn load<B: GpuBackend>(store: &mut TextureStore<B>, backend: &B) -> Result<Self> {
        let checker = checker_rgba8(
            Self::CHECKER_SIZE,
            Self::CHECKER_CELL,
            [235, 235, 235, 255],
            [40, 40, 48, 255],
        );

        Ok(Self {
            white: store.upload_rgba8(backend, "builtin:white", 1, 1, &[255, 255, 255, 255])?,
            black: store.upload_rgba8(backend, "builtin:black", 1, 1, &[0, 0, 0, 255])?,
            magenta: store.upload_rgba8(backend, "builtin:magenta", 1, 1, &[255, 0, 255, 255])?,
            normal: store.upload_rgba8(backend, "builtin:normal", 1, 1, &[128, 128, 255, 255])?,
            checker: store.upload_rgba8(
                backend,
                "builtin:checker",
                Self::CHECKER_SIZE,
                Self::CHECKER_SIZE,
                &checker,
            )?,
        })
    }
}

/// Square checkerboard, `size` texels wide, alternating every `cell` texels.
pub(crate) fn checker_rgba8(size: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Vec<u8> {
    let cell = cell.max(1);
    let mut out = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let texel = if ((x / cell) + (y / cell)) % 2 == 0 { a } else { b };
            out.extend_from_slice(&texel);
        }
    }
    out
}

use std::fmt;

use anyhow::{Context, Result};

use crate::backend::GpuBackend;
use crate::layout::ShaderInputLayout;

/// Opaque program identity.
///
/// Unique per load: loading the same source twice yields two ids, and bindings
/// are cached per id, not per layout content.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(u32);

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "program#{}", self.0)
    }
}

/// A loaded shader program and the vertex inputs it declares.
pub struct Program<B: GpuBackend> {
    id: ProgramId,
    name: String,
    input_layout: ShaderInputLayout,
    raw: B::Program,
}

impl<B: GpuBackend> Program<B> {
    #[inline]
    pub fn id(&self) -> ProgramId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn input_layout(&self) -> &ShaderInputLayout {
        &self.input_layout
    }

    /// Backend object (shader module + pipeline layout under wgpu).
    #[inline]
    pub fn raw(&self) -> &B::Program {
        &self.raw
    }
}

/// Owns every program the renderer has loaded.
pub struct ProgramStore<B: GpuBackend> {
    programs: Vec<Program<B>>,
    next_id: u32,
}

impl<B: GpuBackend> Default for ProgramStore<B> {
    fn default() -> Self {
        Self {
            programs: Vec::new(),
            next_id: 0,
        }
    }
}

impl<B: GpuBackend> ProgramStore<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `source` under `name` with an application-declared input layout.
    pub fn load(
        &mut self,
        backend: &B,
        name: &str,
        source: &str,
        input_layout: ShaderInputLayout,
    ) -> Result<ProgramId> {
        let raw = backend
            .create_program(name, source)
            .with_context(|| format!("failed to load program '{name}'"))?;

        let id = ProgramId(self.next_id);
        self.next_id += 1;

        log::debug!(
            "loaded {id} '{name}' with inputs {:?}",
            input_layout.locations().collect::<Vec<_>>()
        );

        self.programs.push(Program {
            id,
            name: name.to_string(),
            input_layout,
            raw,
        });
        Ok(id)
    }

    pub fn get(&self, id: ProgramId) -> Option<&Program<B>> {
        self.programs.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

/// Scalar type of an attribute component as read by the input assembler.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Float32,
}

/// How to feed one shader input from the vertex buffer.
///
/// `offset` is absolute within the shared geometry buffer: the attribute's
/// offset inside a vertex plus the submesh's first-vertex offset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BindingDirective {
    pub location: u32,
    pub component_count: u8,
    pub component_type: ComponentType,
    pub normalized: bool,
    pub stride: u32,
    pub offset: u64,
}

/// Ordered directives for one `(submesh, shader)` pair, in shader declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingPlan {
    pub(super) directives: Vec<BindingDirective>,
    pub(super) stride: u32,
    pub(super) base_offset: u64,
}

impl BindingPlan {
    #[inline]
    pub fn directives(&self) -> &[BindingDirective] {
        &self.directives
    }

    /// Vertex stride shared by every directive.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Byte offset of the submesh's first vertex inside the geometry buffer.
    ///
    /// Backends that bind a buffer sub-range starting at the submesh (wgpu)
    /// subtract this from each directive's `offset`.
    #[inline]
    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    /// Directive offset relative to the submesh's first vertex.
    #[inline]
    pub fn relative_offset(&self, directive: &BindingDirective) -> u64 {
        directive.offset - self.base_offset
    }
}

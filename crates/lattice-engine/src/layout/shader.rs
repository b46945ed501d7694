use super::{LayoutError, VertexBufferLayout};

/// One vertex input a shader program reads.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ShaderAttribute {
    pub location: u32,
    pub component_count: u8,
}

/// Ordered vertex inputs of a shader program.
///
/// Declared by the application when the program is loaded, not introspected
/// from shader source. Locations are unique within a layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderInputLayout {
    attributes: Vec<ShaderAttribute>,
}

impl ShaderInputLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a layout from `(location, component_count)` pairs in declaration order.
    pub fn from_pairs(pairs: &[(u32, u8)]) -> Result<Self, LayoutError> {
        let mut layout = Self::new();
        for &(location, component_count) in pairs {
            layout.push(location, component_count)?;
        }
        Ok(layout)
    }

    /// Appends an input. Rejects out-of-range component counts and repeated locations.
    pub fn push(&mut self, location: u32, component_count: u8) -> Result<(), LayoutError> {
        if !(1..=4).contains(&component_count) {
            return Err(LayoutError::ComponentCount {
                location,
                count: component_count,
            });
        }
        if self.attributes.iter().any(|a| a.location == location) {
            return Err(LayoutError::DuplicateLocation { location });
        }

        self.attributes.push(ShaderAttribute {
            location,
            component_count,
        });
        Ok(())
    }

    #[inline]
    pub fn attributes(&self) -> &[ShaderAttribute] {
        &self.attributes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterates over declared locations in order.
    pub fn locations(&self) -> impl Iterator<Item = u32> + '_ {
        self.attributes.iter().map(|a| a.location)
    }
}

/// Returns `true` iff every location `shader` declares is provided by `vertex`.
pub fn is_complete(shader: &ShaderInputLayout, vertex: &VertexBufferLayout) -> bool {
    shader.locations().all(|loc| vertex.find(loc).is_some())
}

use super::LayoutError;

/// Size in bytes of one attribute component.
///
/// Vertex data is uploaded as flat `f32` arrays, so every component is a float.
pub const COMPONENT_SIZE: u32 = 4;

/// One attribute provided by a geometry source.
///
/// `byte_offset` is relative to the start of a vertex, not to the start of the
/// buffer. The submesh's own position inside the shared buffer is applied at
/// resolution time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttributeSpec {
    pub location: u32,
    pub component_count: u8,
    pub byte_offset: u32,
}

impl VertexAttributeSpec {
    #[inline]
    pub const fn new(location: u32, component_count: u8, byte_offset: u32) -> Self {
        Self {
            location,
            component_count,
            byte_offset,
        }
    }

    /// Number of bytes this attribute occupies inside a vertex.
    #[inline]
    pub const fn byte_size(&self) -> u32 {
        self.component_count as u32 * COMPONENT_SIZE
    }

    /// Byte offset one past the last byte of this attribute.
    ///
    /// Widened to `u64` so an offset near `u32::MAX` cannot wrap.
    #[inline]
    pub const fn end(&self) -> u64 {
        self.byte_offset as u64 + self.byte_size() as u64
    }
}

/// Ordered attribute list plus the stride between consecutive vertices.
///
/// Entries are appended while a mesh is loaded and never mutated afterwards.
/// Several entries may share a location; lookups return the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexBufferLayout {
    attributes: Vec<VertexAttributeSpec>,
    stride: u32,
}

impl VertexBufferLayout {
    /// Creates an empty layout with the given stride in bytes.
    pub fn new(stride: u32) -> Result<Self, LayoutError> {
        if stride == 0 || stride % COMPONENT_SIZE != 0 {
            return Err(LayoutError::InvalidStride { stride });
        }
        Ok(Self {
            attributes: Vec::new(),
            stride,
        })
    }

    /// Builds a tightly packed, interleaved layout from `(location, component_count)`
    /// pairs. Offsets follow declaration order and the stride is their sum.
    ///
    /// ```rust,ignore
    /// // position (vec3) followed by uv (vec2): stride 20, uv at byte 12
    /// let layout = VertexBufferLayout::packed(&[(0, 3), (1, 2)])?;
    /// ```
    pub fn packed(attributes: &[(u32, u8)]) -> Result<Self, LayoutError> {
        let mut specs = Vec::with_capacity(attributes.len());
        let mut offset = 0u32;

        for &(location, component_count) in attributes {
            check_component_count(location, component_count)?;
            let spec = VertexAttributeSpec::new(location, component_count, offset);
            offset = u32::try_from(spec.end())
                .map_err(|_| LayoutError::InvalidStride { stride: u32::MAX })?;
            specs.push(spec);
        }

        let mut layout = Self::new(offset)?;
        layout.attributes = specs;
        Ok(layout)
    }

    /// Appends an attribute, checking it against the stride.
    pub fn push(&mut self, attribute: VertexAttributeSpec) -> Result<(), LayoutError> {
        let VertexAttributeSpec {
            location,
            component_count,
            byte_offset,
        } = attribute;

        check_component_count(location, component_count)?;

        if byte_offset % COMPONENT_SIZE != 0 {
            return Err(LayoutError::UnalignedOffset {
                location,
                offset: byte_offset,
            });
        }

        let end = attribute.end();
        if end > u64::from(self.stride) {
            return Err(LayoutError::AttributeOutOfStride {
                location,
                end,
                stride: self.stride,
            });
        }

        self.attributes.push(attribute);
        Ok(())
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, location: u32, component_count: u8, byte_offset: u32) -> Result<Self, LayoutError> {
        self.push(VertexAttributeSpec::new(location, component_count, byte_offset))?;
        Ok(self)
    }

    #[inline]
    pub fn attributes(&self) -> &[VertexAttributeSpec] {
        &self.attributes
    }

    /// Bytes between the starts of two consecutive vertices.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Number of `f32` values that make up one vertex.
    #[inline]
    pub fn floats_per_vertex(&self) -> u32 {
        self.stride / COMPONENT_SIZE
    }

    /// Returns the first attribute bound to `location`, scanning from the first entry.
    pub fn find(&self, location: u32) -> Option<&VertexAttributeSpec> {
        self.attributes.iter().find(|a| a.location == location)
    }
}

fn check_component_count(location: u32, count: u8) -> Result<(), LayoutError> {
    if (1..=4).contains(&count) {
        Ok(())
    } else {
        Err(LayoutError::ComponentCount { location, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn packed_computes_offsets_and_stride() {
        let layout = VertexBufferLayout::packed(&[(0, 3), (1, 2)]).unwrap();
        assert_eq!(layout.stride(), 20);
        assert_eq!(
            layout.attributes(),
            &[
                VertexAttributeSpec::new(0, 3, 0),
                VertexAttributeSpec::new(1, 2, 12),
            ]
        );
        assert_eq!(layout.floats_per_vertex(), 5);
    }

    #[test]
    fn explicit_builder_matches_packed() {
        let built = VertexBufferLayout::new(20)
            .and_then(|l| l.with(0, 3, 0))
            .and_then(|l| l.with(1, 2, 12))
            .unwrap();
        assert_eq!(built, VertexBufferLayout::packed(&[(0, 3), (1, 2)]).unwrap());
    }

    #[test]
    fn zero_stride_is_rejected() {
        assert_eq!(
            VertexBufferLayout::new(0),
            Err(LayoutError::InvalidStride { stride: 0 })
        );
    }

    #[test]
    fn unaligned_stride_is_rejected() {
        assert_eq!(
            VertexBufferLayout::new(18),
            Err(LayoutError::InvalidStride { stride: 18 })
        );
    }

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn component_count_out_of_range() {
        let err = VertexBufferLayout::new(32).unwrap().with(3, 5, 0).unwrap_err();
        assert_eq!(err, LayoutError::ComponentCount { location: 3, count: 5 });

        let err = VertexBufferLayout::packed(&[(0, 0)]).unwrap_err();
        assert_eq!(err, LayoutError::ComponentCount { location: 0, count: 0 });
    }

    #[test]
    fn unaligned_offset() {
        let err = VertexBufferLayout::new(32).unwrap().with(1, 2, 6).unwrap_err();
        assert_eq!(err, LayoutError::UnalignedOffset { location: 1, offset: 6 });
    }

    #[test]
    fn attribute_must_fit_in_stride() {
        let err = VertexBufferLayout::new(20).unwrap().with(1, 3, 12).unwrap_err();
        assert_eq!(
            err,
            LayoutError::AttributeOutOfStride { location: 1, end: 24, stride: 20 }
        );
    }

    #[test]
    fn offset_near_u32_max_does_not_wrap() {
        let err = VertexBufferLayout::new(20)
            .unwrap()
            .with(0, 4, u32::MAX - 3)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::AttributeOutOfStride {
                location: 0,
                end: u64::from(u32::MAX) + 13,
                stride: 20,
            }
        );
    }

    #[test]
    fn attribute_ending_exactly_at_stride_is_accepted() {
        assert!(VertexBufferLayout::new(20).unwrap().with(1, 2, 12).is_ok());
    }

    // ── lookup ────────────────────────────────────────────────────────────

    #[test]
    fn find_returns_first_match() {
        let layout = VertexBufferLayout::new(32)
            .and_then(|l| l.with(0, 3, 0))
            .and_then(|l| l.with(2, 2, 12))
            .and_then(|l| l.with(2, 4, 16))
            .unwrap();
        assert_eq!(layout.find(2), Some(&VertexAttributeSpec::new(2, 2, 12)));
    }

    #[test]
    fn find_considers_the_first_entry() {
        let layout = VertexBufferLayout::packed(&[(0, 3), (1, 2)]).unwrap();
        assert_eq!(layout.find(0), Some(&VertexAttributeSpec::new(0, 3, 0)));
        assert_eq!(layout.find(7), None);
    }
}

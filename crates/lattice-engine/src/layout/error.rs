use thiserror::Error;

/// Malformed layout descriptor.
///
/// Raised while a layout is being assembled (mesh load / program load), never
/// during drawing.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("attribute at location {location} has {count} components (expected 1..=4)")]
    ComponentCount { location: u32, count: u8 },

    #[error("attribute at location {location} has byte offset {offset}, not a multiple of 4")]
    UnalignedOffset { location: u32, offset: u32 },

    #[error("vertex stride {stride} must be a non-zero multiple of 4")]
    InvalidStride { stride: u32 },

    #[error("attribute at location {location} ends at byte {end}, past the stride of {stride}")]
    AttributeOutOfStride { location: u32, end: u64, stride: u32 },

    #[error("shader layout declares location {location} more than once")]
    DuplicateLocation { location: u32 },
}

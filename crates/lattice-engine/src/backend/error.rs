use thiserror::Error;

use super::BufferKind;

/// A GPU object could not be created.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("{kind:?} buffer '{label}' has no contents")]
    EmptyBuffer { kind: BufferKind, label: String },

    #[error("{what} of {requested} exceeds the device limit of {limit}")]
    LimitExceeded {
        what: &'static str,
        requested: u64,
        limit: u64,
    },

    #[error("texture '{label}' expects {expected} bytes of RGBA8 data, got {actual}")]
    TextureSize {
        label: String,
        expected: usize,
        actual: usize,
    },

    #[error("device rejected '{label}': {message}")]
    Rejected { label: String, message: String },
}

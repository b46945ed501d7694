use thiserror::Error;

use crate::backend::ResourceError;

/// Failure to produce a binding for a `(submesh, program)` pair.
///
/// None of these leave anything behind in the cache; a later request for the
/// same pair resolves again from scratch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The shader reads a location the submesh does not provide.
    #[error("shader requires vertex attribute at location {location}, which the submesh does not provide")]
    MissingAttribute { location: u32 },

    /// The backend could not create the binding object.
    #[error("failed to create vertex binding: {0}")]
    Resource(#[from] ResourceError),

    /// The submesh already holds bindings for `limit` distinct programs.
    #[error("binding cache full ({limit} programs already bound to this submesh)")]
    CacheFull { limit: usize },
}

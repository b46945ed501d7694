//! Vertex attribute layouts.
//!
//! Two views of the same vertex stream meet here:
//! - [`VertexBufferLayout`] describes what a geometry source provides (one per submesh)
//! - [`ShaderInputLayout`] describes what a shader program consumes
//!
//! Both are plain data. Matching one against the other is done by
//! [`crate::binding::resolve`]; [`is_complete`] answers the yes/no question
//! without building a plan.

mod attribute;
mod error;
mod shader;

pub use attribute::{VertexAttributeSpec, VertexBufferLayout, COMPONENT_SIZE};
pub use error::LayoutError;
pub use shader::{is_complete, ShaderAttribute, ShaderInputLayout};

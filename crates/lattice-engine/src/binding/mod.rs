//! Vertex binding resolution and the per-submesh binding cache.
//!
//! A binding is the GPU object that tells the input assembler how to read a
//! submesh's vertex data for one particular shader program (a VAO in GL terms,
//! a render pipeline's vertex state under wgpu).
//!
//! Flow:
//! - [`resolve`] matches a shader's inputs against a submesh's attributes and
//!   produces a [`BindingPlan`]
//! - [`BindingCache`] memoizes the GPU object built from that plan, keyed by
//!   program identity

mod cache;
mod error;
mod plan;
mod resolver;

pub use cache::{BindingCache, ResolvedBinding, DEFAULT_BINDING_LIMIT};
pub use error::BindingError;
pub use plan::{BindingDirective, BindingPlan, ComponentType};
pub use resolver::resolve;

//! Lattice engine crate.
//!
//! Vertex-input binding for a small mesh renderer: layouts describe what a
//! vertex buffer holds and what a program reads, the resolver matches them,
//! and each submesh caches one binding object per program it is drawn with.
//! The window, device, and frame pieces around it drive a viewer.

pub mod backend;
pub mod binding;
pub mod core;
pub mod device;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod render;
pub mod resources;
pub mod time;
pub mod window;

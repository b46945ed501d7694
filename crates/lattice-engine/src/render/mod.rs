//! Drawing: render targets, the mode switch, and the renderer.
//!
//! [`Scene`] holds everything that does not depend on wgpu and decides what a
//! frame draws. [`Renderer`] records those draws into a wgpu render pass.

mod ctx;
mod mode;
mod renderer;
mod scene;

pub use ctx::{RenderTarget, Viewport};
pub use mode::{Mode, ParseModeError};
pub use renderer::{Renderer, RendererConfig};
pub use scene::{DrawCall, DrawItem, DrawStats, Scene};

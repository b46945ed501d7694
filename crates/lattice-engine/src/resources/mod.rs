//! GPU-resident resources owned by the renderer: programs, textures, materials.
//!
//! Each store hands out small copyable ids; the ids stay valid for the store's
//! lifetime (nothing is unloaded individually).

mod material;
mod program;
mod texture;

pub use material::{Material, MaterialId, Model};
pub use program::{Program, ProgramId, ProgramStore};
pub use texture::{BuiltinTextures, TextureId, TextureStore};

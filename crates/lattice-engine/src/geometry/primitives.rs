//! Embedded shapes built from explicit vertex tables.
//!
//! Coordinates are in clip space (x, y in [-1, 1], z = 0) since the harness
//! draws without a camera.

use crate::layout::{LayoutError, VertexBufferLayout};

use super::{MeshData, SubmeshData};

/// Shader location of the position attribute in every primitive.
pub const POSITION: u32 = 0;
/// Shader location of the normal attribute (lit primitives only).
pub const NORMAL: u32 = 1;
/// Texture coordinates: location 1 for the plain quad, location 2 for lit primitives.
pub const QUAD_TEXCOORD: u32 = 1;
pub const MESH_TEXCOORD: u32 = 2;

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Position (vec3) + uv (vec2) unit quad centered on the origin, 20-byte stride.
pub fn quad() -> Result<MeshData, LayoutError> {
    #[rustfmt::skip]
    let vertices = vec![
        // x     y    z    u    v
        -0.5, -0.5, 0.0, 0.0, 1.0,
         0.5, -0.5, 0.0, 1.0, 1.0,
         0.5,  0.5, 0.0, 1.0, 0.0,
        -0.5,  0.5, 0.0, 0.0, 0.0,
    ];

    let layout = VertexBufferLayout::packed(&[(POSITION, 3), (QUAD_TEXCOORD, 2)])?;

    Ok(MeshData::new("embedded quad").with_submesh(SubmeshData::new(
        layout,
        vertices,
        QUAD_INDICES.to_vec(),
    )))
}

/// `cols x rows` tiles covering `[-extent, extent]^2`, one submesh per tile.
///
/// Vertices are position (vec3) + normal (vec3) + uv (vec2), 32-byte stride,
/// so every tile lives at a different offset of the shared buffers.
pub fn tiles(cols: u32, rows: u32, extent: f32, gap: f32) -> Result<MeshData, LayoutError> {
    let layout = VertexBufferLayout::packed(&[(POSITION, 3), (NORMAL, 3), (MESH_TEXCOORD, 2)])?;

    let cols = cols.max(1);
    let rows = rows.max(1);
    let cell_w = 2.0 * extent / cols as f32;
    let cell_h = 2.0 * extent / rows as f32;
    let inset = gap * 0.5;

    let mut mesh = MeshData::new(format!("tiles {cols}x{rows}"));

    for row in 0..rows {
        for col in 0..cols {
            let x0 = -extent + col as f32 * cell_w + inset;
            let x1 = x0 + cell_w - gap;
            let y1 = extent - row as f32 * cell_h - inset;
            let y0 = y1 - cell_h + gap;

            #[rustfmt::skip]
            let vertices = vec![
                x0, y0, 0.0,  0.0, 0.0, 1.0,  0.0, 1.0,
                x1, y0, 0.0,  0.0, 0.0, 1.0,  1.0, 1.0,
                x1, y1, 0.0,  0.0, 0.0, 1.0,  1.0, 0.0,
                x0, y1, 0.0,  0.0, 0.0, 1.0,  0.0, 0.0,
            ];

            mesh = mesh.with_submesh(SubmeshData::new(
                layout.clone(),
                vertices,
                QUAD_INDICES.to_vec(),
            ));
        }
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{is_complete, ShaderInputLayout};

    #[test]
    fn quad_matches_position_uv_program() {
        let quad = quad().unwrap();
        assert_eq!(quad.submeshes.len(), 1);

        let sub = &quad.submeshes[0];
        assert_eq!(sub.layout.stride(), 20);
        assert_eq!(sub.vertices.len(), 4 * 5);

        let textured = ShaderInputLayout::from_pairs(&[(0, 3), (1, 2)]).unwrap();
        assert!(is_complete(&textured, &sub.layout));
    }

    #[test]
    fn quad_lacks_mesh_texcoord() {
        let quad = quad().unwrap();
        let albedo = ShaderInputLayout::from_pairs(&[(0, 3), (2, 2)]).unwrap();
        assert!(!is_complete(&albedo, &quad.submeshes[0].layout));
    }

    #[test]
    fn tiles_produce_one_submesh_per_cell() {
        let mesh = tiles(3, 2, 0.9, 0.05).unwrap();
        assert_eq!(mesh.submeshes.len(), 6);
        for sub in &mesh.submeshes {
            assert_eq!(sub.layout.stride(), 32);
            assert_eq!(sub.vertices.len(), 4 * 8);
            assert_eq!(sub.indices, QUAD_INDICES.to_vec());
        }
    }

    #[test]
    fn tiles_stay_inside_extent() {
        let mesh = tiles(4, 4, 0.8, 0.0).unwrap();
        for sub in &mesh.submeshes {
            for v in sub.vertices.chunks_exact(8) {
                assert!(v[0].abs() <= 0.8 + 1e-5);
                assert!(v[1].abs() <= 0.8 + 1e-5);
            }
        }
    }
}

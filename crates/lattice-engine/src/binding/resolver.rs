use crate::layout::{ShaderInputLayout, VertexBufferLayout};

use super::{BindingDirective, BindingError, BindingPlan, ComponentType};

/// Matches `shader`'s inputs against `vertex`'s attributes.
///
/// Directives follow the shader's declaration order. For each input the vertex
/// layout is scanned from its first entry and the first attribute with the same
/// location wins. Any unmatched input fails the whole resolution; no partial
/// plan is returned.
///
/// `vertex_byte_offset` is where the submesh's first vertex lives in the shared
/// geometry buffer.
pub fn resolve(
    shader: &ShaderInputLayout,
    vertex: &VertexBufferLayout,
    vertex_byte_offset: u64,
) -> Result<BindingPlan, BindingError> {
    let stride = vertex.stride();

    let directives = shader
        .attributes()
        .iter()
        .map(|input| {
            let attr = vertex
                .find(input.location)
                .ok_or(BindingError::MissingAttribute {
                    location: input.location,
                })?;

            Ok(BindingDirective {
                location: input.location,
                component_count: attr.component_count,
                component_type: ComponentType::Float32,
                normalized: false,
                stride,
                offset: u64::from(attr.byte_offset) + vertex_byte_offset,
            })
        })
        .collect::<Result<Vec<_>, BindingError>>()?;

    Ok(BindingPlan {
        directives,
        stride,
        base_offset: vertex_byte_offset,
    })
}

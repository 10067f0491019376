use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

pub const QUAD_INDICES: &[u16] = &[0, 1, 2, 0, 2, 3];

/// Quad drawing an `image_width`×`image_height` texture at 1:1 scale,
/// anchored to the top-left corner of a `surface_width`×`surface_height`
/// surface. Parts past the surface edge are clipped by the rasterizer.
pub fn quad_vertices(
    image_width: u32,
    image_height: u32,
    surface_width: u32,
    surface_height: u32,
) -> [Vertex; 4] {
    let right = -1.0 + 2.0 * image_width as f32 / surface_width.max(1) as f32;
    let bottom = 1.0 - 2.0 * image_height as f32 / surface_height.max(1) as f32;

    [
        Vertex { pos: [-1.0, bottom], uv: [0.0, 1.0] },
        Vertex { pos: [right, bottom], uv: [1.0, 1.0] },
        Vertex { pos: [right, 1.0], uv: [1.0, 0.0] },
        Vertex { pos: [-1.0, 1.0], uv: [0.0, 0.0] },
    ]
}
